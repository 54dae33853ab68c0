//! Device model for the rotary-dial counter.
//!
//! This module provides:
//! - Wire-level bus definition (field widths, masks, input line state)
//! - The dial state machine (position, latched direction, remaining
//!   steps, zero-crossing accumulator)
//!
//! # Device Overview
//!
//! The device is a single synchronous state machine behind a five-line
//! bus:
//!
//! ```text
//!            +-------------------------------+
//!   strobe ──►                               │
//!   dir    ──►   position   [0..99]  (50)    │
//!   count  ──►   direction  {R, L}           ├──► zero_crossing_count
//!   reset  ──►   remaining  10-bit           │         (11-bit)
//!   clock  ──►   zero_count 11-bit           │
//!            +-------------------------------+
//! ```
//!
//! One instruction is in flight at a time; a strobe during processing
//! replaces it (the documented preemption hazard). The zero-crossing
//! output is valid every cycle and is the device's only output.
//!
//! # Example
//!
//! ```
//! use dial_emu::device::{BusInputs, DialState, Direction, OverflowPolicy};
//!
//! let mut dial = DialState::new();
//! let mut bus = BusInputs::idle();
//!
//! // Latch "L50": 50 steps down from the power-up position lands on 0.
//! bus.drive(Direction::Decrease.level(), 50);
//! bus.strobe = true;
//! dial.clock_edge(&bus, OverflowPolicy::Wrap);
//! bus.strobe = false;
//! while !dial.is_idle() {
//!     dial.clock_edge(&bus, OverflowPolicy::Wrap);
//! }
//! assert_eq!(dial.position, 0);
//! assert_eq!(dial.zero_count, 1);
//! ```

pub mod bus;
pub mod dial;

pub use bus::{
    BusInputs, DIAL_POSITIONS, INITIAL_POSITION, STEP_COUNT_BITS, STEP_COUNT_MAX,
    ZERO_COUNT_BITS, ZERO_COUNT_MAX,
};
pub use dial::{DialState, Direction, EdgeEffect, OverflowPolicy};
