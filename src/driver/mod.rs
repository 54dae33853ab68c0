//! Host-side driving of the dial device.
//!
//! This module provides:
//! - Clock synthesis (the host makes its own clock edges)
//! - Idle-wait timing policies (conservative and tight)
//! - The bus protocol driver that replays parsed programs
//!
//! # Protocol Overview
//!
//! Per instruction, the driver walks the bus through one latch and a
//! policy-sized quiet period:
//!
//! ```text
//!   drive lines ─► strobe high ─► latch edge ─► strobe low ─► idle
//!        │              │             │              │          │
//!   dir + count    low phase    1 rising edge   low phase    N cycles
//! ```
//!
//! There is no return channel. Instructions apply strictly in order,
//! and the only consistency hazard is a strobe arriving before the
//! previous instruction drained — which the idle wait exists to
//! prevent, and which the tight policy deliberately narrows to the
//! margin.

pub mod clock;
pub mod host;
pub mod timing;

pub use clock::{ClockSource, SimClock, WallClock};
pub use host::{DriverStats, HostDriver};
pub use timing::{IdlePolicy, TimingConfig};
