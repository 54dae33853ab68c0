//! Core emulation logic for the dial device.
//!
//! The engine wraps the passive device model from [`crate::device`] and
//! advances it edge by edge. Everything is single-owner and
//! single-threaded: one transition per rising edge, no concurrent
//! writers, no queueing.
//!
//! # Example
//!
//! ```
//! use dial_emu::emu::Engine;
//!
//! let mut engine = Engine::default();
//! engine.bus.drive(true, 3);
//! engine.bus.strobe = true;
//! engine.rising_edge();
//! engine.bus.strobe = false;
//! engine.run_until_idle(2000);
//! assert_eq!(engine.position(), 53);
//! ```

pub mod engine;

pub use engine::{Engine, EngineStats, EngineStatus};
