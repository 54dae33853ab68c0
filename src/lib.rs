//! dial-emu library
//!
//! Cycle-accurate simulation of a rotary-dial zero-crossing counter and
//! the host-side driver that feeds it over a strobed parallel bus.

pub mod parser;
pub mod emu;
pub mod device;
pub mod driver;
pub mod config;
