//! Clock synthesis.
//!
//! The device has no oscillator of its own: the host manufactures the
//! clock by toggling a line on a software-timed cadence. That makes the
//! "clock period" only as precise as the host's sleep granularity,
//! which is the root of the tight-policy hazard described in
//! `crate::driver::timing`.
//!
//! # Design Philosophy
//!
//! Protocol code is written against [`ClockSource`] so two very
//! different hosts share it unchanged:
//!
//! - [`SimClock`]: deterministic, zero wall time; cycle counts are
//!   exact, so even the tight policy is safe under it.
//! - [`WallClock`]: sleeps each half period (scaled by the speed
//!   multiplier), reproducing the timing behavior of a driver wired to
//!   real lines.

use std::time::Duration;

use crate::emu::Engine;

/// A source of clock cycles for the dial engine.
///
/// One call to [`ClockSource::cycle`] is one full clock period: the
/// line rises (the engine samples its inputs), holds, and falls. The
/// falling edge does nothing device-side; it exists so the host has a
/// low phase in which to change the input lines.
pub trait ClockSource {
    /// Drive one full clock cycle into the engine.
    fn cycle(&mut self, engine: &mut Engine);
}

/// Deterministic clock for simulation: edges take no wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock;

impl ClockSource for SimClock {
    fn cycle(&mut self, engine: &mut Engine) {
        engine.rising_edge();
    }
}

/// Wall-timed clock: one sleep per half period.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    half_period: Duration,
}

impl WallClock {
    /// Create a clock with the given half period, scaled by `speed`
    /// (> 1 shortens waits, < 1 lengthens them).
    pub fn new(half_period_us: u64, speed: f64) -> Self {
        let speed = if speed > 0.0 {
            speed
        } else {
            log::warn!("ignoring non-positive speed multiplier {}", speed);
            1.0
        };
        let nanos = (half_period_us as f64 * 1000.0 / speed).round() as u64;
        Self {
            half_period: Duration::from_nanos(nanos),
        }
    }

    /// Effective half period after speed scaling.
    pub fn half_period(&self) -> Duration {
        self.half_period
    }
}

impl ClockSource for WallClock {
    fn cycle(&mut self, engine: &mut Engine) {
        // Rising edge, then the high phase.
        engine.rising_edge();
        std::thread::sleep(self.half_period);
        // Falling edge is a no-op for the device; hold the low phase so
        // line changes between cycles have a full half period of setup.
        std::thread::sleep(self.half_period);
    }
}
