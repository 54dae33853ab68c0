//! Host-side timing model.
//!
//! Delivery is correct only by timing discipline: after the latch edge
//! the host must idle the bus long enough for the engine to drain
//! before the next strobe, because the device has no way to say it is
//! busy.
//!
//! ```text
//! strobe   ──┌─────┐──────────────────────────────┌─────┐──
//! clock    _┌┐_┌┐_┌┐_┌┐_┌┐_┌┐_┌┐_┌┐_┌┐_┌┐_┌┐_┌┐_┌┐_┌┐_┌┐_
//!             latch └── idle wait (policy-sized) ──┘ latch
//! ```
//!
//! # Idle policies
//!
//! - **Conservative**: a fixed bound covering the largest magnitude the
//!   step-count lines can carry, regardless of the instruction. Safe at
//!   any host timing granularity, slow for short instructions.
//! - **Tight** ("trick mode"): the instruction's own driven count plus
//!   a small margin. Minimal, and exactly sufficient when host timing
//!   is at least as fine as the device clock — but if host sleeps are
//!   coarser or jittery, under-waiting lets the next strobe cut off the
//!   in-flight instruction, silently (see `crate::device::dial`).

use crate::config::Config;

/// Default conservative idle bound: the 10-bit maximum of 1023 with slack.
pub const CONSERVATIVE_IDLE_CYCLES: u64 = 1040;

/// Default margin added to the driven count under the tight policy.
pub const TIGHT_IDLE_MARGIN: u64 = 2;

/// Default half period of the synthesized clock, in microseconds.
pub const CLOCK_HALF_PERIOD_US: u64 = 50;

/// Idle-wait policy applied between instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdlePolicy {
    /// Fixed bound independent of the instruction's magnitude.
    #[default]
    Conservative,
    /// Sized to the instruction's own driven count plus a margin.
    Tight,
}

/// Host timing configuration.
#[derive(Debug, Clone, Copy)]
pub struct TimingConfig {
    /// Idle cycles under [`IdlePolicy::Conservative`].
    pub conservative_idle_cycles: u64,
    /// Margin added to the driven count under [`IdlePolicy::Tight`].
    pub tight_idle_margin: u64,
    /// Half period of the synthesized clock, in microseconds.
    pub clock_half_period_us: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            conservative_idle_cycles: CONSERVATIVE_IDLE_CYCLES,
            tight_idle_margin: TIGHT_IDLE_MARGIN,
            clock_half_period_us: CLOCK_HALF_PERIOD_US,
        }
    }
}

impl TimingConfig {
    /// Build from the loaded configuration (file + environment).
    pub fn from_config(config: &Config) -> Self {
        Self {
            conservative_idle_cycles: config.conservative_idle_cycles(),
            tight_idle_margin: config.tight_idle_margin(),
            clock_half_period_us: config.clock_half_period_us(),
        }
    }

    /// Idle cycles to wait after latching an instruction.
    ///
    /// `driven_count` is the value actually put on the step-count lines
    /// (post-truncation), which is exactly the number of processing
    /// cycles the engine will spend on it.
    pub fn idle_cycles(&self, policy: IdlePolicy, driven_count: u16) -> u64 {
        match policy {
            IdlePolicy::Conservative => self.conservative_idle_cycles,
            IdlePolicy::Tight => driven_count as u64 + self.tight_idle_margin,
        }
    }
}
