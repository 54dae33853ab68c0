//! Wire-level bus definition for the dial device.
//!
//! The host and the dial engine share five lines, all sampled or driven
//! relative to a single clock:
//!
//! ```text
//!              host ──────────────────────────► device
//!   clock      ─┐_┌─┐_┌─┐_┌─   (host-synthesized square wave)
//!   strobe     ───┌───┐─────   (high for exactly one clock period)
//!   direction  ═══╡ 1 ╞═════   (1 = increase, 0 = decrease)
//!   step_count ═══╡ N ╞═════   (10-bit parallel magnitude)
//!   reset      ─────────────   (forces initial state on its edge)
//!
//!              device ────────────────────────► observer
//!   zero_crossing_count  ═════  (11-bit, valid at all times)
//! ```
//!
//! Instructions travel one way. There is no acknowledgment, completion,
//! or backpressure line; correct delivery rests entirely on the host's
//! idle-wait discipline (see `crate::driver::timing`).

// ============================================================================
// Field widths
// ============================================================================

/// Width of the `step_count` input bus: 10 bits.
pub const STEP_COUNT_BITS: u32 = 10;

/// Largest magnitude the step-count lines can carry: 1023.
pub const STEP_COUNT_MAX: u16 = (1 << STEP_COUNT_BITS) - 1;

/// Width of the `zero_crossing_count` output bus: 11 bits.
pub const ZERO_COUNT_BITS: u32 = 11;

/// Largest value the zero-crossing accumulator can hold: 2047.
pub const ZERO_COUNT_MAX: u16 = (1 << ZERO_COUNT_BITS) - 1;

// ============================================================================
// Dial geometry and power-up values
// ============================================================================

/// Number of dial positions; the dial wraps past `DIAL_POSITIONS - 1`
/// and below 0.
pub const DIAL_POSITIONS: u8 = 100;

/// Dial position at power-up and after reset.
pub const INITIAL_POSITION: u8 = 50;

/// Truncate a host-side magnitude to what the step-count lines carry.
#[inline]
pub fn truncate_step_count(count: u64) -> u16 {
    (count & STEP_COUNT_MAX as u64) as u16
}

/// Input lines as currently driven by the host.
///
/// This is the device-facing half of the bus: the engine samples these
/// on each rising clock edge and never writes them. Levels persist until
/// the host changes them, like real wires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusInputs {
    /// Strobe line: high means "latch direction and step count this edge".
    pub strobe: bool,
    /// Direction line level: high = increase, low = decrease.
    pub direction: bool,
    /// Step-count lines, already truncated to [`STEP_COUNT_BITS`].
    pub step_count: u16,
    /// Reset line: high forces initial state this edge.
    pub reset: bool,
}

impl BusInputs {
    /// All lines low (the released bus).
    pub fn idle() -> Self {
        Self::default()
    }

    /// Drive the instruction lines, truncating the magnitude to the
    /// physical bus width. Strobe is left untouched.
    pub fn drive(&mut self, direction_level: bool, count: u64) {
        self.direction = direction_level;
        self.step_count = truncate_step_count(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_widths() {
        assert_eq!(STEP_COUNT_MAX, 1023);
        assert_eq!(ZERO_COUNT_MAX, 2047);
    }

    #[test]
    fn test_truncate_step_count() {
        assert_eq!(truncate_step_count(0), 0);
        assert_eq!(truncate_step_count(1023), 1023);
        // 1024 has only bit 10 set, which falls off the bus
        assert_eq!(truncate_step_count(1024), 0);
        assert_eq!(truncate_step_count(1025), 1);
        assert_eq!(truncate_step_count(5000), 5000 & 1023);
    }

    #[test]
    fn test_bus_drive_truncates() {
        let mut bus = BusInputs::idle();
        bus.drive(true, 2047);
        assert!(bus.direction);
        assert_eq!(bus.step_count, 1023);
        assert!(!bus.strobe);
    }
}
