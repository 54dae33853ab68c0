//! Dial state machine.
//!
//! A synchronous machine with two states, `Idle` (no steps remaining)
//! and `Processing` (draining a latched instruction). All four state
//! elements live in [`DialState`] and change only inside
//! [`DialState::clock_edge`], evaluated once per rising clock edge in
//! priority order:
//!
//! 1. `reset` high: every element back to its power-up value.
//! 2. `strobe` high: latch direction and step count from the bus. This
//!    preempts an in-flight instruction unconditionally; whatever
//!    partial movement already happened is kept as the new starting
//!    point. The host's idle-wait discipline, not any signal, is what
//!    keeps strobe out of `Processing`.
//! 3. Steps remaining: move the dial one position in the latched
//!    direction and decrement. On the 1 to 0 transition, landing on
//!    position 0 bumps the zero-crossing accumulator.
//! 4. Otherwise: hold.
//!
//! # Example
//!
//! ```
//! use dial_emu::device::{BusInputs, DialState, OverflowPolicy};
//!
//! let mut bus = BusInputs::idle();
//! let mut dial = DialState::new();
//! assert_eq!(dial.position, 50);
//!
//! // Latch "R3" and let it drain.
//! bus.drive(true, 3);
//! bus.strobe = true;
//! dial.clock_edge(&bus, OverflowPolicy::Wrap);
//! bus.strobe = false;
//! while !dial.is_idle() {
//!     dial.clock_edge(&bus, OverflowPolicy::Wrap);
//! }
//! assert_eq!(dial.position, 53);
//! assert_eq!(dial.zero_count, 0);
//! ```

use serde::{Deserialize, Serialize};

use super::bus::{self, BusInputs};

/// Rotation direction, latched from the bus when an instruction is
/// accepted and fixed until the next latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Wrap-forward: 99 steps to 0.
    Increase,
    /// Wrap-backward: 0 steps to 99. Wire level 0, so also the
    /// power-up value.
    #[default]
    Decrease,
}

impl Direction {
    /// Decode the direction line level (1 = increase, 0 = decrease).
    #[inline]
    pub fn from_level(level: bool) -> Self {
        if level {
            Direction::Increase
        } else {
            Direction::Decrease
        }
    }

    /// Line level this direction is driven as.
    #[inline]
    pub fn level(self) -> bool {
        matches!(self, Direction::Increase)
    }

    /// One wrap-step from `position` in this direction.
    #[inline]
    pub fn advance(self, position: u8) -> u8 {
        match self {
            Direction::Increase => {
                if position + 1 >= bus::DIAL_POSITIONS {
                    0
                } else {
                    position + 1
                }
            }
            Direction::Decrease => {
                if position == 0 {
                    bus::DIAL_POSITIONS - 1
                } else {
                    position - 1
                }
            }
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Increase => write!(f, "R"),
            Direction::Decrease => write!(f, "L"),
        }
    }
}

/// What the zero-crossing accumulator does when it exceeds its 11-bit
/// field. The hardware arithmetic wraps; saturate is offered as a
/// configuration alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Wrap at the field width.
    #[default]
    Wrap,
    /// Hold at the field maximum.
    Saturate,
}

/// What a single rising edge did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEffect {
    /// Idle with strobe low; nothing changed.
    Held,
    /// Reset sampled high; state back to power-up values.
    Reset,
    /// Strobe sampled high; direction and count latched.
    Latched {
        /// An instruction was still in flight when the latch fired.
        preempted: bool,
    },
    /// One dial step applied.
    Stepped {
        /// This step exhausted the latched count.
        completed: bool,
        /// The completing step landed on position 0.
        crossed: bool,
    },
}

/// The four device state elements.
///
/// Created once at power-up and only ever overwritten, mirroring the
/// registers of the synthesized machine. Field widths are enforced at
/// the points the hardware enforces them: the latch masks the incoming
/// count to 10 bits and the accumulator is bounded to 11.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialState {
    /// Dial position, always in [0, 99].
    pub position: u8,
    /// Latched direction for the instruction in flight.
    pub direction: Direction,
    /// Steps left on the instruction in flight.
    pub remaining: u16,
    /// Zero-crossing accumulator.
    pub zero_count: u16,
}

impl Default for DialState {
    fn default() -> Self {
        Self::new()
    }
}

impl DialState {
    /// State at power-up: dial at 50, nothing in flight, count 0.
    pub fn new() -> Self {
        Self {
            position: bus::INITIAL_POSITION,
            direction: Direction::default(),
            remaining: 0,
            zero_count: 0,
        }
    }

    /// True when no instruction is in flight.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.remaining == 0
    }

    /// Apply one rising clock edge with the bus at the given levels.
    pub fn clock_edge(&mut self, bus: &BusInputs, overflow: OverflowPolicy) -> EdgeEffect {
        if bus.reset {
            *self = Self::new();
            return EdgeEffect::Reset;
        }

        if bus.strobe {
            let preempted = self.remaining > 0;
            self.direction = Direction::from_level(bus.direction);
            // 10-bit holding register
            self.remaining = bus.step_count & bus::STEP_COUNT_MAX;
            log::trace!(
                "latch {}{} (preempted={})",
                self.direction,
                self.remaining,
                preempted
            );
            return EdgeEffect::Latched { preempted };
        }

        if self.remaining > 0 {
            self.position = self.direction.advance(self.position);
            self.remaining -= 1;

            let completed = self.remaining == 0;
            let crossed = completed && self.position == 0;
            if crossed {
                self.zero_count = match overflow {
                    OverflowPolicy::Wrap => (self.zero_count + 1) & bus::ZERO_COUNT_MAX,
                    OverflowPolicy::Saturate => (self.zero_count + 1).min(bus::ZERO_COUNT_MAX),
                };
            }
            log::trace!(
                "step to {} (remaining={} crossed={})",
                self.position,
                self.remaining,
                crossed
            );
            return EdgeEffect::Stepped { completed, crossed };
        }

        EdgeEffect::Held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latch(dial: &mut DialState, direction: Direction, count: u16) {
        let bus = BusInputs {
            strobe: true,
            direction: direction.level(),
            step_count: count,
            reset: false,
        };
        dial.clock_edge(&bus, OverflowPolicy::Wrap);
    }

    fn drain(dial: &mut DialState) -> u64 {
        let bus = BusInputs::idle();
        let mut edges = 0;
        while !dial.is_idle() {
            dial.clock_edge(&bus, OverflowPolicy::Wrap);
            edges += 1;
        }
        edges
    }

    #[test]
    fn test_power_up_state() {
        let dial = DialState::new();
        assert_eq!(dial.position, 50);
        assert_eq!(dial.direction, Direction::Decrease);
        assert_eq!(dial.remaining, 0);
        assert_eq!(dial.zero_count, 0);
        assert!(dial.is_idle());
    }

    #[test]
    fn test_idle_hold_changes_nothing() {
        let mut dial = DialState::new();
        let bus = BusInputs::idle();
        let before = dial.clone();

        for _ in 0..1000 {
            assert_eq!(dial.clock_edge(&bus, OverflowPolicy::Wrap), EdgeEffect::Held);
        }
        assert_eq!(dial, before);
    }

    #[test]
    fn test_latch_and_drain() {
        let mut dial = DialState::new();
        latch(&mut dial, Direction::Increase, 3);
        assert_eq!(dial.remaining, 3);

        let edges = drain(&mut dial);
        assert_eq!(edges, 3);
        assert_eq!(dial.position, 53);
        assert_eq!(dial.zero_count, 0);
    }

    #[test]
    fn test_step_effects() {
        let mut dial = DialState::new();
        latch(&mut dial, Direction::Increase, 2);

        let bus = BusInputs::idle();
        let first = dial.clock_edge(&bus, OverflowPolicy::Wrap);
        assert_eq!(
            first,
            EdgeEffect::Stepped {
                completed: false,
                crossed: false
            }
        );

        let second = dial.clock_edge(&bus, OverflowPolicy::Wrap);
        assert_eq!(
            second,
            EdgeEffect::Stepped {
                completed: true,
                crossed: false
            }
        );
    }

    #[test]
    fn test_wraparound_decrease() {
        let mut dial = DialState::new();
        dial.position = 0;
        assert_eq!(Direction::Decrease.advance(0), 99);

        latch(&mut dial, Direction::Decrease, 1);
        drain(&mut dial);
        assert_eq!(dial.position, 99);
        assert_eq!(dial.zero_count, 0);
    }

    #[test]
    fn test_wraparound_increase_counts_crossing() {
        let mut dial = DialState::new();
        dial.position = 99;

        latch(&mut dial, Direction::Increase, 1);
        drain(&mut dial);
        assert_eq!(dial.position, 0);
        assert_eq!(dial.zero_count, 1);
    }

    #[test]
    fn test_zero_length_instruction() {
        let mut dial = DialState::new();
        dial.position = 0;

        latch(&mut dial, Direction::Increase, 0);
        assert!(dial.is_idle());

        // No 1 -> 0 transition ever happens, so sitting on 0 does not count.
        let bus = BusInputs::idle();
        for _ in 0..10 {
            dial.clock_edge(&bus, OverflowPolicy::Wrap);
        }
        assert_eq!(dial.position, 0);
        assert_eq!(dial.zero_count, 0);
    }

    #[test]
    fn test_crossing_only_on_final_step() {
        // Passes through 0 mid-instruction: 98 -> 99 -> 0 -> 1 -> 2.
        let mut dial = DialState::new();
        dial.position = 98;

        latch(&mut dial, Direction::Increase, 4);
        drain(&mut dial);
        assert_eq!(dial.position, 2);
        assert_eq!(dial.zero_count, 0);
    }

    #[test]
    fn test_lands_on_zero_counts() {
        let mut dial = DialState::new();
        latch(&mut dial, Direction::Decrease, 50);
        drain(&mut dial);
        assert_eq!(dial.position, 0);
        assert_eq!(dial.zero_count, 1);
    }

    #[test]
    fn test_preemption_discards_remainder() {
        let mut dial = DialState::new();
        latch(&mut dial, Direction::Increase, 10);

        // Four of A's ten steps land before B arrives.
        let bus = BusInputs::idle();
        for _ in 0..4 {
            dial.clock_edge(&bus, OverflowPolicy::Wrap);
        }
        assert_eq!(dial.position, 54);

        let effect = {
            let strobe_bus = BusInputs {
                strobe: true,
                direction: Direction::Decrease.level(),
                step_count: 2,
                reset: false,
            };
            dial.clock_edge(&strobe_bus, OverflowPolicy::Wrap)
        };
        assert_eq!(effect, EdgeEffect::Latched { preempted: true });

        drain(&mut dial);
        // A's partial progress plus B's full effect: 50 + 4 - 2.
        assert_eq!(dial.position, 52);
    }

    #[test]
    fn test_latch_masks_to_field_width() {
        let mut dial = DialState::new();
        let bus = BusInputs {
            strobe: true,
            direction: true,
            step_count: 1024, // poked past the bus width
            reset: false,
        };
        dial.clock_edge(&bus, OverflowPolicy::Wrap);
        assert_eq!(dial.remaining, 0);
    }

    #[test]
    fn test_reset_mid_instruction() {
        let mut dial = DialState::new();
        latch(&mut dial, Direction::Increase, 10);
        let bus = BusInputs::idle();
        for _ in 0..3 {
            dial.clock_edge(&bus, OverflowPolicy::Wrap);
        }
        assert_eq!(dial.position, 53);

        let reset_bus = BusInputs {
            reset: true,
            ..BusInputs::idle()
        };
        assert_eq!(
            dial.clock_edge(&reset_bus, OverflowPolicy::Wrap),
            EdgeEffect::Reset
        );
        assert_eq!(dial, DialState::new());
    }

    #[test]
    fn test_overflow_wrap() {
        let mut dial = DialState::new();
        dial.zero_count = bus::ZERO_COUNT_MAX;
        dial.position = 1;

        latch(&mut dial, Direction::Decrease, 1);
        drain(&mut dial);
        assert_eq!(dial.position, 0);
        assert_eq!(dial.zero_count, 0);
    }

    #[test]
    fn test_overflow_saturate() {
        let mut dial = DialState::new();
        dial.zero_count = bus::ZERO_COUNT_MAX;
        dial.position = 1;

        let strobe_bus = BusInputs {
            strobe: true,
            direction: false,
            step_count: 1,
            reset: false,
        };
        dial.clock_edge(&strobe_bus, OverflowPolicy::Saturate);
        let bus = BusInputs::idle();
        while !dial.is_idle() {
            dial.clock_edge(&bus, OverflowPolicy::Saturate);
        }
        assert_eq!(dial.position, 0);
        assert_eq!(dial.zero_count, bus::ZERO_COUNT_MAX);
    }

    #[test]
    fn test_direction_levels() {
        assert_eq!(Direction::from_level(true), Direction::Increase);
        assert_eq!(Direction::from_level(false), Direction::Decrease);
        assert!(Direction::Increase.level());
        assert!(!Direction::Decrease.level());
    }
}
