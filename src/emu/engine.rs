//! Dial emulation engine.
//!
//! The engine owns the device state together with the input lines the
//! host drives, and advances the state machine one rising edge at a
//! time. It also keeps observer-side counters for summaries and tests;
//! those counters never flow back to the host side, which has no return
//! channel besides the zero-crossing output itself.
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = Engine::default();
//! engine.bus.drive(true, 3);
//! engine.bus.strobe = true;
//! engine.rising_edge();          // latch edge
//! engine.bus.strobe = false;
//! engine.run_until_idle(2000);   // drain
//! ```

use crate::device::{BusInputs, DialState, EdgeEffect, OverflowPolicy};

/// Engine execution status.
///
/// Derived from the state machine (`Idle` means no steps remaining), so
/// it cannot drift from the registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// No instruction in flight.
    Idle,
    /// Draining a latched instruction.
    Processing,
}

/// Counters accumulated while clocking the engine.
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    /// Strobe edges that latched an instruction.
    pub strobes_latched: u64,
    /// Dial steps applied.
    pub steps_applied: u64,
    /// Instructions fully applied (remaining reached 0).
    pub completions: u64,
    /// Completions that landed on position 0.
    pub zero_crossings: u64,
    /// Latches that cut off an in-flight instruction.
    pub preemptions: u64,
    /// Reset edges taken.
    pub resets: u64,
}

/// The clocked dial device.
///
/// `bus` holds the input lines exactly as the host last drove them;
/// [`Engine::rising_edge`] samples them and applies one transition.
pub struct Engine {
    /// Input lines as driven by the host.
    pub bus: BusInputs,
    /// Device state elements.
    pub state: DialState,
    /// Accumulator overflow policy.
    pub overflow: OverflowPolicy,
    /// Total rising edges applied.
    pub total_cycles: u64,
    /// Observer-side counters.
    pub stats: EngineStats,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(OverflowPolicy::default())
    }
}

impl Engine {
    /// Create an engine at power-up state with the given overflow policy.
    pub fn new(overflow: OverflowPolicy) -> Self {
        Self {
            bus: BusInputs::idle(),
            state: DialState::new(),
            overflow,
            total_cycles: 0,
            stats: EngineStats::default(),
        }
    }

    /// Apply one rising clock edge, sampling the bus as driven.
    pub fn rising_edge(&mut self) -> EdgeEffect {
        let effect = self.state.clock_edge(&self.bus, self.overflow);
        self.total_cycles += 1;

        match effect {
            EdgeEffect::Held => {}
            EdgeEffect::Reset => self.stats.resets += 1,
            EdgeEffect::Latched { preempted } => {
                self.stats.strobes_latched += 1;
                if preempted {
                    self.stats.preemptions += 1;
                    log::debug!(
                        "strobe cut off an in-flight instruction at position {}",
                        self.state.position
                    );
                }
            }
            EdgeEffect::Stepped { completed, crossed } => {
                self.stats.steps_applied += 1;
                if completed {
                    self.stats.completions += 1;
                }
                if crossed {
                    self.stats.zero_crossings += 1;
                }
            }
        }

        effect
    }

    /// Clock until the engine is idle or `max_cycles` edges have passed.
    ///
    /// Callers deassert strobe first; with strobe held high every edge
    /// re-latches and the engine never drains. Returns the number of
    /// edges applied.
    pub fn run_until_idle(&mut self, max_cycles: u64) -> u64 {
        let start = self.total_cycles;
        while !self.state.is_idle() && self.total_cycles - start < max_cycles {
            self.rising_edge();
        }
        self.total_cycles - start
    }

    /// Power-cycle the device: state, bus, cycle counter, and stats.
    pub fn reset(&mut self) {
        self.bus = BusInputs::idle();
        self.state = DialState::new();
        self.total_cycles = 0;
        self.stats = EngineStats::default();
    }

    /// Current status, derived from the state machine.
    pub fn status(&self) -> EngineStatus {
        if self.state.is_idle() {
            EngineStatus::Idle
        } else {
            EngineStatus::Processing
        }
    }

    /// True when no instruction is in flight.
    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Dial position output.
    pub fn position(&self) -> u8 {
        self.state.position
    }

    /// Live zero-crossing count output (the 11-bit bus).
    pub fn zero_crossing_count(&self) -> u16 {
        self.state.zero_count
    }

    /// Get a status string for display.
    pub fn status_string(&self) -> &'static str {
        match self.status() {
            EngineStatus::Idle => "Idle",
            EngineStatus::Processing => "Processing",
        }
    }

    /// Print engine state and counters.
    pub fn print_summary(&self) {
        println!("Engine: {} after {} cycles", self.status_string(), self.total_cycles);
        println!("  position:       {}", self.state.position);
        println!("  zero crossings: {}", self.state.zero_count);
        println!(
            "  latched:        {} ({} preempting)",
            self.stats.strobes_latched, self.stats.preemptions
        );
        println!("  steps applied:  {}", self.stats.steps_applied);
        println!("  completions:    {}", self.stats.completions);
        if self.stats.resets > 0 {
            println!("  resets:         {}", self.stats.resets);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Direction;

    fn send(engine: &mut Engine, direction: Direction, count: u64) {
        engine.bus.drive(direction.level(), count);
        engine.bus.strobe = true;
        engine.rising_edge();
        engine.bus.strobe = false;
    }

    #[test]
    fn test_engine_power_up() {
        let engine = Engine::default();
        assert_eq!(engine.status(), EngineStatus::Idle);
        assert_eq!(engine.total_cycles, 0);
        assert_eq!(engine.position(), 50);
        assert_eq!(engine.zero_crossing_count(), 0);
    }

    #[test]
    fn test_idle_edges_only_count_cycles() {
        let mut engine = Engine::default();
        for _ in 0..100 {
            assert_eq!(engine.rising_edge(), EdgeEffect::Held);
        }
        assert_eq!(engine.total_cycles, 100);
        assert_eq!(engine.stats.steps_applied, 0);
        assert_eq!(engine.position(), 50);
    }

    #[test]
    fn test_latch_and_drain() {
        let mut engine = Engine::default();
        send(&mut engine, Direction::Increase, 3);
        assert_eq!(engine.status(), EngineStatus::Processing);

        let edges = engine.run_until_idle(2000);
        assert_eq!(edges, 3);
        assert_eq!(engine.position(), 53);
        assert_eq!(engine.stats.completions, 1);
        assert_eq!(engine.stats.zero_crossings, 0);
    }

    #[test]
    fn test_run_until_idle_respects_cap() {
        let mut engine = Engine::default();
        send(&mut engine, Direction::Increase, 100);

        let edges = engine.run_until_idle(10);
        assert_eq!(edges, 10);
        assert_eq!(engine.status(), EngineStatus::Processing);
        assert_eq!(engine.state.remaining, 90);
    }

    #[test]
    fn test_zero_crossing_output() {
        let mut engine = Engine::default();
        send(&mut engine, Direction::Decrease, 50);
        engine.run_until_idle(2000);

        assert_eq!(engine.position(), 0);
        assert_eq!(engine.zero_crossing_count(), 1);
        assert_eq!(engine.stats.zero_crossings, 1);
    }

    #[test]
    fn test_preemption_counted() {
        let mut engine = Engine::default();
        send(&mut engine, Direction::Increase, 10);
        for _ in 0..4 {
            engine.rising_edge();
        }

        send(&mut engine, Direction::Decrease, 2);
        assert_eq!(engine.stats.preemptions, 1);

        engine.run_until_idle(2000);
        assert_eq!(engine.position(), 52);
        // Only the second instruction ever completed.
        assert_eq!(engine.stats.completions, 1);
    }

    #[test]
    fn test_reset() {
        let mut engine = Engine::default();
        send(&mut engine, Direction::Increase, 10);
        engine.run_until_idle(2000);
        assert!(engine.total_cycles > 0);

        engine.reset();
        assert_eq!(engine.total_cycles, 0);
        assert_eq!(engine.position(), 50);
        assert_eq!(engine.stats.strobes_latched, 0);
        assert_eq!(engine.status(), EngineStatus::Idle);
    }

    #[test]
    fn test_bus_reset_line() {
        let mut engine = Engine::default();
        send(&mut engine, Direction::Increase, 10);
        for _ in 0..3 {
            engine.rising_edge();
        }

        engine.bus.reset = true;
        engine.rising_edge();
        engine.bus.reset = false;

        assert_eq!(engine.position(), 50);
        assert_eq!(engine.stats.resets, 1);
        // The cycle counter is the harness's, not the device's.
        assert!(engine.total_cycles > 0);
    }
}
