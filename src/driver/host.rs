//! Host-side bus driver.
//!
//! Replays a parsed program onto the dial engine's bus, one
//! instruction at a time, with the timing the device depends on:
//!
//! ```text
//! 1. drive lines      direction + step count presented, strobe low
//! 2. assert strobe    (during the clock low phase)
//! 3. latch edge       exactly one rising edge samples the lines
//! 4. release strobe   (before any further rising edge)
//! 5. idle wait        policy-sized cycles with the bus quiet
//! ```
//!
//! The protocol is fire-and-forget. The device never acknowledges a
//! latch and never signals completion, so a mis-timed strobe is
//! invisible to the driver — step 5 is the sole protection, and under
//! the tight policy it is deliberately minimal (see
//! [`crate::driver::timing`]).

use crate::driver::clock::ClockSource;
use crate::driver::timing::{IdlePolicy, TimingConfig};
use crate::emu::Engine;
use crate::parser::{Instruction, Program};

/// Counters for one driver lifetime.
#[derive(Debug, Clone, Default)]
pub struct DriverStats {
    /// Instructions strobed onto the bus.
    pub instructions_sent: u64,
    /// Cycles spent in step 5 idle waits.
    pub idle_cycles: u64,
    /// Full program replays.
    pub passes: u64,
}

/// Drives the instruction bus with host-synthesized clocking.
///
/// Owns the engine the way a controller owns the wires to its device:
/// it can drive inputs and generate edges, but learns nothing back.
pub struct HostDriver<C: ClockSource> {
    engine: Engine,
    clock: C,
    timing: TimingConfig,
    policy: IdlePolicy,
    stats: DriverStats,
}

impl<C: ClockSource> HostDriver<C> {
    /// Create a driver around an engine and a clock source.
    pub fn new(engine: Engine, clock: C, timing: TimingConfig, policy: IdlePolicy) -> Self {
        Self {
            engine,
            clock,
            timing,
            policy,
            stats: DriverStats::default(),
        }
    }

    /// Send one instruction with the five-step sequence.
    pub fn send(&mut self, instruction: &Instruction) {
        // 1. Present direction and step count. One setup cycle with
        // strobe low keeps the lines stable for a full period before
        // the latch samples them.
        self.engine
            .bus
            .drive(instruction.direction.level(), instruction.count);
        let driven = self.engine.bus.step_count;
        self.clock.cycle(&mut self.engine);

        // 2-3. Strobe high through exactly one rising edge.
        self.engine.bus.strobe = true;
        self.clock.cycle(&mut self.engine);

        // 4. Release the strobe during the low phase.
        self.engine.bus.strobe = false;

        // 5. Idle long enough for the engine to drain. Nothing tells
        // the host when it actually has; the policy is the only
        // guarantee there is.
        let idle = self.timing.idle_cycles(self.policy, driven);
        for _ in 0..idle {
            self.clock.cycle(&mut self.engine);
        }

        self.stats.instructions_sent += 1;
        self.stats.idle_cycles += idle;
        log::debug!(
            "sent {} (driven {}), idled {} cycles",
            instruction,
            driven,
            idle
        );
    }

    /// Replay a program once, in order.
    pub fn replay(&mut self, program: &Program) {
        for instruction in program.instructions() {
            self.send(instruction);
        }
        self.stats.passes += 1;
        log::info!(
            "pass {}: {} instructions, position {}, zero crossings {}",
            self.stats.passes,
            program.len(),
            self.engine.position(),
            self.engine.zero_crossing_count()
        );
    }

    /// The driven engine (the observer's view of the device).
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Driver-side counters.
    pub fn stats(&self) -> &DriverStats {
        &self.stats
    }

    /// The idle policy in force.
    pub fn policy(&self) -> IdlePolicy {
        self.policy
    }

    /// Print driver counters followed by the engine summary.
    pub fn print_summary(&self) {
        println!(
            "Driver: {} instructions over {} pass(es), {:?} idle policy",
            self.stats.instructions_sent, self.stats.passes, self.policy
        );
        println!("  idle cycles:    {}", self.stats.idle_cycles);
        self.engine.print_summary();
    }
}
