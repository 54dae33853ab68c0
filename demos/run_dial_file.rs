//! Dial file replay runner
//!
//! Usage: cargo run --release --example run_dial_file <dial_file> [expected_crossings]

use std::env;

use dial_emu::config::Config;
use dial_emu::driver::{HostDriver, IdlePolicy, SimClock, TimingConfig};
use dial_emu::emu::Engine;
use dial_emu::parser::Program;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <dial_file> [expected_crossings]", args[0]);
        eprintln!("Example: {} testdata/spin.dial 3", args[0]);
        std::process::exit(1);
    }

    let path = &args[1];
    let expected: Option<u16> = match args.get(2) {
        Some(v) => Some(v.parse()?),
        None => None,
    };

    println!("=== Replaying {} ===\n", path);

    let program = Program::from_file(path)?;
    println!("  {} instruction(s)", program.len());

    let config = Config::get();
    let timing = TimingConfig::from_config(config);
    let engine = Engine::new(config.overflow());

    // Simulated clock: every instruction lands instantly, both policies
    // are exact, so run the tight one.
    let mut driver = HostDriver::new(engine, SimClock, timing, IdlePolicy::Tight);
    driver.replay(&program);

    println!("\nResults:");
    println!("  Final position: {}", driver.engine().position());
    println!("  Zero crossings: {}", driver.engine().zero_crossing_count());
    println!("  Cycles clocked: {}", driver.engine().total_cycles);

    if let Some(expected) = expected {
        let observed = driver.engine().zero_crossing_count();
        println!();
        if observed == expected {
            println!("SUCCESS!");
        } else {
            println!("FAILED: expected {} crossings, got {}", expected, observed);
        }
    }

    Ok(())
}
