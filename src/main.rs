//! dial-emu: replay a dial instruction file against the simulated counter

use std::env;

use anyhow::bail;

use dial_emu::config::Config;
use dial_emu::driver::{HostDriver, IdlePolicy, TimingConfig, WallClock};
use dial_emu::emu::Engine;
use dial_emu::parser::Program;

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
struct CliArgs {
    path: String,
    trick: bool,
    loop_forever: bool,
    summary: bool,
    speed: f64,
}

impl CliArgs {
    /// Parse everything after the program name. `Ok(None)` means help
    /// was requested.
    fn parse(args: &[String]) -> anyhow::Result<Option<Self>> {
        let mut trick = false;
        let mut loop_forever = false;
        let mut summary = false;
        let mut speed = 1.0f64;
        let mut path: Option<String> = None;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => return Ok(None),
                "--trick" => trick = true,
                "--loop" => loop_forever = true,
                "--summary" => summary = true,
                "--speed" => {
                    i += 1;
                    let value = match args.get(i) {
                        Some(v) => v,
                        None => bail!("--speed needs a value"),
                    };
                    speed = match value.parse::<f64>() {
                        Ok(s) if s > 0.0 => s,
                        _ => bail!("--speed must be a positive number, got {:?}", value),
                    };
                }
                arg if arg.starts_with('-') => bail!("unknown option {:?}", arg),
                arg => path = Some(arg.to_string()),
            }
            i += 1;
        }

        let path = match path {
            Some(p) => p,
            None => bail!("missing instruction file path"),
        };

        Ok(Some(Self {
            path,
            trick,
            loop_forever,
            summary,
            speed,
        }))
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let argv: Vec<String> = env::args().collect();
    let cli = match CliArgs::parse(&argv[1..]) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print_usage(&argv[0]);
            return Ok(());
        }
        Err(e) => {
            eprintln!("error: {}", e);
            print_usage(&argv[0]);
            std::process::exit(1);
        }
    };

    let config = Config::get();
    let timing = TimingConfig::from_config(config);
    let policy = if cli.trick {
        IdlePolicy::Tight
    } else {
        IdlePolicy::Conservative
    };

    let program = Program::from_file(&cli.path)?;
    println!("Loaded {}: {} instruction(s)", cli.path, program.len());
    println!(
        "Policy: {:?}, clock half period {} us, speed x{}",
        policy, timing.clock_half_period_us, cli.speed
    );
    println!();

    let engine = Engine::new(config.overflow());
    let clock = WallClock::new(timing.clock_half_period_us, cli.speed);
    let mut driver = HostDriver::new(engine, clock, timing, policy);

    if cli.loop_forever {
        log::info!("Replaying {} until interrupted", cli.path);
        loop {
            driver.replay(&program);
            if cli.summary {
                driver.print_summary();
                println!();
            }
        }
    }

    driver.replay(&program);
    driver.print_summary();

    Ok(())
}

/// Print usage information.
fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS] <dial-file>", program);
    eprintln!();
    eprintln!("Replays the instruction records in <dial-file> against the");
    eprintln!("simulated dial counter and reports the zero-crossing count.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --trick        size idle waits from each step count (tight policy)");
    eprintln!("  --loop         replay the file until interrupted");
    eprintln!("  --speed <N>    scale the synthesized clock rate by N (N > 0)");
    eprintln!("  --summary      print per-pass summaries in loop mode");
    eprintln!("  -h, --help     show this message");
}
