//! Settlement Planner - Entry Point
//!
//! Loads the initial world from a configuration file, then reads one command
//! per line from stdin and runs it against the simulation until `close` or
//! end of input.

use clap::Parser;
use settlement_planner::command::{parse_action, Action, ActionKind};
use settlement_planner::simulation::{load_config, SimulationEngine};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Settlement facility planning simulation
#[derive(Parser, Debug)]
#[command(name = "settlement-planner")]
#[command(about = "Simulate facility construction plans across settlements")]
struct Args {
    /// Configuration file (line format, or TOML with a .toml extension)
    config: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "settlement_planner=info")]
    log_filter: String,

    /// Print the final plan report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut engine = match load_config(&args.config) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Failed to load configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    engine.start();
    println!("The simulation has started");

    if let Err(err) = run(&mut engine, args.json) {
        eprintln!("Input error: {}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Read-eval loop over stdin
fn run(engine: &mut SimulationEngine, json: bool) -> io::Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let kind = match parse_action(&line) {
            Ok(Some(kind)) => kind,
            Ok(None) => continue,
            Err(err) => {
                println!("Invalid command: {}", err);
                continue;
            }
        };

        execute(engine, kind, json);
        if !engine.is_running() {
            return Ok(());
        }
    }

    // End of input closes the run as if `close` had been entered
    tracing::info!("End of input, closing simulation");
    execute(engine, ActionKind::Close, json);
    Ok(())
}

fn execute(engine: &mut SimulationEngine, kind: ActionKind, json: bool) {
    let closing = kind == ActionKind::Close;
    let result = engine.execute(Action::new(kind));

    if closing && json {
        print_json_report(engine);
    } else {
        for output in &result.output {
            println!("{}", output);
        }
    }
    if let Some(error) = &result.error {
        println!("Error: {}", error);
    }
}

fn print_json_report(engine: &SimulationEngine) {
    match serde_json::to_string_pretty(&engine.plan_summaries()) {
        Ok(report) => println!("{}", report),
        Err(err) => tracing::warn!("Could not serialize report: {}", err),
    }
}
