#![forbid(unsafe_code)]

//! sortviz: sorting algorithms as animated bar charts.
//!
//! # Running
//!
//! ```sh
//! cargo run -p sortviz-demo -- --algorithm quick --size 60
//! cargo run -p sortviz-demo -- --headless --algorithm heap --seed 7
//! ```
//!
//! # Controls
//!
//! - space: play / pause / resume
//! - r: new array, c: cancel
//! - a / A: next / previous algorithm
//! - + / -: speed, [ / ]: size
//! - q / Esc / Ctrl+C: quit

mod app;
mod canvas;
mod cli;
mod error;
mod logging;
mod terminal;

use std::process::ExitCode;

use clap::Parser;
use sortviz_algorithms::Algorithm;
use sortviz_core::GeometryConfig;
use sortviz_runtime::{RunOutcome, Session, SessionConfig, VirtualPacer};

use crate::app::App;
use crate::cli::Cli;
use crate::error::Result;
use crate::terminal::TerminalGuard;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("sortviz: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    logging::init(cli.log_file.as_deref(), cli.headless)?;
    let mut config = cli.session_config()?;
    if cli.headless {
        return headless(cli.algorithm, config);
    }

    // Bars are measured in cells here.
    config.geometry = GeometryConfig::terminal();
    let session = Session::new(config)?;
    let guard = TerminalGuard::enter()?;
    app::run(App::new(session, cli.algorithm), &guard)?;
    Ok(ExitCode::SUCCESS)
}

/// Sort once with no pacing, print the result, and report success only for
/// a completed, fully sorted run.
fn headless(algorithm: Algorithm, config: SessionConfig) -> Result<ExitCode> {
    let mut session = Session::new(config)?.with_pacer(VirtualPacer::new());
    let input = session.values();
    session.start(algorithm)?;
    let outcome = session.wait();

    println!("algorithm: {algorithm}");
    println!("input:  {input:?}");
    println!("output: {:?}", session.values());
    match outcome {
        Some(RunOutcome::Completed) if session.is_fully_sorted() => {
            println!("outcome: completed");
            Ok(ExitCode::SUCCESS)
        }
        Some(RunOutcome::Completed) => {
            println!("outcome: completed unsorted");
            Ok(ExitCode::FAILURE)
        }
        Some(other) => {
            println!("outcome: {other}");
            Ok(ExitCode::FAILURE)
        }
        None => {
            println!("outcome: not started");
            Ok(ExitCode::FAILURE)
        }
    }
}
