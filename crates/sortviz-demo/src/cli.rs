#![forbid(unsafe_code)]

//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;
use sortviz_algorithms::Algorithm;
use sortviz_runtime::SessionConfig;
use sortviz_runtime::config::MAX_SIZE;

use crate::error::Result;

#[derive(Debug, Parser)]
#[command(
    name = "sortviz",
    about = "Animated sorting algorithms in the terminal",
    version
)]
pub struct Cli {
    /// Algorithm to run: bubble, insertion, selection, merge, quick, heap.
    #[arg(short, long, default_value_t = Algorithm::Bubble)]
    pub algorithm: Algorithm,

    /// Number of bars.
    #[arg(short = 'n', long)]
    pub size: Option<usize>,

    /// Speed slider in (0, 1].
    #[arg(short, long)]
    pub speed: Option<f64>,

    /// Seed for the generated array.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Load session settings from a TOML file; flags override it.
    #[arg(short, long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Write logs here (filter with SORTVIZ_LOG).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Sort once without a terminal UI and print the result.
    #[arg(long)]
    pub headless: bool,
}

impl Cli {
    /// File settings (or defaults) with flags layered on top.
    pub fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::from_toml_file(path)?,
            None => SessionConfig::default(),
        };
        if let Some(size) = self.size {
            config.size = size.min(MAX_SIZE);
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}
