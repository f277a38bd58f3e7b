#![forbid(unsafe_code)]

//! Subscriber setup.
//!
//! The interactive UI owns the terminal, so logs go to a file or nowhere.
//! Headless runs log to stderr. `SORTVIZ_LOG` takes an env-filter directive
//! and defaults to `info`.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{DemoError, Result};

pub const FILTER_ENV: &str = "SORTVIZ_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let registry = tracing_subscriber::registry().with(filter());
    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_thread_names(true)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None if headless => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init(),
        None => return Ok(()),
    };
    installed.map_err(|e| DemoError::Logging(e.to_string()))
}
