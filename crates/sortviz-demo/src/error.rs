#![forbid(unsafe_code)]

use std::io;

use sortviz_runtime::{ConfigError, SessionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("terminal: {0}")]
    Io(#[from] io::Error),

    #[error("logging: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, DemoError>;
