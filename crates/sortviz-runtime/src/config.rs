#![forbid(unsafe_code)]

//! Session configuration.
//!
//! Captures every tunable of a [`Session`](crate::session::Session) as a
//! single [`SessionConfig`] that can be loaded from TOML at startup.
//!
//! # Loading
//!
//! ```toml
//! # sortviz.toml
//! size = 60
//! speed = 0.8
//! seed = 7
//!
//! [geometry]
//! ratio = 2.5
//!
//! [pacing]
//! floor_ms = 16
//! ```
//!
//! ```rust,ignore
//! let config = SessionConfig::from_toml_file("sortviz.toml")?;
//! ```
//!
//! # Defaults
//!
//! Missing keys fall back to [`SessionConfig::default()`]: 30 bars at half
//! speed, a fresh random seed per session, no step trace.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use sortviz_core::{GeometryConfig, Pacing};

/// Largest array a session will generate.
pub const MAX_SIZE: usize = 2000;

/// Tunables of one session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SessionConfig {
    /// Number of bars generated on reset.
    pub size: usize,
    /// Normalized speed slider in `(0, 1]`.
    pub speed: f64,
    /// Seed for array generation; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Record a step trace on the board.
    pub trace: bool,
    pub geometry: GeometryConfig,
    pub pacing: Pacing,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            size: 30,
            speed: 0.5,
            seed: None,
            trace: false,
            geometry: GeometryConfig::default(),
            pacing: Pacing::default(),
        }
    }
}

impl SessionConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.size > MAX_SIZE {
            errors.push(format!("size must be at most {MAX_SIZE}, got {}", self.size));
        }
        if !(self.speed.is_finite() && self.speed > 0.0 && self.speed <= 1.0) {
            errors.push(format!("speed must be in (0, 1], got {}", self.speed));
        }
        if self.pacing.floor_ms == 0 {
            errors.push("pacing.floor_ms must be positive".to_string());
        }
        errors.extend(self.geometry.problems());

        errors
    }

    /// [`validate`](Self::validate), as a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a session configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SessionConfig::default().validate().is_empty());
    }

    #[test]
    fn validate_catches_oversized_array() {
        let config = SessionConfig {
            size: MAX_SIZE + 1,
            ..SessionConfig::default()
        };
        assert!(config.validate().iter().any(|e| e.contains("size")));
    }

    #[test]
    fn validate_catches_bad_speed() {
        for speed in [0.0, -1.0, 1.5, f64::NAN] {
            let config = SessionConfig {
                speed,
                ..SessionConfig::default()
            };
            assert!(config.validate().iter().any(|e| e.contains("speed")), "{speed}");
        }
    }

    #[test]
    fn validate_reports_geometry_problems() {
        let mut config = SessionConfig::default();
        config.geometry.ratio = 0.0;
        let err = config.validated().unwrap_err();
        assert!(err.to_string().contains("geometry.ratio"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
            size = 12
            [geometry]
            gap = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.size, 12);
        assert_eq!(config.speed, 0.5);
        assert_eq!(config.geometry.gap, 2.0);
        assert_eq!(config.geometry.ratio, 2.2);
        assert_eq!(config.pacing, Pacing::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SessionConfig::from_toml_str("size = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }
}
