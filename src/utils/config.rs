use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Numerical and validation settings shared by the system builders and solvers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Singular values below `rank_tolerance * sigma_max` count as zero
    pub rank_tolerance: f64,
    /// Reject bearings whose norm departs from one
    pub validate_bearing_norm: bool,
    /// Allowed deviation of a bearing norm from one
    pub bearing_norm_tolerance: f64,
    /// Reject NaN and infinite station, bearing or range values
    pub reject_non_finite: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rank_tolerance: 1e-12,
            validate_bearing_norm: true,
            bearing_norm_tolerance: 1e-6,
            reject_non_finite: true,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("config I/O error: {message}")]
    IoError { message: String },
    #[error("config serialization error: {message}")]
    SerializationError { message: String },
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config that trusts the caller: no bearing norm check
    pub fn permissive() -> Self {
        Self {
            validate_bearing_norm: false,
            ..Self::default()
        }
    }

    pub fn with_rank_tolerance(mut self, rank_tolerance: f64) -> Self {
        self.rank_tolerance = rank_tolerance;
        self
    }

    pub fn with_bearing_validation(mut self, enabled: bool, tolerance: f64) -> Self {
        self.validate_bearing_norm = enabled;
        self.bearing_norm_tolerance = tolerance;
        self
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rank_tolerance > 0.0 && self.rank_tolerance < 1.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "rank_tolerance".to_string(),
                value: self.rank_tolerance.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }
        if !(self.bearing_norm_tolerance > 0.0 && self.bearing_norm_tolerance.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                parameter: "bearing_norm_tolerance".to_string(),
                value: self.bearing_norm_tolerance.to_string(),
                reason: "must be a positive finite number".to_string(),
            });
        }
        Ok(())
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: SolverConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate()?;
        log::debug!("loaded solver config from {}", path_str);
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }
}
