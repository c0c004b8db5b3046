//! Solver configuration
//!
//! Loaded from JSON alongside the rest of a simulation setup, or built in
//! code from [`SolverConfig::default`].

use crate::error::BandedError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Factorization used by the pentadiagonal solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PentadiagonalStrategy {
    /// Pivot-free symmetric LU over the two bandwidths
    #[default]
    Specialized,
    /// Dense-band Cholesky factorization
    Cholesky,
}

/// Banded solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Strategy for pentadiagonal bands
    pub pentadiagonal_strategy: PentadiagonalStrategy,
    /// Batched solves with fewer systems than this run sequentially
    pub parallel_min_batch: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pentadiagonal_strategy: PentadiagonalStrategy::Specialized,
            parallel_min_batch: 64,
        }
    }
}

impl SolverConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, BandedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BandedError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| BandedError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, BandedError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SolverConfig::from_json_str(r#"{"pentadiagonal_strategy": "cholesky"}"#)
            .unwrap();
        assert_eq!(
            config.pentadiagonal_strategy,
            PentadiagonalStrategy::Cholesky
        );
        assert_eq!(
            config.parallel_min_batch,
            SolverConfig::default().parallel_min_batch
        );
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = SolverConfig::from_json_str(r#"{"pentadiagonal_strategy": "qr"}"#).unwrap_err();
        assert!(matches!(err, BandedError::Config(_)));
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let config = SolverConfig {
            pentadiagonal_strategy: PentadiagonalStrategy::Cholesky,
            parallel_min_batch: 4,
        };
        let path = std::env::temp_dir().join(format!("banded-config-{}.json", std::process::id()));
        fs::write(&path, config.to_json_string().unwrap()).unwrap();

        let loaded = SolverConfig::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = SolverConfig::from_file("/nonexistent/banded.json").unwrap_err();
        assert!(matches!(err, BandedError::Config(_)));
    }
}
