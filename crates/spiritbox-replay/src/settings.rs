//! Replay settings, read from the environment.

use std::path::PathBuf;

use crate::error::AppError;

/// Where to find the replay inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySettings {
    /// Scenario file (`SCENARIO_PATH`, required).
    pub scenario_path: PathBuf,
    /// Script file (`SCRIPT_PATH`, required).
    pub script_path: PathBuf,
    /// Session config file (`CONFIG_PATH`, optional JSON).
    pub config_path: Option<PathBuf>,
    /// Seed for responder selection (`RNG_SEED`, optional).
    pub seed: Option<u64>,
}

impl ReplaySettings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or the
    /// seed is not a `u64`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or the
    /// seed is not a `u64`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name)
                .map(PathBuf::from)
                .ok_or_else(|| AppError::Config(format!("{name} environment variable must be set")))
        };
        let seed = lookup("RNG_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|e| AppError::Config(format!("RNG_SEED must be a valid u64: {e}")))
            })
            .transpose()?;

        Ok(Self {
            scenario_path: required("SCENARIO_PATH")?,
            script_path: required("SCRIPT_PATH")?,
            config_path: lookup("CONFIG_PATH").map(PathBuf::from),
            seed,
        })
    }
}
