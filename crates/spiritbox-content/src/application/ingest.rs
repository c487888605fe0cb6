//! Scenario ingestion.
//!
//! Scenarios are authored as JSON or YAML. Every loaded scenario is
//! validated before it is handed to a session, and can be fingerprinted so
//! audit events identify exactly which content a session ran.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use spiritbox_core::error::DomainError;
use tracing::debug;

use crate::domain::scenario::ScenarioDefinition;

/// Source format of a scenario document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl ScenarioFormat {
    /// Infers the format from a file extension (`json`, `yaml`, `yml`).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parses and validates a scenario document.
///
/// # Errors
///
/// Returns `DomainError::Scenario` if the document does not parse or fails
/// validation.
pub fn parse_scenario(
    source: &str,
    format: ScenarioFormat,
) -> Result<ScenarioDefinition, DomainError> {
    let scenario: ScenarioDefinition = match format {
        ScenarioFormat::Json => serde_json::from_str(source)
            .map_err(|e| DomainError::Scenario(format!("invalid scenario JSON: {e}")))?,
        ScenarioFormat::Yaml => serde_yaml::from_str(source)
            .map_err(|e| DomainError::Scenario(format!("invalid scenario YAML: {e}")))?,
    };
    scenario.validate()?;
    Ok(scenario)
}

/// Reads, parses and validates the scenario file at `path`.
///
/// # Errors
///
/// Returns `DomainError::Scenario` for an unknown extension, an unreadable
/// file, or invalid content.
pub fn load_scenario(path: &Path) -> Result<ScenarioDefinition, DomainError> {
    let format = ScenarioFormat::from_path(path).ok_or_else(|| {
        DomainError::Scenario(format!(
            "unsupported scenario file extension: {}",
            path.display()
        ))
    })?;
    let source = fs::read_to_string(path)
        .map_err(|e| DomainError::Scenario(format!("cannot read {}: {e}", path.display())))?;
    debug!(path = %path.display(), ?format, "loading scenario");
    parse_scenario(&source, format)
}

/// Lists the scenario files directly inside `dir`, sorted by path.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the directory cannot be read.
pub fn list_scenarios(dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        DomainError::Infrastructure(format!("cannot list {}: {e}", dir.display()))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| DomainError::Infrastructure(format!("cannot list {}: {e}", dir.display())))?
            .path();
        if path.is_file() && ScenarioFormat::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Lowercase hex SHA-256 of the scenario's canonical JSON form.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if serialization fails.
pub fn fingerprint(scenario: &ScenarioDefinition) -> Result<String, DomainError> {
    let canonical = serde_json::to_vec(scenario)
        .map_err(|e| DomainError::Infrastructure(format!("scenario serialization failed: {e}")))?;
    let digest = Sha256::digest(&canonical);
    Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
}
