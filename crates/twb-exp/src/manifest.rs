//! Structured manifest describing a completed sampling phase.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use twb_core::{ErrorInfo, EvalError, RunProvenance};

use crate::config::EvalConfig;

/// Descriptor of one expanded algorithm configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmDescriptor {
    /// Catalog index of the configuration.
    pub index: usize,
    /// Display name.
    pub name: String,
    /// Parameter-settings string.
    pub settings: String,
}

/// Descriptor of one processed subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRecord {
    /// Stable subject id.
    pub id: u64,
    /// Subject name.
    pub name: String,
    /// Number of variables in the as-loaded model.
    pub variables: usize,
    /// Number of clauses in the as-loaded model.
    pub clauses: usize,
    /// SHA-256 of the archived original model file.
    pub model_sha256: String,
}

/// Manifest persisted at the output root after the sampling phase.
///
/// Purely descriptive; the metrics phase resolves artifacts by grid
/// coordinates and never reads this back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Provenance for the run.
    pub provenance: RunProvenance,
    /// Resolved configuration the run executed with.
    pub config: EvalConfig,
    /// Expanded algorithm catalog.
    pub algorithms: Vec<AlgorithmDescriptor>,
    /// Subjects successfully read and archived.
    pub subjects: Vec<SubjectRecord>,
}

impl RunManifest {
    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), EvalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                EvalError::Serde(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            EvalError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            EvalError::Serde(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            EvalError::Serde(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            EvalError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Hex SHA-256 of a file's contents.
pub fn file_sha256(path: &Path) -> Result<String, EvalError> {
    let bytes = fs::read(path).map_err(|err| {
        EvalError::Serde(
            ErrorInfo::new("manifest-hash", "failed to read artifact for hashing")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    Ok(format!("{:x}", Sha256::digest(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let config: EvalConfig = serde_yaml::from_str("systems: [demo]\n").unwrap();
        let manifest = RunManifest {
            provenance: RunProvenance {
                seed: 7,
                created_at: "2024-01-01T00:00:00Z".to_string(),
                tool_versions: Default::default(),
            },
            config,
            algorithms: vec![AlgorithmDescriptor {
                index: 0,
                name: "Dummy".to_string(),
                settings: "42".to_string(),
            }],
            subjects: Vec::new(),
        };
        manifest.write(&path).unwrap();
        let loaded = RunManifest::load(&path).unwrap();
        assert_eq!(loaded.provenance.seed, 7);
        assert_eq!(loaded.algorithms.len(), 1);
    }
}
