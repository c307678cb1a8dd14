//! YAML-configurable parameters governing an experiment run.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use twb_core::{ErrorInfo, EvalError};

/// Experiment configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Names of the subject models; `<model_path>/<name>.dimacs` must exist.
    pub systems: Vec<String>,
    /// Directory holding the subject model files.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Directory for archival artifacts and recorded tables.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Directory for the transient working files shared by all runs.
    #[serde(default = "default_temp_path")]
    pub temp_path: PathBuf,
    /// Number of model-randomization iterations per subject.
    #[serde(default = "default_iterations")]
    pub system_iterations: usize,
    /// Number of repetitions per algorithm configuration.
    #[serde(default = "default_iterations")]
    pub algorithm_iterations: usize,
    /// Hard timeout for one algorithm invocation, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Base seed for model randomization and seeded algorithms.
    #[serde(default)]
    pub random_seed: u64,
    /// Interaction strengths to evaluate.
    #[serde(default = "default_t_values")]
    pub t: Vec<u32>,
    /// Algorithm names to expand through the catalog.
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,
    /// External tool locations.
    #[serde(default)]
    pub tools: ToolPaths,
}

/// Locations of the external sampling tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolPaths {
    /// JVM launcher used for every external tool.
    #[serde(default = "default_java")]
    pub java: String,
    /// Path to the ACTS jar.
    #[serde(default = "default_acts_jar")]
    pub acts_jar: PathBuf,
    /// Classpath glob for the FeatJAR-based samplers.
    #[serde(default = "default_featjar_classpath")]
    pub featjar_classpath: String,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output")
}

fn default_temp_path() -> PathBuf {
    PathBuf::from("temp")
}

fn default_iterations() -> usize {
    1
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_t_values() -> Vec<u32> {
    vec![2]
}

fn default_algorithms() -> Vec<String> {
    vec!["DUMMY".to_string()]
}

fn default_java() -> String {
    "java".to_string()
}

fn default_acts_jar() -> PathBuf {
    PathBuf::from("tools/ACTS3.2/acts_3.2.jar")
}

fn default_featjar_classpath() -> String {
    "tools/FeatJAR/*".to_string()
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            java: default_java(),
            acts_jar: default_acts_jar(),
            featjar_classpath: default_featjar_classpath(),
        }
    }
}

impl EvalConfig {
    /// Loads and validates a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            EvalError::Serde(
                ErrorInfo::new("config-read", "failed to read configuration")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let config: EvalConfig = serde_yaml::from_str(&contents).map_err(|err| {
            EvalError::Serde(
                ErrorInfo::new("config-parse", "failed to parse configuration")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration invariants.
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.systems.is_empty() {
            return Err(EvalError::Serde(ErrorInfo::new(
                "config-systems-empty",
                "at least one subject system is required",
            )));
        }
        if self.system_iterations == 0 || self.algorithm_iterations == 0 {
            return Err(EvalError::Serde(ErrorInfo::new(
                "config-iterations-zero",
                "system and algorithm iterations must be positive",
            )));
        }
        if self.t.is_empty() {
            return Err(EvalError::Serde(ErrorInfo::new(
                "config-t-empty",
                "at least one interaction strength is required",
            )));
        }
        if self.t.iter().any(|&t| t == 0) {
            return Err(EvalError::Serde(ErrorInfo::new(
                "config-t-zero",
                "interaction strengths must be positive",
            )));
        }
        if self.algorithms.is_empty() {
            return Err(EvalError::Serde(ErrorInfo::new(
                "config-algorithms-empty",
                "at least one algorithm name is required",
            )));
        }
        Ok(())
    }

    /// The per-run timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
