//! Provenance descriptors attached to run manifests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provenance information attached to a run manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Base deterministic seed used for model randomization.
    pub seed: u64,
    /// ISO-8601 timestamp recording when the run started.
    pub created_at: String,
    /// Version map for the tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}
