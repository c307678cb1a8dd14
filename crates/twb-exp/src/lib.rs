#![deny(missing_docs)]
#![doc = "Process-based algorithm execution and experiment-grid orchestration."]

pub mod algorithms;
mod catalog;
pub mod config;
mod driver;
pub mod groups;
pub mod manifest;
pub mod metrics;
mod process;
pub mod randomizer;
mod recorder;
mod store;

pub use algorithms::{ActsSampling, Dummy, FideSampling, SamplingAlgorithm};
pub use catalog::build_algorithms;
pub use config::{EvalConfig, ToolPaths};
pub use driver::{ExperimentDriver, Subject, MANIFEST_FILE};
pub use manifest::{AlgorithmDescriptor, RunManifest, SubjectRecord};
pub use metrics::{compute_cell_metrics, CellMetrics, MISSING};
pub use process::{ProcessRunner, RunResult};
pub use recorder::{
    ResultRecorder, ALGORITHMS_FILE, DATA_FILE, FEATURE_GROUPS_FILE, METRICS_FILE, MODELS_FILE,
};
pub use store::ArtifactStore;
