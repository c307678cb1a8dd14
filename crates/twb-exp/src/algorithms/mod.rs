//! Algorithm lifecycle contract and the concrete tool variants.

pub mod acts;
pub mod dummy;
pub mod fide;

pub use acts::ActsSampling;
pub use dummy::Dummy;
pub use fide::FideSampling;

use twb_core::EvalError;
use twb_model::Sample;

/// One configured CIT tool invocation, consumed by the process runner.
///
/// Variants differ only in command construction and result parsing; the
/// lifecycle contract is uniform: `pre_process` prepares input artifacts,
/// `command_line` builds the argv (pure), `parse_results` reads the tool's
/// output artifact, and `post_process` removes temporary artifacts
/// unconditionally.
pub trait SamplingAlgorithm: std::fmt::Debug {
    /// Prepares input artifacts for the external tool. May fail, aborting
    /// the run before any process is spawned.
    fn pre_process(&mut self) -> Result<(), EvalError> {
        Ok(())
    }

    /// Builds the argv for the child process. Pure; an empty argv marks an
    /// in-process no-op baseline.
    fn command_line(&self) -> Vec<String>;

    /// Reads the tool's output artifact into a sample. Must fail loudly on
    /// absent or malformed artifacts so the runner can record the failure.
    fn parse_results(&self) -> Result<Sample, EvalError>;

    /// Deletes temporary and output artifacts. Failures are logged by the
    /// implementation, never raised.
    fn post_process(&self);

    /// Display name used for reporting.
    fn name(&self) -> &str;

    /// Parameter-settings string used for reporting.
    fn parameter_settings(&self) -> String;

    /// Interaction strength this configuration targets.
    fn strength(&self) -> u32;

    /// Number of repetitions to execute for this configuration.
    fn iterations(&self) -> usize;
}
