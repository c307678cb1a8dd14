//! No-op baseline used for pipeline validation.

use rand::Rng;
use twb_core::EvalError;
use twb_model::{Sample, VariableMap};

use super::SamplingAlgorithm;

/// Baseline that spawns no process and yields an empty sample.
///
/// The display id is drawn unseeded so repeated experiment runs are
/// distinguishable in algorithms.csv.
#[derive(Debug)]
pub struct Dummy {
    id: i64,
    strength: u32,
    iterations: usize,
}

impl Dummy {
    /// Creates a baseline entry for the given interaction strength.
    pub fn new(strength: u32, iterations: usize) -> Self {
        Self {
            id: rand::thread_rng().gen(),
            strength,
            iterations,
        }
    }
}

impl SamplingAlgorithm for Dummy {
    fn command_line(&self) -> Vec<String> {
        Vec::new()
    }

    fn parse_results(&self) -> Result<Sample, EvalError> {
        Ok(Sample::empty(VariableMap::new(Vec::new())?))
    }

    fn post_process(&self) {}

    fn name(&self) -> &str {
        "Dummy"
    }

    fn parameter_settings(&self) -> String {
        self.id.to_string()
    }

    fn strength(&self) -> u32 {
        self.strength
    }

    fn iterations(&self) -> usize {
        self.iterations
    }
}
