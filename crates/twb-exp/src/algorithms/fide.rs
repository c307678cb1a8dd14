//! FeatJAR/FeatureIDE-based sampling variants (ICPL, Chvatal, IncLing, YASA).

use std::fs;
use std::path::PathBuf;

use tracing::warn;
use twb_core::EvalError;
use twb_model::{read_sample, Sample};

use super::SamplingAlgorithm;

/// One FeatJAR `genconfig` invocation.
///
/// The tool reads the shared working model directly and writes its sample in
/// the workbench's own sample format, so no pre-processing conversion is
/// needed.
#[derive(Debug)]
pub struct FideSampling {
    display_name: String,
    algo_flag: &'static str,
    strength: u32,
    grouping: Option<u32>,
    seed: Option<u64>,
    iterations: usize,
    java: String,
    classpath: String,
    model_file: PathBuf,
    output_file: PathBuf,
}

impl FideSampling {
    /// Creates a FeatJAR-based variant.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        display_name: impl Into<String>,
        algo_flag: &'static str,
        strength: u32,
        grouping: Option<u32>,
        seed: Option<u64>,
        iterations: usize,
        java: String,
        classpath: String,
        model_file: PathBuf,
        output_file: PathBuf,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            algo_flag,
            strength,
            grouping,
            seed,
            iterations,
            java,
            classpath,
            model_file,
            output_file,
        }
    }
}

impl SamplingAlgorithm for FideSampling {
    fn command_line(&self) -> Vec<String> {
        let mut argv = vec![
            self.java.clone(),
            "-da".to_string(),
            "-Xmx14g".to_string(),
            "-Xms2g".to_string(),
            "-cp".to_string(),
            self.classpath.clone(),
            "de.featjar.util.cli.CLI".to_string(),
            "genconfig".to_string(),
            "-o".to_string(),
            self.output_file.display().to_string(),
            "-i".to_string(),
            self.model_file.display().to_string(),
            "-a".to_string(),
            self.algo_flag.to_string(),
            "-t".to_string(),
            self.strength.to_string(),
        ];
        if let Some(grouping) = self.grouping {
            argv.push("-m".to_string());
            argv.push(grouping.to_string());
        }
        if let Some(seed) = self.seed {
            argv.push("-s".to_string());
            argv.push(seed.to_string());
        }
        argv
    }

    fn parse_results(&self) -> Result<Sample, EvalError> {
        read_sample(&self.output_file)
    }

    fn post_process(&self) {
        if let Err(err) = fs::remove_file(&self.output_file) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    path = %self.output_file.display(),
                    error = %err,
                    "failed to remove artifact"
                );
            }
        }
    }

    fn name(&self) -> &str {
        &self.display_name
    }

    fn parameter_settings(&self) -> String {
        match self.grouping {
            Some(grouping) => format!("t{}_m{}", self.strength, grouping),
            None => format!("t{}", self.strength),
        }
    }

    fn strength(&self) -> u32 {
        self.strength
    }

    fn iterations(&self) -> usize {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(seed: Option<u64>, grouping: Option<u32>) -> FideSampling {
        FideSampling::new(
            "FIDE-YASA",
            "YASA",
            2,
            grouping,
            seed,
            1,
            "java".to_string(),
            "tools/FeatJAR/*".to_string(),
            PathBuf::from("temp/model.dimacs"),
            PathBuf::from("temp/sample.csv"),
        )
    }

    #[test]
    fn command_line_carries_algorithm_and_strength() {
        let argv = variant(None, None).command_line();
        let joined = argv.join(" ");
        assert!(joined.contains("genconfig"));
        assert!(joined.contains("-a YASA"));
        assert!(joined.contains("-t 2"));
        assert!(!joined.contains("-m"));
        assert!(!joined.contains("-s"));
    }

    #[test]
    fn seed_and_grouping_are_optional_flags() {
        let argv = variant(Some(11), Some(3)).command_line();
        let joined = argv.join(" ");
        assert!(joined.contains("-m 3"));
        assert!(joined.contains("-s 11"));
    }

    #[test]
    fn settings_include_grouping_when_present() {
        assert_eq!(variant(None, Some(5)).parameter_settings(), "t2_m5");
        assert_eq!(variant(None, None).parameter_settings(), "t2");
    }
}
