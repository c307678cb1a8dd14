//! ACTS-based sampling variants (IPOG/IPOF families).

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::warn;
use twb_core::{ErrorInfo, EvalError};
use twb_model::{read_dimacs, Cnf, PartialConfiguration, Sample, VariableMap};

use super::SamplingAlgorithm;

/// Number of preamble lines in the ACTS CSV output.
const ACTS_PREAMBLE_LINES: usize = 7;

/// One ACTS invocation, parameterized by algorithm flag and constraint
/// handler. Pre-processing converts the shared working model into the ACTS
/// input format; parsing maps the tool's `true`/`false`/`*` CSV cells back
/// to literals.
#[derive(Debug)]
pub struct ActsSampling {
    display_name: String,
    algo_flag: &'static str,
    constraint_handler: &'static str,
    strength: u32,
    iterations: usize,
    java: String,
    jar: PathBuf,
    model_file: PathBuf,
    input_file: PathBuf,
    output_file: PathBuf,
    variables: Option<VariableMap>,
}

impl ActsSampling {
    /// Creates an ACTS variant.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        display_name: impl Into<String>,
        algo_flag: &'static str,
        constraint_handler: &'static str,
        strength: u32,
        iterations: usize,
        java: String,
        jar: PathBuf,
        model_file: PathBuf,
        input_file: PathBuf,
        output_file: PathBuf,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            algo_flag,
            constraint_handler,
            strength,
            iterations,
            java,
            jar,
            model_file,
            input_file,
            output_file,
            variables: None,
        }
    }

    fn write_acts_input(&self, cnf: &Cnf) -> Result<(), EvalError> {
        let mut out = String::new();
        out.push_str("[System]\nName: model\n\n[Parameter]\n");
        for name in cnf.variables().names() {
            out.push_str(&format!("{name} (boolean) : true, false\n"));
        }
        out.push_str("\n[Constraint]\n");
        for clause in cnf.clauses() {
            let terms: Vec<String> = clause
                .iter()
                .map(|&literal| {
                    let name = cnf
                        .variables()
                        .name(literal.unsigned_abs())
                        .unwrap_or_default();
                    if literal > 0 {
                        format!("{name} = \"true\"")
                    } else {
                        format!("{name} = \"false\"")
                    }
                })
                .collect();
            out.push_str(&terms.join(" || "));
            out.push('\n');
        }
        let mut file = fs::File::create(&self.input_file).map_err(|err| {
            EvalError::Process(
                ErrorInfo::new("acts-input-write", "failed to write ACTS input file")
                    .with_context("path", self.input_file.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        file.write_all(out.as_bytes()).map_err(|err| {
            EvalError::Process(
                ErrorInfo::new("acts-input-write", "failed to write ACTS input file")
                    .with_context("path", self.input_file.display().to_string())
                    .with_hint(err.to_string()),
            )
        })
    }

    fn convert_row(&self, line: &str, variables: &VariableMap) -> Result<PartialConfiguration, EvalError> {
        let count = variables.variable_count();
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() != count {
            return Err(EvalError::Sample(
                ErrorInfo::new("acts-parse", "ACTS row width mismatch")
                    .with_context("expected", count.to_string())
                    .with_context("found", cells.len().to_string()),
            ));
        }
        let mut configuration = PartialConfiguration::unset(count);
        for (pos, cell) in cells.iter().enumerate() {
            let index = pos as u32 + 1;
            match cell.trim() {
                "true" => configuration.assign(index, true),
                "false" => configuration.assign(index, false),
                "*" => {}
                other => {
                    return Err(EvalError::Sample(
                        ErrorInfo::new("acts-parse", "unknown ACTS cell value")
                            .with_context("cell", other.to_string()),
                    ));
                }
            }
        }
        Ok(configuration)
    }
}

impl SamplingAlgorithm for ActsSampling {
    fn pre_process(&mut self) -> Result<(), EvalError> {
        let cnf = read_dimacs(&self.model_file)?;
        self.write_acts_input(&cnf)?;
        self.variables = Some(cnf.variables().clone());
        Ok(())
    }

    fn command_line(&self) -> Vec<String> {
        vec![
            self.java.clone(),
            "-da".to_string(),
            "-Xmx14g".to_string(),
            format!("-Dalgo={}", self.algo_flag),
            format!("-Ddoi={}", self.strength),
            "-Doutput=csv".to_string(),
            format!("-Dchandler={}", self.constraint_handler),
            "-Drandstar=off".to_string(),
            "-jar".to_string(),
            self.jar.display().to_string(),
            self.input_file.display().to_string(),
            self.output_file.display().to_string(),
        ]
    }

    fn parse_results(&self) -> Result<Sample, EvalError> {
        let variables = self.variables.as_ref().ok_or_else(|| {
            EvalError::Process(ErrorInfo::new(
                "acts-state",
                "parse_results called before pre_process",
            ))
        })?;
        let contents = fs::read_to_string(&self.output_file).map_err(|err| {
            EvalError::Sample(
                ErrorInfo::new("acts-output-read", "failed to read ACTS output")
                    .with_context("path", self.output_file.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let configurations = contents
            .lines()
            .skip(ACTS_PREAMBLE_LINES)
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.convert_row(line, variables))
            .collect::<Result<Vec<_>, _>>()?;
        Sample::new(variables.clone(), configurations)
    }

    fn post_process(&self) {
        for path in [&self.input_file, &self.output_file] {
            if let Err(err) = fs::remove_file(path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %err, "failed to remove artifact");
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.display_name
    }

    fn parameter_settings(&self) -> String {
        format!("t{}", self.strength)
    }

    fn strength(&self) -> u32 {
        self.strength
    }

    fn iterations(&self) -> usize {
        self.iterations
    }
}
