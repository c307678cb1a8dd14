//! Append-only CSV tables recording the experiment grid.
//!
//! One physical table per concern; a header is written when a table file is
//! first created, every row is flushed before the call returns, and no row
//! is ever rewritten. Partial results therefore survive any later abort.

use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use twb_core::{CellContext, ErrorInfo, EvalError};

use crate::groups::{FeatureGroupAssignment, GROUP_COUNT};
use crate::metrics::CellMetrics;
use crate::process::RunResult;

/// Execution-phase subject table.
pub const MODELS_FILE: &str = "models.csv";
/// Execution-phase algorithm-configuration table.
pub const ALGORITHMS_FILE: &str = "algorithms.csv";
/// Execution-phase feature-group report.
pub const FEATURE_GROUPS_FILE: &str = "feature_groups.csv";
/// Execution-phase per-cell run outcomes.
pub const DATA_FILE: &str = "data.csv";
/// Metrics-phase per-cell validity/coverage records.
pub const METRICS_FILE: &str = "data2.csv";

/// Append-only writer over the recorded tables of one experiment.
pub struct ResultRecorder {
    dir: PathBuf,
}

impl ResultRecorder {
    /// Creates a recorder rooted at the output directory.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn append(&self, file: &str, header: &[&str], record: &[String]) -> Result<(), EvalError> {
        let path = self.dir.join(file);
        let exists = path.exists();
        let handle = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|err| {
                EvalError::Serde(
                    ErrorInfo::new("recorder-open", "failed to open table")
                        .with_context("path", path.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(BufWriter::new(handle));
        if !exists {
            writer
                .write_record(header)
                .map_err(|err| wrap_csv(&path, err))?;
        }
        writer
            .write_record(record)
            .map_err(|err| wrap_csv(&path, err))?;
        writer
            .flush()
            .map_err(|err| wrap_csv(&path, err.into()))?;
        Ok(())
    }

    /// Appends one subject row to models.csv.
    pub fn record_model(
        &self,
        subject_id: u64,
        name: &str,
        variables: usize,
        clauses: usize,
    ) -> Result<(), EvalError> {
        self.append(
            MODELS_FILE,
            &["ModelID", "Name", "#Variables", "#Clauses"],
            &[
                subject_id.to_string(),
                name.to_string(),
                variables.to_string(),
                clauses.to_string(),
            ],
        )
    }

    /// Appends one configuration row to algorithms.csv.
    pub fn record_algorithm(
        &self,
        index: usize,
        name: &str,
        settings: &str,
    ) -> Result<(), EvalError> {
        self.append(
            ALGORITHMS_FILE,
            &["AlgorithmID", "Name", "Settings"],
            &[index.to_string(), name.to_string(), settings.to_string()],
        )
    }

    /// Appends the per-group variable lists to feature_groups.csv.
    ///
    /// Rows are variable-length: the group number followed by the names of
    /// its member variables.
    pub fn record_feature_groups(
        &self,
        assignment: &FeatureGroupAssignment,
    ) -> Result<(), EvalError> {
        for group in 1..=GROUP_COUNT {
            let mut record = vec![group.to_string()];
            for (variable, groups) in assignment {
                if groups.contains(&group) {
                    record.push(variable.clone());
                }
            }
            self.append(FEATURE_GROUPS_FILE, &["Feature group", "Features"], &record)?;
        }
        Ok(())
    }

    /// Appends one run-outcome row to data.csv.
    pub fn record_run(&self, cell: &CellContext, result: &RunResult) -> Result<(), EvalError> {
        let sample_size = result.sample.as_ref().map_or(0, |sample| sample.len());
        self.append(
            DATA_FILE,
            &[
                "ModelID",
                "AlgorithmID",
                "SystemIteration",
                "AlgorithmIteration",
                "InTime",
                "Success",
                "Time",
                "SampleSize",
            ],
            &[
                cell.subject.as_raw().to_string(),
                cell.algorithm_index.to_string(),
                cell.system_iteration.to_string(),
                cell.algorithm_iteration.to_string(),
                result.terminated_in_time.to_string(),
                result.no_error.to_string(),
                result.elapsed.as_millis().to_string(),
                sample_size.to_string(),
            ],
        )
    }

    /// Appends one validity/coverage row to data2.csv.
    pub fn record_metrics(
        &self,
        cell: &CellContext,
        metrics: &CellMetrics,
    ) -> Result<(), EvalError> {
        self.append(
            METRICS_FILE,
            &[
                "ModelID",
                "AlgorithmID",
                "SystemIteration",
                "AlgorithmIteration",
                "ValidityRatio",
                "Coverage",
                "NumberOfUncoveredConditions",
                "NumberOfInvalidConditions",
            ],
            &[
                cell.subject.as_raw().to_string(),
                cell.algorithm_index.to_string(),
                cell.system_iteration.to_string(),
                cell.algorithm_iteration.to_string(),
                metrics.validity_ratio.to_string(),
                metrics.coverage.to_string(),
                metrics.uncovered.to_string(),
                metrics.invalid.to_string(),
            ],
        )
    }

}

fn wrap_csv(path: &Path, err: csv::Error) -> EvalError {
    EvalError::Serde(
        ErrorInfo::new("recorder-write", "failed to append table row")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use twb_core::SubjectId;

    #[test]
    fn header_is_written_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ResultRecorder::new(dir.path().to_path_buf());
        recorder.record_algorithm(0, "Dummy", "42").unwrap();

        // A fresh recorder over the same directory must append, not rewrite.
        let recorder = ResultRecorder::new(dir.path().to_path_buf());
        recorder.record_algorithm(1, "FIDE-YASA", "t2_m1").unwrap();

        let contents =
            std::fs::read_to_string(dir.path().join(ALGORITHMS_FILE)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "AlgorithmID,Name,Settings");
        assert!(lines[1].starts_with("0,Dummy"));
        assert!(lines[2].starts_with("1,FIDE-YASA"));
    }

    #[test]
    fn run_rows_follow_the_column_contract() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ResultRecorder::new(dir.path().to_path_buf());
        let cell = CellContext::new(SubjectId::from_raw(1), 2, 3, 4);
        let result = RunResult {
            elapsed: Duration::from_millis(250),
            terminated_in_time: true,
            no_error: false,
            sample: None,
        };
        recorder.record_run(&cell, &result).unwrap();

        let contents = std::fs::read_to_string(dir.path().join(DATA_FILE)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "ModelID,AlgorithmID,SystemIteration,AlgorithmIteration,InTime,Success,Time,SampleSize"
        );
        assert_eq!(lines[1], "1,3,2,4,true,false,250,0");
    }
}
