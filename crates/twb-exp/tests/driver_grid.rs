use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tempfile::tempdir;
use twb_core::{EvalError, SubjectId};
use twb_exp::{
    EvalConfig, ExperimentDriver, RunManifest, SamplingAlgorithm, ToolPaths, DATA_FILE,
    MANIFEST_FILE, METRICS_FILE,
};
use twb_model::{write_dimacs, Cnf, Sample, VariableMap};

fn grid_config(root: &Path) -> EvalConfig {
    EvalConfig {
        systems: vec!["demo".to_string()],
        model_path: root.join("models"),
        output_path: root.join("output"),
        temp_path: root.join("temp"),
        system_iterations: 2,
        algorithm_iterations: 2,
        timeout_ms: 1_000,
        random_seed: 7,
        t: vec![2],
        algorithms: vec!["DUMMY".to_string()],
        tools: ToolPaths::default(),
    }
}

fn write_demo_model(root: &Path) {
    let variables = VariableMap::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
    let cnf = Cnf::new(variables, vec![vec![1, 2], vec![-1, 3]]).unwrap();
    write_dimacs(&root.join("models").join("demo.dimacs"), &cnf).unwrap();
}

fn table_rows(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect()
}

#[test]
fn dummy_grid_records_every_cell() {
    let dir = tempdir().unwrap();
    let config = grid_config(dir.path());
    write_demo_model(dir.path());

    let mut driver = ExperimentDriver::new(config).unwrap();
    driver.run_sampling_phase().unwrap();

    let output = dir.path().join("output");
    let rows = table_rows(&output.join(DATA_FILE));
    // 1 subject x 2 system iterations x 1 config x 2 repetitions.
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert_eq!(row[4], "true", "InTime");
        assert_eq!(row[5], "true", "Success");
    }

    for artifact in ["0_org_model.dimacs", "0_1_rnd_model.dimacs", "0_2_rnd_model.dimacs"] {
        assert!(output.join(artifact).exists(), "missing {artifact}");
    }
    for cell in ["0_1_0_1", "0_1_0_2", "0_2_0_1", "0_2_0_2"] {
        assert!(
            output.join(format!("{cell}_sample.csv")).exists(),
            "missing sample for {cell}"
        );
    }

    let manifest = RunManifest::load(&output.join(MANIFEST_FILE)).unwrap();
    assert_eq!(manifest.provenance.seed, 7);
    assert_eq!(manifest.algorithms.len(), 1);
    assert_eq!(manifest.subjects.len(), 1);
    assert_eq!(manifest.subjects[0].variables, 3);

    driver.run_coverage_phase().unwrap();
    let rows = table_rows(&output.join(METRICS_FILE));
    assert_eq!(rows.len(), 4);
    // The no-op baseline persists an empty sample: metrics are computed,
    // not sentinels.
    for row in &rows {
        assert_eq!(row[4], "0", "ValidityRatio");
        assert_eq!(row[5], "0", "Coverage");
        assert_ne!(row[6], "-1", "NumberOfUncoveredConditions");
    }
}

#[test]
fn missing_samples_get_sentinel_rows() {
    let dir = tempdir().unwrap();
    let config = grid_config(dir.path());
    write_demo_model(dir.path());

    let mut driver = ExperimentDriver::new(config).unwrap();
    driver.run_sampling_phase().unwrap();

    let output = dir.path().join("output");
    for entry in fs::read_dir(&output).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if name.ends_with("_sample.csv") {
            fs::remove_file(path).unwrap();
        }
    }

    driver.run_coverage_phase().unwrap();
    let rows = table_rows(&output.join(METRICS_FILE));
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert_eq!(row[4], "-1", "ValidityRatio");
        assert_eq!(row[5], "-1", "Coverage");
        assert_eq!(row[6], "-1", "NumberOfUncoveredConditions");
        assert_eq!(row[7], "-1", "NumberOfInvalidConditions");
    }
}

/// External tool that always outlives the timeout.
#[derive(Debug)]
struct SleepingTool;

impl SamplingAlgorithm for SleepingTool {
    fn command_line(&self) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), "sleep 5".to_string()]
    }
    fn parse_results(&self) -> Result<Sample, EvalError> {
        Ok(Sample::empty(VariableMap::new(Vec::new())?))
    }
    fn post_process(&self) {}
    fn name(&self) -> &str {
        "sleeper"
    }
    fn parameter_settings(&self) -> String {
        "t2".to_string()
    }
    fn strength(&self) -> u32 {
        2
    }
    fn iterations(&self) -> usize {
        2
    }
}

#[test]
fn timed_out_cells_persist_no_samples() {
    let dir = tempdir().unwrap();
    let mut config = grid_config(dir.path());
    config.timeout_ms = 300;
    write_demo_model(dir.path());

    let algorithms: Vec<Box<dyn SamplingAlgorithm>> = vec![Box::new(SleepingTool)];
    let mut driver = ExperimentDriver::with_algorithms(config, algorithms).unwrap();
    driver.run_sampling_phase().unwrap();

    let output = dir.path().join("output");
    let rows = table_rows(&output.join(DATA_FILE));
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert_eq!(row[4], "false", "InTime");
    }

    let samples: Vec<PathBuf> = fs::read_dir(&output)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with("_sample.csv")
        })
        .collect();
    assert!(samples.is_empty(), "unexpected samples: {samples:?}");
}

#[test]
fn unreadable_subject_skips_its_grid_slice() {
    let dir = tempdir().unwrap();
    let mut config = grid_config(dir.path());
    config.systems = vec!["missing".to_string(), "demo".to_string()];
    write_demo_model(dir.path());

    let mut driver = ExperimentDriver::new(config).unwrap();
    driver.run_sampling_phase().unwrap();

    let output = dir.path().join("output");
    let rows = table_rows(&output.join(DATA_FILE));
    // Only the readable subject contributes rows, under its own id.
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert_eq!(row[0], "1", "ModelID");
    }
    assert!(!output.join("0_org_model.dimacs").exists());
    assert!(output.join("1_org_model.dimacs").exists());

    // The store resolves the surviving subject's artifacts by coordinates.
    assert!(driver
        .store()
        .rnd_model_path(SubjectId::from_raw(1), 2)
        .exists());
}
