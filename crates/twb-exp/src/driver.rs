//! Nested grid traversal over subjects, iterations, and configurations.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{error, info, warn};
use twb_core::{CellContext, EvalError, RunProvenance, SubjectId};
use twb_model::{read_dimacs, Cnf, MODEL_EXTENSION};

use crate::algorithms::SamplingAlgorithm;
use crate::catalog::build_algorithms;
use crate::config::EvalConfig;
use crate::groups::assign_feature_groups;
use crate::manifest::{file_sha256, AlgorithmDescriptor, RunManifest, SubjectRecord};
use crate::metrics::compute_cell_metrics;
use crate::process::{ProcessRunner, RunResult};
use crate::randomizer::randomize_model;
use crate::recorder::ResultRecorder;
use crate::store::ArtifactStore;

/// File name of the manifest written after the sampling phase.
pub const MANIFEST_FILE: &str = "manifest.json";

/// A named subject model with its stable id.
#[derive(Debug, Clone)]
pub struct Subject {
    /// Stable identifier derived from the subject's configuration position.
    pub id: SubjectId,
    /// Subject model name.
    pub name: String,
}

/// Top-level controller composing runner, store, and recorder into the
/// experiment grid traversal.
///
/// The traversal is strictly single-threaded and sequential; exactly one
/// external process is in flight at a time, and the two shared working files
/// are overwritten in place between cells. Failure scopes, from widest to
/// narrowest: a subject that cannot be read is skipped entirely; an
/// iteration whose variant cannot be generated or persisted is skipped; a
/// cell whose row or sample cannot be persisted abandons the remaining
/// repetitions of that configuration only.
pub struct ExperimentDriver {
    config: EvalConfig,
    store: ArtifactStore,
    recorder: ResultRecorder,
    algorithms: Vec<Box<dyn SamplingAlgorithm>>,
}

impl ExperimentDriver {
    /// Builds a driver from a configuration, expanding the algorithm
    /// catalog.
    pub fn new(config: EvalConfig) -> Result<Self, EvalError> {
        config.validate()?;
        let store = ArtifactStore::new(config.output_path.clone(), config.temp_path.clone());
        let algorithms = build_algorithms(&config, &store)?;
        let recorder = ResultRecorder::new(config.output_path.clone());
        Ok(Self {
            config,
            store,
            recorder,
            algorithms,
        })
    }

    /// Builds a driver around an explicit algorithm list.
    ///
    /// This is the seam for tools outside the built-in catalog; both phases
    /// use the given list's order as the algorithm index.
    pub fn with_algorithms(
        config: EvalConfig,
        algorithms: Vec<Box<dyn SamplingAlgorithm>>,
    ) -> Result<Self, EvalError> {
        config.validate()?;
        let store = ArtifactStore::new(config.output_path.clone(), config.temp_path.clone());
        let recorder = ResultRecorder::new(config.output_path.clone());
        Ok(Self {
            config,
            store,
            recorder,
            algorithms,
        })
    }

    /// The artifact store the driver records into.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    fn subjects(&self) -> Vec<Subject> {
        self.config
            .systems
            .iter()
            .enumerate()
            .map(|(index, name)| Subject {
                id: SubjectId::from_raw(index as u64),
                name: name.clone(),
            })
            .collect()
    }

    /// Executes the sampling phase over the full grid.
    ///
    /// Returns an error only for experiment-level failures (directory
    /// layout, the algorithms table); per-subject, per-iteration, and
    /// per-cell failures are logged, recorded where applicable, and never
    /// abort the traversal.
    pub fn run_sampling_phase(&mut self) -> Result<(), EvalError> {
        self.store.ensure_layout()?;
        for (index, algorithm) in self.algorithms.iter().enumerate() {
            self.recorder
                .record_algorithm(index, algorithm.name(), &algorithm.parameter_settings())?;
        }

        let runner = ProcessRunner::new(self.config.timeout());
        let subjects = self.subjects();
        let mut subject_records = Vec::new();
        info!(subjects = subjects.len(), "sampling phase started");

        let config = &self.config;
        let store = &self.store;
        let recorder = &self.recorder;
        let algorithms = &mut self.algorithms;

        for (subject_index, subject) in subjects.iter().enumerate() {
            info!(
                system = %subject.name,
                position = %format!("{}/{}", subject_index + 1, subjects.len()),
                "reading subject"
            );
            let model = match prepare_subject(config, store, recorder, subject) {
                Some((model, record)) => {
                    subject_records.push(record);
                    model
                }
                None => continue,
            };

            for iteration in 1..=config.system_iterations {
                let variant = match randomize_model(&model, config.random_seed, iteration) {
                    Ok(variant) => variant,
                    Err(err) => {
                        error!(system = %subject.name, iteration, %err, "variant generation failed");
                        continue;
                    }
                };
                if let Err(err) = store.put_variant_model(subject.id, iteration, &variant) {
                    error!(system = %subject.name, iteration, %err, "variant persist failed");
                    continue;
                }

                let algorithm_count = algorithms.len();
                for algorithm_index in 0..algorithm_count {
                    let algorithm = &mut algorithms[algorithm_index];
                    let repetitions = algorithm.iterations();
                    for repetition in 1..=repetitions {
                        let cell =
                            CellContext::new(subject.id, iteration, algorithm_index, repetition);
                        info!(
                            system = %subject.name,
                            system_position = %format!("{}/{}", subject_index + 1, subjects.len()),
                            iteration = %format!("{}/{}", iteration, config.system_iterations),
                            algorithm = algorithm.name(),
                            algorithm_position =
                                %format!("{}/{}", algorithm_index + 1, algorithm_count),
                            repetition = %format!("{}/{}", repetition, repetitions),
                            "running cell"
                        );
                        let result = runner.run(algorithm.as_mut());
                        if let Err(err) = record_cell(recorder, store, &cell, &result) {
                            error!(
                                system = %subject.name,
                                iteration,
                                algorithm = algorithm.name(),
                                %err,
                                "cell persist failed; abandoning remaining repetitions"
                            );
                            break;
                        }
                    }
                }
            }
        }

        let manifest = self.build_manifest(subject_records);
        manifest.write(&self.store.output_dir().join(MANIFEST_FILE))?;
        info!("sampling phase finished");
        Ok(())
    }

    /// Executes the metrics phase over the full grid.
    ///
    /// Reloads persisted (variant, sample) pairs purely by grid coordinates;
    /// cells without a usable sample are recorded with sentinel values.
    pub fn run_coverage_phase(&self) -> Result<(), EvalError> {
        self.store.ensure_layout()?;
        let subjects = self.subjects();
        info!(subjects = subjects.len(), "metrics phase started");

        for (subject_index, subject) in subjects.iter().enumerate() {
            for iteration in 1..=self.config.system_iterations {
                let model = match self.store.get_variant_model(subject.id, iteration) {
                    Ok(model) => model,
                    Err(err) => {
                        error!(system = %subject.name, iteration, %err, "variant missing");
                        continue;
                    }
                };

                for (algorithm_index, algorithm) in self.algorithms.iter().enumerate() {
                    let repetitions = algorithm.iterations();
                    for repetition in 1..=repetitions {
                        let cell =
                            CellContext::new(subject.id, iteration, algorithm_index, repetition);
                        info!(
                            system = %subject.name,
                            system_position = %format!("{}/{}", subject_index + 1, subjects.len()),
                            iteration = %format!("{}/{}", iteration, self.config.system_iterations),
                            algorithm = algorithm.name(),
                            repetition = %format!("{}/{}", repetition, repetitions),
                            "computing metrics"
                        );
                        let sample = if self.store.has_sample(&cell) {
                            match self.store.get_sample(&cell) {
                                Ok(sample) => Some(sample),
                                Err(err) => {
                                    warn!(%err, "sample unreadable; recording sentinels");
                                    None
                                }
                            }
                        } else {
                            None
                        };
                        let metrics =
                            compute_cell_metrics(&model, sample.as_ref(), algorithm.strength());
                        if let Err(err) = self.recorder.record_metrics(&cell, &metrics) {
                            error!(
                                system = %subject.name,
                                iteration,
                                algorithm = algorithm.name(),
                                %err,
                                "metrics persist failed; abandoning remaining repetitions"
                            );
                            break;
                        }
                    }
                }
            }
        }
        info!("metrics phase finished");
        Ok(())
    }

    fn build_manifest(&self, subjects: Vec<SubjectRecord>) -> RunManifest {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert("twb".to_string(), env!("CARGO_PKG_VERSION").to_string());
        RunManifest {
            provenance: RunProvenance {
                seed: self.config.random_seed,
                created_at: Utc::now().to_rfc3339(),
                tool_versions,
            },
            config: self.config.clone(),
            algorithms: self
                .algorithms
                .iter()
                .enumerate()
                .map(|(index, algorithm)| AlgorithmDescriptor {
                    index,
                    name: algorithm.name().to_string(),
                    settings: algorithm.parameter_settings(),
                })
                .collect(),
            subjects,
        }
    }
}

/// Reads, archives, and records one subject. Any failure aborts the whole
/// subject; the feature-group report is written here because it exists once
/// per subject and only in the sampling phase.
fn prepare_subject(
    config: &EvalConfig,
    store: &ArtifactStore,
    recorder: &ResultRecorder,
    subject: &Subject,
) -> Option<(Cnf, SubjectRecord)> {
    let model_file = config
        .model_path
        .join(format!("{}.{MODEL_EXTENSION}", subject.name));
    let model = match read_dimacs(&model_file) {
        Ok(model) => model,
        Err(err) => {
            error!(system = %subject.name, %err, "subject read failed");
            return None;
        }
    };

    if let Err(err) = store.put_org_model(subject.id, &model) {
        error!(system = %subject.name, %err, "subject archive failed");
        return None;
    }
    if let Err(err) = recorder.record_model(
        subject.id.as_raw(),
        &subject.name,
        model.variable_count(),
        model.clause_count(),
    ) {
        error!(system = %subject.name, %err, "subject record failed");
        return None;
    }

    let groups = assign_feature_groups(model.variables());
    if let Err(err) = recorder.record_feature_groups(&groups) {
        error!(system = %subject.name, %err, "feature-group record failed");
        return None;
    }

    let model_sha256 = match file_sha256(&store.org_model_path(subject.id)) {
        Ok(hash) => hash,
        Err(err) => {
            warn!(system = %subject.name, %err, "model hash unavailable");
            String::from("unavailable")
        }
    };
    let record = SubjectRecord {
        id: subject.id.as_raw(),
        name: subject.name.clone(),
        variables: model.variable_count(),
        clauses: model.clause_count(),
        model_sha256,
    };
    Some((model, record))
}

/// Records one evaluated cell: the data row first, then the sample artifact.
/// An error from either step is the caller's signal to abandon the remaining
/// repetitions of the current configuration.
fn record_cell(
    recorder: &ResultRecorder,
    store: &ArtifactStore,
    cell: &CellContext,
    result: &RunResult,
) -> Result<(), EvalError> {
    recorder.record_run(cell, result)?;
    if let Some(sample) = &result.sample {
        store.put_sample(cell, sample)?;
    }
    Ok(())
}
