//! Grid-coordinate-keyed artifact store.
//!
//! Path construction lives here and nowhere else: the sampling phase writes
//! artifacts and the metrics phase reloads them purely by grid coordinates,
//! so both phases must resolve byte-identical paths for the same cell.

use std::fs;
use std::path::{Path, PathBuf};

use twb_core::{CellContext, ErrorInfo, EvalError, SubjectId};
use twb_model::{
    read_dimacs, read_sample, write_dimacs, write_sample, Cnf, Sample, MODEL_EXTENSION,
    SAMPLE_EXTENSION,
};

/// Artifact store over the archival output directory and the transient
/// working directory shared by all algorithm invocations.
pub struct ArtifactStore {
    output_dir: PathBuf,
    temp_dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at the given directories.
    pub fn new(output_dir: PathBuf, temp_dir: PathBuf) -> Self {
        Self {
            output_dir,
            temp_dir,
        }
    }

    /// Creates both directories if they do not exist yet.
    pub fn ensure_layout(&self) -> Result<(), EvalError> {
        for dir in [&self.output_dir, &self.temp_dir] {
            fs::create_dir_all(dir).map_err(|err| {
                EvalError::Model(
                    ErrorInfo::new("store-layout", "failed to create artifact directory")
                        .with_context("path", dir.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
        }
        Ok(())
    }

    /// The archival output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Transient model file overwritten before every iteration.
    pub fn working_model_path(&self) -> PathBuf {
        self.temp_dir.join(format!("model.{MODEL_EXTENSION}"))
    }

    /// Transient sample file overwritten by every tool invocation.
    pub fn working_sample_path(&self) -> PathBuf {
        self.temp_dir.join(format!("sample.{SAMPLE_EXTENSION}"))
    }

    /// Transient ACTS input file derived from the working model.
    pub fn acts_input_path(&self) -> PathBuf {
        self.temp_dir.join("acts_model.txt")
    }

    /// Archival path of the as-loaded model for a subject.
    pub fn org_model_path(&self, subject: SubjectId) -> PathBuf {
        self.output_dir
            .join(format!("{subject}_org_model.{MODEL_EXTENSION}"))
    }

    /// Archival path of the randomized variant for an iteration.
    pub fn rnd_model_path(&self, subject: SubjectId, iteration: usize) -> PathBuf {
        self.output_dir
            .join(format!("{subject}_{iteration}_rnd_model.{MODEL_EXTENSION}"))
    }

    /// Archival path of the sample for a grid cell.
    pub fn sample_path(&self, cell: &CellContext) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}_{}_{}_sample.{SAMPLE_EXTENSION}",
            cell.subject, cell.system_iteration, cell.algorithm_index, cell.algorithm_iteration
        ))
    }

    /// Archives the as-loaded model of a subject.
    pub fn put_org_model(&self, subject: SubjectId, model: &Cnf) -> Result<(), EvalError> {
        write_dimacs(&self.org_model_path(subject), model)
    }

    /// Persists a randomized variant to the working copy and the archive.
    pub fn put_variant_model(
        &self,
        subject: SubjectId,
        iteration: usize,
        model: &Cnf,
    ) -> Result<(), EvalError> {
        write_dimacs(&self.working_model_path(), model)?;
        write_dimacs(&self.rnd_model_path(subject, iteration), model)
    }

    /// Reloads the archived variant for an iteration.
    pub fn get_variant_model(
        &self,
        subject: SubjectId,
        iteration: usize,
    ) -> Result<Cnf, EvalError> {
        read_dimacs(&self.rnd_model_path(subject, iteration))
    }

    /// Archives the sample produced by a grid cell.
    pub fn put_sample(&self, cell: &CellContext, sample: &Sample) -> Result<(), EvalError> {
        write_sample(&self.sample_path(cell), sample)
    }

    /// Reloads the archived sample for a grid cell.
    pub fn get_sample(&self, cell: &CellContext) -> Result<Sample, EvalError> {
        read_sample(&self.sample_path(cell))
    }

    /// Whether a sample was persisted for the grid cell.
    pub fn has_sample(&self, cell: &CellContext) -> bool {
        self.sample_path(cell).exists()
    }
}
