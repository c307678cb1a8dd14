//! CNF model representation with deterministic randomization.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use twb_core::{derive_substream_seed, ErrorInfo, EvalError, RngHandle};

use crate::vars::VariableMap;

/// A propositional model in conjunctive normal form.
///
/// Clauses are literal lists over 1-based variable indices; a negative
/// literal negates the variable. The variable map carries display names for
/// reporting and for the sample codec header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cnf {
    variables: VariableMap,
    clauses: Vec<Vec<i32>>,
}

impl Cnf {
    /// Builds a model, validating every literal against the variable map.
    pub fn new(variables: VariableMap, clauses: Vec<Vec<i32>>) -> Result<Self, EvalError> {
        let count = variables.variable_count() as i64;
        for (idx, clause) in clauses.iter().enumerate() {
            for &literal in clause {
                if literal == 0 || (literal as i64).abs() > count {
                    return Err(EvalError::Model(
                        ErrorInfo::new("clause-literal-range", "literal outside variable range")
                            .with_context("clause", idx.to_string())
                            .with_context("literal", literal.to_string()),
                    ));
                }
            }
        }
        Ok(Self { variables, clauses })
    }

    /// The variable map of the model.
    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// The clause list of the model.
    pub fn clauses(&self) -> &[Vec<i32>] {
        &self.clauses
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.variable_count()
    }

    /// Number of clauses.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Produces a randomized variant of the model.
    ///
    /// The transformation permutes variable indices (renaming the variable
    /// map accordingly) and shuffles the clause order. Identical `(model,
    /// seed)` inputs always yield an identical variant; callers rely on this
    /// for reproducible experiment grids.
    pub fn randomize(&self, seed: u64) -> Result<Cnf, EvalError> {
        let count = self.variable_count();
        // Separate substreams for the permutation and the clause order, so
        // neither draw count influences the other.
        let mut index_rng = RngHandle::from_seed(derive_substream_seed(seed, 0));
        let mut clause_rng = RngHandle::from_seed(derive_substream_seed(seed, 1));

        // permutation[old - 1] = new 1-based index
        let mut new_indices: Vec<u32> = (1..=count as u32).collect();
        new_indices.shuffle(index_rng.inner_mut());

        let mut names = vec![String::new(); count];
        for (old_pos, &new_index) in new_indices.iter().enumerate() {
            names[new_index as usize - 1] = self.variables.names()[old_pos].clone();
        }
        let variables = VariableMap::new(names)?;

        let mut clauses: Vec<Vec<i32>> = self
            .clauses
            .iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|&literal| {
                        let mapped = new_indices[literal.unsigned_abs() as usize - 1] as i32;
                        if literal < 0 {
                            -mapped
                        } else {
                            mapped
                        }
                    })
                    .collect()
            })
            .collect();
        clauses.shuffle(clause_rng.inner_mut());

        Cnf::new(variables, clauses)
    }
}
