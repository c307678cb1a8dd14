//! Partial-configuration samples produced by sampling algorithms.

use serde::{Deserialize, Serialize};
use twb_core::{ErrorInfo, EvalError};

use crate::vars::VariableMap;

/// One (possibly partial) assignment over a model's variables.
///
/// Entry `i` is `+(i+1)` for true, `-(i+1)` for false, or `0` for unset,
/// mirroring the literal-list convention used by the sampling tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialConfiguration {
    literals: Vec<i32>,
}

impl PartialConfiguration {
    /// Creates an all-unset configuration over `count` variables.
    pub fn unset(count: usize) -> Self {
        Self {
            literals: vec![0; count],
        }
    }

    /// Assigns a value to a 1-based variable index.
    pub fn assign(&mut self, index: u32, value: bool) {
        let literal = index as i32;
        self.literals[index as usize - 1] = if value { literal } else { -literal };
    }

    /// Returns the assigned value for a 1-based variable index, if any.
    pub fn value(&self, index: u32) -> Option<bool> {
        match self.literals.get(index as usize - 1) {
            Some(0) | None => None,
            Some(literal) => Some(*literal > 0),
        }
    }

    /// Index-ordered literal view.
    pub fn literals(&self) -> &[i32] {
        &self.literals
    }

    /// Number of assigned variables.
    pub fn assigned_count(&self) -> usize {
        self.literals.iter().filter(|&&l| l != 0).count()
    }
}

/// Ordered collection of configurations produced by one algorithm run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    variables: VariableMap,
    configurations: Vec<PartialConfiguration>,
}

impl Sample {
    /// Creates an empty sample over the given variables.
    pub fn empty(variables: VariableMap) -> Self {
        Self {
            variables,
            configurations: Vec::new(),
        }
    }

    /// Creates a sample from configurations, validating their width.
    pub fn new(
        variables: VariableMap,
        configurations: Vec<PartialConfiguration>,
    ) -> Result<Self, EvalError> {
        let count = variables.variable_count();
        for configuration in &configurations {
            if configuration.literals().len() != count {
                return Err(EvalError::Sample(
                    ErrorInfo::new("sample-width", "configuration width mismatch")
                        .with_context("expected", count.to_string())
                        .with_context("found", configuration.literals().len().to_string()),
                ));
            }
        }
        Ok(Self {
            variables,
            configurations,
        })
    }

    /// The variable map the sample is expressed over.
    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// The configurations in insertion order.
    pub fn configurations(&self) -> &[PartialConfiguration] {
        &self.configurations
    }

    /// Number of configurations.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// True when the sample holds no configurations.
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}
