//! Grid coordinate types shared by both experiment phases.

use serde::{Deserialize, Serialize};

/// Stable identifier for a subject model within an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(u64);

impl SubjectId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Full grid coordinate of one (config, repetition) cell.
///
/// The tuple `(subject, system_iteration, algorithm_index,
/// algorithm_iteration)` uniquely names every persisted artifact and every
/// recorded row. Iterations are 1-based, the algorithm index is 0-based,
/// matching the recorded tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellContext {
    /// Subject model the cell belongs to.
    pub subject: SubjectId,
    /// Model-randomization iteration (1-based).
    pub system_iteration: usize,
    /// Index of the algorithm configuration in the catalog (0-based).
    pub algorithm_index: usize,
    /// Repetition of the algorithm configuration (1-based).
    pub algorithm_iteration: usize,
}

impl CellContext {
    /// Creates a cell coordinate.
    pub fn new(
        subject: SubjectId,
        system_iteration: usize,
        algorithm_index: usize,
        algorithm_iteration: usize,
    ) -> Self {
        Self {
            subject,
            system_iteration,
            algorithm_index,
            algorithm_iteration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_order_by_grid_position() {
        let a = CellContext::new(SubjectId::from_raw(0), 1, 0, 1);
        let b = CellContext::new(SubjectId::from_raw(0), 1, 0, 2);
        let c = CellContext::new(SubjectId::from_raw(0), 2, 0, 1);
        assert!(a < b);
        assert!(b < c);
    }
}
