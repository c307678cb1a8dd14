//! Variable-name table mapping 1-based indices to display names.

use serde::{Deserialize, Serialize};
use twb_core::{ErrorInfo, EvalError};

/// Bidirectional mapping between 1-based variable indices and names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableMap {
    names: Vec<String>,
}

impl VariableMap {
    /// Builds a map from an ordered list of unique, non-empty names.
    pub fn new(names: Vec<String>) -> Result<Self, EvalError> {
        for (idx, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(EvalError::Model(
                    ErrorInfo::new("variable-name-empty", "variable names must be non-empty")
                        .with_context("index", (idx + 1).to_string()),
                ));
            }
            if names[..idx].contains(name) {
                return Err(EvalError::Model(
                    ErrorInfo::new("variable-name-duplicate", "variable names must be unique")
                        .with_context("name", name.clone()),
                ));
            }
        }
        Ok(Self { names })
    }

    /// Number of variables in the map.
    pub fn variable_count(&self) -> usize {
        self.names.len()
    }

    /// Returns the name for a 1-based variable index.
    pub fn name(&self, index: u32) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.names.get(index as usize - 1).map(String::as_str)
    }

    /// Returns the 1-based index for a variable name.
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|pos| pos as u32 + 1)
    }

    /// All names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_name_agree() {
        let map = VariableMap::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(map.variable_count(), 3);
        assert_eq!(map.name(2), Some("b"));
        assert_eq!(map.index_of("c"), Some(3));
        assert_eq!(map.name(0), None);
        assert_eq!(map.name(4), None);
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = VariableMap::new(vec!["a".into(), "a".into()]).unwrap_err();
        assert_eq!(err.info().code, "variable-name-duplicate");
    }
}
