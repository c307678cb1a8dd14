//! Per-cell metric computation over persisted artifacts.

use serde::{Deserialize, Serialize};
use twb_model::{Cnf, Sample};
use twb_twise::{coverage, validity};

/// Sentinel recorded for cells with no usable sample.
pub const MISSING: f64 = -1.0;

/// Validity and coverage figures for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    /// Fraction of configurations satisfying the model, or -1.
    pub validity_ratio: f64,
    /// t-wise coverage ratio, or -1.
    pub coverage: f64,
    /// Count of valid-but-unrealized tuples, or -1.
    pub uncovered: i64,
    /// Count of tuples unsatisfiable against the model, or -1.
    pub invalid: i64,
}

impl CellMetrics {
    /// The sentinel record for a missing or unparsable sample.
    pub fn missing() -> Self {
        Self {
            validity_ratio: MISSING,
            coverage: MISSING,
            uncovered: -1,
            invalid: -1,
        }
    }

    /// Whether this record carries the missing-data sentinels.
    pub fn is_missing(&self) -> bool {
        self.validity_ratio == MISSING
    }
}

/// Computes the metrics for one cell.
///
/// The literal universe handed to the oracle is derived from the variant's
/// variable map. A missing sample yields the sentinel record without
/// invoking the oracle; that is a missing-data case, not an error.
pub fn compute_cell_metrics(model: &Cnf, sample: Option<&Sample>, t: u32) -> CellMetrics {
    let Some(sample) = sample else {
        return CellMetrics::missing();
    };
    let universe: Vec<u32> = (1..=model.variable_count() as u32).collect();
    let validity_statistic = validity(model, sample);
    let coverage_statistic = coverage(model, sample, &universe, t);
    CellMetrics {
        validity_ratio: validity_statistic.ratio(),
        coverage: coverage_statistic.coverage(),
        uncovered: coverage_statistic.uncovered as i64,
        invalid: coverage_statistic.invalid as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twb_model::{PartialConfiguration, VariableMap};

    fn model() -> Cnf {
        let variables = VariableMap::new(vec!["a".into(), "b".into()]).unwrap();
        Cnf::new(variables, vec![vec![1, 2]]).unwrap()
    }

    #[test]
    fn missing_sample_yields_sentinels() {
        let metrics = compute_cell_metrics(&model(), None, 2);
        assert!(metrics.is_missing());
        assert_eq!(metrics.validity_ratio, -1.0);
        assert_eq!(metrics.coverage, -1.0);
        assert_eq!(metrics.uncovered, -1);
        assert_eq!(metrics.invalid, -1);
    }

    #[test]
    fn computed_records_stay_in_range() {
        let cnf = model();
        let mut configuration = PartialConfiguration::unset(2);
        configuration.assign(1, true);
        configuration.assign(2, true);
        let sample = Sample::new(cnf.variables().clone(), vec![configuration]).unwrap();
        let metrics = compute_cell_metrics(&cnf, Some(&sample), 2);
        assert!((0.0..=1.0).contains(&metrics.validity_ratio));
        assert!((0.0..=1.0).contains(&metrics.coverage));
        assert!(metrics.uncovered >= 0);
        assert!(metrics.invalid >= 0);
    }
}
