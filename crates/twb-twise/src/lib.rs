#![deny(missing_docs)]
#![doc = "Validity and t-wise coverage statistics for configuration samples."]

use serde::{Deserialize, Serialize};
use twb_model::{satisfiable_with, Cnf, Sample};

/// Fraction of sample configurations satisfying the model's constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityStatistic {
    /// Number of configurations that satisfy every clause.
    pub valid: usize,
    /// Total number of configurations in the sample.
    pub total: usize,
}

impl ValidityStatistic {
    /// Valid-to-total ratio; an empty sample yields 0.0.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.valid as f64 / self.total as f64
        }
    }
}

/// t-wise interaction coverage of a sample against a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStatistic {
    /// Interaction strength the statistic was computed for.
    pub t: u32,
    /// Valid tuples realized by at least one configuration.
    pub covered: usize,
    /// Valid tuples realized by no configuration.
    pub uncovered: usize,
    /// Tuples unsatisfiable against the model.
    pub invalid: usize,
}

impl CoverageStatistic {
    /// Covered-to-valid ratio; an empty valid universe yields 1.0.
    pub fn coverage(&self) -> f64 {
        let valid = self.covered + self.uncovered;
        if valid == 0 {
            1.0
        } else {
            self.covered as f64 / valid as f64
        }
    }
}

/// Computes the validity statistic for a sample.
///
/// A configuration is valid iff no clause has all of its literals assigned
/// false; unset literals cannot falsify a clause.
pub fn validity(model: &Cnf, sample: &Sample) -> ValidityStatistic {
    let valid = sample
        .configurations()
        .iter()
        .filter(|configuration| {
            model.clauses().iter().all(|clause| {
                clause.iter().any(|&literal| {
                    match configuration.value(literal.unsigned_abs()) {
                        Some(value) => value == (literal > 0),
                        None => true,
                    }
                })
            })
        })
        .count();
    ValidityStatistic {
        valid,
        total: sample.len(),
    }
}

/// Computes the t-wise coverage statistic for a sample.
///
/// The literal universe is the list of 1-based variable indices eligible for
/// tuple enumeration, derived by the caller from the model variant's
/// variable map. Every combination of `t` distinct universe variables and
/// every sign pattern over them forms one tuple; a tuple unsatisfiable
/// against the model counts as invalid, otherwise it is covered when some
/// configuration assigns all of its literals.
pub fn coverage(model: &Cnf, sample: &Sample, universe: &[u32], t: u32) -> CoverageStatistic {
    let mut statistic = CoverageStatistic {
        t,
        covered: 0,
        uncovered: 0,
        invalid: 0,
    };
    let mut chosen = Vec::with_capacity(t as usize);
    enumerate_tuples(model, sample, universe, t as usize, 0, &mut chosen, &mut statistic);
    statistic
}

fn enumerate_tuples(
    model: &Cnf,
    sample: &Sample,
    universe: &[u32],
    t: usize,
    start: usize,
    chosen: &mut Vec<u32>,
    statistic: &mut CoverageStatistic,
) {
    if chosen.len() == t {
        classify_signs(model, sample, chosen, &mut Vec::new(), statistic);
        return;
    }
    for pos in start..universe.len() {
        chosen.push(universe[pos]);
        enumerate_tuples(model, sample, universe, t, pos + 1, chosen, statistic);
        chosen.pop();
    }
}

fn classify_signs(
    model: &Cnf,
    sample: &Sample,
    variables: &[u32],
    literals: &mut Vec<i32>,
    statistic: &mut CoverageStatistic,
) {
    if literals.len() == variables.len() {
        classify_tuple(model, sample, literals, statistic);
        return;
    }
    let variable = variables[literals.len()] as i32;
    for literal in [variable, -variable] {
        literals.push(literal);
        classify_signs(model, sample, variables, literals, statistic);
        literals.pop();
    }
}

fn classify_tuple(
    model: &Cnf,
    sample: &Sample,
    tuple: &[i32],
    statistic: &mut CoverageStatistic,
) {
    if !satisfiable_with(model, tuple) {
        statistic.invalid += 1;
        return;
    }
    let realized = sample.configurations().iter().any(|configuration| {
        tuple.iter().all(|&literal| {
            configuration.value(literal.unsigned_abs()) == Some(literal > 0)
        })
    });
    if realized {
        statistic.covered += 1;
    } else {
        statistic.uncovered += 1;
    }
}
