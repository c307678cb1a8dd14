//! Minimal DPLL satisfiability check.
//!
//! Used by the statistics oracle to classify interaction tuples as invalid
//! (model plus tuple unsatisfiable). Not a general-purpose solver; unit
//! propagation plus chronological backtracking is enough for the model
//! sizes this workbench evaluates.

use crate::cnf::Cnf;

/// Returns whether the model is satisfiable under the given assumptions.
///
/// Assumptions are literals over the model's variables; conflicting
/// assumptions make the query trivially unsatisfiable.
pub fn satisfiable_with(cnf: &Cnf, assumptions: &[i32]) -> bool {
    let count = cnf.variable_count();
    let mut assignment: Vec<Option<bool>> = vec![None; count];
    for &literal in assumptions {
        let slot = literal.unsigned_abs() as usize - 1;
        let value = literal > 0;
        match assignment[slot] {
            Some(existing) if existing != value => return false,
            _ => assignment[slot] = Some(value),
        }
    }
    dpll(cnf.clauses(), &mut assignment)
}

fn dpll(clauses: &[Vec<i32>], assignment: &mut Vec<Option<bool>>) -> bool {
    loop {
        let mut unit: Option<i32> = None;
        for clause in clauses {
            let mut satisfied = false;
            let mut unassigned: Option<i32> = None;
            let mut unassigned_count = 0usize;
            for &literal in clause {
                match assignment[literal.unsigned_abs() as usize - 1] {
                    Some(value) => {
                        if value == (literal > 0) {
                            satisfied = true;
                            break;
                        }
                    }
                    None => {
                        unassigned = Some(literal);
                        unassigned_count += 1;
                    }
                }
            }
            if satisfied {
                continue;
            }
            match unassigned_count {
                0 => return false,
                1 => {
                    unit = unassigned;
                    break;
                }
                _ => {}
            }
        }
        match unit {
            Some(literal) => {
                assignment[literal.unsigned_abs() as usize - 1] = Some(literal > 0);
            }
            None => break,
        }
    }

    let next = match assignment.iter().position(Option::is_none) {
        Some(slot) => slot,
        None => return true,
    };
    for value in [true, false] {
        let mut branch = assignment.clone();
        branch[next] = Some(value);
        if dpll(clauses, &mut branch) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::VariableMap;

    fn cnf(names: usize, clauses: Vec<Vec<i32>>) -> Cnf {
        let variables =
            VariableMap::new((1..=names).map(|i| format!("x{i}")).collect()).unwrap();
        Cnf::new(variables, clauses).unwrap()
    }

    #[test]
    fn satisfiable_model() {
        let model = cnf(2, vec![vec![1, 2], vec![-1, 2]]);
        assert!(satisfiable_with(&model, &[]));
        assert!(satisfiable_with(&model, &[2]));
    }

    #[test]
    fn contradictory_assumptions() {
        let model = cnf(1, vec![vec![1]]);
        assert!(!satisfiable_with(&model, &[1, -1]));
        assert!(!satisfiable_with(&model, &[-1]));
    }

    #[test]
    fn unsatisfiable_core() {
        let model = cnf(2, vec![vec![1], vec![-1]]);
        assert!(!satisfiable_with(&model, &[]));
    }

    #[test]
    fn propagation_chain() {
        // x1 forces x2 forces x3; assuming -x3 must fail together with x1.
        let model = cnf(3, vec![vec![-1, 2], vec![-2, 3]]);
        assert!(satisfiable_with(&model, &[1]));
        assert!(!satisfiable_with(&model, &[1, -3]));
    }
}
