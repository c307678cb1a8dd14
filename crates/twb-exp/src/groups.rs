//! Random feature-group assignment for the descriptive report.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use twb_model::VariableMap;

/// Number of semantic groups variables are assigned to.
pub const GROUP_COUNT: u32 = 10;
/// Maximum number of groups one variable belongs to.
pub const MAX_MEMBERSHIPS: u32 = 3;

/// Mapping from variable name to its group memberships.
pub type FeatureGroupAssignment = BTreeMap<String, BTreeSet<u32>>;

/// Assigns every variable to between one and three groups.
///
/// Deliberately unseeded: the assignment feeds a descriptive report only and
/// is NOT reproducible across runs, unlike everything else in the grid. It
/// must never influence algorithm execution or metrics.
pub fn assign_feature_groups(variables: &VariableMap) -> FeatureGroupAssignment {
    let mut rng = rand::thread_rng();
    let mut assignment = FeatureGroupAssignment::new();
    for name in variables.names() {
        let memberships = rng.gen_range(1..=MAX_MEMBERSHIPS);
        let mut groups = BTreeSet::new();
        // Draws are with replacement, so a variable can end up in fewer
        // groups than draws.
        for _ in 0..memberships {
            groups.insert(rng.gen_range(1..=GROUP_COUNT));
        }
        assignment.insert(name.clone(), groups);
    }
    assignment
}
