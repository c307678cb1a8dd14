//! Declarative name-to-variant catalog for algorithm configurations.
//!
//! The configured algorithm names are expanded against the configured
//! interaction strengths through a static table; both experiment phases use
//! the same expansion, so algorithm indices and artifact keys always agree.

use twb_core::{ErrorInfo, EvalError};

use crate::algorithms::{ActsSampling, Dummy, FideSampling, SamplingAlgorithm};
use crate::config::EvalConfig;
use crate::store::ArtifactStore;

enum ToolKind {
    Dummy,
    Acts {
        display: &'static str,
        algo: &'static str,
        handler: &'static str,
    },
    Fide {
        display: &'static str,
        algo: &'static str,
        grouping: Option<u32>,
        seeded: bool,
        fixed_strength: Option<u32>,
    },
}

struct CatalogEntry {
    key: &'static str,
    kind: ToolKind,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        key: "DUMMY",
        kind: ToolKind::Dummy,
    },
    CatalogEntry {
        key: "IPOG_FT",
        kind: ToolKind::Acts {
            display: "ACTS-IPOG",
            algo: "ipog",
            handler: "forbiddentuples",
        },
    },
    CatalogEntry {
        key: "IPOG_CSP",
        kind: ToolKind::Acts {
            display: "ACTS-IPOG",
            algo: "ipog",
            handler: "solver",
        },
    },
    CatalogEntry {
        key: "IPOG_D",
        kind: ToolKind::Acts {
            display: "ACTS-IPOG-D",
            algo: "ipog_d",
            handler: "forbiddentuples",
        },
    },
    CatalogEntry {
        key: "IPOF_FT",
        kind: ToolKind::Acts {
            display: "ACTS-IPOF",
            algo: "ipof",
            handler: "forbiddentuples",
        },
    },
    CatalogEntry {
        key: "IPOF_CSP",
        kind: ToolKind::Acts {
            display: "ACTS-IPOF",
            algo: "ipof",
            handler: "solver",
        },
    },
    CatalogEntry {
        key: "IPOF2",
        kind: ToolKind::Acts {
            display: "ACTS-IPOF2",
            algo: "ipof2",
            handler: "forbiddentuples",
        },
    },
    CatalogEntry {
        key: "IC",
        kind: ToolKind::Fide {
            display: "FIDE-ICPL",
            algo: "ICPL",
            grouping: None,
            seeded: false,
            fixed_strength: None,
        },
    },
    CatalogEntry {
        key: "CH",
        kind: ToolKind::Fide {
            display: "FIDE-Chvatal",
            algo: "Chvatal",
            grouping: None,
            seeded: false,
            fixed_strength: None,
        },
    },
    CatalogEntry {
        key: "IL",
        kind: ToolKind::Fide {
            display: "Incling",
            algo: "Incling",
            grouping: None,
            seeded: true,
            fixed_strength: Some(2),
        },
    },
    CatalogEntry {
        key: "YA",
        kind: ToolKind::Fide {
            display: "FIDE-YASA",
            algo: "YASA",
            grouping: Some(1),
            seeded: true,
            fixed_strength: None,
        },
    },
    CatalogEntry {
        key: "YA3",
        kind: ToolKind::Fide {
            display: "FIDE-YASA",
            algo: "YASA",
            grouping: Some(3),
            seeded: true,
            fixed_strength: None,
        },
    },
    CatalogEntry {
        key: "YA5",
        kind: ToolKind::Fide {
            display: "FIDE-YASA",
            algo: "YASA",
            grouping: Some(5),
            seeded: true,
            fixed_strength: None,
        },
    },
    CatalogEntry {
        key: "YA10",
        kind: ToolKind::Fide {
            display: "FIDE-YASA",
            algo: "YASA",
            grouping: Some(10),
            seeded: true,
            fixed_strength: None,
        },
    },
];

/// Expands the configured algorithm names and strengths into the ordered
/// list of algorithm configurations.
///
/// Entries with a fixed interaction strength (IncLing) contribute a
/// configuration only when the configured strength matches, so the returned
/// indices are identical for every traversal of the same configuration.
pub fn build_algorithms(
    config: &EvalConfig,
    store: &ArtifactStore,
) -> Result<Vec<Box<dyn SamplingAlgorithm>>, EvalError> {
    let mut algorithms: Vec<Box<dyn SamplingAlgorithm>> = Vec::new();
    for name in &config.algorithms {
        let entry = CATALOG
            .iter()
            .find(|entry| entry.key == name)
            .ok_or_else(|| {
                EvalError::Serde(
                    ErrorInfo::new("algorithm-unknown", "unknown algorithm name")
                        .with_context("name", name.clone()),
                )
            })?;
        for &strength in &config.t {
            match &entry.kind {
                ToolKind::Dummy => {
                    algorithms.push(Box::new(Dummy::new(
                        strength,
                        config.algorithm_iterations,
                    )));
                }
                ToolKind::Acts {
                    display,
                    algo,
                    handler,
                } => {
                    algorithms.push(Box::new(ActsSampling::new(
                        *display,
                        *algo,
                        *handler,
                        strength,
                        config.algorithm_iterations,
                        config.tools.java.clone(),
                        config.tools.acts_jar.clone(),
                        store.working_model_path(),
                        store.acts_input_path(),
                        store.working_sample_path(),
                    )));
                }
                ToolKind::Fide {
                    display,
                    algo,
                    grouping,
                    seeded,
                    fixed_strength,
                } => {
                    if let Some(fixed) = fixed_strength {
                        if *fixed != strength {
                            continue;
                        }
                    }
                    let seed = seeded.then_some(config.random_seed);
                    algorithms.push(Box::new(FideSampling::new(
                        *display,
                        *algo,
                        strength,
                        *grouping,
                        seed,
                        config.algorithm_iterations,
                        config.tools.java.clone(),
                        config.tools.featjar_classpath.clone(),
                        store.working_model_path(),
                        store.working_sample_path(),
                    )));
                }
            }
        }
    }
    Ok(algorithms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(algorithms: &[&str], t: &[u32]) -> EvalConfig {
        let mut config: EvalConfig = serde_yaml::from_str("systems: [demo]\n").unwrap();
        config.algorithms = algorithms.iter().map(|s| s.to_string()).collect();
        config.t = t.to_vec();
        config
    }

    fn store() -> ArtifactStore {
        ArtifactStore::new("out".into(), "tmp".into())
    }

    #[test]
    fn expands_names_by_strength() {
        let config = config(&["DUMMY", "CH"], &[2, 3]);
        let algorithms = build_algorithms(&config, &store()).unwrap();
        assert_eq!(algorithms.len(), 4);
        assert_eq!(algorithms[0].name(), "Dummy");
        assert_eq!(algorithms[2].name(), "FIDE-Chvatal");
        assert_eq!(algorithms[2].strength(), 2);
        assert_eq!(algorithms[3].strength(), 3);
    }

    #[test]
    fn incling_is_filtered_to_pairwise() {
        let config = config(&["IL"], &[2, 3]);
        let algorithms = build_algorithms(&config, &store()).unwrap();
        assert_eq!(algorithms.len(), 1);
        assert_eq!(algorithms[0].strength(), 2);
        assert_eq!(algorithms[0].name(), "Incling");
    }

    #[test]
    fn yasa_grouping_shows_in_settings() {
        let config = config(&["YA", "YA10"], &[2]);
        let algorithms = build_algorithms(&config, &store()).unwrap();
        assert_eq!(algorithms[0].parameter_settings(), "t2_m1");
        assert_eq!(algorithms[1].parameter_settings(), "t2_m10");
    }

    #[test]
    fn unknown_names_are_rejected() {
        let config = config(&["NOPE"], &[2]);
        let err = build_algorithms(&config, &store()).unwrap_err();
        assert_eq!(err.info().code, "algorithm-unknown");
    }
}
