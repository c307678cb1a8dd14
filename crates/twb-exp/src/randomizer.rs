//! Seeding policy for reproducible model variants.

use twb_core::EvalError;
use twb_model::Cnf;

/// Derives the randomization seed for a system iteration.
///
/// The seed contract is plain `base + iteration`. Variant archives produced
/// under one base seed stay valid when an experiment is later extended with
/// more iterations, so this must not change to a hashed substream.
pub fn variant_seed(base_seed: u64, system_iteration: usize) -> u64 {
    base_seed.wrapping_add(system_iteration as u64)
}

/// Produces the reproducible randomized variant of a subject model.
///
/// Identical `(model, base_seed, system_iteration)` inputs always yield an
/// identical variant; the perturbation itself is delegated to
/// [`Cnf::randomize`].
pub fn randomize_model(
    model: &Cnf,
    base_seed: u64,
    system_iteration: usize,
) -> Result<Cnf, EvalError> {
    model.randomize(variant_seed(base_seed, system_iteration))
}
