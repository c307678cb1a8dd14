#![deny(missing_docs)]
#![doc = "Shared error, RNG, and grid-coordinate types for the twb workbench."]

pub mod errors;
pub mod grid;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, EvalError};
pub use grid::{CellContext, SubjectId};
pub use provenance::RunProvenance;
pub use rng::{derive_substream_seed, RngHandle};
