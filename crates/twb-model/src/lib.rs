#![deny(missing_docs)]
#![doc = "CNF models, partial-configuration samples, and their file codecs."]

mod cnf;
pub mod dimacs;
mod sample;
pub mod sample_io;
pub mod solver;
mod vars;

pub use cnf::Cnf;
pub use dimacs::{parse_dimacs, read_dimacs, write_dimacs, MODEL_EXTENSION};
pub use sample::{PartialConfiguration, Sample};
pub use sample_io::{parse_sample, read_sample, write_sample, SAMPLE_EXTENSION};
pub use solver::satisfiable_with;
pub use vars::VariableMap;
