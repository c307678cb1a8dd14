//! Sample persistence format.
//!
//! One header line with the variable names, then one line per configuration
//! with `+`, `-`, or `0` cells, semicolon separated. The format carries its
//! own variable map so the metrics phase can load a sample without the model
//! that produced it.

use std::fs;
use std::io::Write;
use std::path::Path;

use twb_core::{ErrorInfo, EvalError};

use crate::sample::{PartialConfiguration, Sample};
use crate::vars::VariableMap;

/// File extension used for persisted samples.
pub const SAMPLE_EXTENSION: &str = "csv";

const SEPARATOR: char = ';';

/// Writes a sample to disk.
pub fn write_sample(path: &Path, sample: &Sample) -> Result<(), EvalError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| write_error(path, err))?;
    }
    let mut out = String::new();
    out.push_str(&sample.variables().names().join(&SEPARATOR.to_string()));
    out.push('\n');
    for configuration in sample.configurations() {
        let row: Vec<&str> = configuration
            .literals()
            .iter()
            .map(|&literal| match literal.signum() {
                1 => "+",
                -1 => "-",
                _ => "0",
            })
            .collect();
        out.push_str(&row.join(&SEPARATOR.to_string()));
        out.push('\n');
    }
    let mut file = fs::File::create(path).map_err(|err| write_error(path, err))?;
    file.write_all(out.as_bytes())
        .map_err(|err| write_error(path, err))
}

/// Reads a sample from disk. Fails loudly on absent or malformed files.
pub fn read_sample(path: &Path) -> Result<Sample, EvalError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        EvalError::Sample(
            ErrorInfo::new("sample-read", "failed to read sample file")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    parse_sample(&contents).map_err(|err| {
        let info = err.info().clone().with_context("path", path.display().to_string());
        EvalError::Sample(info)
    })
}

/// Parses sample text.
pub fn parse_sample(contents: &str) -> Result<Sample, EvalError> {
    let mut lines = contents.lines();
    let header = lines.next().ok_or_else(|| {
        EvalError::Sample(ErrorInfo::new("sample-parse", "missing header line"))
    })?;
    // An empty header denotes a sample over zero variables (the no-op
    // baseline produces these).
    let names: Vec<String> = if header.is_empty() {
        Vec::new()
    } else {
        header.split(SEPARATOR).map(str::to_string).collect()
    };
    let variables = VariableMap::new(names).map_err(|err| {
        EvalError::Sample(err.info().clone())
    })?;
    let count = variables.variable_count();

    let mut configurations = Vec::new();
    for (row, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(SEPARATOR).collect();
        if cells.len() != count {
            return Err(EvalError::Sample(
                ErrorInfo::new("sample-parse", "configuration width mismatch")
                    .with_context("row", (row + 1).to_string())
                    .with_context("expected", count.to_string())
                    .with_context("found", cells.len().to_string()),
            ));
        }
        let mut configuration = PartialConfiguration::unset(count);
        for (pos, cell) in cells.iter().enumerate() {
            let index = pos as u32 + 1;
            match *cell {
                "+" => configuration.assign(index, true),
                "-" => configuration.assign(index, false),
                "0" => {}
                other => {
                    return Err(EvalError::Sample(
                        ErrorInfo::new("sample-parse", "unknown cell value")
                            .with_context("row", (row + 1).to_string())
                            .with_context("cell", other.to_string()),
                    ));
                }
            }
        }
        configurations.push(configuration);
    }
    Sample::new(variables, configurations)
}

fn write_error(path: &Path, err: std::io::Error) -> EvalError {
    EvalError::Sample(
        ErrorInfo::new("sample-write", "failed to write sample file")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_unset_cells() {
        let variables = VariableMap::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        let mut one = PartialConfiguration::unset(3);
        one.assign(1, true);
        one.assign(3, false);
        let two = PartialConfiguration::unset(3);
        let sample = Sample::new(variables, vec![one, two]).unwrap();

        let text = "a;b;c\n+;0;-\n0;0;0\n";
        let parsed = parse_sample(text).unwrap();
        assert_eq!(parsed, sample);
    }

    #[test]
    fn unknown_cells_fail_loudly() {
        let err = parse_sample("a;b\n+;?\n").unwrap_err();
        assert_eq!(err.info().code, "sample-parse");
    }

    #[test]
    fn empty_sample_has_header_only() {
        let parsed = parse_sample("a;b\n").unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.variables().variable_count(), 2);
    }
}
