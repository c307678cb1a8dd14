//! DIMACS CNF reader and writer.
//!
//! The writer emits `c v <index> <name>` comments so variable names survive
//! the round trip; the reader falls back to `x<index>` names when a file
//! carries no name comments.

use std::fs;
use std::io::Write;
use std::path::Path;

use twb_core::{ErrorInfo, EvalError};

use crate::cnf::Cnf;
use crate::vars::VariableMap;

/// File extension used for persisted models.
pub const MODEL_EXTENSION: &str = "dimacs";

/// Writes a model to a DIMACS file.
pub fn write_dimacs(path: &Path, cnf: &Cnf) -> Result<(), EvalError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| write_error(path, err))?;
    }
    let mut out = String::new();
    for (pos, name) in cnf.variables().names().iter().enumerate() {
        out.push_str(&format!("c v {} {}\n", pos + 1, name));
    }
    out.push_str(&format!(
        "p cnf {} {}\n",
        cnf.variable_count(),
        cnf.clause_count()
    ));
    for clause in cnf.clauses() {
        for literal in clause {
            out.push_str(&format!("{literal} "));
        }
        out.push_str("0\n");
    }
    let mut file = fs::File::create(path).map_err(|err| write_error(path, err))?;
    file.write_all(out.as_bytes())
        .map_err(|err| write_error(path, err))
}

/// Reads a model from a DIMACS file.
pub fn read_dimacs(path: &Path) -> Result<Cnf, EvalError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        EvalError::Model(
            ErrorInfo::new("model-read", "failed to read model file")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    parse_dimacs(&contents).map_err(|err| {
        let info = err.info().clone().with_context("path", path.display().to_string());
        EvalError::Model(info)
    })
}

/// Parses DIMACS text into a model.
pub fn parse_dimacs(contents: &str) -> Result<Cnf, EvalError> {
    let mut declared: Option<(usize, usize)> = None;
    let mut names: Vec<(u32, String)> = Vec::new();
    let mut clauses: Vec<Vec<i32>> = Vec::new();
    let mut current: Vec<i32> = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("c") {
            let rest = rest.trim();
            if let Some(spec) = rest.strip_prefix("v ") {
                let mut parts = spec.splitn(2, ' ');
                let index = parts
                    .next()
                    .and_then(|raw| raw.parse::<u32>().ok())
                    .ok_or_else(|| parse_error("malformed variable comment", line))?;
                let name = parts
                    .next()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| parse_error("malformed variable comment", line))?;
                names.push((index, name.to_string()));
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("p ") {
            let mut parts = rest.split_whitespace();
            if parts.next() != Some("cnf") {
                return Err(parse_error("unsupported problem line", line));
            }
            let variables = parts
                .next()
                .and_then(|raw| raw.parse::<usize>().ok())
                .ok_or_else(|| parse_error("malformed problem line", line))?;
            let clause_count = parts
                .next()
                .and_then(|raw| raw.parse::<usize>().ok())
                .ok_or_else(|| parse_error("malformed problem line", line))?;
            declared = Some((variables, clause_count));
            continue;
        }
        for token in line.split_whitespace() {
            let literal = token
                .parse::<i32>()
                .map_err(|_| parse_error("malformed literal", token))?;
            if literal == 0 {
                clauses.push(std::mem::take(&mut current));
            } else {
                current.push(literal);
            }
        }
    }
    if !current.is_empty() {
        return Err(parse_error("clause not terminated by 0", "<eof>"));
    }

    let (variable_count, clause_count) =
        declared.ok_or_else(|| parse_error("missing problem line", "<eof>"))?;
    if clauses.len() != clause_count {
        return Err(EvalError::Model(
            ErrorInfo::new("dimacs-parse", "clause count mismatch")
                .with_context("declared", clause_count.to_string())
                .with_context("found", clauses.len().to_string()),
        ));
    }

    let mut resolved = vec![String::new(); variable_count];
    for (index, name) in names {
        if index == 0 || index as usize > variable_count {
            return Err(EvalError::Model(
                ErrorInfo::new("dimacs-parse", "variable comment outside range")
                    .with_context("index", index.to_string()),
            ));
        }
        resolved[index as usize - 1] = name;
    }
    for (pos, name) in resolved.iter_mut().enumerate() {
        if name.is_empty() {
            *name = format!("x{}", pos + 1);
        }
    }

    let variables = VariableMap::new(resolved)?;
    Cnf::new(variables, clauses)
}

fn parse_error(message: &str, line: &str) -> EvalError {
    EvalError::Model(
        ErrorInfo::new("dimacs-parse", message).with_context("line", line.to_string()),
    )
}

fn write_error(path: &Path, err: std::io::Error) -> EvalError {
    EvalError::Model(
        ErrorInfo::new("model-write", "failed to write model file")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_file() {
        let cnf = parse_dimacs("p cnf 2 2\n1 -2 0\n2 0\n").unwrap();
        assert_eq!(cnf.variable_count(), 2);
        assert_eq!(cnf.clauses(), &[vec![1, -2], vec![2]]);
        assert_eq!(cnf.variables().name(1), Some("x1"));
    }

    #[test]
    fn rejects_clause_count_mismatch() {
        let err = parse_dimacs("p cnf 2 3\n1 0\n").unwrap_err();
        assert_eq!(err.info().code, "dimacs-parse");
    }

    #[test]
    fn rejects_unterminated_clause() {
        let err = parse_dimacs("p cnf 2 1\n1 -2\n").unwrap_err();
        assert_eq!(err.info().code, "dimacs-parse");
    }
}
