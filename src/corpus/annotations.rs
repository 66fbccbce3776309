//! Error-annotation file handling.
//!
//! Annotation files are semicolon-delimited with one row per annotated
//! spelling variant. The six error-kind counts sit at fixed columns:
//!
//! ```text
//! query;variant;...;space;character;insertion;deletion;substitution;transposition
//! ```
//!
//! A count greater than zero marks the kind as present for that row.
//! Queries may span several consecutive rows (one per variant); the
//! first line of the file is a header.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::ErrorKind;
use crate::{Error, Result};

/// Column of the first error-kind count.
const FIRST_KIND_COLUMN: usize = 3;

fn kind_count(fields: &[&str], kind_index: usize, line: &str) -> Result<u64> {
    let column = FIRST_KIND_COLUMN + kind_index;
    let field = fields.get(column).ok_or_else(|| {
        Error::corpus(format!(
            "annotation row has {} fields, expected at least {}: {line:?}",
            fields.len(),
            FIRST_KIND_COLUMN + ErrorKind::ALL.len()
        ))
    })?;

    field
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::corpus(format!("non-numeric error count {field:?} in row {line:?}")))
}

/// The error kinds flagged on one annotation row.
pub fn kinds_in_row(line: &str) -> Result<Vec<ErrorKind>> {
    let fields: Vec<&str> = line.split(';').collect();
    let mut kinds = Vec::new();

    for (index, kind) in ErrorKind::ALL.iter().enumerate() {
        if kind_count(&fields, index, line)? > 0 {
            kinds.push(*kind);
        }
    }

    Ok(kinds)
}

/// Per-kind counts summed over every annotation row (each row can count
/// a kind more than once when several variants exhibit it).
pub fn error_counts_per_row(path: impl AsRef<Path>) -> Result<BTreeMap<ErrorKind, u64>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut counts: BTreeMap<ErrorKind, u64> =
        ErrorKind::ALL.iter().map(|kind| (*kind, 0)).collect();

    for line in reader.lines().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(';').collect();
        for (index, kind) in ErrorKind::ALL.iter().enumerate() {
            *counts.entry(*kind).or_default() += kind_count(&fields, index, &line)?;
        }
    }

    Ok(counts)
}

/// Number of queries on which each error kind appears at least once.
///
/// Rows belonging to the same query are grouped by the query string in
/// column 0, so a kind flagged on several variants of one query is
/// counted once.
pub fn error_counts_per_query(path: impl AsRef<Path>) -> Result<BTreeMap<ErrorKind, u64>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut counts: BTreeMap<ErrorKind, u64> = BTreeMap::new();

    let mut current_query = String::new();
    let mut current_kinds: HashSet<ErrorKind> = HashSet::new();

    let flush = |kinds: &mut HashSet<ErrorKind>, counts: &mut BTreeMap<ErrorKind, u64>| {
        for kind in kinds.drain() {
            *counts.entry(kind).or_default() += 1;
        }
    };

    for line in reader.lines().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let query = line.split(';').next().unwrap_or_default();
        if query != current_query {
            flush(&mut current_kinds, &mut counts);
            current_query = query.to_string();
        }

        current_kinds.extend(kinds_in_row(&line)?);
    }

    flush(&mut current_kinds, &mut counts);

    Ok(counts)
}

/// Per-query error kinds, indexed by query string.
///
/// Used by corpus readers to attach annotations to entries without
/// walking both files in lockstep.
pub fn kinds_by_query(path: impl AsRef<Path>) -> Result<BTreeMap<String, HashSet<ErrorKind>>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut by_query: BTreeMap<String, HashSet<ErrorKind>> = BTreeMap::new();

    for line in reader.lines().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let query = line.split(';').next().unwrap_or_default().to_string();
        by_query
            .entry(query)
            .or_default()
            .extend(kinds_in_row(&line)?);
    }

    Ok(by_query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_kinds_with_positive_counts() {
        let kinds = kinds_in_row("exmaple;example;1;0;0;0;0;0;1").unwrap();
        assert_eq!(kinds, vec![ErrorKind::Transposition]);

        let kinds = kinds_in_row("wallmart;walmart;1;1;0;2;0;0;0").unwrap();
        assert_eq!(kinds, vec![ErrorKind::Space, ErrorKind::Insertion]);
    }

    #[test]
    fn short_rows_are_rejected() {
        assert!(kinds_in_row("query;variant;1;0;0").is_err());
    }

    #[test]
    fn non_numeric_counts_are_rejected() {
        assert!(kinds_in_row("query;variant;1;x;0;0;0;0;0").is_err());
    }
}
