//! Corpus statistics.
//!
//! Descriptive measures of an annotated corpus, independent of any
//! speller: how many queries are misspelled, how far they sit from
//! their accepted spellings, and how the error kinds distribute.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use super::metrics::round_to;
use crate::corpus::{annotations, Corpus, ErrorKind};
use crate::Result;

/// Statistical profile of an annotated corpus.
#[derive(Debug, Clone)]
pub struct CorpusStats {
    /// Corpus identifier.
    pub corpus: String,
    /// Number of entries.
    pub size: usize,
    /// Queries accepted with alternatives (upper-bound errors).
    pub potential_misspellings: usize,
    /// Queries whose ground truth excludes them (lower-bound errors).
    pub definite_misspellings: usize,
    /// Percentage of potentially misspelled queries.
    pub potential_percentage: f64,
    /// Percentage of definitely misspelled queries.
    pub definite_percentage: f64,
    /// Percentage of queries with any error.
    pub misspelling_percentage: f64,
    /// Mean minimum edit distance to a differing accepted spelling,
    /// definite misspellings only.
    pub avg_min_distance_definite: f64,
    /// Mean minimum edit distance over all misspelled queries.
    pub avg_min_distance_all: f64,
    /// Accepted spellings per potentially misspelled query.
    pub variants_per_query_potential: f64,
    /// Accepted spellings per definitely misspelled query.
    pub variants_per_query_definite: f64,
    /// Edit-distance frequencies over potential misspellings.
    pub distance_histogram_potential: BTreeMap<usize, usize>,
    /// Edit-distance frequencies over definite misspellings.
    pub distance_histogram_definite: BTreeMap<usize, usize>,
    /// Queries carrying each error kind at least once.
    pub queries_with_error: BTreeMap<ErrorKind, u64>,
    /// `queries_with_error` normalized by the misspelled-query count.
    pub queries_with_error_ratio: BTreeMap<ErrorKind, f64>,
    /// Error-kind counts summed over every annotation row.
    pub variants_with_error: BTreeMap<ErrorKind, u64>,
    /// `variants_with_error` normalized by the total variant count.
    pub variants_with_error_ratio: BTreeMap<ErrorKind, f64>,
}

/// Compute the statistical profile of `corpus`.
///
/// The annotation file is consumed directly for the error-kind
/// distributions, so it is passed alongside the parsed corpus.
pub fn analyze(corpus: &dyn Corpus, annotation_path: impl AsRef<Path>) -> Result<CorpusStats> {
    let entries = corpus.entries()?;

    let mut potential = 0usize;
    let mut definite = 0usize;
    let mut variants_potential = 0usize;
    let mut variants_definite = 0usize;

    let mut sum_min_distance_definite = 0usize;
    let mut sum_min_distance_all = 0usize;

    let mut histogram_potential: BTreeMap<usize, usize> = BTreeMap::new();
    let mut histogram_definite: BTreeMap<usize, usize> = BTreeMap::new();

    for entry in entries.iter().filter(|entry| entry.contains_error()) {
        let is_potential = entry.potentially_misspelled();
        let is_definite = entry.definitely_misspelled();

        if is_potential {
            potential += 1;
            variants_potential += entry.ground_truth().len();
        }
        if is_definite {
            definite += 1;
            variants_definite += entry.ground_truth().len();
        }

        let mut min_distance_definite = usize::MAX;
        let mut min_distance = usize::MAX;

        for variant in entry.ground_truth() {
            let distance = strsim::levenshtein(variant, entry.query());

            if is_potential {
                *histogram_potential.entry(distance).or_default() += 1;
            }

            if is_definite {
                *histogram_definite.entry(distance).or_default() += 1;

                if variant != entry.query() && distance < min_distance_definite {
                    min_distance_definite = distance;
                }
            }

            if distance < min_distance {
                min_distance = distance;
            }
        }

        if min_distance_definite != usize::MAX {
            sum_min_distance_definite += min_distance_definite;
        }
        if min_distance != usize::MAX {
            sum_min_distance_all += min_distance;
        }
    }

    let misspelled = potential + definite;
    let size = entries.len();

    let queries_with_error = annotations::error_counts_per_query(annotation_path.as_ref())?;
    let variants_with_error = annotations::error_counts_per_row(annotation_path.as_ref())?;

    let queries_with_error_ratio = normalize_counts(&queries_with_error, misspelled as f64);
    let variants_with_error_ratio = normalize_counts(
        &variants_with_error,
        (variants_potential + variants_definite) as f64,
    );

    Ok(CorpusStats {
        corpus: corpus.tag().to_string(),
        size,
        potential_misspellings: potential,
        definite_misspellings: definite,
        potential_percentage: percentage(potential, size),
        definite_percentage: percentage(definite, size),
        misspelling_percentage: percentage(misspelled, size),
        avg_min_distance_definite: mean(sum_min_distance_definite, definite),
        avg_min_distance_all: mean(sum_min_distance_all, misspelled),
        variants_per_query_potential: mean(variants_potential, potential),
        variants_per_query_definite: mean(variants_definite, definite),
        distance_histogram_potential: histogram_potential,
        distance_histogram_definite: histogram_definite,
        queries_with_error,
        queries_with_error_ratio,
        variants_with_error,
        variants_with_error_ratio,
    })
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, 2)
}

fn mean(sum: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to(sum as f64 / count as f64, 2)
}

fn normalize_counts(counts: &BTreeMap<ErrorKind, u64>, total: f64) -> BTreeMap<ErrorKind, f64> {
    counts
        .iter()
        .map(|(kind, count)| {
            let ratio = if total == 0.0 {
                0.0
            } else {
                round_to(*count as f64 / total, 4)
            };
            (*kind, ratio)
        })
        .collect()
}

impl fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Corpus: {}", self.corpus)?;
        writeln!(f, "Size: {}", self.size)?;
        writeln!(f)?;
        writeln!(
            f,
            "Potential misspellings: {} ({}%)",
            self.potential_misspellings, self.potential_percentage
        )?;
        writeln!(
            f,
            "Definite misspellings:  {} ({}%)",
            self.definite_misspellings, self.definite_percentage
        )?;
        writeln!(
            f,
            "Potential + definite:   {} ({}%)",
            self.potential_misspellings + self.definite_misspellings,
            self.misspelling_percentage
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Avg. min. edit distance (definite): {}",
            self.avg_min_distance_definite
        )?;
        writeln!(
            f,
            "Avg. min. edit distance (potential + definite): {}",
            self.avg_min_distance_all
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Spelling variants per query (potential): {}",
            self.variants_per_query_potential
        )?;
        writeln!(
            f,
            "Spelling variants per query (definite): {}",
            self.variants_per_query_definite
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Edit distance frequencies (potential): {:?}",
            self.distance_histogram_potential
        )?;
        writeln!(
            f,
            "Edit distance frequencies (definite): {:?}",
            self.distance_histogram_definite
        )?;
        writeln!(f)?;
        writeln!(f, "Queries with error kind:")?;
        for (kind, count) in &self.queries_with_error {
            let ratio = self.queries_with_error_ratio.get(kind).unwrap_or(&0.0);
            writeln!(f, "  {kind}: {count} ({ratio})")?;
        }
        writeln!(f)?;
        writeln!(f, "Spelling variants with error kind:")?;
        for (kind, count) in &self.variants_with_error {
            let ratio = self.variants_with_error_ratio.get(kind).unwrap_or(&0.0);
            writeln!(f, "  {kind}: {count} ({ratio})")?;
        }

        Ok(())
    }
}
