//! Spelling results paired with their ground truth.

use std::fmt;

use indexmap::IndexSet;

/// The outcome of one speller invocation on one corpus entry: the query,
/// its accepted spellings, and the speller's ranked candidates.
#[derive(Debug, Clone)]
pub struct SpellingResult {
    query: String,
    ground_truth: IndexSet<String>,
    ranked: Vec<(String, f64)>,
}

impl SpellingResult {
    /// Pair a speller's output with the corpus ground truth.
    ///
    /// Candidates are re-sorted by descending confidence here, so the
    /// construction order of the input mapping carries no meaning.
    pub fn new(
        query: impl Into<String>,
        ground_truth: IndexSet<String>,
        mut ranked: Vec<(String, f64)>,
    ) -> Self {
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            query: query.into(),
            ground_truth,
            ranked,
        }
    }

    /// The corpus query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The accepted spellings for the query.
    pub fn ground_truth(&self) -> &IndexSet<String> {
        &self.ground_truth
    }

    /// The speller's candidates with confidences, best first.
    pub fn ranked(&self) -> &[(String, f64)] {
        &self.ranked
    }

    /// Whether the ground truth accepts `candidate`.
    pub fn in_ground_truth(&self, candidate: &str) -> bool {
        self.ground_truth.contains(candidate)
    }

    /// Whether the speller returned `spelling` among its candidates.
    pub fn contains_candidate(&self, spelling: &str) -> bool {
        self.ranked.iter().any(|(candidate, _)| candidate == spelling)
    }

    /// Whether any returned candidate is an accepted spelling.
    pub fn is_correct(&self) -> bool {
        self.ranked
            .iter()
            .any(|(candidate, _)| self.ground_truth.contains(candidate))
    }
}

/// One output line per result: `query;candidate;confidence;...`.
impl fmt::Display for SpellingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query)?;

        for (candidate, confidence) in &self.ranked {
            write!(f, ";{candidate};{confidence}")?;
        }

        Ok(())
    }
}
