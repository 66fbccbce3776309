//! Per-token candidate generation and phrase aggregation.

use indexmap::IndexSet;

use crate::oracle::DictionaryOracle;
use crate::Result;

/// Ranked alternative spellings for every token position of a query.
///
/// The outer index matches the position of the token in the query's
/// whitespace tokenization; each inner list is ordered best-first and
/// always ends with a recoverable form of the original token when the
/// token was flagged misspelled.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    positions: Vec<Vec<String>>,
}

impl CandidateSet {
    /// Build the candidate set for `query` from a dictionary oracle.
    ///
    /// Misspelled tokens get the oracle's suggestions truncated to
    /// `max_suggestions` with the original token appended as the final
    /// fallback; correctly spelled tokens keep a singleton list. An
    /// unreachable oracle propagates its error — substituting empty
    /// lists would silently corrupt the aggregation.
    pub fn generate<D: DictionaryOracle>(
        query: &str,
        oracle: &mut D,
        max_suggestions: usize,
    ) -> Result<Self> {
        let mut positions = Vec::new();

        for token in query.split_whitespace() {
            if oracle.is_misspelled(token)? {
                let mut suggestions = oracle.suggest(token)?;
                suggestions.truncate(max_suggestions);
                suggestions.push(token.to_string());
                positions.push(suggestions);
            } else {
                positions.push(vec![token.to_string()]);
            }
        }

        Ok(Self { positions })
    }

    /// Candidate set over explicit per-position lists.
    pub fn from_positions(positions: Vec<Vec<String>>) -> Self {
        Self { positions }
    }

    /// The per-position candidate lists.
    pub fn positions(&self) -> &[Vec<String>] {
        &self.positions
    }

    /// Number of phrases the unfiltered cross-product yields.
    pub fn combination_count(&self) -> usize {
        if self.positions.is_empty() {
            return 0;
        }
        self.positions.iter().map(Vec::len).product()
    }

    /// Lazy cross-product of the positions: each item is a lower-cased,
    /// whitespace-joined phrase. Finite and restartable; nothing is
    /// materialized beyond the current index vector.
    pub fn phrases(&self) -> Phrases<'_> {
        Phrases::new(&self.positions)
    }

    /// Cross-product filtered to phrases of at least `min_words` words.
    ///
    /// The floor discards degenerate results where an oracle folded a
    /// candidate down to a shorter phrase (e.g. a multi-word suggestion
    /// merging tokens).
    pub fn aggregate(&self, min_words: usize) -> Vec<String> {
        self.phrases()
            .filter(|phrase| phrase.split_whitespace().count() >= min_words)
            .collect()
    }
}

/// Iterator over the cross-product of a [`CandidateSet`]'s positions.
pub struct Phrases<'a> {
    positions: &'a [Vec<String>],
    indices: Vec<usize>,
    done: bool,
}

impl<'a> Phrases<'a> {
    fn new(positions: &'a [Vec<String>]) -> Self {
        // An empty set or any empty position makes the product empty.
        let done = positions.is_empty() || positions.iter().any(Vec::is_empty);
        Self {
            positions,
            indices: vec![0; positions.len()],
            done,
        }
    }

    fn current_phrase(&self) -> String {
        let words: Vec<&str> = self
            .positions
            .iter()
            .zip(&self.indices)
            .map(|(position, index)| position[*index].trim())
            .filter(|word| !word.is_empty())
            .collect();

        words.join(" ").to_lowercase()
    }

    fn advance(&mut self) {
        // Odometer increment, rightmost position fastest.
        for index in (0..self.indices.len()).rev() {
            self.indices[index] += 1;
            if self.indices[index] < self.positions[index].len() {
                return;
            }
            self.indices[index] = 0;
        }

        self.done = true;
    }
}

impl Iterator for Phrases<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }

        let phrase = self.current_phrase();
        self.advance();

        Some(phrase)
    }
}
