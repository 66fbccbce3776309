//! Dictionary-assisted speller.
//!
//! Implements the query-spelling algorithm Gord Lueck presented for the
//! 2011 Microsoft Speller Challenge: expand per-token dictionary
//! suggestions into full-phrase candidates, score them with a language
//! model penalized by edit distance, and normalize into a confidence
//! distribution.

use super::score;
use super::{CandidateSet, RankedCandidates, Speller};
use crate::oracle::{DictionaryOracle, LanguageModel};
use crate::Result;

/// Suggestions kept per misspelled token (the original token is
/// appended on top of these).
const MAX_SUGGESTIONS: usize = 2;

/// Dictionary-assisted speller over a dictionary oracle and a
/// language-model oracle.
pub struct DictionarySpeller<D, L> {
    dictionary: D,
    language_model: L,
    max_suggestions: usize,
}

impl<D: DictionaryOracle, L: LanguageModel> DictionarySpeller<D, L> {
    /// Speller over the given oracles.
    pub fn new(dictionary: D, language_model: L) -> Self {
        Self {
            dictionary,
            language_model,
            max_suggestions: MAX_SUGGESTIONS,
        }
    }

    /// Override how many dictionary suggestions are kept per token.
    ///
    /// The cross-product grows with the per-token candidate counts, so
    /// keep this small.
    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }
}

impl<D: DictionaryOracle, L: LanguageModel> Speller for DictionarySpeller<D, L> {
    fn tag(&self) -> &str {
        "dictionary"
    }

    fn spell(&mut self, query: &str) -> Result<RankedCandidates> {
        let candidates = CandidateSet::generate(query, &mut self.dictionary, self.max_suggestions)?;

        let min_words = query.split_whitespace().count();
        let mut corrections = candidates.aggregate(min_words);

        // A single surviving candidate means the dictionary saw nothing
        // to fix. Word-break segmentation of the concatenated query can
        // still recover space-insertion errors a per-token lookup is
        // blind to.
        if corrections.len() == 1 {
            let concatenated: String = query.split_whitespace().collect();
            corrections.extend(
                self.language_model
                    .segment_into_words(&concatenated, self.max_suggestions)?,
            );
        }

        let mut scores = score::score_candidates(&mut self.language_model, &corrections, query)?;
        score::normalize(&mut scores)?;

        // No correction found: suppress low-confidence noise and hand
        // the query back with full confidence.
        if scores.len() == 1 && scores.keys().next().map(String::as_str) == Some(query) {
            return Ok(vec![(query.to_string(), 1.0)]);
        }

        Ok(score::rank_by_confidence(scores))
    }

    fn flush(&mut self) -> Result<()> {
        self.dictionary.flush()?;
        self.language_model.flush()
    }
}
