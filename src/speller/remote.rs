//! Remote-API-backed speller.

use indexmap::IndexMap;

use super::score;
use super::{CandidateSet, RankedCandidates, Speller};
use crate::oracle::RemoteSpellCheck;
use crate::Result;

/// Speller delegating per-token suggestions to a remote spell-check API
/// and aggregating them with uniform confidences.
pub struct RemoteSpeller {
    client: RemoteSpellCheck,
}

impl RemoteSpeller {
    /// Speller over a remote spell-check client.
    pub fn new(client: RemoteSpellCheck) -> Self {
        Self { client }
    }
}

impl Speller for RemoteSpeller {
    fn tag(&self) -> &str {
        "remote"
    }

    fn spell(&mut self, query: &str) -> Result<RankedCandidates> {
        let positions = self.client.spell(query)?;
        let candidates = CandidateSet::from_positions(positions);

        // The API returns no ranking signal across combinations, so
        // every aggregated phrase gets the same weight.
        let corrections = candidates.aggregate(candidates.positions().len());
        let weight = 1.0 / corrections.len() as f64;

        let mut scores: IndexMap<String, f64> = IndexMap::new();
        for correction in corrections {
            scores.entry(correction).or_insert(weight);
        }

        score::normalize(&mut scores)?;

        Ok(score::rank_by_confidence(scores))
    }

    fn flush(&mut self) -> Result<()> {
        self.client.flush()
    }
}
