//! Identity baseline.

use super::{RankedCandidates, Speller};
use crate::Result;

/// Baseline speller: every query is returned as its own correction with
/// full confidence. Any useful algorithm has to beat this.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineSpeller;

impl BaselineSpeller {
    /// Create the baseline speller.
    pub fn new() -> Self {
        Self
    }
}

impl Speller for BaselineSpeller {
    fn tag(&self) -> &str {
        "baseline"
    }

    fn spell(&mut self, query: &str) -> Result<RankedCandidates> {
        Ok(vec![(query.to_string(), 1.0)])
    }
}
