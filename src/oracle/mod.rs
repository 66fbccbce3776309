//! Oracle collaborators consumed by the spellers.
//!
//! The core pipeline never talks to a concrete dictionary or language
//! model; it goes through the two traits here so that local word lists,
//! remote APIs, and test doubles are interchangeable. Methods take
//! `&mut self` because the remote clients write through their
//! memoization stores on every successful call.

pub mod spellcheck;
pub mod weblm;
pub mod wordlist;

pub use spellcheck::RemoteSpellCheck;
pub use weblm::WebLanguageModel;
pub use wordlist::WordListDictionary;

use crate::Result;

/// Per-token spelling oracle: flags misspellings and ranks corrections.
pub trait DictionaryOracle {
    /// Whether the dictionary flags `token` as misspelled.
    fn is_misspelled(&mut self, token: &str) -> Result<bool>;

    /// Ranked corrections for a misspelled token, best first.
    fn suggest(&mut self, token: &str) -> Result<Vec<String>>;

    /// Push any buffered state to disk. Local oracles have nothing to
    /// flush.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Phrase-level language-model oracle.
pub trait LanguageModel {
    /// Joint log-probability of the words of `phrase` occurring
    /// together. Very negative for implausible phrases.
    fn joint_log_probability(&mut self, phrase: &str) -> Result<f64>;

    /// Ranked word-break segmentations of a concatenated string, best
    /// first, at most `max_candidates` of them.
    fn segment_into_words(&mut self, text: &str, max_candidates: usize) -> Result<Vec<String>>;

    /// Push any buffered state to disk. Local oracles have nothing to
    /// flush.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
