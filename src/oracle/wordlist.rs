//! Local word-list dictionary oracle.
//!
//! Loads a newline-delimited word list (frequency-sorted lists work
//! best: file order breaks ranking ties) and suggests corrections by
//! scanning for words within a bounded Levenshtein distance.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexSet;

use super::DictionaryOracle;
use crate::Result;

/// Suggestions are drawn from words within this edit distance.
const DEFAULT_MAX_EDIT_DISTANCE: usize = 2;

/// Dictionary oracle backed by an in-memory word list.
#[derive(Debug, Clone)]
pub struct WordListDictionary {
    words: IndexSet<String>,
    max_edit_distance: usize,
}

impl WordListDictionary {
    /// Load a word list: one word per line, `#` comment lines skipped.
    /// Only the first whitespace-separated field of each line is used,
    /// so `word<TAB>frequency` lists load as-is.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut words = IndexSet::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(word) = trimmed.split_whitespace().next() {
                words.insert(word.to_lowercase());
            }
        }

        Ok(Self {
            words,
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
        })
    }

    /// Dictionary over an explicit set of words; useful in tests.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words
                .into_iter()
                .map(|word| word.into().to_lowercase())
                .collect(),
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
        }
    }

    /// Override the maximum edit distance considered for suggestions.
    pub fn with_max_edit_distance(mut self, distance: usize) -> Self {
        self.max_edit_distance = distance;
        self
    }

    /// Number of words in the dictionary.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl DictionaryOracle for WordListDictionary {
    fn is_misspelled(&mut self, token: &str) -> Result<bool> {
        Ok(!token.is_empty() && !self.words.contains(&token.to_lowercase()))
    }

    fn suggest(&mut self, token: &str) -> Result<Vec<String>> {
        let needle = token.to_lowercase();
        let needle_len = needle.chars().count();

        let mut ranked: Vec<(usize, &String)> = Vec::new();

        for word in &self.words {
            // Length window first: cheaper than the distance itself.
            if word.chars().count().abs_diff(needle_len) > self.max_edit_distance {
                continue;
            }

            let distance = strsim::levenshtein(&needle, word);
            if distance <= self.max_edit_distance {
                ranked.push((distance, word));
            }
        }

        // Stable sort: file order (frequency order) breaks ties.
        ranked.sort_by_key(|(distance, _)| *distance);

        Ok(ranked.into_iter().map(|(_, word)| word.clone()).collect())
    }
}
