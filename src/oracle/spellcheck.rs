//! Remote per-token spelling-suggestion client.
//!
//! One batched request per query: the API flags misspelled tokens and
//! suggests replacements for each. Responses are memoized per token, so
//! repeated corpus queries only hit the network for tokens whose
//! suggestions are not cached yet. A fixed delay after each remote batch
//! keeps the client inside the collaborator's rate limits.

use std::thread;
use std::time::Duration;

use log::debug;
use serde_json::Value;

use super::weblm::{check_payload, SUBSCRIPTION_HEADER};
use crate::config::ApiConfig;
use crate::store::MultiValueStore;
use crate::{Error, Result};

/// Client for a remote spell-check API returning per-token suggestions.
pub struct RemoteSpellCheck {
    http: reqwest::blocking::Client,
    config: ApiConfig,
    cache: MultiValueStore,
}

impl RemoteSpellCheck {
    /// Client over an explicit per-token suggestion cache.
    pub fn new(config: ApiConfig, cache: MultiValueStore) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            config,
            cache,
        }
    }

    /// Suggestion lists for every token position of `query`.
    ///
    /// Positions the API does not flag keep the original token as their
    /// only candidate. The outer vector is position-aligned with the
    /// query's whitespace tokenization.
    pub fn spell(&mut self, query: &str) -> Result<Vec<Vec<String>>> {
        let words: Vec<&str> = query.split_whitespace().collect();

        let mut candidates: Vec<Vec<String>> = words
            .iter()
            .map(|word| dedup_preserving_order(self.cache.get(word)))
            .collect();

        if candidates.iter().all(|position| !position.is_empty()) {
            return Ok(candidates);
        }

        self.fill_from_remote(query, &words, &mut candidates)?;

        // Unflagged positions fall back to the original token.
        for (position, word) in candidates.iter_mut().zip(&words) {
            if position.is_empty() {
                position.push(word.to_string());
                self.cache.append(word, *word);
            }
        }

        thread::sleep(Duration::from_millis(self.config.request_delay_ms));

        Ok(candidates)
    }

    fn fill_from_remote(
        &mut self,
        query: &str,
        words: &[&str],
        candidates: &mut [Vec<String>],
    ) -> Result<()> {
        debug!("requesting spelling suggestions for {query:?}");

        let response = self
            .http
            .post(&self.config.spell_check_url)
            .query(&[("mode", "spell")])
            .header(SUBSCRIPTION_HEADER, &self.config.subscription_key)
            .form(&[("text", query)])
            .send()?;

        let payload = check_payload(response, "spell-check")?;

        let flagged = match payload.get("flaggedTokens").and_then(Value::as_array) {
            Some(flagged) => flagged,
            None => {
                if let Some(message) = payload.get("message").and_then(Value::as_str) {
                    return Err(Error::invalid_credential("spell-check", message));
                }
                return Err(Error::malformed_response(
                    "spell-check",
                    "missing flaggedTokens array",
                ));
            }
        };

        for token_node in flagged {
            let token = token_node
                .get("token")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    Error::malformed_response("spell-check", "flagged token without token field")
                })?;

            let suggestion_nodes = token_node
                .get("suggestions")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    Error::malformed_response("spell-check", "flagged token without suggestions")
                })?;

            let mut suggestions = Vec::with_capacity(suggestion_nodes.len());
            for node in suggestion_nodes {
                let suggestion = node
                    .get("suggestion")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        Error::malformed_response("spell-check", "suggestion without text")
                    })?;
                suggestions.push(suggestion.to_string());
            }

            let token_words: Vec<&str> = token.split_whitespace().collect();
            if let Some(index) = position_of(words, token, &token_words) {
                candidates[index] = suggestions.clone();

                // A multi-word flagged span consumes the following
                // positions; blank them so aggregation skips them.
                for consumed in candidates
                    .iter_mut()
                    .take(index + token_words.len())
                    .skip(index + 1)
                {
                    *consumed = vec![String::new()];
                }
            }

            self.cache.extend(token, suggestions);
        }

        Ok(())
    }

    /// Push the suggestion cache to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.cache.flush()
    }
}

/// Index of the query position a flagged token starts at.
fn position_of(words: &[&str], token: &str, token_words: &[&str]) -> Option<usize> {
    let first = token_words.first()?;

    words
        .iter()
        .position(|word| word == first)
        .or_else(|| words.iter().position(|word| word.contains(token)))
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = indexmap::IndexSet::new();
    seen.extend(values);
    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_matches_first_word_of_token() {
        let words = vec!["examlpe", "of", "spealling"];
        assert_eq!(position_of(&words, "examlpe", &["examlpe"]), Some(0));
        assert_eq!(position_of(&words, "spealling", &["spealling"]), Some(2));
    }

    #[test]
    fn position_falls_back_to_substring_match() {
        let words = vec!["exam-lpe", "test"];
        assert_eq!(position_of(&words, "lpe", &["lpe"]), Some(0));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let values = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(dedup_preserving_order(values), vec!["a", "b"]);
    }
}
