//! Remote web language-model client.
//!
//! Talks to a web language-model API over blocking HTTP for the two
//! phrase-level operations the spellers need: joint log-probabilities
//! and word-break segmentation. Every successful response is memoized
//! in a persistent store keyed by the exact input string, and the
//! stores are consulted before any network call.

use log::debug;
use serde_json::{json, Value};

use super::LanguageModel;
use crate::config::ApiConfig;
use crate::store::{MultiValueStore, SingleValueStore};
use crate::{Error, Result};

/// Header carrying the subscription key.
pub(crate) const SUBSCRIPTION_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Language-model oracle backed by a remote web API.
pub struct WebLanguageModel {
    http: reqwest::blocking::Client,
    config: ApiConfig,
    joint_cache: SingleValueStore,
    segment_cache: MultiValueStore,
}

impl WebLanguageModel {
    /// Client over explicit cache resources.
    ///
    /// The caches are owned for the client's lifetime and flushed on
    /// [`flush`](LanguageModel::flush) and on drop.
    pub fn new(
        config: ApiConfig,
        joint_cache: SingleValueStore,
        segment_cache: MultiValueStore,
    ) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            config,
            joint_cache,
            segment_cache,
        }
    }
}

impl LanguageModel for WebLanguageModel {
    fn joint_log_probability(&mut self, phrase: &str) -> Result<f64> {
        if let Some(cached) = self.joint_cache.get(phrase) {
            return Ok(cached);
        }

        debug!("requesting joint probability for {phrase:?}");

        let order = self.config.order.to_string();
        let response = self
            .http
            .post(&self.config.joint_probability_url)
            .query(&[
                ("model", self.config.model.as_str()),
                ("order", order.as_str()),
            ])
            .header(SUBSCRIPTION_HEADER, &self.config.subscription_key)
            .json(&json!({ "queries": [phrase] }))
            .send()?;

        let payload = check_payload(response, "joint-probability")?;

        let probability = payload
            .get("results")
            .and_then(|results| results.get(0))
            .and_then(|entry| entry.get("probability"))
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                Error::malformed_response("joint-probability", "missing results[0].probability")
            })?;

        self.joint_cache.put_if_absent(phrase, probability);

        Ok(probability)
    }

    fn segment_into_words(&mut self, text: &str, max_candidates: usize) -> Result<Vec<String>> {
        if self.segment_cache.contains(text) {
            return Ok(self.segment_cache.get(text));
        }

        debug!("requesting word breaks for {text:?}");

        let stripped: String = text.split_whitespace().collect();
        let order = self.config.order.to_string();
        let max_returned = max_candidates.to_string();
        let response = self
            .http
            .post(&self.config.word_break_url)
            .query(&[
                ("model", self.config.model.as_str()),
                ("text", stripped.as_str()),
                ("order", order.as_str()),
                ("maxNumOfCandidatesReturned", max_returned.as_str()),
            ])
            .header(SUBSCRIPTION_HEADER, &self.config.subscription_key)
            .send()?;

        let payload = check_payload(response, "word-break")?;

        let entries = payload
            .get("candidates")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::malformed_response("word-break", "missing candidates array"))?;

        let mut candidates = Vec::with_capacity(entries.len());
        for entry in entries {
            let words = entry
                .get("words")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    Error::malformed_response("word-break", "candidate without words field")
                })?;
            candidates.push(words.to_string());
        }

        self.segment_cache.extend(text, candidates.iter().cloned());

        Ok(candidates)
    }

    fn flush(&mut self) -> Result<()> {
        self.joint_cache.flush()?;
        self.segment_cache.flush()
    }
}

/// Decode a response body, mapping auth rejections and error payloads to
/// the error taxonomy before the caller extracts its fields.
pub(crate) fn check_payload(
    response: reqwest::blocking::Response,
    resource: &str,
) -> Result<Value> {
    let status = response.status();
    let payload: Value = response
        .json()
        .map_err(|e| Error::malformed_response(resource, format!("body is not JSON: {e}")))?;

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::invalid_credential(resource, error_message(&payload)));
    }

    if let Some(error) = payload.get("error") {
        return Err(Error::invalid_credential(resource, error_message(error)));
    }

    if !status.is_success() {
        return Err(Error::collaborator_unavailable(format!(
            "{resource} returned status {status}"
        )));
    }

    Ok(payload)
}

fn error_message(payload: &Value) -> String {
    payload
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| payload.to_string())
}
