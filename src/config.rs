//! Configuration for the remote oracle clients.
//!
//! Credentials and endpoints live in a TOML file so that runs against the
//! remote language-model and spell-check APIs can be reproduced without
//! editing code:
//!
//! ```toml
//! subscription_key = "0123abcd"
//! # endpoints, model and order have sensible defaults
//! request_delay_ms = 150
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

fn default_joint_probability_url() -> String {
    "https://api.projectoxford.ai/text/weblm/v1.0/calculateJointProbability".to_string()
}

fn default_word_break_url() -> String {
    "https://api.projectoxford.ai/text/weblm/v1.0/breakIntoWords".to_string()
}

fn default_spell_check_url() -> String {
    "https://api.cognitive.microsoft.com/bing/v5.0/spellcheck/".to_string()
}

fn default_model() -> String {
    "query".to_string()
}

fn default_order() -> u8 {
    5
}

fn default_request_delay_ms() -> u64 {
    150
}

/// Connection settings for the remote language-model and spell-check
/// oracles.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Subscription key sent with every request.
    pub subscription_key: String,

    /// Endpoint computing joint log-probabilities for phrases.
    #[serde(default = "default_joint_probability_url")]
    pub joint_probability_url: String,

    /// Endpoint segmenting concatenated text into word-break candidates.
    #[serde(default = "default_word_break_url")]
    pub word_break_url: String,

    /// Endpoint returning per-token spelling suggestions.
    #[serde(default = "default_spell_check_url")]
    pub spell_check_url: String,

    /// Language model to query (e.g. `query`, `body`).
    #[serde(default = "default_model")]
    pub model: String,

    /// N-gram order of the language model.
    #[serde(default = "default_order")]
    pub order: u8,

    /// Pause after each batched remote request, in milliseconds.
    ///
    /// A best-effort courtesy toward the collaborator's rate limits, not
    /// a correctness requirement.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl ApiConfig {
    /// Load the configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    /// Configuration with a key and default endpoints; useful in tests.
    pub fn with_key(subscription_key: impl Into<String>) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            joint_probability_url: default_joint_probability_url(),
            word_break_url: default_word_break_url(),
            spell_check_url: default_spell_check_url(),
            model: default_model(),
            order: default_order(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}
