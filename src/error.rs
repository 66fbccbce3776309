//! Error types for qspell.

use thiserror::Error;

/// Result type for qspell operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for qspell operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A remote oracle could not be reached or its transport failed.
    ///
    /// No retry happens at this layer; the failure surfaces to the
    /// evaluation driver.
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// An oracle rejected the request because of a bad credential.
    ///
    /// Fatal for the whole evaluation run: every subsequent call against
    /// the same resource would fail identically.
    #[error("Invalid credential for {resource}: {message}")]
    InvalidCredential {
        /// The oracle resource that rejected the request.
        resource: String,
        /// The rejection message reported by the oracle.
        message: String,
    },

    /// An oracle response was missing the expected fields.
    ///
    /// Callers treat this the same as [`Error::CollaboratorUnavailable`].
    #[error("Malformed response from {resource}: {message}")]
    MalformedResponse {
        /// The oracle resource that produced the response.
        resource: String,
        /// What was wrong with the payload.
        message: String,
    },

    /// Metric computation over an empty or otherwise degenerate input.
    #[error("Degenerate metric input: {0}")]
    DegenerateMetricInput(String),

    /// A speller failed while correcting a specific query.
    #[error("spelling of query {query:?} failed: {source}")]
    QueryFailed {
        /// The corpus query that triggered the failure.
        query: String,
        /// The underlying pipeline error.
        #[source]
        source: Box<Error>,
    },

    /// Corpus or annotation file parsing error.
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Configuration loading error.
    #[error("Config error: {0}")]
    Config(String),

    /// Persistent memoization store error.
    #[error("Store error: {0}")]
    Store(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a collaborator-unavailable error.
    pub fn collaborator_unavailable(msg: impl Into<String>) -> Self {
        Error::CollaboratorUnavailable(msg.into())
    }

    /// Create an invalid-credential error for a named oracle resource.
    pub fn invalid_credential(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidCredential {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-response error for a named oracle resource.
    pub fn malformed_response(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedResponse {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Create a degenerate-metric-input error.
    pub fn degenerate_metric(msg: impl Into<String>) -> Self {
        Error::DegenerateMetricInput(msg.into())
    }

    /// Create a corpus parsing error.
    pub fn corpus(msg: impl Into<String>) -> Self {
        Error::Corpus(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::CollaboratorUnavailable(err.to_string())
    }
}
