//! Corpus model: annotated query-correction entries and corpus readers.
//!
//! A speller corpus pairs real search queries with the set of spellings
//! human annotators accepted for them, plus per-query tags describing
//! which kinds of spelling error the query exhibits. Entries are built
//! once by a [`Corpus`] reader and consumed read-only by the evaluator.

pub mod annotations;
pub mod webis;

pub use webis::WebisCorpus;

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::{Error, Result};

/// Spelling error categories annotated on corpus queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// Missing or spurious whitespace ("walmart" for "wal mart").
    Space,
    /// A wrong character somewhere in a token.
    Character,
    /// An extra character inserted into a token.
    Insertion,
    /// A character missing from a token.
    Deletion,
    /// One character substituted for another.
    Substitution,
    /// Two adjacent characters swapped.
    Transposition,
}

impl ErrorKind {
    /// All annotated kinds, in annotation-file column order.
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::Space,
        ErrorKind::Character,
        ErrorKind::Insertion,
        ErrorKind::Deletion,
        ErrorKind::Substitution,
        ErrorKind::Transposition,
    ];

    /// Lower-case label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Space => "space",
            ErrorKind::Character => "character",
            ErrorKind::Insertion => "insertion",
            ErrorKind::Deletion => "deletion",
            ErrorKind::Substitution => "substitution",
            ErrorKind::Transposition => "transposition",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of a speller corpus: a query, the accepted spellings for
/// it, and the annotated error kinds.
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    query: String,
    ground_truth: IndexSet<String>,
    errors: HashSet<ErrorKind>,
}

impl CorpusEntry {
    /// Create an entry. The ground truth must be non-empty.
    pub fn new(query: impl Into<String>, ground_truth: IndexSet<String>) -> Result<Self> {
        let query = query.into();
        if ground_truth.is_empty() {
            return Err(Error::corpus(format!(
                "query {query:?} has no ground-truth spellings"
            )));
        }

        Ok(Self {
            query,
            ground_truth,
            errors: HashSet::new(),
        })
    }

    /// Union more error annotations into the entry.
    ///
    /// Annotations only accumulate while a corpus is parsed; they are
    /// never removed.
    pub fn add_error_annotations(&mut self, kinds: impl IntoIterator<Item = ErrorKind>) {
        self.errors.extend(kinds);
    }

    /// The query as it appeared in the search log.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The accepted spellings for the query, in annotation order.
    pub fn ground_truth(&self) -> &IndexSet<String> {
        &self.ground_truth
    }

    /// Whether `kind` was annotated on this entry.
    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.contains(&kind)
    }

    /// The query itself is not an accepted spelling (lower-bound error:
    /// the query is misspelled no matter how lenient the annotator).
    pub fn definitely_misspelled(&self) -> bool {
        !self.ground_truth.contains(&self.query)
    }

    /// The query is accepted but alternatives exist (upper-bound error:
    /// a stricter annotator could call the query misspelled).
    pub fn potentially_misspelled(&self) -> bool {
        self.ground_truth.contains(&self.query)
            && self.ground_truth.iter().any(|variant| variant != &self.query)
    }

    /// Whether the entry exhibits a lower-bound or upper-bound error.
    pub fn contains_error(&self) -> bool {
        self.definitely_misspelled() || self.potentially_misspelled()
    }
}

/// A parsed, annotated corpus of queries.
///
/// Implement this to migrate a new corpus into the harness; the
/// evaluator only ever sees the trait.
pub trait Corpus {
    /// Identifier used in reports and artifact file names.
    fn tag(&self) -> &str;

    /// Parse the corpus into annotated entries.
    fn entries(&self) -> Result<Vec<CorpusEntry>>;
}
