//! # qspell
//!
//! Research harness for evaluating query-spelling-correction algorithms
//! against annotated error corpora.
//!
//! - **Spellers**: baseline, dictionary-assisted, remote-API-backed
//! - **Metrics**: EF1 (expected precision/recall/F1), Precision@1
//! - **Slicing**: per error kind (space, character, insertion, deletion,
//!   substitution, transposition) plus a no-error slice
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use qspell::{Evaluator, WebisCorpus, BaselineSpeller};
//!
//! let corpus = WebisCorpus::new("corpus.csv", "corpus-annotations.csv");
//! let mut speller = BaselineSpeller::new();
//!
//! let report = Evaluator::new("data/output").evaluate(&mut speller, &corpus)?;
//! println!("{report}");
//! ```
//!
//! ## Spellers
//!
//! | Speller | Oracles | Network |
//! |---------|---------|---------|
//! | [`BaselineSpeller`] | none | no |
//! | [`DictionarySpeller`] | word list + language model | LM calls |
//! | [`RemoteSpeller`] | spell-check API | yes |
//!
//! Anything implementing [`Speller`] plugs into the evaluator, and
//! anything implementing [`Corpus`] can be evaluated on. Remote oracle
//! responses are memoized in persistent stores so repeated runs replay
//! from disk instead of the network.
//!
//! ## Design
//!
//! The pipeline is single-threaded and synchronous: corpus parsing,
//! candidate generation, scoring, and metric computation run
//! sequentially, blocking on oracle calls. Oracle failures propagate to
//! the evaluation driver — no stage substitutes defaults, which would
//! silently corrupt scores.

#![warn(missing_docs)]

pub mod config;
pub mod corpus;
mod error;
pub mod eval;
pub mod oracle;
pub mod speller;
pub mod store;

pub use config::ApiConfig;
pub use corpus::{Corpus, CorpusEntry, ErrorKind, WebisCorpus};
pub use error::{Error, Result};
pub use eval::{CorpusStats, Ef1, EvaluationReport, Evaluator, SpellingResult};
pub use oracle::{
    DictionaryOracle, LanguageModel, RemoteSpellCheck, WebLanguageModel, WordListDictionary,
};
pub use speller::{
    BaselineSpeller, CandidateSet, DictionarySpeller, RankedCandidates, RemoteSpeller, Speller,
};
pub use store::{MultiValueStore, SingleValueStore};
