//! Evaluation framework for spelling-correction algorithms.
//!
//! Runs a [`Speller`](crate::Speller) over an annotated corpus and
//! measures the quality of its ranked corrections:
//!
//! - **EF1** — harmonic mean of expected precision and expected recall
//!   over the confidence mass assigned to ground-truth spellings.
//! - **Precision@1** — fraction of queries whose top-ranked (or
//!   tied-for-top) correction is a ground-truth spelling.
//!
//! Both metrics are reported for the whole corpus and per error-kind
//! slice (space, character, insertion, deletion, substitution,
//! transposition, no error). Slicing is a pure filter; the computation
//! never changes.

pub mod analysis;
pub mod evaluator;
pub mod metrics;
pub mod result;

pub use analysis::{analyze, CorpusStats};
pub use evaluator::{EvaluationReport, Evaluator, SliceMetrics};
pub use metrics::{precision_at_1, round_to, Ef1};
pub use result::SpellingResult;
