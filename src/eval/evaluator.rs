//! Evaluation driver: runs spellers over corpora and reports quality.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use super::metrics::{precision_at_1, Ef1};
use super::result::SpellingResult;
use crate::corpus::{Corpus, ErrorKind};
use crate::speller::Speller;
use crate::{Error, Result};

/// Log a progress line every this many queries.
const PROGRESS_INTERVAL: usize = 100;

/// Flush the speller's caches every this many queries.
const FLUSH_INTERVAL: usize = 1000;

/// Metrics over one slice of the result set.
///
/// `ef1` and `precision_at_1` are absent when the slice is empty or the
/// metric is undefined for it; `detail` then carries the reason so the
/// report stays explicit instead of printing NaN.
#[derive(Debug, Clone)]
pub struct SliceMetrics {
    /// Slice name as shown in the report.
    pub name: String,
    /// Number of results in the slice.
    pub count: usize,
    /// EF1 over the slice, when defined.
    pub ef1: Option<Ef1>,
    /// Precision@1 over the slice, when defined.
    pub precision_at_1: Option<f64>,
    /// Why a metric is absent, when one is.
    pub detail: Option<String>,
}

impl SliceMetrics {
    fn compute(name: impl Into<String>, results: &[&SpellingResult]) -> Self {
        let mut detail = None;

        let ef1 = match Ef1::compute(results.iter().copied()) {
            Ok(ef1) => Some(ef1),
            Err(Error::DegenerateMetricInput(reason)) => {
                detail = Some(reason);
                None
            }
            Err(other) => {
                detail = Some(other.to_string());
                None
            }
        };

        let precision = precision_at_1(results.iter().copied()).ok();

        Self {
            name: name.into(),
            count: results.len(),
            ef1,
            precision_at_1: precision,
            detail,
        }
    }
}

impl fmt::Display for SliceMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---------------")?;
        writeln!(f, "{} ({} queries):", self.name, self.count)?;

        match &self.ef1 {
            Some(ef1) => writeln!(f, "{ef1}")?,
            None => {
                let reason = self.detail.as_deref().unwrap_or("no data");
                writeln!(f, "EF1: undefined ({reason})")?;
            }
        }

        match self.precision_at_1 {
            Some(precision) => writeln!(f, "Precision@1: {precision}")?,
            None => writeln!(f, "Precision@1: no data")?,
        }

        write!(f, "---------------")
    }
}

/// Full evaluation report for one speller/corpus pairing.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    /// Tag of the evaluated speller.
    pub speller: String,
    /// Tag of the corpus evaluated on.
    pub corpus: String,
    /// Metrics over all results.
    pub general: SliceMetrics,
    /// Metrics per error-kind slice, plus the no-error slice.
    pub slices: Vec<SliceMetrics>,
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Results for {} on {}:", self.speller, self.corpus)?;
        writeln!(f, "{}", self.general)?;

        for slice in &self.slices {
            writeln!(f)?;
            writeln!(f, "{slice}")?;
        }

        Ok(())
    }
}

/// Runs spellers over corpora, slices the results by error kind, and
/// writes the output artifacts.
#[derive(Debug, Clone)]
pub struct Evaluator {
    out_dir: PathBuf,
}

impl Evaluator {
    /// Evaluator writing artifacts below `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Evaluate `speller` on every entry of `corpus`.
    ///
    /// Results are sliced by the six annotated error kinds plus a
    /// no-error slice, and two artifacts are written below the output
    /// directory: the per-query candidate CSV and the EF1/Precision@1
    /// summary.
    ///
    /// A failing speller aborts the pairing; the error names the query
    /// that triggered the failure.
    pub fn evaluate<S>(&self, speller: &mut S, corpus: &dyn Corpus) -> Result<EvaluationReport>
    where
        S: Speller + ?Sized,
    {
        info!("evaluating {} on {}", speller.tag(), corpus.tag());

        let entries = corpus.entries()?;

        let mut results: Vec<SpellingResult> = Vec::with_capacity(entries.len());
        let mut kind_slices: HashMap<ErrorKind, Vec<usize>> = HashMap::new();
        let mut no_error_slice: Vec<usize> = Vec::new();

        for entry in &entries {
            let ranked = speller
                .spell(entry.query())
                .map_err(|source| Error::QueryFailed {
                    query: entry.query().to_string(),
                    source: Box::new(source),
                })?;

            let index = results.len();
            results.push(SpellingResult::new(
                entry.query(),
                entry.ground_truth().clone(),
                ranked,
            ));

            for kind in ErrorKind::ALL {
                if entry.has_error(kind) {
                    kind_slices.entry(kind).or_default().push(index);
                }
            }

            if !entry.definitely_misspelled() && !entry.potentially_misspelled() {
                no_error_slice.push(index);
            }

            if results.len() % PROGRESS_INTERVAL == 0 {
                info!("processed {} queries", results.len());
            }

            if results.len() % FLUSH_INTERVAL == 0 {
                speller.flush()?;
            }
        }

        info!("processed {} queries, done", results.len());
        speller.flush()?;

        let all: Vec<&SpellingResult> = results.iter().collect();
        let general = SliceMetrics::compute("General", &all);

        let mut slices = Vec::with_capacity(ErrorKind::ALL.len() + 1);
        slices.push(SliceMetrics::compute(
            "No Error",
            &select(&results, &no_error_slice),
        ));
        for kind in ErrorKind::ALL {
            let indices = kind_slices.remove(&kind).unwrap_or_default();
            slices.push(SliceMetrics::compute(
                format!("{} Error", capitalize(kind.label())),
                &select(&results, &indices),
            ));
        }

        let report = EvaluationReport {
            speller: speller.tag().to_string(),
            corpus: corpus.tag().to_string(),
            general,
            slices,
        };

        self.write_artifacts(speller.tag(), corpus.tag(), &results, &report)?;

        Ok(report)
    }

    /// Directory the artifacts for `speller_tag` land in.
    pub fn artifact_dir(&self, speller_tag: &str) -> PathBuf {
        self.out_dir.join(speller_tag)
    }

    fn write_artifacts(
        &self,
        speller_tag: &str,
        corpus_tag: &str,
        results: &[SpellingResult],
        report: &EvaluationReport,
    ) -> Result<()> {
        let dir = self.artifact_dir(speller_tag);
        fs::create_dir_all(&dir)?;

        let spelling_path = dir.join(format!("{speller_tag}-{corpus_tag}-spelling.csv"));
        write_lines(&spelling_path, results.iter().map(ToString::to_string))?;

        let summary_path = dir.join(format!("{speller_tag}-{corpus_tag}-ef1.txt"));
        let mut summary = fs::File::create(&summary_path)?;
        writeln!(summary, "{}", report.general)?;

        info!(
            "wrote artifacts {} and {}",
            spelling_path.display(),
            summary_path.display()
        );

        Ok(())
    }
}

fn select<'a>(results: &'a [SpellingResult], indices: &[usize]) -> Vec<&'a SpellingResult> {
    indices.iter().map(|index| &results[*index]).collect()
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn write_lines<I>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = String>,
{
    let mut file = fs::File::create(path)?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(())
}
