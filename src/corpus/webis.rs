//! Reader for the semicolon-delimited query-speller corpus format.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use log::debug;

use super::{annotations, Corpus, CorpusEntry};
use crate::Result;

/// Corpus reader for the Webis query speller corpus: a corpus file of
/// `query;[variant]*` rows paired with an error-annotation file.
#[derive(Debug, Clone)]
pub struct WebisCorpus {
    corpus_path: PathBuf,
    annotation_path: PathBuf,
    tag: String,
}

impl WebisCorpus {
    /// Reader over a corpus/annotation file pair.
    pub fn new(corpus_path: impl Into<PathBuf>, annotation_path: impl Into<PathBuf>) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            annotation_path: annotation_path.into(),
            tag: "webis-query-speller-corpus".to_string(),
        }
    }

    /// Override the corpus identifier used in reports and file names.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Location of the error-annotation file.
    pub fn annotation_path(&self) -> &Path {
        &self.annotation_path
    }

    fn parse_row(line: &str) -> Result<CorpusEntry> {
        let mut fields = line.split(';');
        let query = fields.next().unwrap_or_default();

        let ground_truth: IndexSet<String> = fields
            .filter(|variant| !variant.is_empty())
            .map(str::to_string)
            .collect();

        CorpusEntry::new(query, ground_truth)
    }
}

impl Corpus for WebisCorpus {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn entries(&self) -> Result<Vec<CorpusEntry>> {
        let annotations = annotations::kinds_by_query(&self.annotation_path)?;

        let reader = BufReader::new(File::open(&self.corpus_path)?);
        let mut entries = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let mut entry = Self::parse_row(&line)?;
            if let Some(kinds) = annotations.get(entry.query()) {
                entry.add_error_annotations(kinds.iter().copied());
            }

            entries.push(entry);
        }

        debug!(
            "parsed {} entries from {}",
            entries.len(),
            self.corpus_path.display()
        );

        Ok(entries)
    }
}
