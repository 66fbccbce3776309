//! Evaluation driver integration tests.

use std::fs;
use std::path::PathBuf;

use qspell::{BaselineSpeller, Error, ErrorKind, Evaluator, Result, Speller, WebisCorpus};

const ANNOTATION_HEADER: &str =
    "query;variant;correct;space;character;insertion;deletion;substitution;transposition";

fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fixture_corpus(dir: &tempfile::TempDir) -> WebisCorpus {
    let corpus = write_fixture(
        dir,
        "corpus.csv",
        "correct query;correct query\n\
         exmaple;example\n",
    );
    let annotations = write_fixture(
        dir,
        "annotations.csv",
        &format!(
            "{ANNOTATION_HEADER}\n\
             exmaple;example;1;0;1;0;0;0;1\n"
        ),
    );

    WebisCorpus::new(corpus, annotations).with_tag("fixture")
}

#[test]
fn baseline_scores_half_on_a_half_correct_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = fixture_corpus(&dir);

    let evaluator = Evaluator::new(dir.path().join("out"));
    let report = evaluator
        .evaluate(&mut BaselineSpeller::new(), &corpus)
        .unwrap();

    // The baseline gets "correct query" right and "exmaple" wrong.
    let general = report.general.ef1.unwrap();
    assert_eq!(general.expected_precision, 0.5);
    assert_eq!(general.expected_recall, 0.5);
    assert_eq!(general.ef1, 0.5);
    assert_eq!(report.general.precision_at_1, Some(0.5));
}

#[test]
fn results_are_sliced_by_error_kind() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = fixture_corpus(&dir);

    let evaluator = Evaluator::new(dir.path().join("out"));
    let report = evaluator
        .evaluate(&mut BaselineSpeller::new(), &corpus)
        .unwrap();

    let slice = |name: &str| {
        report
            .slices
            .iter()
            .find(|slice| slice.name == name)
            .unwrap_or_else(|| panic!("missing slice {name}"))
    };

    assert_eq!(slice("No Error").count, 1);
    assert_eq!(slice("Character Error").count, 1);
    assert_eq!(slice("Transposition Error").count, 1);

    // No query carries a space error; the slice reports no data instead
    // of NaN.
    let space = slice("Space Error");
    assert_eq!(space.count, 0);
    assert!(space.ef1.is_none());
    assert!(space.detail.is_some());
}

#[test]
fn artifacts_are_written_per_speller_and_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = fixture_corpus(&dir);
    let out = dir.path().join("out");

    Evaluator::new(&out)
        .evaluate(&mut BaselineSpeller::new(), &corpus)
        .unwrap();

    let spelling = out.join("baseline/baseline-fixture-spelling.csv");
    let summary = out.join("baseline/baseline-fixture-ef1.txt");

    let csv = fs::read_to_string(spelling).unwrap();
    assert!(csv.contains("correct query;correct query;1"));
    assert!(csv.contains("exmaple;exmaple;1"));

    let summary = fs::read_to_string(summary).unwrap();
    assert!(summary.contains("EF1:"));
    assert!(summary.contains("Precision@1:"));
}

/// Speller that fails on a chosen query.
struct TrippingSpeller {
    poison: String,
}

impl Speller for TrippingSpeller {
    fn tag(&self) -> &str {
        "tripping"
    }

    fn spell(&mut self, query: &str) -> Result<Vec<(String, f64)>> {
        if query == self.poison {
            return Err(Error::collaborator_unavailable("oracle went away"));
        }
        Ok(vec![(query.to_string(), 1.0)])
    }
}

#[test]
fn a_failing_speller_aborts_and_names_the_query() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = fixture_corpus(&dir);

    let mut speller = TrippingSpeller {
        poison: "exmaple".to_string(),
    };

    let err = Evaluator::new(dir.path().join("out"))
        .evaluate(&mut speller, &corpus)
        .unwrap_err();

    match err {
        Error::QueryFailed { query, .. } => assert_eq!(query, "exmaple"),
        other => panic!("expected QueryFailed, got {other}"),
    }
}

#[test]
fn report_display_is_explicit_about_empty_slices() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = fixture_corpus(&dir);

    let report = Evaluator::new(dir.path().join("out"))
        .evaluate(&mut BaselineSpeller::new(), &corpus)
        .unwrap();

    let rendered = report.to_string();
    assert!(rendered.contains("General"));
    assert!(rendered.contains("EF1: undefined"));
    assert!(!rendered.contains("NaN"));
}

#[test]
fn analysis_profiles_the_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = fixture_corpus(&dir);

    let stats = qspell::eval::analyze(&corpus, corpus.annotation_path()).unwrap();

    assert_eq!(stats.size, 2);
    assert_eq!(stats.definite_misspellings, 1);
    assert_eq!(stats.potential_misspellings, 0);
    assert_eq!(stats.misspelling_percentage, 50.0);
    // "exmaple" -> "example" is one transposition, distance 2.
    assert_eq!(stats.avg_min_distance_definite, 2.0);
    assert_eq!(stats.queries_with_error.get(&ErrorKind::Character), Some(&1));
}
