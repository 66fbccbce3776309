//! Integration tests for the qspell CLI.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

const ANNOTATION_HEADER: &str =
    "query;variant;correct;space;character;insertion;deletion;substitution;transposition";

fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fixture_files(dir: &tempfile::TempDir) -> (PathBuf, PathBuf) {
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
    (corpus, annotations)
}

fn qspell() -> Command {
    Command::cargo_bin("qspell").unwrap()
}

#[test]
fn help_describes_the_harness() {
    qspell()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("evaluate").and(predicate::str::contains("analyze")));
}

#[test]
fn analyze_prints_corpus_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let (corpus, annotations) = fixture_files(&dir);

    qspell()
        .arg("analyze")
        .arg("--corpus")
        .arg(&corpus)
        .arg("--annotations")
        .arg(&annotations)
        .assert()
        .success()
        .stdout(predicate::str::contains("Corpus:"))
        .stdout(predicate::str::contains("Definite misspellings"));
}

#[test]
fn evaluate_baseline_writes_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let (corpus, annotations) = fixture_files(&dir);
    let out = dir.path().join("out");

    qspell()
        .arg("evaluate")
        .arg("--corpus")
        .arg(&corpus)
        .arg("--annotations")
        .arg(&annotations)
        .arg("--tag")
        .arg("fixture")
        .arg("--speller")
        .arg("baseline")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Precision@1"));

    assert!(out.join("baseline/baseline-fixture-spelling.csv").exists());
    assert!(out.join("baseline/baseline-fixture-ef1.txt").exists());
}

#[test]
fn spell_prints_ranked_candidates() {
    qspell()
        .arg("spell")
        .arg("--speller")
        .arg("baseline")
        .arg("some query")
        .assert()
        .success()
        .stdout(predicate::str::contains("some query | 100.00%"));
}

#[test]
fn dictionary_speller_requires_a_word_list() {
    let dir = tempfile::tempdir().unwrap();
    let (corpus, annotations) = fixture_files(&dir);

    qspell()
        .arg("evaluate")
        .arg("--corpus")
        .arg(&corpus)
        .arg("--annotations")
        .arg(&annotations)
        .arg("--speller")
        .arg("dictionary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dictionary"));
}

#[test]
fn missing_corpus_file_fails_cleanly() {
    qspell()
        .arg("analyze")
        .arg("--corpus")
        .arg("does-not-exist.csv")
        .arg("--annotations")
        .arg("also-missing.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
