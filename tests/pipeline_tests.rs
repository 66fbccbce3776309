//! End-to-end tests of the dictionary speller pipeline over mock
//! oracles.

use std::collections::HashMap;

use qspell::speller::score;
use qspell::{
    CandidateSet, DictionaryOracle, DictionarySpeller, Error, LanguageModel, Result, Speller,
};

/// Dictionary oracle over a fixed set of flagged tokens.
#[derive(Default)]
struct MockDictionary {
    suggestions: HashMap<String, Vec<String>>,
    unavailable: bool,
}

impl MockDictionary {
    fn flag(mut self, token: &str, suggestions: &[&str]) -> Self {
        self.suggestions.insert(
            token.to_string(),
            suggestions.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }
}

impl DictionaryOracle for MockDictionary {
    fn is_misspelled(&mut self, token: &str) -> Result<bool> {
        if self.unavailable {
            return Err(Error::collaborator_unavailable("dictionary offline"));
        }
        Ok(self.suggestions.contains_key(token))
    }

    fn suggest(&mut self, token: &str) -> Result<Vec<String>> {
        if self.unavailable {
            return Err(Error::collaborator_unavailable("dictionary offline"));
        }
        Ok(self.suggestions.get(token).cloned().unwrap_or_default())
    }
}

/// Language model over fixed per-phrase log-probabilities.
struct MockLanguageModel {
    log_probs: HashMap<String, f64>,
    default_log_prob: f64,
    segmentations: HashMap<String, Vec<String>>,
}

impl MockLanguageModel {
    fn new(default_log_prob: f64) -> Self {
        Self {
            log_probs: HashMap::new(),
            default_log_prob,
            segmentations: HashMap::new(),
        }
    }

    fn with_log_prob(mut self, phrase: &str, log_prob: f64) -> Self {
        self.log_probs.insert(phrase.to_string(), log_prob);
        self
    }

    fn with_segmentation(mut self, text: &str, candidates: &[&str]) -> Self {
        self.segmentations.insert(
            text.to_string(),
            candidates.iter().map(|s| s.to_string()).collect(),
        );
        self
    }
}

impl LanguageModel for MockLanguageModel {
    fn joint_log_probability(&mut self, phrase: &str) -> Result<f64> {
        Ok(self
            .log_probs
            .get(phrase)
            .copied()
            .unwrap_or(self.default_log_prob))
    }

    fn segment_into_words(&mut self, text: &str, max_candidates: usize) -> Result<Vec<String>> {
        let mut candidates = self.segmentations.get(text).cloned().unwrap_or_default();
        candidates.truncate(max_candidates);
        Ok(candidates)
    }
}

/// Language model whose answers drift between calls, for first-write
/// tests.
struct DriftLanguageModel {
    responses: Vec<f64>,
    calls: usize,
}

impl LanguageModel for DriftLanguageModel {
    fn joint_log_probability(&mut self, _phrase: &str) -> Result<f64> {
        let response = self.responses[self.calls.min(self.responses.len() - 1)];
        self.calls += 1;
        Ok(response)
    }

    fn segment_into_words(&mut self, _text: &str, _max: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[test]
fn corrects_a_character_insertion_end_to_end() {
    let dictionary = MockDictionary::default().flag("exam1ple", &["example", "exampl"]);
    let language_model = MockLanguageModel::new(-30.0)
        .with_log_prob("example", -10.0)
        .with_log_prob("exampl", -18.0)
        .with_log_prob("exam1ple", -25.0);

    let mut speller = DictionarySpeller::new(dictionary, language_model);
    let ranked = speller.spell("exam1ple").unwrap();

    let candidates: Vec<&str> = ranked.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(candidates.len(), 3);
    assert!(candidates.contains(&"example"));
    assert!(candidates.contains(&"exampl"));
    assert!(candidates.contains(&"exam1ple"));

    assert_eq!(ranked[0].0, "example");
    assert!(ranked[0].1 > ranked[1].1);
    assert!(ranked[0].1 > ranked[2].1);
}

#[test]
fn unchanged_query_gets_full_confidence() {
    let dictionary = MockDictionary::default();
    let language_model = MockLanguageModel::new(-20.0);

    let mut speller = DictionarySpeller::new(dictionary, language_model);
    let ranked = speller.spell("hello world").unwrap();

    assert_eq!(ranked, vec![("hello world".to_string(), 1.0)]);
}

#[test]
fn word_break_segmentation_recovers_space_errors() {
    let dictionary = MockDictionary::default();
    let language_model = MockLanguageModel::new(-20.0)
        .with_log_prob("hello world", -8.0)
        .with_segmentation("helloworld", &["hello world"]);

    let mut speller = DictionarySpeller::new(dictionary, language_model);
    let ranked = speller.spell("helloworld").unwrap();

    assert_eq!(ranked[0].0, "hello world");
    assert!(ranked.iter().any(|(c, _)| c == "helloworld"));
}

#[test]
fn dictionary_failure_propagates() {
    let language_model = MockLanguageModel::new(-20.0);
    let mut speller = DictionarySpeller::new(MockDictionary::unavailable(), language_model);

    assert!(matches!(
        speller.spell("anything"),
        Err(Error::CollaboratorUnavailable(_))
    ));
}

#[test]
fn suggestions_are_truncated_and_the_token_is_recoverable() {
    let mut dictionary =
        MockDictionary::default().flag("teh", &["the", "ten", "tea", "tech", "they"]);

    let candidates = CandidateSet::generate("teh", &mut dictionary, 2).unwrap();

    assert_eq!(candidates.positions().len(), 1);
    assert_eq!(candidates.positions()[0], vec!["the", "ten", "teh"]);
}

#[test]
fn duplicate_candidates_keep_their_first_score() {
    // The oracle drifts between calls; the stored score must come from
    // the first call only.
    let mut language_model = DriftLanguageModel {
        responses: vec![-5.0, -9.0],
        calls: 0,
    };

    let candidates = vec!["foo".to_string(), "foo".to_string()];
    let scores = score::score_candidates(&mut language_model, &candidates, "foo").unwrap();

    assert_eq!(scores.len(), 1);
    assert_eq!(scores["foo"], -5.0);
    assert_eq!(language_model.calls, 2);
}

#[test]
fn scored_distribution_sums_to_one_after_normalization() {
    let dictionary = MockDictionary::default().flag("exam1ple", &["example", "exampl"]);
    let language_model = MockLanguageModel::new(-30.0)
        .with_log_prob("example", -10.0)
        .with_log_prob("exampl", -18.0)
        .with_log_prob("exam1ple", -25.0);

    let mut speller = DictionarySpeller::new(dictionary, language_model);
    let ranked = speller.spell("exam1ple").unwrap();

    let sum: f64 = ranked.iter().map(|(_, confidence)| confidence).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}
