//! Quality metrics for ranked spelling corrections.

use std::fmt;

use serde::Serialize;

use super::SpellingResult;
use crate::{Error, Result};

/// Decimal places used when reporting metric values.
const REPORT_PLACES: u32 = 3;

/// Round half-up to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Expected precision, expected recall, and their harmonic mean over a
/// set of spelling results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ef1 {
    /// Mean confidence mass assigned to ground-truth spellings.
    pub expected_precision: f64,
    /// Mean fraction of ground-truth spellings recovered.
    pub expected_recall: f64,
    /// Harmonic mean of the two.
    pub ef1: f64,
}

impl Ef1 {
    /// Compute EF1 over spelling results.
    ///
    /// # Errors
    ///
    /// [`Error::DegenerateMetricInput`] when the input is empty, and
    /// when expected precision and recall are both zero (the harmonic
    /// mean is undefined there; returning NaN would silently poison
    /// downstream aggregation).
    pub fn compute<'a, I>(results: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a SpellingResult>,
    {
        let results: Vec<&SpellingResult> = results.into_iter().collect();
        if results.is_empty() {
            return Err(Error::degenerate_metric(
                "EF1 over an empty result list is undefined",
            ));
        }

        let mut sum_precision = 0.0;
        let mut sum_recall = 0.0;

        for result in &results {
            for (candidate, confidence) in result.ranked() {
                if result.in_ground_truth(candidate) {
                    sum_precision += confidence;
                }
            }

            let truth_size = result.ground_truth().len() as f64;
            for truth in result.ground_truth() {
                if result.contains_candidate(truth) {
                    sum_recall += 1.0 / truth_size;
                }
            }
        }

        let count = results.len() as f64;
        let expected_precision = sum_precision / count;
        let expected_recall = sum_recall / count;

        if expected_precision + expected_recall == 0.0 {
            return Err(Error::degenerate_metric(
                "EF1 undefined: expected precision and recall are both zero",
            ));
        }

        let ef1 = 2.0 * expected_precision * expected_recall
            / (expected_precision + expected_recall);

        Ok(Self {
            expected_precision: round_to(expected_precision, REPORT_PLACES),
            expected_recall: round_to(expected_recall, REPORT_PLACES),
            ef1: round_to(ef1, REPORT_PLACES),
        })
    }
}

impl fmt::Display for Ef1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EF1: {}\n EP: {}\n ER: {}",
            self.ef1, self.expected_precision, self.expected_recall
        )
    }
}

/// Precision@1 over spelling results.
///
/// Candidates tied at the exact top confidence all count as rank 1; a
/// result is credited once if any of them is a ground-truth spelling.
///
/// # Errors
///
/// [`Error::DegenerateMetricInput`] when the input is empty.
pub fn precision_at_1<'a, I>(results: I) -> Result<f64>
where
    I: IntoIterator<Item = &'a SpellingResult>,
{
    let results: Vec<&SpellingResult> = results.into_iter().collect();
    if results.is_empty() {
        return Err(Error::degenerate_metric(
            "Precision@1 over an empty result list is undefined",
        ));
    }

    let mut credited = 0usize;

    for result in &results {
        let top = match result.ranked().first() {
            Some((_, confidence)) => *confidence,
            None => continue,
        };

        for (candidate, confidence) in result.ranked() {
            if *confidence != top {
                break;
            }

            if result.in_ground_truth(candidate) {
                credited += 1;
                break;
            }
        }
    }

    Ok(round_to(
        credited as f64 / results.len() as f64,
        REPORT_PLACES,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexSet;

    fn truths(items: &[&str]) -> IndexSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn result(query: &str, truth: &[&str], ranked: &[(&str, f64)]) -> SpellingResult {
        SpellingResult::new(
            query,
            truths(truth),
            ranked
                .iter()
                .map(|(candidate, confidence)| (candidate.to_string(), *confidence))
                .collect(),
        )
    }

    #[test]
    fn perfect_results_score_one() {
        let results = vec![
            result("quary", &["query"], &[("query", 1.0)]),
            result("exmaple", &["example"], &[("example", 1.0)]),
        ];

        let ef1 = Ef1::compute(&results).unwrap();
        assert_eq!(ef1.expected_precision, 1.0);
        assert_eq!(ef1.expected_recall, 1.0);
        assert_eq!(ef1.ef1, 1.0);
    }

    #[test]
    fn recall_uses_real_division_over_ground_truth_size() {
        // One of two accepted spellings recovered at confidence 0.6.
        let results = vec![result(
            "color",
            &["color", "colour"],
            &[("color", 0.6), ("colro", 0.4)],
        )];

        let ef1 = Ef1::compute(&results).unwrap();
        assert_eq!(ef1.expected_precision, 0.6);
        assert_eq!(ef1.expected_recall, 0.5);
        // 2 * 0.6 * 0.5 / 1.1
        assert_eq!(ef1.ef1, 0.545);
    }

    #[test]
    fn empty_input_is_a_degenerate_metric_error() {
        let results: Vec<SpellingResult> = Vec::new();
        assert!(matches!(
            Ef1::compute(&results),
            Err(Error::DegenerateMetricInput(_))
        ));
        assert!(matches!(
            precision_at_1(&results),
            Err(Error::DegenerateMetricInput(_))
        ));
    }

    #[test]
    fn zero_precision_and_recall_is_a_degenerate_metric_error() {
        let results = vec![result("quary", &["query"], &[("wrong", 1.0)])];
        assert!(matches!(
            Ef1::compute(&results),
            Err(Error::DegenerateMetricInput(_))
        ));
    }

    #[test]
    fn tied_top_candidates_share_rank_one() {
        let results = vec![result(
            "quary",
            &["query"],
            &[("qwary", 0.5), ("query", 0.5)],
        )];

        assert_eq!(precision_at_1(&results).unwrap(), 1.0);
    }

    #[test]
    fn credit_requires_the_top_confidence_tier() {
        // The correct candidate sits strictly below the top confidence.
        let results = vec![result(
            "quary",
            &["query"],
            &[("qwary", 0.6), ("query", 0.4)],
        )];

        assert_eq!(precision_at_1(&results).unwrap(), 0.0);
    }

    #[test]
    fn rounding_keeps_the_reporting_precision() {
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
        assert_eq!(round_to(0.5454, 3), 0.545);
        assert_eq!(round_to(12.3456789, 2), 12.35);
    }
}
