//! Confidence scoring for aggregated correction candidates.
//!
//! Each candidate phrase is scored by its language-model log-probability
//! penalized by how far it drifted from the input, outliers are floored
//! rather than dropped, and the surviving scores are normalized into a
//! confidence distribution.

use indexmap::IndexMap;

use crate::oracle::LanguageModel;
use crate::{Error, Result};

/// Weight of the edit-distance penalty in the adjusted score.
pub const ERROR_RATE: f64 = 36.0;

/// Near-zero confidence assigned to suppressed outliers.
///
/// Outliers keep their map entry at this floor instead of disappearing,
/// so downstream logic can still see that a phrase was a candidate.
pub const OUTLIER_FLOOR: f64 = 1e-15;

/// Score every candidate against the original query.
///
/// The adjusted score is
/// `log_prob - (ERROR_RATE * levenshtein(query, candidate)) / query_len`,
/// penalizing divergent candidates more harshly the shorter the query
/// is. Duplicate phrases keep their first-seen score — later occurrences
/// never overwrite it — but still feed the running maximum used for
/// outlier suppression.
pub fn score_candidates<L: LanguageModel + ?Sized>(
    language_model: &mut L,
    candidates: &[String],
    query: &str,
) -> Result<IndexMap<String, f64>> {
    let mut scores = IndexMap::new();
    let query_len = query.chars().count() as f64;

    let mut max_exp = f64::MIN_POSITIVE;

    for candidate in candidates {
        let log_prob = language_model.joint_log_probability(candidate)?;
        let distance = strsim::levenshtein(query, candidate) as f64;
        let adjusted = log_prob - (ERROR_RATE * distance) / query_len;

        if adjusted.exp() > max_exp {
            max_exp = adjusted.exp();
        }

        scores.entry(candidate.clone()).or_insert(adjusted);
    }

    floor_below(&mut scores, max_exp);

    Ok(scores)
}

/// Floor every score whose exponentiated value is an order of magnitude
/// below the best one.
///
/// Idempotent: entries already at [`OUTLIER_FLOOR`] neither contribute
/// to the maximum nor get re-floored, so re-applying the rule to an
/// already-suppressed mapping changes nothing.
pub fn suppress_outliers(scores: &mut IndexMap<String, f64>) {
    let max_exp = scores
        .values()
        .filter(|score| **score != OUTLIER_FLOOR)
        .map(|score| score.exp())
        .fold(f64::MIN_POSITIVE, f64::max);

    floor_below(scores, max_exp);
}

fn floor_below(scores: &mut IndexMap<String, f64>, max_exp: f64) {
    for score in scores.values_mut() {
        if *score != OUTLIER_FLOOR && score.exp() * 10.0 < max_exp {
            *score = OUTLIER_FLOOR;
        }
    }
}

/// Normalize scores into a confidence distribution summing to 1.
///
/// Normalizing an empty mapping is undefined (the sum would be a
/// division by zero) and reported as an error.
pub fn normalize(scores: &mut IndexMap<String, f64>) -> Result<()> {
    if scores.is_empty() {
        return Err(Error::degenerate_metric(
            "cannot normalize an empty confidence mapping",
        ));
    }

    let sum: f64 = scores.values().sum();
    for score in scores.values_mut() {
        *score /= sum;
    }

    Ok(())
}

/// Descending-confidence ordering, stable for ties within one run.
pub fn rank_by_confidence(scores: IndexMap<String, f64>) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
        entries
            .iter()
            .map(|(phrase, score)| (phrase.to_string(), *score))
            .collect()
    }

    #[test]
    fn suppression_floors_dominated_scores() {
        let mut map = scores(&[("good", -5.0), ("bad", -30.0)]);
        suppress_outliers(&mut map);

        assert_eq!(map["good"], -5.0);
        assert_eq!(map["bad"], OUTLIER_FLOOR);
    }

    #[test]
    fn suppression_keeps_scores_within_one_magnitude() {
        // exp(-5.1) * 10 > exp(-5.0): both survive.
        let mut map = scores(&[("a", -5.0), ("b", -5.1)]);
        suppress_outliers(&mut map);

        assert_eq!(map["a"], -5.0);
        assert_eq!(map["b"], -5.1);
    }

    #[test]
    fn suppression_is_idempotent() {
        let mut map = scores(&[("good", -5.0), ("bad", -30.0), ("worse", -60.0)]);
        suppress_outliers(&mut map);
        let once = map.clone();
        suppress_outliers(&mut map);

        assert_eq!(map, once);
    }

    #[test]
    fn normalized_scores_sum_to_one() {
        let mut map = scores(&[("a", -4.0), ("b", -6.0), ("c", -12.0)]);
        normalize(&mut map).unwrap();

        let sum: f64 = map.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn normalizing_empty_mapping_is_an_error() {
        let mut map = IndexMap::new();
        assert!(normalize(&mut map).is_err());
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let map = scores(&[("first", 0.4), ("second", 0.4), ("third", 0.2)]);
        let ranked = rank_by_confidence(map);

        assert_eq!(ranked[0].0, "first");
        assert_eq!(ranked[1].0, "second");
        assert_eq!(ranked[2].0, "third");
    }
}
