//! Matches a new description against the user's previously categorized transactions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize, tokens};

/// Tokens this short or shorter are ignored when counting shared tokens.
const MAX_IGNORED_TOKEN_LENGTH: usize = 2;
/// A sample is similar when it shares at least this many tokens...
const MIN_SHARED_TOKENS: usize = 2;
/// ...or more than this fraction of the description's tokens.
const MIN_SHARED_FRACTION: f64 = 0.6;
/// A category needs this many similar samples to be accepted.
const MIN_SIMILAR_SAMPLES: usize = 2;
const BASE_CONFIDENCE: usize = 60;
const CONFIDENCE_PER_SAMPLE: usize = 10;
/// The highest confidence a historical match can report.
pub const MAX_HISTORICAL_CONFIDENCE: u8 = 90;

/// A previously categorized transaction, used only as matching input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalSample {
    /// The category the transaction was filed under.
    pub category: String,
    /// The text description of the transaction.
    pub description: String,
}

impl HistoricalSample {
    /// Create a sample, mostly useful in tests and fixtures.
    pub fn new(category: &str, description: &str) -> Self {
        Self {
            category: category.to_owned(),
            description: description.to_owned(),
        }
    }
}

/// The category suggested by the user's history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalMatch {
    /// The category shared by the similar samples.
    pub category: String,
    /// How many samples of `category` were similar to the description.
    pub similar_samples: usize,
    /// Confidence in the match, at most [MAX_HISTORICAL_CONFIDENCE].
    pub confidence: u8,
}

/// Find the category whose past transactions look most like `description`.
///
/// A sample is similar when enough of the description's tokens appear in the
/// sample's description. The category with the most similar samples wins, but
/// only if it has at least two of them.
pub fn match_history(description: &str, samples: &[HistoricalSample]) -> Option<HistoricalMatch> {
    let normalized = normalize(description);
    let description_tokens: Vec<&str> = tokens(&normalized).collect();

    if description_tokens.is_empty() {
        return None;
    }

    // Categories in the order they were first seen, so ties go to the most recent sample.
    let mut category_order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for sample in samples {
        if !is_similar(&description_tokens, &normalize(&sample.description)) {
            continue;
        }

        let count = counts.entry(sample.category.as_str()).or_insert_with(|| {
            category_order.push(sample.category.as_str());
            0
        });
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for category in category_order {
        let count = counts[category];
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((category, count));
        }
    }

    let (category, similar_samples) = best?;
    if similar_samples < MIN_SIMILAR_SAMPLES {
        return None;
    }

    let confidence = (BASE_CONFIDENCE + CONFIDENCE_PER_SAMPLE * similar_samples)
        .min(MAX_HISTORICAL_CONFIDENCE as usize) as u8;

    Some(HistoricalMatch {
        category: category.to_owned(),
        similar_samples,
        confidence,
    })
}

fn is_similar(description_tokens: &[&str], normalized_sample: &str) -> bool {
    let shared = description_tokens
        .iter()
        .filter(|token| token.len() > MAX_IGNORED_TOKEN_LENGTH)
        .filter(|token| normalized_sample.contains(**token))
        .count();

    let shared_fraction = shared as f64 / description_tokens.len() as f64;

    shared >= MIN_SHARED_TOKENS || shared_fraction > MIN_SHARED_FRACTION
}

#[cfg(test)]
mod history_tests {
    use super::{HistoricalMatch, HistoricalSample, is_similar, match_history};

    #[test]
    fn two_similar_samples_are_accepted() {
        let samples = [
            HistoricalSample::new("Comida", "Compra Supermercado Lider Maipu"),
            HistoricalSample::new("Comida", "SUPERMERCADO LIDER La Florida"),
        ];

        let got = match_history("Supermercado Líder Vitacura", &samples);

        assert_eq!(
            got,
            Some(HistoricalMatch {
                category: "Comida".to_owned(),
                similar_samples: 2,
                confidence: 80,
            })
        );
    }

    #[test]
    fn one_similar_sample_is_not_enough() {
        let samples = [
            HistoricalSample::new("Comida", "Compra Supermercado Lider Maipu"),
            HistoricalSample::new("Transporte", "Carga tarjeta bip"),
        ];

        assert_eq!(match_history("Supermercado Lider Vitacura", &samples), None);
    }

    #[test]
    fn confidence_is_capped() {
        let samples: Vec<_> = (0..6)
            .map(|i| HistoricalSample::new("Transporte", &format!("Uber viaje {i}")))
            .collect();

        let got = match_history("uber viaje", &samples).unwrap();

        assert_eq!(got.similar_samples, 6);
        assert_eq!(got.confidence, 90);
    }

    #[test]
    fn most_similar_samples_wins() {
        let samples = [
            HistoricalSample::new("Salidas", "pago cafe central"),
            HistoricalSample::new("Comida", "cafe central almuerzo"),
            HistoricalSample::new("Comida", "cafe central once"),
            HistoricalSample::new("Salidas", "cafe central noche"),
            HistoricalSample::new("Comida", "cafe central desayuno"),
        ];

        let got = match_history("Café Central", &samples).unwrap();

        assert_eq!(got.category, "Comida");
        assert_eq!(got.similar_samples, 3);
        assert_eq!(got.confidence, 90);
    }

    #[test]
    fn ties_go_to_the_most_recent_category() {
        let samples = [
            HistoricalSample::new("Salidas", "cafe central noche"),
            HistoricalSample::new("Comida", "cafe central almuerzo"),
            HistoricalSample::new("Comida", "cafe central once"),
            HistoricalSample::new("Salidas", "cafe central tarde"),
        ];

        let got = match_history("cafe central", &samples).unwrap();

        assert_eq!(got.category, "Salidas");
    }

    #[test]
    fn empty_description_never_matches() {
        let samples = [
            HistoricalSample::new("Comida", "jumbo"),
            HistoricalSample::new("Comida", "jumbo"),
        ];

        assert_eq!(match_history("", &samples), None);
        assert_eq!(match_history("  #!  ", &samples), None);
    }

    #[test]
    fn single_long_token_matches_by_fraction() {
        // One shared token out of one is above the fraction threshold.
        assert!(is_similar(&["netflix"], "netflix com suscripcion"));
        // One shared token out of two is not.
        assert!(!is_similar(&["netflix", "mensual"], "netflix com"));
    }

    #[test]
    fn short_tokens_are_not_counted() {
        assert!(!is_similar(&["en", "la"], "compra en la feria"));
    }
}
