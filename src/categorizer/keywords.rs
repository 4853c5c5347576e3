//! Scores a description against the keyword lists of the category dictionary.
//!
//! The point values and thresholds below were tuned by hand on real
//! transaction descriptions. They are kept as named constants so they can be
//! adjusted together.

use serde::Serialize;

use crate::{
    dictionary::CategoryDictionary,
    normalize::{normalize, tokens},
};

/// Points for a keyword found verbatim in the description.
const EXACT_MATCH_POINTS: u32 = 20;
/// Points for a keyword whose words all matched, including a long word.
const FULL_MATCH_POINTS: u32 = 8;
/// Points for a keyword whose words all matched, none of them long.
const FULL_SHORT_MATCH_POINTS: u32 = 4;
/// Points for a keyword where only some words matched, including a long word.
const PARTIAL_MATCH_POINTS: u32 = 1;
/// Applied to the whole category score when any keyword matched exactly.
const EXACT_MATCH_MULTIPLIER: f64 = 1.5;

/// Keyword words this short or shorter are skipped.
const MAX_SKIPPED_WORD_LENGTH: usize = 2;
/// Words shorter than this only match when equal.
const MIN_PREFIX_WORD_LENGTH: usize = 4;
/// Matched words longer than this are significant.
const MAX_MINOR_WORD_LENGTH: usize = 4;
/// A prefix match needs the shorter word to cover more than this share of the longer one.
const MIN_PREFIX_LENGTH_RATIO: f64 = 0.7;

/// The score of one dictionary category for one description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    /// The dictionary category name.
    pub category: String,
    /// The accumulated score.
    pub score: u32,
    /// Whether any keyword appeared verbatim in the description.
    pub exact_match: bool,
}

/// Score every category in `dictionary` against `normalized_description`,
/// keeping only the categories that scored above zero.
///
/// The result is in dictionary order.
pub fn score_dictionary(
    dictionary: &CategoryDictionary,
    normalized_description: &str,
) -> Vec<CategoryScore> {
    dictionary
        .iter()
        .map(|(category, keywords)| score_category(category, keywords, normalized_description))
        .filter(|score| score.score > 0)
        .collect()
}

/// Score a single category's `keywords` against `normalized_description`.
pub fn score_category(
    category: &str,
    keywords: &[String],
    normalized_description: &str,
) -> CategoryScore {
    let description_tokens: Vec<&str> = tokens(normalized_description).collect();
    let mut score = 0;
    let mut exact_match = false;

    for keyword in keywords {
        let keyword = normalize(keyword);
        if keyword.is_empty() {
            continue;
        }

        if normalized_description.contains(&keyword) {
            score += EXACT_MATCH_POINTS;
            exact_match = true;
            continue;
        }

        score += score_keyword_words(&keyword, &description_tokens);
    }

    if exact_match {
        score = (score as f64 * EXACT_MATCH_MULTIPLIER).floor() as u32;
    }

    CategoryScore {
        category: category.to_owned(),
        score,
        exact_match,
    }
}

/// Points for a keyword that did not appear verbatim, based on how many of
/// its words match a description token.
fn score_keyword_words(keyword: &str, description_tokens: &[&str]) -> u32 {
    let words: Vec<&str> = tokens(keyword)
        .filter(|word| word.len() > MAX_SKIPPED_WORD_LENGTH)
        .collect();

    if words.is_empty() {
        return 0;
    }

    let mut matched = 0;
    let mut significant = 0;

    for word in &words {
        if description_tokens.iter().any(|token| words_match(word, token)) {
            matched += 1;

            if word.len() > MAX_MINOR_WORD_LENGTH {
                significant += 1;
            }
        }
    }

    if matched == words.len() {
        if significant > 0 {
            FULL_MATCH_POINTS
        } else {
            FULL_SHORT_MATCH_POINTS
        }
    } else if significant > 0 {
        PARTIAL_MATCH_POINTS
    } else {
        0
    }
}

/// Whether a keyword word matches a description token, either exactly or by
/// one being a close prefix of the other (plurals, conjugations).
pub(crate) fn words_match(word: &str, token: &str) -> bool {
    if word == token {
        return true;
    }

    if word.len() < MIN_PREFIX_WORD_LENGTH || token.len() < MIN_PREFIX_WORD_LENGTH {
        return false;
    }

    if !(token.starts_with(word) || word.starts_with(token)) {
        return false;
    }

    let (shorter, longer) = if word.len() < token.len() {
        (word.len(), token.len())
    } else {
        (token.len(), word.len())
    };

    shorter as f64 / longer as f64 > MIN_PREFIX_LENGTH_RATIO
}

#[cfg(test)]
mod keyword_tests {
    use crate::{dictionary::CategoryDictionary, normalize::normalize};

    use super::{CategoryScore, score_category, score_dictionary, words_match};

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| (*word).to_owned()).collect()
    }

    #[test]
    fn exact_keyword_sets_flag_and_multiplier() {
        let description = normalize("Compra en Jumbo supermercado");

        let got = score_category("Comida", &keywords(&["jumbo"]), &description);

        assert_eq!(
            got,
            CategoryScore {
                category: "Comida".to_owned(),
                score: 30,
                exact_match: true
            }
        );
    }

    #[test]
    fn exact_keywords_accumulate_before_multiplier() {
        let description = normalize("Compra en Jumbo supermercado");

        let got = score_category("Comida", &keywords(&["jumbo", "supermercado"]), &description);

        assert_eq!(got.score, 60);
    }

    #[test]
    fn keyword_is_normalized_before_matching() {
        let description = normalize("PAGO CAFETERÍA");

        let got = score_category("Comida", &keywords(&["Cafetería"]), &description);

        assert!(got.exact_match);
    }

    #[test]
    fn fuzzy_prefix_tolerates_suffix_variation() {
        assert!(words_match("empanada", "empanadas"));
        assert!(words_match("empanadas", "empanada"));
        assert!(words_match("pasaje", "pasajes"));
    }

    #[test]
    fn fuzzy_prefix_rejects_unrelated_and_short_words() {
        assert!(!words_match("taxi", "empanadas"));
        assert!(!words_match("bus", "buses"));
        // 4/10 is below the length ratio.
        assert!(!words_match("cine", "cinematica"));
    }

    #[test]
    fn fuzzy_prefix_needs_more_than_seventy_percent() {
        // 7/10 sits exactly on the ratio and is not enough.
        assert!(!words_match("cinemat", "cinematica"));
        assert!(!words_match("cinematica", "cinemat"));
        // 8/10 clears it.
        assert!(words_match("cinemati", "cinematica"));
        assert!(words_match("cinematica", "cinemati"));
    }

    #[test]
    fn all_words_matched_with_significant_word_scores_eight() {
        // "empanadas" is not a substring of "empanada", so the words are compared.
        let description = normalize("docena de empanada");

        let got = score_category("Comida", &keywords(&["empanadas"]), &description);

        assert_eq!(got.score, 8);
        assert!(!got.exact_match);
    }

    #[test]
    fn all_short_words_matched_scores_four() {
        let description = normalize("bus pago mensual");

        let got = score_category("Transporte", &keywords(&["pago bus"]), &description);

        assert_eq!(got.score, 4);
    }

    #[test]
    fn partial_significant_match_scores_one() {
        let description = normalize("alimentos varios");

        let got = score_category("Mascotas", &keywords(&["alimento perro"]), &description);

        assert_eq!(got.score, 1);
    }

    #[test]
    fn partial_minor_match_scores_nothing() {
        let description = normalize("cruz roja");

        let got = score_category("Salud", &keywords(&["cruz verde"]), &description);

        assert_eq!(got.score, 0);
    }

    #[test]
    fn fuzzy_points_are_multiplied_with_exact_match() {
        let description = normalize("jumbo empanada");

        let got = score_category("Comida", &keywords(&["jumbo", "empanadas"]), &description);

        // (20 + 8) * 1.5
        assert_eq!(got.score, 42);
    }

    #[test]
    fn empty_keywords_are_ignored() {
        let got = score_category("Comida", &keywords(&["", "  #"]), "compra");

        assert_eq!(got.score, 0);
        assert!(!got.exact_match);
    }

    #[test]
    fn score_dictionary_drops_zero_scores() {
        let dictionary = CategoryDictionary::new([
            ("Comida", vec!["jumbo"]),
            ("Transporte", vec!["uber"]),
            ("Viajes", vec!["aeropuerto"]),
        ])
        .unwrap();

        let got = score_dictionary(&dictionary, &normalize("Uber al aeropuerto"));

        let categories: Vec<_> = got.iter().map(|score| score.category.as_str()).collect();
        assert_eq!(categories, vec!["Transporte", "Viajes"]);
    }
}
