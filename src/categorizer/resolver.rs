//! Combines the historical and keyword signals into a final category.

use std::time::Instant;

use crate::{
    Error,
    categorizer::{
        CategorizeRequest, Categorization, CategoryWriter, HISTORY_SAMPLE_LIMIT,
        HistoricalSample, HistorySource, Method, UNCATEGORIZED,
        history::match_history,
        keywords::{CategoryScore, score_dictionary},
    },
    dictionary::CategoryDictionary,
    normalize::{normalize, tokens},
};

/// Added to a keyword candidate that matches one of the user's categories.
const RECONCILIATION_BONUS: u32 = 15;
/// Keyword confidence is the winning score times this factor...
const CONFIDENCE_PER_POINT: u32 = 5;
/// ...capped to this value.
const MAX_KEYWORD_CONFIDENCE: u32 = 95;

/// Picks categories for transactions.
///
/// The categorizer owns the keyword dictionary and reads the user's history
/// and writes the chosen category through the [HistorySource] and
/// [CategoryWriter] ports.
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    dictionary: CategoryDictionary,
}

impl Categorizer {
    /// Create a categorizer that scores keywords with `dictionary`.
    pub fn new(dictionary: CategoryDictionary) -> Self {
        Self { dictionary }
    }

    /// Categorize the transaction described by `request` and save the result.
    ///
    /// The category is saved through `writer` at most once, and only when the
    /// result is not [UNCATEGORIZED].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::HistoryUnavailable] if `history` fails,
    /// - or [Error::CategoryCommitFailed] if a category was chosen but `writer` failed.
    pub fn categorize<H, W>(
        &self,
        request: &CategorizeRequest,
        history: &H,
        writer: &W,
    ) -> Result<Categorization, Error>
    where
        H: HistorySource + ?Sized,
        W: CategoryWriter + ?Sized,
    {
        let start_time = Instant::now();

        let samples = history
            .recent_categorized(&request.user_id, HISTORY_SAMPLE_LIMIT)
            .map_err(|error| Error::HistoryUnavailable(Box::new(error)))?;

        let categorization = self.resolve(
            request.description(),
            &samples,
            &request.existing_category_names,
        );

        if categorization.method != Method::None {
            writer
                .set_category(
                    &request.user_id,
                    request.transaction_id,
                    &categorization.category,
                )
                .map_err(|error| Error::CategoryCommitFailed {
                    category: categorization.category.clone(),
                    source: Box::new(error),
                })?;
        }

        tracing::info!(
            "Categorized transaction {} as \"{}\" using {:?} with confidence {} in {}us",
            request.transaction_id,
            categorization.category,
            categorization.method,
            categorization.confidence,
            start_time.elapsed().as_micros()
        );

        Ok(categorization)
    }

    /// Pick a category for `description` without saving anything.
    ///
    /// The result is always one of `existing_categories` (using the user's
    /// spelling) or [UNCATEGORIZED].
    pub fn resolve(
        &self,
        description: &str,
        samples: &[HistoricalSample],
        existing_categories: &[String],
    ) -> Categorization {
        if let Some(historical) = match_history(description, samples) {
            match reconcile_exact(&historical.category, existing_categories) {
                Some(category) => {
                    return Categorization {
                        category: category.to_owned(),
                        confidence: historical.confidence,
                        method: Method::Historical,
                    };
                }
                None => tracing::debug!(
                    "Historical category \"{}\" is not one of the user's categories, \
                    falling back to keywords",
                    historical.category
                ),
            }
        }

        let scores = score_dictionary(&self.dictionary, &normalize(description));

        let mut candidates: Vec<&CategoryScore> =
            scores.iter().filter(|score| score.exact_match).collect();
        candidates.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!("Keyword candidates for \"{description}\": {candidates:?}");

        let mut best: Option<(&str, u32)> = None;
        for candidate in &candidates {
            if let Some(category) = reconcile_exact(&candidate.category, existing_categories) {
                let boosted_score = candidate.score + RECONCILIATION_BONUS;

                if best.is_none_or(|(_, best_score)| boosted_score > best_score) {
                    best = Some((category, boosted_score));
                }
            }
        }

        if best.is_none() {
            best = candidates.first().and_then(|top| {
                reconcile_loose(&top.category, existing_categories)
                    .map(|category| (category, top.score))
            });
        }

        match best {
            Some((category, score)) => Categorization {
                category: category.to_owned(),
                confidence: (score.saturating_mul(CONFIDENCE_PER_POINT))
                    .min(MAX_KEYWORD_CONFIDENCE) as u8,
                method: Method::Keywords,
            },
            None => Categorization::uncategorized(),
        }
    }
}

/// Find the user's category with the same name as `candidate`, ignoring case
/// and accents.
fn reconcile_exact<'a>(candidate: &str, existing_categories: &'a [String]) -> Option<&'a str> {
    let candidate = normalize(candidate);
    if candidate.is_empty() {
        return None;
    }

    existing_categories
        .iter()
        .find(|name| normalize(name) == candidate)
        .map(String::as_str)
}

/// Find the first user category whose name shares whole words with
/// `candidate`: every word of the shorter name must be a word of the longer
/// one. Case and accents are ignored.
fn reconcile_loose<'a>(candidate: &str, existing_categories: &'a [String]) -> Option<&'a str> {
    let candidate = normalize(candidate);
    let candidate_tokens: Vec<&str> = tokens(&candidate).collect();
    if candidate_tokens.is_empty() {
        return None;
    }

    existing_categories
        .iter()
        .find(|name| {
            let name = normalize(name);
            let name_tokens: Vec<&str> = tokens(&name).collect();
            if name_tokens.is_empty() {
                return false;
            }

            let (shorter, longer) = if name_tokens.len() <= candidate_tokens.len() {
                (&name_tokens, &candidate_tokens)
            } else {
                (&candidate_tokens, &name_tokens)
            };

            shorter.iter().all(|token| longer.contains(token))
        })
        .map(String::as_str)
}

impl Categorization {
    /// The result when no confident match was found.
    pub fn uncategorized() -> Self {
        Self {
            category: UNCATEGORIZED.to_owned(),
            confidence: 0,
            method: Method::None,
        }
    }
}
