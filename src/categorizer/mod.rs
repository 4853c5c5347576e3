//! Automatic categorization of transactions.
//!
//! A transaction is categorized by:
//! - comparing its description with the user's recently categorized
//!   transactions ([history]),
//! - or, failing that, scoring it against the keyword dictionary ([keywords]),
//! - and finally mapping the result onto one of the user's own categories
//!   ([resolver]).

mod auto_categorize;
mod categorize_endpoint;
mod history;
mod keywords;
mod ports;
mod resolver;

use serde::{Deserialize, Serialize};

use crate::database_id::{TransactionId, UserId};

pub use auto_categorize::{
    AutoCategorizeResult, auto_categorize_endpoint, categorize_uncategorized_transactions,
};
pub use categorize_endpoint::{CategorizeState, categorize_endpoint};
pub use history::{HistoricalMatch, HistoricalSample, match_history};
pub use keywords::{CategoryScore, score_category, score_dictionary};
pub use ports::{CategoryWriter, HistorySource};
pub use resolver::Categorizer;

/// The category given to transactions that could not be categorized.
pub const UNCATEGORIZED: &str = "uncategorized";

/// The maximum number of historical samples considered per categorization.
pub const HISTORY_SAMPLE_LIMIT: usize = 100;

/// How the final category was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// The user's past transactions agreed on a category.
    Historical,
    /// The keyword dictionary matched one of the user's categories.
    Keywords,
    /// Nothing matched, the transaction is uncategorized.
    None,
}

/// The outcome of categorizing a single transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Categorization {
    /// One of the user's category names or [UNCATEGORIZED].
    pub category: String,
    /// Confidence from 0 to 95.
    pub confidence: u8,
    /// Which signal produced the category.
    pub method: Method,
}

/// A request to categorize one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeRequest {
    /// The transaction to save the category to.
    pub transaction_id: TransactionId,
    /// The transaction's description, missing descriptions are treated as empty.
    #[serde(default)]
    pub description: Option<String>,
    /// The owner of the transaction.
    pub user_id: UserId,
    /// The user's category names, in the order the user sees them.
    #[serde(default)]
    pub existing_category_names: Vec<String>,
}

impl CategorizeRequest {
    /// The description to categorize, empty if none was given.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}
