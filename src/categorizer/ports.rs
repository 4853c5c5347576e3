//! The storage interfaces the categorizer depends on.

use crate::{
    Error,
    categorizer::HistoricalSample,
    database_id::{TransactionId, UserId},
};

/// Provides the categorized transactions a user has recorded so far.
pub trait HistorySource {
    /// Fetch up to `limit` of the user's most recent categorized transactions.
    ///
    /// Transactions still carrying the "uncategorized" sentinel are not part
    /// of the history.
    fn recent_categorized(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<HistoricalSample>, Error>;
}

/// Saves the category chosen for a transaction.
pub trait CategoryWriter {
    /// Set the category label of the transaction with `transaction_id`.
    ///
    /// Only a transaction owned by `user_id` may be updated. Any other
    /// transaction is treated as missing.
    fn set_category(
        &self,
        user_id: &UserId,
        transaction_id: TransactionId,
        category: &str,
    ) -> Result<(), Error>;
}
