//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    categorizer::{CategoryWriter, HistoricalSample, HistorySource, UNCATEGORIZED},
    database_id::{TransactionId, UserId},
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense, income or investment recorded by a user.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// The category label, [UNCATEGORIZED] until one is chosen.
    pub category: String,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(user_id: &str, amount: f64, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            user_id: user_id.to_owned(),
            amount,
            description: description.to_owned(),
            category: UNCATEGORIZED.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// New transactions are [UNCATEGORIZED] and timestamped with the current time
/// unless told otherwise.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user that recorded the transaction.
    pub user_id: UserId,

    /// The monetary amount of the transaction.
    ///
    /// Positive values represent income, negative values represent expenses.
    pub amount: f64,

    /// A human-readable description of the transaction, either typed by the
    /// user or taken from a bank notification email, e.g.:
    /// - `"Compra en Jumbo supermercado"`
    /// - `"UBER *TRIP HELP.UBER.COM"`
    pub description: String,

    /// The category label of the transaction.
    pub category: String,

    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

impl TransactionBuilder {
    /// Set the category label for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the time the transaction was recorded.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, description, amount, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, description, amount, category, created_at",
        )?
        .query_row(
            (
                builder.user_id,
                builder.description,
                builder.amount,
                builder.category,
                builder.created_at.to_offset(UtcOffset::UTC),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, description, amount, category, created_at
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve the user's transactions that are still [UNCATEGORIZED], oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_uncategorized_transactions(
    user_id: &UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, amount, category, created_at
             FROM \"transaction\"
             WHERE user_id = ?1 AND category = ?2
             ORDER BY created_at ASC, id ASC",
        )?
        .query_map((user_id, UNCATEGORIZED), map_transaction_row)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Retrieve up to `limit` of the user's categorized transactions, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_recent_categorized(
    user_id: &UserId,
    limit: usize,
    connection: &Connection,
) -> Result<Vec<HistoricalSample>, Error> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    connection
        .prepare(
            "SELECT category, description
             FROM \"transaction\"
             WHERE user_id = ?1 AND category != ?2
             ORDER BY created_at DESC, id DESC
             LIMIT ?3",
        )?
        .query_map((user_id, UNCATEGORIZED, limit), |row| {
            Ok(HistoricalSample {
                category: row.get(0)?,
                description: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Set the category label of a transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction of `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn set_transaction_category(
    id: TransactionId,
    user_id: &UserId,
    category: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET category = ?1 WHERE id = ?2 AND user_id = ?3",
        (category, id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL DEFAULT 'uncategorized',
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Used by the history lookup and the uncategorized listing.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_category_date
         ON \"transaction\"(user_id, category, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let description = row.get(2)?;
    let amount = row.get(3)?;
    let category = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Transaction {
        id,
        user_id,
        description,
        amount,
        category,
        created_at,
    })
}

// ============================================================================
// CATEGORIZER PORTS
// ============================================================================

impl HistorySource for Connection {
    fn recent_categorized(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<HistoricalSample>, Error> {
        get_recent_categorized(user_id, limit, self)
    }
}

impl CategoryWriter for Connection {
    fn set_category(
        &self,
        user_id: &UserId,
        transaction_id: TransactionId,
        category: &str,
    ) -> Result<(), Error> {
        set_transaction_category(transaction_id, user_id, category, self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
