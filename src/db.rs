//! Database initialization for the application's tables.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, category::create_category_table, transaction::create_transaction_table};

/// Create the category and transaction tables if they do not exist.
///
/// The tables are created inside a single exclusive transaction, so either
/// all of them exist afterwards or none of the changes are kept.
///
/// # Errors
/// Returns an error if a table could not be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
