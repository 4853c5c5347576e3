//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying and categorizing transactions,
//!   including the SQLite implementation of the categorizer ports
//! - The JSON endpoint for creating transactions

mod core;
mod create_transaction_endpoint;

pub use core::{
    Transaction, TransactionBuilder, create_transaction, create_transaction_table,
    get_transaction, get_uncategorized_transactions,
};
pub use create_transaction_endpoint::create_transaction_endpoint;
