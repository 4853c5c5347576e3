//! Finanzas is a personal finance tracker.
//!
//! This library provides the transaction categorizer and the JSON API that
//! serves it. New transactions are matched against the user's categorization
//! history first and a keyword dictionary second, and the winning category is
//! written back to the transaction.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod categorizer;
mod category;
mod database_id;
mod db;
mod dictionary;
mod endpoints;
mod logging;
mod normalize;
mod routing;
mod transaction;

pub use app_state::AppState;
pub use categorizer::{
    AutoCategorizeResult, CategorizeRequest, Categorization, Categorizer, CategoryScore,
    CategoryWriter, HISTORY_SAMPLE_LIMIT, HistoricalMatch, HistoricalSample, HistorySource, Method,
    UNCATEGORIZED, categorize_uncategorized_transactions, match_history, score_category,
    score_dictionary,
};
pub use category::{Category, CategoryName, create_category, get_category_names};
pub use database_id::{CategoryId, TransactionId, UserId};
pub use db::initialize as initialize_db;
pub use dictionary::CategoryDictionary;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use normalize::normalize;
pub use routing::build_router;
pub use transaction::{Transaction, TransactionBuilder, create_transaction, get_transaction};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user's categorization history could not be fetched.
    ///
    /// The categorizer does not fall back to "uncategorized" in this case,
    /// since that would report a confidence it never computed.
    #[error("could not fetch the categorization history: {0}")]
    HistoryUnavailable(#[source] Box<Error>),

    /// A category was chosen for the transaction but could not be saved.
    ///
    /// `category` holds the category that was determined so callers can tell
    /// the computation itself succeeded.
    #[error("determined the category \"{category}\" but could not save it: {source}")]
    CategoryCommitFailed {
        /// The category that the categorizer chose.
        category: String,
        /// Why saving the category failed.
        #[source]
        source: Box<Error>,
    },

    /// The category dictionary could not be read or was malformed.
    #[error("invalid category dictionary: {0}")]
    InvalidDictionary(String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The user already has a category with this name.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The JSON request body was missing, malformed or lacked required fields.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A request or response body could not be read.
    #[error("could not read the message body")]
    BodyReadError,
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent back when a request fails.
#[derive(Debug, Serialize)]
struct FailureBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound | Error::UpdateMissingTransaction => StatusCode::NOT_FOUND,
            Error::EmptyCategoryName
            | Error::DuplicateCategoryName(_)
            | Error::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Error::CategoryCommitFailed { source, .. } => source.status_code(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Error::SqlError(_) | Error::DatabaseLockError | Error::BodyReadError => {
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            Error::HistoryUnavailable(_) => {
                "Could not categorize: the transaction history is unavailable.".to_owned()
            }
            Error::CategoryCommitFailed { category, source } => {
                format!(
                    "Could not categorize: determined the category \"{category}\" but could not \
                    save it ({})",
                    source.client_message()
                )
            }
            error => error.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        let category = match &self {
            Error::CategoryCommitFailed { category, .. } => Some(category.clone()),
            _ => None,
        };

        let body = FailureBody {
            success: false,
            error: self.client_message(),
            category,
        };

        (status, Json(body)).into_response()
    }
}
