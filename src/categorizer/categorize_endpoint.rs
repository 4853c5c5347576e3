//! The JSON endpoint for categorizing a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    categorizer::{CategorizeRequest, Categorization, Categorizer, Method},
};

/// The state needed to categorize transactions.
#[derive(Debug, Clone)]
pub struct CategorizeState {
    /// The database connection holding the transactions and their history.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The categorizer loaded at start up.
    pub categorizer: Arc<Categorizer>,
}

impl FromRef<AppState> for CategorizeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            categorizer: state.categorizer.clone(),
        }
    }
}

/// The JSON body sent back after a successful categorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizeResponse {
    /// Always `true`, failures use the error body instead.
    pub success: bool,
    /// The chosen category or "uncategorized".
    pub category: String,
    /// Confidence from 0 to 95.
    pub confidence: u8,
    /// How the category was chosen.
    pub method: Method,
}

impl From<Categorization> for CategorizeResponse {
    fn from(categorization: Categorization) -> Self {
        Self {
            success: true,
            category: categorization.category,
            confidence: categorization.confidence,
            method: categorization.method,
        }
    }
}

/// A route handler for categorizing one transaction and saving its category.
pub async fn categorize_endpoint(
    State(state): State<CategorizeState>,
    payload: Result<Json<CategorizeRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match state
        .categorizer
        .categorize(&request, &*connection, &*connection)
    {
        Ok(categorization) => (
            StatusCode::OK,
            Json(CategorizeResponse::from(categorization)),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "Could not categorize transaction {}: {error}",
                request.transaction_id
            );
            error.into_response()
        }
    }
}
