//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    database_id::UserId,
    transaction::{Transaction, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for creating a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// The user recording the transaction.
    pub user_id: UserId,
    /// Text detailing the transaction, treated as empty when missing.
    #[serde(default)]
    pub description: Option<String>,
    /// The value of the transaction.
    pub amount: f64,
    /// An initial category, defaults to "uncategorized".
    #[serde(default)]
    pub category: Option<String>,
    /// When the transaction happened, defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A route handler for creating a new transaction, responds with the created transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Response {
    let new_transaction = match payload {
        Ok(Json(new_transaction)) => new_transaction,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let mut builder = Transaction::build(
        &new_transaction.user_id,
        new_transaction.amount,
        new_transaction.description.as_deref().unwrap_or_default(),
    );

    if let Some(category) = new_transaction
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
    {
        builder = builder.category(category);
    }

    if let Some(created_at) = new_transaction.created_at {
        builder = builder.created_at(created_at);
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_transaction(builder, &connection) {
        Ok(transaction) => {
            tracing::debug!("Created transaction {}", transaction.id);
            (StatusCode::CREATED, Json(transaction)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        categorizer::UNCATEGORIZED,
        db::initialize,
        endpoints,
        transaction::{Transaction, get_transaction},
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_test_server(state: CreateTransactionState) -> TestServer {
        let app = Router::new()
            .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn creates_uncategorized_transaction() {
        let state = get_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "userId": "user-1",
                "description": "Uber al aeropuerto",
                "amount": -12500.0,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction: Transaction = response.json();
        assert_eq!(transaction.category, UNCATEGORIZED);
        assert_eq!(transaction.user_id, "user-1");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transaction(transaction.id, &connection), Ok(transaction));
    }

    #[tokio::test]
    async fn missing_amount_gets_json_error() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({ "userId": "user-1" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn missing_description_is_empty() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "userId": "user-1",
                "amount": 100.0,
                "category": "Sueldo",
                "createdAt": "2025-10-05T09:30:00Z",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction: Transaction = response.json();
        assert_eq!(transaction.description, "");
        assert_eq!(transaction.category, "Sueldo");
    }
}
