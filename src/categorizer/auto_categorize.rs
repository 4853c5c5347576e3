use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    categorizer::{CategorizeRequest, CategorizeState, Categorizer, Method},
    category::get_category_names,
    database_id::UserId,
    transaction::get_uncategorized_transactions,
};

/// Result of categorizing a user's uncategorized transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoCategorizeResult {
    /// Always `true`, failures use the error body instead.
    pub success: bool,
    /// Number of uncategorized transactions that were looked at.
    pub processed: usize,
    /// Number of transactions that were given a category.
    pub categorized: usize,
}

impl AutoCategorizeResult {
    /// Creates a new empty result with zero transactions processed and zero categorized
    pub fn empty() -> Self {
        Self {
            success: true,
            processed: 0,
            categorized: 0,
        }
    }
}

/// A route handler for categorizing all of a user's uncategorized transactions.
pub async fn auto_categorize_endpoint(
    Path(user_id): Path<UserId>,
    State(state): State<CategorizeState>,
) -> Response {
    let start_time = std::time::Instant::now();

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match categorize_uncategorized_transactions(&user_id, &state.categorizer, &connection) {
        Ok(result) => {
            tracing::info!(
                "Auto-categorizing transactions for user {user_id} completed in {}ms: \
                {} transactions processed, {} categorized",
                start_time.elapsed().as_millis(),
                result.processed,
                result.categorized
            );

            (StatusCode::OK, Json(result)).into_response()
        }
        Err(error) => {
            tracing::error!(
                "Failed to auto-categorize transactions for user {user_id} after {}ms: {error}",
                start_time.elapsed().as_millis()
            );

            error.into_response()
        }
    }
}

/// Categorize every uncategorized transaction of `user_id`, oldest first,
/// using the user's stored category names.
///
/// All updates happen in a single database transaction: either every chosen
/// category is saved or none are. Each categorization sees the categories
/// saved before it.
///
/// # Errors
/// Returns an error if there are database errors during the operation.
pub fn categorize_uncategorized_transactions(
    user_id: &UserId,
    categorizer: &Categorizer,
    connection: &Connection,
) -> Result<AutoCategorizeResult, Error> {
    let category_names = get_category_names(user_id, connection)?;
    if category_names.is_empty() {
        return Ok(AutoCategorizeResult::empty());
    }

    let transactions = get_uncategorized_transactions(user_id, connection)?;
    if transactions.is_empty() {
        return Ok(AutoCategorizeResult::empty());
    }

    let db_transaction = connection.unchecked_transaction()?;
    let mut categorized = 0;

    for transaction in &transactions {
        let request = CategorizeRequest {
            transaction_id: transaction.id,
            description: Some(transaction.description.clone()),
            user_id: user_id.to_owned(),
            existing_category_names: category_names.clone(),
        };

        let categorization =
            categorizer.categorize(&request, &*db_transaction, &*db_transaction)?;

        if categorization.method != Method::None {
            categorized += 1;
        }
    }

    db_transaction.commit()?;

    Ok(AutoCategorizeResult {
        success: true,
        processed: transactions.len(),
        categorized,
    })
}

#[cfg(test)]
mod auto_categorize_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        categorizer::{CategorizeState, Categorizer, UNCATEGORIZED},
        category::{CategoryName, create_category},
        db::initialize,
        endpoints,
        transaction::{Transaction, create_transaction, get_transaction},
    };

    use super::{
        AutoCategorizeResult, auto_categorize_endpoint, categorize_uncategorized_transactions,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn create_categories(user_id: &str, names: &[&str], connection: &Connection) {
        for name in names {
            create_category(
                &user_id.to_owned(),
                CategoryName::new(name).unwrap(),
                connection,
            )
            .unwrap();
        }
    }

    #[test]
    fn no_categories_returns_zero_results() {
        let connection = get_test_db_connection();
        create_transaction(Transaction::build("user-1", -1.0, "uber"), &connection).unwrap();

        let result = categorize_uncategorized_transactions(
            &"user-1".to_owned(),
            &Categorizer::default(),
            &connection,
        )
        .unwrap();

        assert_eq!(result, AutoCategorizeResult::empty());
    }

    #[test]
    fn no_transactions_returns_zero_results() {
        let connection = get_test_db_connection();
        create_categories("user-1", &["Transporte"], &connection);

        let result = categorize_uncategorized_transactions(
            &"user-1".to_owned(),
            &Categorizer::default(),
            &connection,
        )
        .unwrap();

        assert_eq!(result, AutoCategorizeResult::empty());
    }

    #[test]
    fn categorizes_matching_transactions_only() {
        let connection = get_test_db_connection();
        create_categories("user-1", &["Transporte", "Comida"], &connection);
        let uber =
            create_transaction(Transaction::build("user-1", -1.0, "Uber centro"), &connection)
                .unwrap();
        let jumbo = create_transaction(
            Transaction::build("user-1", -1.0, "Compra en Jumbo"),
            &connection,
        )
        .unwrap();
        let unknown =
            create_transaction(Transaction::build("user-1", -1.0, "xqzv"), &connection).unwrap();
        let other_user =
            create_transaction(Transaction::build("user-2", -1.0, "Uber"), &connection).unwrap();

        let result = categorize_uncategorized_transactions(
            &"user-1".to_owned(),
            &Categorizer::default(),
            &connection,
        )
        .unwrap();

        assert_eq!(result.processed, 3);
        assert_eq!(result.categorized, 2);
        assert_eq!(get_transaction(uber.id, &connection).unwrap().category, "Transporte");
        assert_eq!(get_transaction(jumbo.id, &connection).unwrap().category, "Comida");
        assert_eq!(
            get_transaction(unknown.id, &connection).unwrap().category,
            UNCATEGORIZED
        );
        assert_eq!(
            get_transaction(other_user.id, &connection).unwrap().category,
            UNCATEGORIZED
        );
    }

    #[test]
    fn does_not_touch_categorized_transactions() {
        let connection = get_test_db_connection();
        create_categories("user-1", &["Transporte", "Viajes"], &connection);
        let transaction = create_transaction(
            Transaction::build("user-1", -1.0, "Uber").category("Viajes"),
            &connection,
        )
        .unwrap();

        let result = categorize_uncategorized_transactions(
            &"user-1".to_owned(),
            &Categorizer::default(),
            &connection,
        )
        .unwrap();

        assert_eq!(result.processed, 0);
        assert_eq!(get_transaction(transaction.id, &connection).unwrap().category, "Viajes");
    }

    #[tokio::test]
    async fn endpoint_returns_summary() {
        let connection = get_test_db_connection();
        create_categories("user-1", &["Transporte"], &connection);
        create_transaction(Transaction::build("user-1", -1.0, "taxi casa"), &connection).unwrap();
        let state = CategorizeState {
            db_connection: Arc::new(Mutex::new(connection)),
            categorizer: Arc::new(Categorizer::default()),
        };
        let app = Router::new()
            .route(
                endpoints::AUTO_CATEGORIZE_UNCATEGORIZED,
                post(auto_categorize_endpoint),
            )
            .with_state(state);
        let server = TestServer::new(app);

        let response = server
            .post(&endpoints::format_endpoint(
                endpoints::AUTO_CATEGORIZE_UNCATEGORIZED,
                "user-1",
            ))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<AutoCategorizeResult>(),
            AutoCategorizeResult {
                success: true,
                processed: 1,
                categorized: 1,
            }
        );
    }
}
