use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    category::{db::create_category, domain::CategoryName},
    database_id::UserId,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for creating a category.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryData {
    /// The name of the new category.
    pub name: String,
}

/// A route handler for creating a new category for a user.
pub async fn create_category_endpoint(
    Path(user_id): Path<UserId>,
    State(state): State<CreateCategoryState>,
    payload: Result<Json<CategoryData>, JsonRejection>,
) -> Response {
    let new_category = match payload {
        Ok(Json(new_category)) => new_category,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let name = match CategoryName::new(&new_category.name) {
        Ok(name) => name,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_category(&user_id, name, &connection) {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(error) => error.into_response(),
    }
}
