//! Application router configuration.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::{
    AppState, Error,
    categorizer::{auto_categorize_endpoint, categorize_endpoint},
    category::create_category_endpoint,
    endpoints,
    logging::logging_middleware,
    transaction::create_transaction_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::CATEGORIZE, post(categorize_endpoint))
        .route(
            endpoints::AUTO_CATEGORIZE_UNCATEGORIZED,
            post(auto_categorize_endpoint),
        )
        .route(endpoints::USER_CATEGORIES, post(create_category_endpoint))
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The JSON response for routes that do not exist.
async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
