//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/users/{user_id}/categories', use [format_endpoint].

use std::fmt::Display;

/// The route for categorizing a single transaction.
pub const CATEGORIZE: &str = "/api/categorize";
/// The route for categorizing all of a user's uncategorized transactions.
pub const AUTO_CATEGORIZE_UNCATEGORIZED: &str = "/api/users/{user_id}/categorize";
/// The route to create a category for a user.
pub const USER_CATEGORIES: &str = "/api/users/{user_id}/categories";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
