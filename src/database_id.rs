//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// Database identifier for a user category.
pub type CategoryId = DatabaseId;

/// Identifier of the user that owns a transaction or category.
///
/// Users are managed by the authentication provider, so this is the
/// provider's opaque user ID rather than a local row ID.
pub type UserId = String;
