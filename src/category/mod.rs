//! The categories a user files transactions under.
//!
//! The categorizer only ever assigns one of these names (or "uncategorized").

mod create_category_endpoint;
mod db;
mod domain;

pub use create_category_endpoint::create_category_endpoint;
pub use db::{create_category, create_category_table, get_category_names};
pub use domain::{Category, CategoryName};
