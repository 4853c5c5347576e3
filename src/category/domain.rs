//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{CategoryId, UserId},
};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category a user files transactions under (e.g., 'Comida', 'Transporte').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The user that owns the category.
    pub user_id: UserId,
    /// The name shown to the user.
    pub name: CategoryName,
}
