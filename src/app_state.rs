//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, categorizer::Categorizer, db::initialize, dictionary::CategoryDictionary};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The categorizer shared by all requests.
    pub categorizer: Arc<Categorizer>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection and the
    /// keyword dictionary used for categorization.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, dictionary: CategoryDictionary) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            categorizer: Arc::new(Categorizer::new(dictionary)),
        })
    }
}
