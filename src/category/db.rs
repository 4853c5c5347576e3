use rusqlite::Connection;

use crate::{
    Error,
    category::domain::{Category, CategoryName},
    database_id::UserId,
};

/// Create a category for a user in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if the user already has a category called `name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    user_id: &UserId,
    name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (user_id, name) VALUES (?1, ?2);",
            (user_id, name.as_ref()),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        user_id: user_id.to_owned(),
        name,
    })
}

/// Retrieve the names of the user's categories in the order they were created.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_category_names(user_id: &UserId, connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare("SELECT name FROM category WHERE user_id = :user_id ORDER BY id;")?
        .query_map(&[(":user_id", user_id)], |row| row.get(0))?
        .map(|maybe_name| maybe_name.map_err(|error| error.into()))
        .collect()
}

/// Create the category table in the database.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                UNIQUE(user_id, name)
            );",
        (),
    )?;

    Ok(())
}
