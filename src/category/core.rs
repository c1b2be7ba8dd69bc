//! Defines the core data model and database queries for categories.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::CategoryId};

/// A grouping that causes can be filed under, e.g. "Education" or "Health".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The category's name, unique across categories.
    pub name: String,
    /// A text description of what belongs in the category.
    pub description: Option<String>,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the category was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The data needed to create or update a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInput {
    /// The category's name.
    pub name: String,
    /// A text description of what belongs in the category.
    #[serde(default)]
    pub description: Option<String>,
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create a new category in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(input: CategoryInput, connection: &Connection) -> Result<Category, Error> {
    let now = OffsetDateTime::now_utc();

    let category = connection
        .prepare(
            "INSERT INTO category (name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, description, created_at, updated_at",
        )?
        .query_one((input.name, input.description, now, now), map_category_row)?;

    Ok(category)
}

/// Retrieve a category from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an existing category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    let category = connection
        .prepare(
            "SELECT id, name, description, created_at, updated_at FROM category WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_category_row)?;

    Ok(category)
}

/// Retrieve all categories, most recently created first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, description, created_at, updated_at FROM category
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map([], map_category_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Update the category with the given `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an existing category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    id: CategoryId,
    input: CategoryInput,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
        (input.name, input.description, OffsetDateTime::now_utc(), id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_category(id, connection)
}

/// Delete the category with the given `id`.
///
/// Causes filed under the category keep existing with their category cleared.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an existing category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
