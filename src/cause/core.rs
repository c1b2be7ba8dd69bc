//! Defines the core data model and database queries for causes.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{CategoryId, CauseId},
};

/// A fundraising campaign with a monetary goal and a running raised total.
///
/// The `raised_amount` field is a cached aggregate: it always equals the sum
/// of the amounts of all non-failed donations referencing the cause. It is
/// only ever written by [crate::donation::create_donation] through
/// [super::increase_raised_amount], inside the same database transaction as
/// the donation insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cause {
    /// The ID of the cause.
    pub id: CauseId,
    /// The cause's headline title.
    pub title: String,
    /// The organization running the cause.
    pub organization: String,
    /// A text description of what the cause is raising money for.
    pub description: String,
    /// A URL for the cause's cover image.
    pub image_url: String,
    /// The total raised so far across all non-failed donations.
    pub raised_amount: f64,
    /// The fundraising target.
    pub goal_amount: f64,
    /// The ID of the category the cause is filed under, if any.
    pub category_id: Option<CategoryId>,
    /// Whether the cause is highlighted on the landing page.
    pub featured: bool,
    /// When the cause was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the cause was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// The name of the cause's category, populated by list queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

/// The data needed to create or update a cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseInput {
    /// The cause's headline title.
    pub title: String,
    /// The organization running the cause.
    pub organization: String,
    /// A text description of what the cause is raising money for.
    pub description: String,
    /// A URL for the cause's cover image.
    pub image_url: String,
    /// The fundraising target, must be positive.
    pub goal_amount: f64,
    /// The ID of the category to file the cause under, if any.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Whether the cause is highlighted on the landing page.
    #[serde(default)]
    pub featured: bool,
}

/// Create the cause table in the database.
///
/// The check constraint keeps the raised-amount aggregate from ever dropping
/// below zero.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_cause_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS cause (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                organization TEXT NOT NULL,
                description TEXT NOT NULL,
                image_url TEXT NOT NULL,
                raised_amount REAL NOT NULL DEFAULT 0.0 CHECK (raised_amount >= 0.0),
                goal_amount REAL NOT NULL,
                category_id INTEGER,
                featured INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create a new cause in the database with a raised amount of zero.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the goal amount is zero or less,
/// - [Error::NotFound] if the category ID does not refer to an existing
///   category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_cause(input: CauseInput, connection: &Connection) -> Result<Cause, Error> {
    if input.goal_amount <= 0.0 {
        return Err(Error::NonPositiveAmount(input.goal_amount));
    }

    let now = OffsetDateTime::now_utc();

    let cause = connection
        .prepare(
            "INSERT INTO cause (title, organization, description, image_url, goal_amount,
                                category_id, featured, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING id, title, organization, description, image_url, raised_amount,
                 goal_amount, category_id, featured, created_at, updated_at",
        )?
        .query_one(
            (
                input.title,
                input.organization,
                input.description,
                input.image_url,
                input.goal_amount,
                input.category_id,
                input.featured,
                now,
                now,
            ),
            map_cause_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })?;

    Ok(cause)
}

/// Retrieve a cause from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an existing cause,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_cause(id: CauseId, connection: &Connection) -> Result<Cause, Error> {
    let cause = connection
        .prepare(
            "SELECT id, title, organization, description, image_url, raised_amount,
                 goal_amount, category_id, featured, created_at, updated_at
             FROM cause WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_cause_row)?;

    Ok(cause)
}

/// Retrieve all causes with their category names, most recently created first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_all_causes(connection: &Connection) -> Result<Vec<Cause>, Error> {
    query_causes("", connection)
}

/// Retrieve the featured causes with their category names, most recently
/// created first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_featured_causes(connection: &Connection) -> Result<Vec<Cause>, Error> {
    query_causes("WHERE c.featured = 1", connection)
}

fn query_causes(where_clause: &str, connection: &Connection) -> Result<Vec<Cause>, Error> {
    let query = format!(
        "SELECT c.id, c.title, c.organization, c.description, c.image_url, c.raised_amount,
             c.goal_amount, c.category_id, c.featured, c.created_at, c.updated_at,
             cat.name
         FROM cause c
         LEFT JOIN category cat ON c.category_id = cat.id
         {where_clause}
         ORDER BY c.created_at DESC, c.id DESC"
    );

    connection
        .prepare(&query)?
        .query_map([], |row| {
            let mut cause = map_cause_row(row)?;
            cause.category_name = row.get(11)?;

            Ok(cause)
        })?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Update the cause with the given `id`.
///
/// The raised amount is deliberately not touched here; it only moves with
/// donations.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the goal amount is zero or less,
/// - [Error::NotFound] if `id` does not refer to an existing cause,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_cause(
    id: CauseId,
    input: CauseInput,
    connection: &Connection,
) -> Result<Cause, Error> {
    if input.goal_amount <= 0.0 {
        return Err(Error::NonPositiveAmount(input.goal_amount));
    }

    let rows_affected = connection.execute(
        "UPDATE cause SET title = ?1, organization = ?2, description = ?3, image_url = ?4,
             goal_amount = ?5, category_id = ?6, featured = ?7, updated_at = ?8
         WHERE id = ?9",
        (
            input.title,
            input.organization,
            input.description,
            input.image_url,
            input.goal_amount,
            input.category_id,
            input.featured,
            OffsetDateTime::now_utc(),
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_cause(id, connection)
}

/// Delete the cause with the given `id`.
///
/// Fails if any donations reference the cause, since deleting it would orphan
/// the ledger rows backing its raised amount.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an existing cause,
/// - or [Error::SqlError] if there is some other SQL error, including the
///   foreign key violation raised when donations still reference the cause.
pub fn delete_cause(id: CauseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM cause WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

pub(crate) fn map_cause_row(row: &Row) -> Result<Cause, rusqlite::Error> {
    Ok(Cause {
        id: row.get(0)?,
        title: row.get(1)?,
        organization: row.get(2)?,
        description: row.get(3)?,
        image_url: row.get(4)?,
        raised_amount: row.get(5)?,
        goal_amount: row.get(6)?,
        category_id: row.get(7)?,
        featured: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        category_name: None,
    })
}
