//! Defines the core data model and database queries for user accounts.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::UserId};

/// The role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular account that can record donations.
    User,
    /// An account that can also manage categories and causes.
    Admin,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    fn from_str_or_default(text: &str) -> Self {
        match text {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The ID of the user.
    pub id: UserId,
    /// The user's display name, shown next to attributed donations.
    pub name: String,
    /// The user's email address, unique across accounts.
    pub email: String,
    /// The bcrypt hash of the user's password.
    ///
    /// Never serialized into responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// The role assigned to the account.
    pub role: Role,
    /// When the account was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the account was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The editable fields of a user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    /// The new display name for the account.
    pub name: String,
}

/// The data needed to insert a new user account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The bcrypt hash of the user's password.
    pub password_hash: String,
    /// The role assigned to the account.
    pub role: Role,
}

/// Create the user table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create a new user account in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateEmail] if a user with the same email already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let now = OffsetDateTime::now_utc();

    let user = connection
        .prepare(
            "INSERT INTO user (name, email, password_hash, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, name, email, password_hash, role, created_at, updated_at",
        )?
        .query_one(
            (
                new_user.name,
                new_user.email,
                new_user.password_hash,
                new_user.role.as_str(),
                now,
                now,
            ),
            map_user_row,
        )?;

    Ok(user)
}

/// Retrieve a user from the database by their `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_id(id: UserId, connection: &Connection) -> Result<User, Error> {
    let user = connection
        .prepare(
            "SELECT id, name, email, password_hash, role, created_at, updated_at
             FROM user WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_user_row)?;

    Ok(user)
}

/// Update the display name of the user with the given `id`.
///
/// Only the name is editable; email and role stay as registered.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_user(
    id: UserId,
    input: ProfileInput,
    connection: &Connection,
) -> Result<User, Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET name = ?1, updated_at = ?2 WHERE id = ?3",
        (input.name, OffsetDateTime::now_utc(), id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_user_by_id(id, connection)
}

/// Retrieve a user from the database by their `email`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `email` does not belong to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    let user = connection
        .prepare(
            "SELECT id, name, email, password_hash, role, created_at, updated_at
             FROM user WHERE email = :email",
        )?
        .query_one(&[(":email", &email)], map_user_row)?;

    Ok(user)
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let role_text: String = row.get(4)?;

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: Role::from_str_or_default(&role_text),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
