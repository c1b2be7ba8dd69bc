//! Database initialization and schema migration helpers.

use rusqlite::Connection;

use crate::{
    Error, category::create_category_table, cause::create_cause_table,
    donation::create_donation_table, user::create_user_table,
};

/// Create the application's tables and bring an existing database up to the
/// current schema.
///
/// This function is idempotent and safe to call on every server start.
///
/// # Errors
/// Returns an [Error::SqlError] if a table cannot be created or a migration
/// fails.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Foreign keys are off by default in SQLite.
    connection.pragma_update(None, "foreign_keys", true)?;

    create_user_table(connection)?;
    create_category_table(connection)?;
    create_cause_table(connection)?;
    create_donation_table(connection)?;

    // The transaction_hash column was added to the donation table after the
    // initial release. Databases created before then are migrated in place so
    // the read paths can assume the latest schema.
    if !column_exists(connection, "donation", "transaction_hash")? {
        connection.execute("ALTER TABLE donation ADD COLUMN transaction_hash TEXT", ())?;
    }

    Ok(())
}

/// Check the SQLite catalog for the presence of `column` on `table`.
///
/// # Errors
/// Returns an [Error::SqlError] if the table info query fails.
pub fn column_exists(connection: &Connection, table: &str, column: &str) -> Result<bool, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        (table, column),
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{column_exists, initialize};

    #[test]
    fn initialize_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("Could not initialize database");

        for table in ["user", "category", "cause", "donation"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "table {table} was not created");
        }
    }

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("Could not initialize database");
        initialize(&conn).expect("Second initialize failed");
    }

    #[test]
    fn initialize_adds_transaction_hash_column() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();

        assert!(column_exists(&conn, "donation", "transaction_hash").unwrap());
    }

    #[test]
    fn column_exists_reports_missing_column() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        assert!(!column_exists(&conn, "donation", "no_such_column").unwrap());
    }
}
