//! Capability detection for the donation table.

use rusqlite::Connection;

use crate::{Error, db::column_exists};

/// The shape of the donation table, probed once at startup.
///
/// The transaction_hash column was added after the initial release, so a
/// server can find itself pointed at a database that predates it (e.g. during
/// a rolling migration). Rather than probing the catalog on every query, the
/// capability is detected here once and the read queries branch on the cached
/// flag. [crate::db::initialize] adds the column unconditionally, so this
/// only ever reports `false` for a database the server did not initialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationSchema {
    /// Whether the donation table has the transaction_hash column.
    pub has_transaction_hash: bool,
}

impl DonationSchema {
    /// Probe the database catalog for the donation table's capabilities.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the catalog query fails.
    pub fn detect(connection: &Connection) -> Result<Self, Error> {
        Ok(Self {
            has_transaction_hash: column_exists(connection, "donation", "transaction_hash")?,
        })
    }
}
