//! The raised-amount aggregate update for causes.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{Error, database_id::CauseId};

/// Atomically add `amount` to the raised amount of the cause with the given
/// `id` and refresh its updated-at timestamp.
///
/// The increment is expressed as a relative update executed by the database,
/// never as a read-modify-write at the application layer, so concurrent
/// donations to the same cause cannot lose updates.
///
/// This function must only be called from inside the donation-creation
/// transaction ([crate::donation::create_donation]); a standalone call would
/// let the aggregate drift from the donation rows backing it.
///
/// # Errors
/// This function will return a:
/// - [Error::CauseNotFound] if `id` does not refer to an existing cause,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn increase_raised_amount(
    id: CauseId,
    amount: f64,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE cause SET raised_amount = raised_amount + ?1, updated_at = ?2 WHERE id = ?3",
        (amount, now, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::CauseNotFound(id));
    }

    Ok(())
}
