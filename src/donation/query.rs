//! The enrichment query that reconstructs donation history.
//!
//! Every read path shares one join (donation ⟕ cause ⟕ user) parameterized
//! by a filter, rather than duplicating the join per operation. The left
//! joins matter: a donation without an attached user must still appear in
//! listings.

use rusqlite::{Connection, Row};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    database_id::{CauseId, DonationId, UserId},
};

use super::{
    core::{ANONYMOUS_DONOR, Donation, DonationStatus},
    schema::DonationSchema,
};

/// How many donations a recent-donations query returns when the caller does
/// not ask for a specific count.
pub const DEFAULT_RECENT_LIMIT: i64 = 5;

/// Display format for donation dates, e.g. "Jan 2, 2006".
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// Selects which donations an enrichment query returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DonationFilter {
    /// The single donation with the given ID.
    ById(DonationId),
    /// All donations to the given cause.
    ByCause(CauseId),
    /// All donations attributed to the given user.
    ByUser(UserId),
    /// The most recent donations, capped at the given count. Non-positive
    /// counts silently fall back to [DEFAULT_RECENT_LIMIT].
    Recent(i64),
    /// Every donation.
    All,
}

/// Retrieve donations matching `filter`, most recent first, enriched with the
/// cause title and organization and the donor's display name.
///
/// The display name reads [ANONYMOUS_DONOR] whenever the donation is marked
/// anonymous or has no attached account; the underlying identity never leaks
/// through the display field.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn query_donations(
    filter: DonationFilter,
    schema: DonationSchema,
    connection: &Connection,
) -> Result<Vec<Donation>, Error> {
    // Selecting NULL in place of the column keeps one row shape for both
    // schema generations.
    let hash_column = if schema.has_transaction_hash {
        "d.transaction_hash"
    } else {
        "NULL"
    };

    let (where_clause, limit_clause, params): (&str, &str, Vec<i64>) = match filter {
        DonationFilter::ById(id) => ("WHERE d.id = ?1", "", vec![id]),
        DonationFilter::ByCause(cause_id) => ("WHERE d.cause_id = ?1", "", vec![cause_id]),
        DonationFilter::ByUser(user_id) => ("WHERE d.user_id = ?1", "", vec![user_id]),
        DonationFilter::Recent(limit) => (
            "",
            "LIMIT ?1",
            vec![if limit <= 0 { DEFAULT_RECENT_LIMIT } else { limit }],
        ),
        DonationFilter::All => ("", "", Vec::new()),
    };

    // Sort by creation time, and then ID so donations recorded in the same
    // instant keep a stable order.
    let query = format!(
        "SELECT d.id, d.user_id, d.cause_id, d.amount, d.is_anonymous, d.status,
             d.transaction_id, {hash_column}, d.created_at, d.updated_at,
             c.title, c.organization, u.name
         FROM donation d
         LEFT JOIN cause c ON d.cause_id = c.id
         LEFT JOIN user u ON d.user_id = u.id
         {where_clause}
         ORDER BY d.created_at DESC, d.id DESC
         {limit_clause}"
    );

    connection
        .prepare(&query)?
        .query_map(rusqlite::params_from_iter(params), map_donation_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Retrieve a single donation by its `id`, enriched like [query_donations].
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an existing donation,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_donation(
    id: DonationId,
    schema: DonationSchema,
    connection: &Connection,
) -> Result<Donation, Error> {
    query_donations(DonationFilter::ById(id), schema, connection)?
        .into_iter()
        .next()
        .ok_or(Error::NotFound)
}

fn map_donation_row(row: &Row) -> Result<Donation, rusqlite::Error> {
    let is_anonymous: bool = row.get(4)?;
    let status_text: String = row.get(5)?;
    let created_at: OffsetDateTime = row.get(8)?;

    let user_name = match (is_anonymous, row.get::<_, Option<String>>(12)?) {
        (false, Some(name)) => name,
        _ => ANONYMOUS_DONOR.to_owned(),
    };

    Ok(Donation {
        id: row.get(0)?,
        user_id: row.get(1)?,
        cause_id: row.get(2)?,
        amount: row.get(3)?,
        is_anonymous,
        status: DonationStatus::from_str_or_default(&status_text),
        transaction_id: row.get(6)?,
        transaction_hash: row.get(7)?,
        created_at,
        updated_at: row.get(9)?,
        cause_title: row.get(10)?,
        cause_organization: row.get(11)?,
        user_name,
        date: created_at.format(DISPLAY_DATE_FORMAT).unwrap_or_default(),
    })
}
