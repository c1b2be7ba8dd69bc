//! Defines the core data model for donations.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::database_id::{CauseId, DonationId, UserId};

/// The display name used when a donation has no attributable account or the
/// donor chose to stay anonymous.
pub const ANONYMOUS_DONOR: &str = "Anonymous";

/// The settlement status of a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    /// Recorded but awaiting external payment confirmation.
    Pending,
    /// Confirmed by the external payment flow.
    Completed,
    /// Rejected by the external payment flow. Failed donations do not count
    /// towards a cause's raised amount.
    Failed,
}

impl DonationStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Completed => "completed",
            DonationStatus::Failed => "failed",
        }
    }

    pub(crate) fn from_str_or_default(text: &str) -> Self {
        match text {
            "completed" => DonationStatus::Completed,
            "failed" => DonationStatus::Failed,
            _ => DonationStatus::Pending,
        }
    }
}

/// A recorded donation, enriched with the display fields the read queries
/// join in from the cause and user tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    /// The ID of the donation.
    pub id: DonationId,
    /// The account the donation is attributed to, if any.
    ///
    /// `None` means the donation has no attributable account at all, which is
    /// distinct from `is_anonymous`: that flag only controls whether an
    /// attributed donor's name is shown.
    pub user_id: Option<UserId>,
    /// The cause the donation was made to.
    pub cause_id: CauseId,
    /// The amount of money donated.
    pub amount: f64,
    /// Whether the donor chose to hide their name in donation listings.
    pub is_anonymous: bool,
    /// The settlement status of the donation.
    pub status: DonationStatus,
    /// Opaque correlation ID from an external payment provider, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Opaque hash from an external payment provider, if any. Added to the
    /// schema after the initial release; see [super::DonationSchema].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    /// When the donation was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the donation was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// The title of the cause, joined in by the read queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_title: Option<String>,
    /// The organization running the cause, joined in by the read queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_organization: Option<String>,
    /// The donor's display name, or [ANONYMOUS_DONOR] when the donation is
    /// anonymous or has no attributable account.
    pub user_name: String,
    /// The creation time formatted for display, e.g. "Jan 2, 2006".
    pub date: String,
}

/// The data needed to create a donation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationInput {
    /// The account to attribute the donation to. Left unset for donations
    /// made without an account; request handlers fill it in from the auth
    /// context when the caller is signed in.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// The cause to donate to.
    pub cause_id: CauseId,
    /// The amount to donate, must be positive.
    pub amount: f64,
    /// Whether to hide the donor's name in donation listings.
    #[serde(default)]
    pub is_anonymous: bool,
}

/// Create the donation table in the database.
///
/// The table is created in its original shape; the transaction_hash column is
/// added by the migration in [crate::db::initialize] so that databases
/// predating the column and fresh databases end up identical.
///
/// The cause reference is enforced with a foreign key. The user reference is
/// deliberately not: attribution is taken as-is from the caller.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_donation_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS donation (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                cause_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                is_anonymous INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'pending',
                transaction_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(cause_id) REFERENCES cause(id)
                )",
        (),
    )?;

    // Covers the by-cause listing and the aggregate consistency checks.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_donation_cause_created
             ON donation(cause_id, created_at);",
        (),
    )?;

    Ok(())
}
