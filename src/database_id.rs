//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a row in the user table.
pub type UserId = i64;
/// The ID of a row in the category table.
pub type CategoryId = i64;
/// The ID of a row in the cause table.
pub type CauseId = i64;
/// The ID of a row in the donation table.
pub type DonationId = i64;
