//! The donation ledger: donation creation with an atomic raised-amount
//! update, and the enriched read queries over donation history.

mod core;
mod create;
mod endpoints;
mod query;
mod schema;

pub use core::{ANONYMOUS_DONOR, Donation, DonationInput, DonationStatus, create_donation_table};
pub use create::create_donation;
pub use endpoints::{
    create_donation_endpoint, get_all_donations_endpoint, get_donation_endpoint,
    get_donations_by_cause_endpoint, get_donations_by_user_endpoint, get_my_donations_endpoint,
    get_recent_donations_endpoint,
};
pub use query::{DEFAULT_RECENT_LIMIT, DonationFilter, get_donation, query_donations};
pub use schema::DonationSchema;
