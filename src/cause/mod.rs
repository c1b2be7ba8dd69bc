//! Fundraising causes and the raised-amount aggregate.

mod aggregate;
mod core;
mod endpoints;

pub use aggregate::increase_raised_amount;
pub use core::{
    Cause, CauseInput, create_cause, create_cause_table, delete_cause, get_all_causes, get_cause,
    get_featured_causes, update_cause,
};
pub use endpoints::{
    create_cause_endpoint, delete_cause_endpoint, get_all_causes_endpoint, get_cause_endpoint,
    get_featured_causes_endpoint, update_cause_endpoint,
};
