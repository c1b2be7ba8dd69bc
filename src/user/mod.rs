//! User accounts: the data model, database queries and account endpoints.

mod core;
mod endpoints;

pub use core::{
    NewUser, ProfileInput, Role, User, create_user, create_user_table, get_user_by_email,
    get_user_by_id, update_user,
};
pub use endpoints::{get_me_endpoint, get_user_endpoint, register_endpoint, update_me_endpoint};
