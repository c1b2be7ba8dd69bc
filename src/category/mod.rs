//! Categories that causes can be grouped under.

mod core;
mod endpoints;

pub use core::{
    Category, CategoryInput, create_category, create_category_table, delete_category,
    get_all_categories, get_category, update_category,
};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, get_all_categories_endpoint,
    get_category_endpoint, update_category_endpoint,
};
