//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::log_in_endpoint,
    category::{
        create_category_endpoint, delete_category_endpoint, get_all_categories_endpoint,
        get_category_endpoint, update_category_endpoint,
    },
    cause::{
        create_cause_endpoint, delete_cause_endpoint, get_all_causes_endpoint, get_cause_endpoint,
        get_featured_causes_endpoint, update_cause_endpoint,
    },
    donation::{
        create_donation_endpoint, get_all_donations_endpoint, get_donation_endpoint,
        get_donations_by_cause_endpoint, get_donations_by_user_endpoint, get_my_donations_endpoint,
        get_recent_donations_endpoint,
    },
    user::{get_me_endpoint, get_user_endpoint, register_endpoint, update_me_endpoint},
};

/// The API's route paths.
pub mod endpoints {
    /// Create a new user account.
    pub const REGISTER: &str = "/api/users/register";
    /// Exchange credentials for a bearer token.
    pub const LOG_IN: &str = "/api/users/login";
    /// The signed-in user's account details.
    pub const ME: &str = "/api/users/me";
    /// A single user account.
    pub const USER: &str = "/api/users/{id}";
    /// The signed-in user's donation history.
    pub const MY_DONATIONS: &str = "/api/users/me/donations";
    /// A user's donation history.
    pub const USER_DONATIONS: &str = "/api/users/{id}/donations";
    /// The category collection.
    pub const CATEGORIES: &str = "/api/categories";
    /// A single category.
    pub const CATEGORY: &str = "/api/categories/{id}";
    /// The cause collection.
    pub const CAUSES: &str = "/api/causes";
    /// The causes highlighted on the home page.
    pub const FEATURED_CAUSES: &str = "/api/causes/featured";
    /// A single cause.
    pub const CAUSE: &str = "/api/causes/{id}";
    /// The donations made to a cause.
    pub const CAUSE_DONATIONS: &str = "/api/causes/{id}/donations";
    /// The donation collection.
    pub const DONATIONS: &str = "/api/donations";
    /// The most recently recorded donations.
    pub const RECENT_DONATIONS: &str = "/api/donations/recent";
    /// A single donation.
    pub const DONATION: &str = "/api/donations/{id}";
}

/// Return a router with all the app's routes.
///
/// Routes that mutate data (other than recording a donation) require a bearer
/// token, enforced by the [crate::auth::Claims] extractor in each handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::REGISTER, post(register_endpoint))
        .route(endpoints::LOG_IN, post(log_in_endpoint))
        .route(endpoints::ME, get(get_me_endpoint).put(update_me_endpoint))
        .route(endpoints::USER, get(get_user_endpoint))
        .route(endpoints::MY_DONATIONS, get(get_my_donations_endpoint))
        .route(endpoints::USER_DONATIONS, get(get_donations_by_user_endpoint))
        .route(
            endpoints::CATEGORIES,
            get(get_all_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::CAUSES,
            get(get_all_causes_endpoint).post(create_cause_endpoint),
        )
        .route(endpoints::FEATURED_CAUSES, get(get_featured_causes_endpoint))
        .route(
            endpoints::CAUSE,
            get(get_cause_endpoint)
                .put(update_cause_endpoint)
                .delete(delete_cause_endpoint),
        )
        .route(endpoints::CAUSE_DONATIONS, get(get_donations_by_cause_endpoint))
        .route(
            endpoints::DONATIONS,
            get(get_all_donations_endpoint).post(create_donation_endpoint),
        )
        .route(endpoints::RECENT_DONATIONS, get(get_recent_donations_endpoint))
        .route(endpoints::DONATION, get(get_donation_endpoint))
        .with_state(state)
}
