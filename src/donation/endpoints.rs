//! Route handlers for recording donations and browsing donation history.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{Claims, OptionalClaims},
    database_id::{CauseId, DonationId, UserId},
};

use super::{
    core::{Donation, DonationInput},
    create::create_donation,
    query::{DEFAULT_RECENT_LIMIT, DonationFilter, get_donation, query_donations},
};

/// A route handler for recording a new donation.
///
/// Works with or without authentication: when the caller is signed in and the
/// request body does not name a user, the donation is attributed to the
/// signed-in user. An explicit `user_id` in the body is left untouched.
pub async fn create_donation_endpoint(
    State(state): State<AppState>,
    OptionalClaims(claims): OptionalClaims,
    Json(mut input): Json<DonationInput>,
) -> Result<(StatusCode, Json<Donation>), Error> {
    if input.user_id.is_none() {
        input.user_id = claims.map(|claims| claims.sub);
    }

    let mut connection = state.lock_connection()?;

    create_donation(input, state.donation_schema, &mut connection)
        .map(|donation| (StatusCode::CREATED, Json(donation)))
}

/// A route handler for getting a donation by its database ID.
pub async fn get_donation_endpoint(
    State(state): State<AppState>,
    _claims: Claims,
    Path(donation_id): Path<DonationId>,
) -> Result<Json<Donation>, Error> {
    let connection = state.lock_connection()?;

    get_donation(donation_id, state.donation_schema, &connection).map(Json)
}

/// A route handler for listing every donation.
pub async fn get_all_donations_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<Donation>>, Error> {
    let connection = state.lock_connection()?;

    query_donations(DonationFilter::All, state.donation_schema, &connection).map(Json)
}

/// A route handler for listing the donations made to a cause.
pub async fn get_donations_by_cause_endpoint(
    State(state): State<AppState>,
    Path(cause_id): Path<CauseId>,
) -> Result<Json<Vec<Donation>>, Error> {
    let connection = state.lock_connection()?;

    query_donations(
        DonationFilter::ByCause(cause_id),
        state.donation_schema,
        &connection,
    )
    .map(Json)
}

/// A route handler for listing the donations attributed to a user.
pub async fn get_donations_by_user_endpoint(
    State(state): State<AppState>,
    _claims: Claims,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Donation>>, Error> {
    let connection = state.lock_connection()?;

    query_donations(
        DonationFilter::ByUser(user_id),
        state.donation_schema,
        &connection,
    )
    .map(Json)
}

/// A route handler for listing the signed-in user's donations.
pub async fn get_my_donations_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<Donation>>, Error> {
    let connection = state.lock_connection()?;

    query_donations(
        DonationFilter::ByUser(claims.sub),
        state.donation_schema,
        &connection,
    )
    .map(Json)
}

/// The query string parameters for the recent-donations listing.
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    /// How many donations to return, defaulting to [DEFAULT_RECENT_LIMIT].
    pub limit: Option<i64>,
}

/// A route handler for listing the most recent donations.
pub async fn get_recent_donations_endpoint(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Result<Json<Vec<Donation>>, Error> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let connection = state.lock_connection()?;

    query_donations(
        DonationFilter::Recent(limit),
        state.donation_schema,
        &connection,
    )
    .map(Json)
}
