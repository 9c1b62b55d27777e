//! Event listing endpoint

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use evdir_core::{EventListing, EventQuery, EventQueryParams};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/events", get(list_events))
}

/// GET /events - Filter, sort and paginate the event directory
///
/// Query pairs are taken raw so that no parameter value can make the request
/// fail; anything unrecognized is dropped by `EventQuery`.
async fn list_events(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<EventListing>, AppError> {
    let params = EventQueryParams::from_pairs(pairs);
    let query = EventQuery::from_params(&params, state.query_defaults());

    let events = state.events().await?;
    let listing = query.run(events);

    tracing::debug!(
        total = listing.total,
        returned = listing.data.len(),
        "Listed events"
    );

    Ok(Json(listing))
}
