use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::ListingId;
use super::filters::FilterPatch;
use super::service::{ListingService, ListingServiceError};
use crate::session::{SessionToken, SessionUser};
use crate::storage::KeyValueStore;

/// Header carrying the token returned by `POST /api/v1/session`.
pub const SESSION_HEADER: &str = "x-session-token";

/// Router builder exposing search, detail, saved-listing, and session endpoints.
pub fn listing_router<S>(service: Arc<ListingService<S>>) -> Router
where
    S: KeyValueStore + 'static,
{
    Router::new()
        .route("/api/v1/listings/search", post(search_handler::<S>))
        .route("/api/v1/listings/:listing_id", get(detail_handler::<S>))
        .route(
            "/api/v1/saved",
            get(saved_handler::<S>).delete(clear_saved_handler::<S>),
        )
        .route(
            "/api/v1/saved/:listing_id/toggle",
            post(toggle_saved_handler::<S>),
        )
        .route(
            "/api/v1/session",
            get(session_handler::<S>)
                .post(sign_in_handler::<S>)
                .delete(logout_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn search_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    headers: HeaderMap,
    axum::Json(patch): axum::Json<FilterPatch>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let token = session_token(&headers);
    match service.search(&patch, token.as_ref()) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let token = session_token(&headers);
    match service.get(&ListingId(listing_id), token.as_ref()) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn saved_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let token = session_token(&headers);
    match service.saved(token.as_ref()) {
        Ok(listings) => {
            let payload = json!({
                "count": listings.len(),
                "listings": listings,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn toggle_saved_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let token = session_token(&headers);
    let id = ListingId(listing_id);
    match service.toggle_saved(&id, token.as_ref()) {
        Ok(saved) => {
            let payload = json!({
                "listing_id": id,
                "saved": saved,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn clear_saved_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let token = session_token(&headers);
    match service.clear_saved(token.as_ref()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let token = session_token(&headers);
    match service.current_user(token.as_ref()) {
        Ok(user) => {
            let payload = json!({
                "signed_in": user.is_some(),
                "user": user,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn sign_in_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    axum::Json(user): axum::Json<SessionUser>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.sign_in(user) {
        Ok(signed_in) => (StatusCode::OK, axum::Json(signed_in)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn logout_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let token = session_token(&headers);
    match service.logout(token.as_ref()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

/// A missing or malformed token means the caller is a guest.
fn session_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(SessionToken::parse)
}

fn error_response(err: ListingServiceError) -> Response {
    let status = match &err {
        ListingServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ListingServiceError::SignInRequired(_) => StatusCode::UNAUTHORIZED,
        ListingServiceError::Saved(_) | ListingServiceError::Session(_) => {
            warn!(error = %err, "listing request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
