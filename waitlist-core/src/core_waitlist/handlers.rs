//! HTTP handlers for the waitlist endpoints

use super::api::ADMIN_KEY_HEADER;
use super::error::{WaitlistError, WaitlistResult};
use super::state::AppState;
use super::types::*;
use crate::core_email::normalize;
use crate::core_store::{meta_key, JoinMetadata, WAITLIST_SET_KEY};
use crate::telemetry::{
    self, OperationTimer, JOINS_NEW, JOINS_REJECTED, JOINS_REPEAT, LIST_UNAUTHORIZED,
    METADATA_WRITE_FAILURES,
};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// POST /waitlist - Join the waitlist
///
/// Repeating a join for the same email is a success with
/// `alreadyJoined: true`, never an error. A body that cannot be read at all
/// (over the size limit, broken stream) is reported as invalid JSON.
pub async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> WaitlistResult<Json<JoinResponse>> {
    let body = body.map_err(|rejection| {
        debug!("Unreadable join body: {}", rejection);
        WaitlistError::InvalidJson
    })?;
    let request = JoinRequest::from_body(&body)?;

    let email = normalize(&request.email).map_err(|rejected| {
        telemetry::record_counter(JOINS_REJECTED);
        debug!("Rejected join: {}", rejected);
        WaitlistError::InvalidEmail(rejected)
    })?;

    let timer = OperationTimer::new("add_to_set");
    let added = state.store.add_to_set(WAITLIST_SET_KEY, email.as_str()).await?;
    timer.stop();

    if added {
        telemetry::record_counter(JOINS_NEW);
        debug!(%email, "New waitlist signup");

        // Membership is authoritative; a lost metadata record is tolerated.
        let metadata = JoinMetadata::now();
        if let Err(e) = state
            .store
            .write_metadata(&meta_key(&email), &metadata.to_fields())
            .await
        {
            telemetry::record_counter(METADATA_WRITE_FAILURES);
            warn!(%email, "Failed to write join metadata: {}", e);
        }
    } else {
        telemetry::record_counter(JOINS_REPEAT);
        debug!(%email, "Repeat waitlist signup");
    }

    Ok(Json(JoinResponse {
        ok: true,
        already_joined: !added,
    }))
}

/// GET /waitlist-count - Number of signups
pub async fn waitlist_count(
    State(state): State<Arc<AppState>>,
) -> WaitlistResult<Json<CountResponse>> {
    let timer = OperationTimer::new("set_cardinality");
    let count = state.store.set_cardinality(WAITLIST_SET_KEY).await?;
    timer.stop();

    Ok(Json(CountResponse { ok: true, count }))
}

/// GET /waitlist-list - Every signup, sorted ascending
pub async fn waitlist_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> WaitlistResult<Json<ListResponse>> {
    let presented = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if !state.is_admin(presented) {
        telemetry::record_counter(LIST_UNAUTHORIZED);
        return Err(WaitlistError::Unauthorized);
    }

    let timer = OperationTimer::new("set_members");
    let mut emails = state.store.set_members(WAITLIST_SET_KEY).await?;
    timer.stop();

    emails.sort_unstable();

    Ok(Json(ListResponse { ok: true, emails }))
}

/// Fallback for any verb a route does not serve
pub async fn method_not_allowed() -> WaitlistError {
    WaitlistError::MethodNotAllowed
}
