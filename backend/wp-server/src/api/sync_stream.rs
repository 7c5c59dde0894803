use crate::{ApiError, ApiResult, AppState, Session, SyncQuery, parse_cursor};

use wp_core::{Cursor, Envelope};
use wp_sync::{EnvelopeStream, SyncError};

use std::convert::Infallible;
use std::panic::Location;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::sse::{Event, KeepAlive, Sse},
};
use error_location::ErrorLocation;
use futures::{Stream, StreamExt, stream};
use serde_json::json;

const LAST_EVENT_ID: &str = "last-event-id";

pub const READY_EVENT: &str = "ready";
pub const ENVELOPE_EVENT: &str = "envelope";
pub const STALE_EVENT: &str = "stale";
pub const ERROR_EVENT: &str = "error";

/// GET /sync/stream?since=<cursor>
///
/// Server-sent events: a `ready` frame whose id is the starting cursor, then
/// catch-up after it, then live envelopes.
/// `Last-Event-ID` stands in for `since` when a browser reconnects on its own.
/// A stale cursor is reported as a single `stale` event before the stream
/// closes, so EventSource clients can read it.
pub async fn sync_stream(
    State(state): State<AppState>,
    Session(session): Session,
    Query(query): Query<SyncQuery>,
    headers: HeaderMap,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    query.check_tenant(&session)?;

    let since = match query.cursor()? {
        Some(cursor) => Some(cursor),
        None => parse_cursor(headers.get(LAST_EVENT_ID).and_then(|v| v.to_str().ok()))?,
    };

    let permit = state
        .stream_slots
        .clone()
        .try_acquire_owned()
        .map_err(|_| ApiError::Overloaded {
            message: "too many open streams".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let events = match state
        .server
        .subscribe(&session.tenant_id, &session.actor_id, since)
        .await
    {
        Ok(opened) => {
            log::info!(
                "SSE stream opened for actor {} in tenant {} (since {:?}, start {})",
                session.actor_id,
                session.tenant_id,
                since,
                opened.start
            );
            stream::once(async move { ready_event(opened.start) })
                .chain(envelope_events(opened.envelopes))
                .left_stream()
        }
        Err(e @ SyncError::StaleCursor { .. }) => {
            log::info!("SSE stream for tenant {} rejected: {}", session.tenant_id, e);
            stream::once(async move { terminal_event(&e) }).right_stream()
        }
        Err(e) => return Err(e.into()),
    };

    let shutdown = state.shutdown.subscribe_guard();
    // The permit is released when the response body is dropped
    let events = events.take_until(async move {
        let _permit = permit;
        let mut shutdown = shutdown;
        shutdown.wait().await;
    });

    let keep_alive = KeepAlive::new().interval(state.keep_alive);
    Ok(Sse::new(events.map(Ok::<Event, Infallible>)).keep_alive(keep_alive))
}

/// Envelopes become `envelope` events; the first error becomes the last event
fn envelope_events(envelopes: EnvelopeStream) -> impl Stream<Item = Event> + Send {
    stream::unfold(Some(envelopes), |state| async move {
        let mut envelopes = state?;
        match envelopes.next().await? {
            Ok(envelope) => match envelope_event(&envelope) {
                Ok(event) => Some((event, Some(envelopes))),
                Err(e) => Some((terminal_event(&e), None)),
            },
            Err(e) => {
                log::info!("SSE stream ended: {}", e);
                Some((terminal_event(&e), None))
            }
        }
    })
}

pub fn ready_event(start: Cursor) -> Event {
    Event::default()
        .event(READY_EVENT)
        .id(start.to_string())
        .data(json!({ "cursor": start }).to_string())
}

pub fn envelope_event(envelope: &Envelope) -> Result<Event, SyncError> {
    let data = serde_json::to_string(envelope)?;
    Ok(Event::default()
        .event(ENVELOPE_EVENT)
        .id(envelope.cursor().to_string())
        .data(data))
}

/// `stale` for a stale cursor, `error` for anything else
pub fn terminal_event(error: &SyncError) -> Event {
    match error {
        SyncError::StaleCursor { cursor, reason, .. } => {
            Event::default().event(STALE_EVENT).data(stale_data(*cursor, reason))
        }
        other => Event::default().event(ERROR_EVENT).data(
            json!({
                "code": other.error_code(),
                "message": client_message(other),
            })
            .to_string(),
        ),
    }
}

fn stale_data(cursor: Cursor, reason: &str) -> String {
    json!({
        "code": "STALE_CURSOR",
        "message": reason,
        "cursor": cursor,
    })
    .to_string()
}

/// Error text without source locations
fn client_message(error: &SyncError) -> String {
    match error {
        SyncError::BroadcastUnavailable { message, .. }
        | SyncError::Validation { message, .. }
        | SyncError::Internal { message, .. } => message.clone(),
        SyncError::StaleCursor { reason, .. } => reason.clone(),
        SyncError::TenantMismatch {
            expected, actual, ..
        } => format!("session tenant {} cannot access tenant {}", expected, actual),
        SyncError::Serialization { .. } => "envelope serialization failed".to_string(),
    }
}
