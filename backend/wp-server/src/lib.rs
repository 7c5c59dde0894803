pub mod api;
pub mod app_state;
pub mod backend;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    changes::{ChangesResponse, list_changes},
    error::{ApiError, ApiErrorBody, ApiErrorResponse, Result as ApiResult},
    extractors::session::{ACTOR_HEADER, Session, TENANT_HEADER},
    sync_query::{SyncQuery, parse_cursor},
    sync_stream::{envelope_event, ready_event, sync_stream, terminal_event},
};
pub use app_state::AppState;
pub use backend::build_backend;
pub use error::{Result as ServerResult, ServerError};

pub use crate::routes::build_router;
