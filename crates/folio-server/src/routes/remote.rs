//! Remote connection routes

use axum::{Json, extract::State, http::StatusCode};
use folio_cms::ConnectionStatus;
use folio_core::{ConnectionSource, RemoteConfig};

use crate::error::ApiResult;
use crate::extract::AdminSession;
use crate::state::AppState;

/// GET /api/admin/remote
pub async fn status(State(state): State<AppState>, _session: AdminSession) -> Json<ConnectionStatus> {
    Json(state.store.connection_status().await)
}

/// POST /api/admin/remote
///
/// The body is the parameter text as pasted by the operator. It is parsed
/// as strict JSON, connected, and remembered for later sessions.
pub async fn connect(
    State(state): State<AppState>,
    _session: AdminSession,
    body: String,
) -> ApiResult<Json<ConnectionStatus>> {
    let config = RemoteConfig::parse(&body)?;
    state.store.connect(config, ConnectionSource::Operator).await?;
    Ok(Json(state.store.connection_status().await))
}

/// DELETE /api/admin/remote
///
/// Disconnects and forgets operator-supplied parameters.
pub async fn disconnect(State(state): State<AppState>, _session: AdminSession) -> StatusCode {
    state.store.disconnect(true).await;
    StatusCode::NO_CONTENT
}
