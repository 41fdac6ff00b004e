//! Password recovery routes
//!
//! These work without a session. The code itself is delivered out of band.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use folio_cms::RecoveryTicket;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::view::WriteResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRequested {
    pub expires_at: DateTime<Utc>,
}

/// POST /api/admin/recovery/request
pub async fn request(State(state): State<AppState>) -> ApiResult<Json<RecoveryRequested>> {
    let expires_at = state.auth.request_recovery().await?;
    Ok(Json(RecoveryRequested { expires_at }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct Verified {
    pub ticket: RecoveryTicket,
}

/// POST /api/admin/recovery/verify
pub async fn verify(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VerifyRequest>,
) -> ApiResult<Json<Verified>> {
    let ticket = state.auth.verify_recovery(&req.code).await?;
    Ok(Json(Verified { ticket }))
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub ticket: RecoveryTicket,
    pub username: String,
    pub password: String,
}

/// POST /api/admin/recovery/complete
pub async fn complete(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CompleteRequest>,
) -> ApiResult<Json<WriteResponse>> {
    let outcome = state
        .auth
        .complete_recovery(&req.ticket, &req.username, &req.password)
        .await?;
    Ok(Json(outcome.into()))
}
