//! Admin session and editing routes

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use folio_core::{
    AboutPatch, ContentPatch, EntryKind, Post, Service, SiteContent, TeamMember, new_entry_id,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{AdminSession, ApiJson};
use crate::state::AppState;
use crate::view::{WriteResponse, redacted};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<folio_cms::Session>> {
    let session = state.auth.login(&req.username, &req.password).await?;
    Ok(Json(session))
}

/// POST /api/admin/logout
pub async fn logout(State(state): State<AppState>, session: AdminSession) -> StatusCode {
    state.auth.logout(&session.token);
    StatusCode::NO_CONTENT
}

/// GET /api/admin/content
pub async fn content(State(state): State<AppState>, _session: AdminSession) -> Json<SiteContent> {
    let content = state.store.snapshot().await;
    Json(redacted(&content))
}

/// PATCH /api/admin/content
///
/// Credentials are excluded here so a password can only be set hashed.
pub async fn update_content(
    State(state): State<AppState>,
    _session: AdminSession,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<WriteResponse>> {
    let patch = ContentPatch::decode_strict(body)?;
    if patch.credentials.is_some() {
        return Err(ApiError::Unprocessable(
            "credentials are changed through /api/admin/credentials".to_string(),
        ));
    }
    let outcome = state.store.update(patch).await;
    Ok(Json(outcome.into()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetRequest {
    pub confirm: bool,
}

/// POST /api/admin/reset
pub async fn reset(
    State(state): State<AppState>,
    _session: AdminSession,
    ApiJson(req): ApiJson<ResetRequest>,
) -> ApiResult<Json<WriteResponse>> {
    if !req.confirm {
        return Err(ApiError::BadRequest(
            "reset replaces all content with defaults; send {\"confirm\": true}".to_string(),
        ));
    }
    info!("Admin requested reset");
    Ok(Json(state.store.reset().await.into()))
}

#[derive(Debug, Serialize)]
pub struct EntryCreated {
    pub id: String,
    #[serde(flatten)]
    pub write: WriteResponse,
}

/// POST /api/admin/entries/{list}
///
/// Appends an entry to `executives`, `cas`, `services` or `posts` under a
/// freshly minted id. Any `id` in the body is replaced.
pub async fn create_entry(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(list): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<(StatusCode, Json<EntryCreated>)> {
    let kind = EntryKind::from_list_name(&list)
        .ok_or_else(|| ApiError::NotFound(format!("unknown list `{list}`")))?;
    let Value::Object(mut fields) = body else {
        return Err(ApiError::Unprocessable("entry must be a JSON object".to_string()));
    };

    let id = new_entry_id(kind);
    fields.insert("id".to_string(), Value::String(id.clone()));
    let entry = Value::Object(fields);

    // The list is read and replaced under the store's write lock.
    let outcome = state
        .store
        .update_with(|current| append_entry(current, kind, entry))
        .await?;
    info!(list = kind.list_name(), %id, "Created list entry");
    Ok((
        StatusCode::CREATED,
        Json(EntryCreated {
            id,
            write: outcome.into(),
        }),
    ))
}

fn append_entry(current: &SiteContent, kind: EntryKind, entry: Value) -> ApiResult<ContentPatch> {
    Ok(match kind {
        EntryKind::Executive => {
            let mut executives = current.about.executives.clone();
            executives.push(decode_entry::<TeamMember>(kind, entry)?);
            about_patch(AboutPatch {
                executives: Some(executives),
                ..AboutPatch::default()
            })
        }
        EntryKind::CharteredAccountant => {
            let mut cas = current.about.cas.clone();
            cas.push(decode_entry::<TeamMember>(kind, entry)?);
            about_patch(AboutPatch {
                cas: Some(cas),
                ..AboutPatch::default()
            })
        }
        EntryKind::Service => {
            let mut services = current.services.clone();
            services.push(decode_entry::<Service>(kind, entry)?);
            ContentPatch {
                services: Some(services),
                ..ContentPatch::default()
            }
        }
        EntryKind::Post => {
            let mut posts = current.posts.clone();
            posts.push(decode_entry::<Post>(kind, entry)?);
            ContentPatch {
                posts: Some(posts),
                ..ContentPatch::default()
            }
        }
    })
}

fn decode_entry<T: serde::de::DeserializeOwned>(kind: EntryKind, entry: Value) -> ApiResult<T> {
    serde_json::from_value(entry)
        .map_err(|e| ApiError::Unprocessable(format!("invalid {} entry: {e}", kind.list_name())))
}

fn about_patch(about: AboutPatch) -> ContentPatch {
    ContentPatch {
        about: Some(about),
        ..ContentPatch::default()
    }
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// PUT /api/admin/credentials
pub async fn change_credentials(
    State(state): State<AppState>,
    _session: AdminSession,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> ApiResult<Json<WriteResponse>> {
    let outcome = state
        .auth
        .change_credentials(&req.username, &req.password)
        .await?;
    Ok(Json(outcome.into()))
}
