//! HTTP error responses.
//!
//! Every failure renders as `{"error": "<message>"}` with a status code.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_cms::CmsError;
use folio_core::ContentError;
use folio_sync::SyncError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(CmsError::Unauthorized.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<CmsError> for ApiError {
    fn from(err: CmsError) -> Self {
        let message = err.to_string();
        match err {
            CmsError::Content(_) | CmsError::InvalidInput(_) => ApiError::Unprocessable(message),
            CmsError::Connect(SyncError::InvalidConfig(_)) => ApiError::Unprocessable(message),
            CmsError::NoConnector => ApiError::BadRequest(message),
            CmsError::Connect(_) | CmsError::Relay(_) => ApiError::BadGateway(message),
            CmsError::InvalidCredentials | CmsError::Unauthorized => ApiError::Unauthorized(message),
            CmsError::RecoveryLocked(_) => ApiError::TooManyRequests(message),
            CmsError::Hashing(_) => ApiError::Internal(message),
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        ApiError::Unprocessable(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cms_error_status() {
        let cases = [
            (CmsError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (CmsError::invalid_input("short"), StatusCode::UNPROCESSABLE_ENTITY),
            (CmsError::NoConnector, StatusCode::BAD_REQUEST),
            (
                CmsError::RecoveryLocked(chrono::Utc::now()),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                CmsError::Connect(SyncError::transport("refused")),
                StatusCode::BAD_GATEWAY,
            ),
            (
                CmsError::Connect(SyncError::InvalidConfig(ContentError::invalid_remote_config("x"))),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_credentials_message_is_generic() {
        let err = ApiError::from(CmsError::InvalidCredentials);
        assert_eq!(err.to_string(), "Invalid credentials");
    }
}
