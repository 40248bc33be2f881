use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::{FormRejection, JsonRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::error::AuthError;

/// Application-level error type.
/// Implements `IntoResponse` so handlers can return `Result<T, AppError>`;
/// the body is always `{"detail": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

// Body-parsing failures answer 422 with the usual `detail` body.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

pub const UNAUTHORIZED_DETAIL: &str = "Could not validate credentials";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Validation(msg) => {
                debug!(detail = %msg, "request rejected");
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Auth(AuthError::DuplicateIdentity) => (
                StatusCode::BAD_REQUEST,
                "Email already registered".to_string(),
            ),
            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::BAD_REQUEST,
                "Incorrect email or password".to_string(),
            ),
            AppError::Auth(
                e @ (AuthError::TokenInvalid
                | AuthError::TokenExpired
                | AuthError::IdentityNotFound),
            ) => {
                // Same answer for all three; only the log tells them apart.
                warn!(reason = e.reason(), "authentication failed");
                let body = Json(json!({ "detail": UNAUTHORIZED_DETAIL }));
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    body,
                )
                    .into_response();
            }
            AppError::Auth(AuthError::Internal(e)) | AppError::Internal(e) => {
                error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn detail_of(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        value["detail"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn token_failures_share_one_response() {
        for err in [
            AuthError::TokenInvalid,
            AuthError::TokenExpired,
            AuthError::IdentityNotFound,
        ] {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
            assert_eq!(detail_of(response).await, UNAUTHORIZED_DETAIL);
        }
    }

    #[tokio::test]
    async fn client_errors_map_to_400_and_422() {
        let dup = AppError::from(AuthError::DuplicateIdentity).into_response();
        assert_eq!(dup.status(), StatusCode::BAD_REQUEST);
        assert_eq!(detail_of(dup).await, "Email already registered");

        let creds = AppError::from(AuthError::InvalidCredentials).into_response();
        assert_eq!(creds.status(), StatusCode::BAD_REQUEST);
        assert_eq!(detail_of(creds).await, "Incorrect email or password");

        let invalid = AppError::Validation("Invalid email".into()).into_response();
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = AppError::from(anyhow::anyhow!("secret db string")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail_of(response).await, "Internal server error");
    }
}
