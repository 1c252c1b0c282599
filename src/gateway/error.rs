use axum::{
    Json,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::AuthError;
use crate::contact::{RelayError, ValidationError};
use crate::pipeline::PipelineError;
use crate::trial::AXIOM_STATUS_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    ContactValidation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("no trial with id {0}")]
    TrialNotFound(String),

    #[error("not signed in")]
    Unauthorized,

    /// Ground-truth derivation failed, so the submission was rejected.
    #[error("oracle derivation failed: {0}")]
    DerivationFailed(String),

    #[error("trial store error: {0}")]
    StoreFailed(String),

    /// The mail relay rejected the inquiry; `message` is its own error text.
    #[error("{message}")]
    RelayFailed { status: u16, message: String },

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<PipelineError> for GatewayError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Derivation(source) => GatewayError::DerivationFailed(source.to_string()),
            PipelineError::Store(source) => GatewayError::StoreFailed(source.to_string()),
        }
    }
}

impl From<RelayError> for GatewayError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::Rejected { status, message } => GatewayError::RelayFailed { status, message },
            RelayError::Transport(source) => GatewayError::RelayFailed {
                status: StatusCode::BAD_GATEWAY.as_u16(),
                message: source.to_string(),
            },
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, axiom_status) = match &self {
            GatewayError::InvalidRequest(_) | GatewayError::ContactValidation(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request")
            }
            GatewayError::Auth(e) => match e {
                AuthError::InvalidName
                | AuthError::InvalidCompany
                | AuthError::InvalidEmail
                | AuthError::WeakPassword { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
                AuthError::EmailTaken => (StatusCode::CONFLICT, "email_taken"),
                AuthError::UnknownEmail | AuthError::WrongPassword => {
                    (StatusCode::UNAUTHORIZED, "auth_error")
                }
                AuthError::Io { .. } | AuthError::Corrupt { .. } | AuthError::Serialization(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "auth_storage_error")
                }
            },
            GatewayError::TrialNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            GatewayError::Unauthorized => (StatusCode::UNAUTHORIZED, "auth_error"),
            GatewayError::DerivationFailed(_) => (StatusCode::BAD_GATEWAY, "oracle_error"),
            GatewayError::StoreFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
            GatewayError::RelayFailed { .. } => (StatusCode::BAD_GATEWAY, "relay_error"),
            GatewayError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            AXIOM_STATUS_HEADER,
            HeaderValue::from_str(axiom_status).unwrap_or(HeaderValue::from_static("error")),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
