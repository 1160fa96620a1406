//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use seva_domain::error::SevaError;

use crate::rpc::{Code, Envelope};

/// Underlying storage failed; details are logged, not returned.
pub const CODE_STORAGE: Code = 1;
/// Malformed identifier or request payload.
pub const CODE_VALIDATION: Code = 2;
/// Referenced domain or spec is absent.
pub const CODE_NOT_FOUND: Code = 3;
/// Entity already exists.
pub const CODE_CONFLICT: Code = 4;

/// Maps [`SevaError`] (and malformed request bodies) to an HTTP response
/// carrying an error envelope.
pub enum ApiError {
    Service(SevaError),
    Payload(JsonRejection),
}

impl From<SevaError> for ApiError {
    fn from(err: SevaError) -> Self {
        Self::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::Payload(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Service(SevaError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, CODE_VALIDATION, err.to_string())
            }
            Self::Service(SevaError::NotFound(err)) => {
                (StatusCode::NOT_FOUND, CODE_NOT_FOUND, err.to_string())
            }
            Self::Service(SevaError::Conflict(err)) => {
                (StatusCode::CONFLICT, CODE_CONFLICT, err.to_string())
            }
            Self::Service(SevaError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CODE_STORAGE,
                    "internal server error".to_string(),
                )
            }
            Self::Payload(rejection) => (rejection.status(), CODE_VALIDATION, rejection.body_text()),
        };

        (status, Json(Envelope { code, body: message })).into_response()
    }
}
