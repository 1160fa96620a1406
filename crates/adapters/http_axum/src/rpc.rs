//! Response envelope shared by every RPC endpoint.
//!
//! Successful calls answer `{ "Code": 0, "Body": <payload> }`. Success codes
//! are `0` or negative; positive codes are reserved for errors (see
//! [`ApiError`](crate::error::ApiError)).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Envelope status code.
pub type Code = i16;

/// Plain success.
pub const CODE_OK: Code = 0;

/// Wire form of every RPC response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    pub code: Code,
    pub body: T,
}

/// A successful RPC response.
pub struct RpcOk<T> {
    status: StatusCode,
    code: Code,
    body: T,
}

impl<T> RpcOk<T> {
    /// Build a success response.
    ///
    /// # Panics
    ///
    /// Panics if `code` is positive: reporting an error code as a success
    /// is a programming error.
    pub fn new(status: StatusCode, code: Code, body: T) -> Self {
        assert!(code <= 0, "success code must be 0 or negative, got {code}");
        Self { status, code, body }
    }

    /// `200 OK` with [`CODE_OK`].
    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, CODE_OK, body)
    }

    /// `201 Created` with [`CODE_OK`].
    pub fn created(body: T) -> Self {
        Self::new(StatusCode::CREATED, CODE_OK, body)
    }
}

impl<T: Serialize> IntoResponse for RpcOk<T> {
    fn into_response(self) -> Response {
        let envelope = Envelope {
            code: self.code,
            body: self.body,
        };
        (self.status, Json(envelope)).into_response()
    }
}
