use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// ApiError
///
/// The failure taxonomy for every operation in the application. Handlers and the
/// auth extractor return this type; the `IntoResponse` impl turns each variant
/// into the matching status code and a JSON `{"error": "..."}` body, which is the
/// wire contract the frontend consumes.
///
/// `Internal` is kept distinct from the 4xx variants so operators can tell a
/// client mistake from a system fault in the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable identity: the token is absent, fails verification, or names a
    /// user that no longer exists.
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// A required field is missing or malformed on input. Raised before any write.
    #[error("{0}")]
    Validation(&'static str),

    /// The operand identifier does not resolve to a stored record.
    #[error("{0}")]
    NotFound(&'static str),

    /// The caller is authenticated but does not own the record.
    #[error("{0}")]
    Forbidden(&'static str),

    /// A store-level failure. The source is logged; the response body stays
    /// generic so no internal detail leaks to the client.
    #[error("internal server error")]
    Internal(#[from] sqlx::Error),
}

/// ErrorBody
///
/// The JSON envelope every failure response carries.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            tracing::error!("store failure: {:?}", source);
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
