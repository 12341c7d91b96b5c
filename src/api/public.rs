//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::chat::{RoomError, SessionError};

// Errors

pub struct ApiError(anyhow::Error);

impl ApiError {
    /// Session and room errors are the caller's fault, everything else
    /// is ours.
    fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<SessionError>() {
            return match err {
                SessionError::Room(RoomError::NotFound(_)) => StatusCode::NOT_FOUND,
                SessionError::RoomsDisabled | SessionError::EmptyPrompt => {
                    StatusCode::BAD_REQUEST
                }
                SessionError::Busy => StatusCode::CONFLICT,
            };
        }
        if let Some(RoomError::NotFound(_)) = self.0.downcast_ref::<RoomError>() {
            return StatusCode::NOT_FOUND;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("{}", self.0);
            (status, format!("Something went wrong: {}", self.0)).into_response()
        } else {
            tracing::debug!("Rejected request: {}", self.0);
            (status, self.0.to_string()).into_response()
        }
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod rooms {
    pub use crate::api::routes::rooms::public::*;
}
