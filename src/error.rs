//! HTTP-facing error taxonomy shared by every route.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::database::DatabaseError;

pub const TEAM_NOT_FOUND: &str = "Team not found";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API key not configured")]
    MissingApiKey,
    #[error("API returned status: {status}")]
    UpstreamStatus { status: u16 },
    #[error("API request failed")]
    UpstreamRejected { data: Value },
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Database(#[from] DatabaseError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MissingApiKey
            | Self::UpstreamStatus { .. }
            | Self::UpstreamRejected { .. }
            | Self::Transport(_)
            | Self::Database(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn body(&self) -> Value {
        match self {
            Self::UpstreamRejected { data } => json!({
                "error": self.to_string(),
                "data": data,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_static_message() {
        let err = ApiError::NotFound(TEAM_NOT_FOUND);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.body(), json!({ "error": "Team not found" }));
    }

    #[test]
    fn upstream_status_is_echoed_in_message() {
        let err = ApiError::UpstreamStatus { status: 503 };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body()["error"], "API returned status: 503");
    }

    #[test]
    fn rejected_payload_is_carried_alongside_error() {
        let err = ApiError::UpstreamRejected {
            data: json!({ "success": false }),
        };
        let body = err.body();
        assert_eq!(body["error"], "API request failed");
        assert_eq!(body["data"]["success"], false);
    }
}
