//! Error bodies for the HTTP surface.

use crate::utils::error::PriceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for PriceError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self {
            PriceError::UpstreamFetchFailed(source) => {
                tracing::warn!(
                    kind = self.kind(),
                    feed = ?source.feed(),
                    error = %source,
                    "price request failed"
                )
            }
            _ => tracing::debug!(kind = self.kind(), error = %self, "price request rejected"),
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
