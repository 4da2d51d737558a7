use std::path::PathBuf;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use vpncheck_core::{LookupError, OverrideError, RefreshError};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stats are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a handler can fail with, mapped onto an HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Refresh(#[from] RefreshError),
    #[error(transparent)]
    Override(#[from] OverrideError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(LookupError::InvalidAddress(_)) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(LookupError::NotReady { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Refresh(_) => StatusCode::BAD_GATEWAY,
            ApiError::Override(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Lookup(LookupError::InvalidAddress(_)) => {
                "Invalid IP address format".to_string()
            }
            other => other.to_string(),
        };

        if status.is_server_error() {
            error!("Server error: {self}");
        } else {
            debug!("Client error: {self}");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
