use std::path::PathBuf;

use reqwest::{Method, StatusCode};
use thiserror::Error;
use tokio::sync::AcquireError;
use url::Url;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures at the backend boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request failed: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    #[error("{method} {url} returned {status}")]
    Status {
        method: Method,
        url: Url,
        status: StatusCode,
    },

    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Media {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request pool closed")]
    PoolClosed(#[from] AcquireError),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(e) => e.status(),
            _ => None,
        }
    }
}
