//! Customer API client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{verb} failed: server returned {status}")]
    Status {
        verb: &'static str,
        status: reqwest::StatusCode,
    },
}
