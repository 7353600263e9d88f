//! Error types for the chess client

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Unexpected response body from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Mock response not configured for: {0}")]
    NotConfigured(String),
}
