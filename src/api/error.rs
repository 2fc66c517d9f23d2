//! Errors raised while talking to the results API.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Cannot connect to results API at {0}")]
    Connection(String),

    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Results API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),
}
