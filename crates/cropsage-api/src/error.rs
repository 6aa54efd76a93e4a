use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the CropSage backend client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the admin token (401/403).
    #[error("not authorized for {url} (HTTP {status})")]
    Unauthorized { status: u16, url: String },

    #[error("not found: {url}")]
    NotFound { url: String },

    /// Login was refused: unknown user or wrong password.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("token store error at {}: {source}", path.display())]
    TokenStore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
