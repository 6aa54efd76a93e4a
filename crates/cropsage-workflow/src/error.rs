use cropsage_api::ApiError;
use thiserror::Error;

/// Failures that abort a diagnosis run. Everything else degrades.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The query was blank; nothing was sent anywhere.
    #[error("please enter or speak your query")]
    EmptyInput,

    /// The classifier could not be reached or answered with an error.
    #[error("error connecting to backend: {0}")]
    Classification(#[source] ApiError),
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from translation service")]
    UnexpectedStatus { status: u16 },

    #[error("translation service error {status}: {message}")]
    Service { status: u64, message: String },

    #[error("JSON deserialization error for translation response: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("translation service returned an empty translation")]
    Empty,

    #[error("invalid translation URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("voice recognition not supported")]
    Unsupported,

    #[error("voice recognition failed: {0}")]
    Recognition(String),
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech synthesis not supported")]
    Unsupported,

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("location unavailable")]
    Unavailable,

    #[error("location lookup failed: {0}")]
    Failed(String),
}
