use thiserror::Error;

/// Failure to obtain a snapshot from a weather provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to send weather request for '{city}': {source}")]
    Request {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("weather request for '{city}' failed with status {status}: {body}")]
    Status {
        city: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to read weather response body for '{city}': {source}")]
    Body {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse weather response for '{city}': {source}")]
    Parse {
        city: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("weather response for '{city}' contained no conditions")]
    MissingCondition { city: String },
}

/// Failure of an object store operation.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{operation} on bucket '{bucket}' failed: {message}")]
    Request {
        operation: &'static str,
        bucket: String,
        message: String,
    },

    #[error("failed to encode object body: {0}")]
    Serialize(String),
}

impl From<csv::Error> for StorageError {
    fn from(e: csv::Error) -> Self {
        StorageError::Serialize(e.to_string())
    }
}
