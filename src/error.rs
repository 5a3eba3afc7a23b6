use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Everything that can go wrong while building, running or persisting a network.
///
/// Shape and index errors are raised at the point of detection and never
/// corrected silently; configuration errors are raised once, by
/// `NetworkConfig::build` or `Network::from_state`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("{layer} layers do not support `{operation}`")]
    UnsupportedLayerOperation {
        layer: &'static str,
        operation: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        NetworkError::ShapeMismatch(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        NetworkError::ConfigurationInvalid(msg.into())
    }
}
