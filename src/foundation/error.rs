/// Convenience result type used across the crate.
pub type FrameResult<T> = Result<T, FrameError>;

/// Message surfaced when the removal API fails without a usable error payload.
pub const REMOVAL_FALLBACK_MESSAGE: &str = "Failed to remove background";

/// Error taxonomy for the framing pipeline.
///
/// Every variant is recoverable at the call site. Batch processing records the rendered message
/// against the affected image and carries on with the others.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    /// Invalid user-provided data (dimensions, policy constants, unknown ids).
    #[error("validation error: {0}")]
    Validation(String),

    /// An input buffer (file or capture) is not a decodable image.
    #[error("input decode error: {0}")]
    InputDecode(String),

    /// No background-removal credential was configured.
    #[error("background removal API key not configured (set REMOVE_BG_API_KEY)")]
    MissingCredential,

    /// The removal API answered with a non-success status.
    ///
    /// Displays the server-provided message verbatim.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided title, or [`REMOVAL_FALLBACK_MESSAGE`].
        message: String,
    },

    /// Transport failure talking to a remote endpoint.
    #[error("network error: {0}")]
    Network(String),

    /// A frame or subject image could not be decoded for compositing.
    #[error("composite decode error: {0}")]
    CompositeDecode(String),

    /// The output canvas could not be allocated.
    #[error("canvas unavailable: {0}")]
    CanvasUnavailable(String),

    /// Configuration or catalog file problems.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameError {
    /// Build a [`FrameError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FrameError::InputDecode`] value.
    pub fn input_decode(msg: impl Into<String>) -> Self {
        Self::InputDecode(msg.into())
    }

    /// Build a [`FrameError::Network`] value.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Build a [`FrameError::CompositeDecode`] value.
    pub fn composite_decode(msg: impl Into<String>) -> Self {
        Self::CompositeDecode(msg.into())
    }

    /// Build a [`FrameError::CanvasUnavailable`] value.
    pub fn canvas_unavailable(msg: impl Into<String>) -> Self {
        Self::CanvasUnavailable(msg.into())
    }

    /// Build a [`FrameError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
