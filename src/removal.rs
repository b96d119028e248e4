//! Background removal through a remote API.

use std::future::Future;

use crate::foundation::error::{FrameResult, REMOVAL_FALLBACK_MESSAGE};

pub(crate) mod client;

pub use client::{DEFAULT_ENDPOINT, RemoveBgClient};

/// Something that turns an encoded photo into an encoded cut-out.
///
/// The studio pipeline is generic over this so batch behavior can be exercised without a
/// network.
pub trait BackgroundRemover: Send + Sync + 'static {
    /// Remove the background from `image` (any encoded format) and return the encoded result.
    fn remove_background(&self, image: Vec<u8>) -> impl Future<Output = FrameResult<Vec<u8>>> + Send;
}

/// Connection settings for [`RemoveBgClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovalSettings {
    /// Static API credential; `None` fails every call with `MissingCredential`.
    pub api_key: Option<String>,
    /// Endpoint accepting the multipart upload.
    pub endpoint: String,
    /// Whole-request timeout.
    pub request_timeout_secs: u64,
    /// TCP/TLS connect timeout.
    pub connect_timeout_secs: u64,
}

impl Default for RemovalSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(serde::Deserialize)]
struct ApiErrorEntry {
    #[serde(default)]
    title: Option<String>,
}

/// Extract the user-facing message from a non-success response body.
///
/// Uses `errors[0].title` when present and non-empty, otherwise the generic fallback.
pub fn api_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.errors.into_iter().next())
        .and_then(|e| e.title)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| REMOVAL_FALLBACK_MESSAGE.to_string())
}

#[cfg(test)]
#[path = "../tests/unit/removal/removal.rs"]
mod tests;
