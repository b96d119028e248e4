use std::time::Duration;

use crate::{
    foundation::error::{FrameError, FrameResult},
    removal::{BackgroundRemover, RemovalSettings, api_error_message},
};

/// remove.bg v1 endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.remove.bg/v1.0/removebg";

/// Thin HTTP wrapper around the remove.bg upload endpoint.
#[derive(Clone, Debug)]
pub struct RemoveBgClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl RemoveBgClient {
    pub fn new(settings: &RemovalSettings) -> FrameResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .map_err(|e| FrameError::network(format!("build http client: {e}")))?;
        Ok(Self {
            http,
            api_key: settings
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            endpoint: settings.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// The underlying HTTP client, shared for frame downloads.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

impl BackgroundRemover for RemoveBgClient {
    async fn remove_background(&self, image: Vec<u8>) -> FrameResult<Vec<u8>> {
        let api_key = self.api_key.as_deref().ok_or(FrameError::MissingCredential)?;

        let upload_len = image.len();
        let part = reqwest::multipart::Part::bytes(image).file_name("image");
        let form = reqwest::multipart::Form::new()
            .part("image_file", part)
            .text("size", "auto");

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Api-Key", api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| FrameError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FrameError::network(e.to_string()))?;

        if !status.is_success() {
            let message = api_error_message(&body);
            tracing::warn!(status = status.as_u16(), %message, "background removal rejected");
            return Err(FrameError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(upload_len, result_len = body.len(), "background removed");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/removal/client.rs"]
mod tests;
