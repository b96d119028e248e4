//! Tool configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON file, then the environment.
//! Command-line flags are applied last by the binary.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Canvas,
        error::{FrameError, FrameResult},
    },
    placement::PlacementPolicy,
    removal::{DEFAULT_ENDPOINT, RemovalSettings},
};

/// Environment variable holding the remove.bg credential.
pub const ENV_API_KEY: &str = "REMOVE_BG_API_KEY";
/// Environment variable overriding the removal endpoint.
pub const ENV_ENDPOINT: &str = "REMOVE_BG_ENDPOINT";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// remove.bg credential. Prefer the environment over committing it to a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub placement: PlacementPolicy,
    pub canvas: Canvas,
    /// Where composites are written.
    pub output_dir: PathBuf,
    /// JSON frame catalog; the built-in catalog is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<PathBuf>,
    /// Selected frame id; the catalog's first frame when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        let removal = RemovalSettings::default();
        Self {
            api_key: None,
            endpoint: removal.endpoint,
            request_timeout_secs: removal.request_timeout_secs,
            connect_timeout_secs: removal.connect_timeout_secs,
            placement: PlacementPolicy::default(),
            canvas: Canvas::default(),
            output_dir: PathBuf::from("."),
            frames: None,
            frame: None,
        }
    }
}

impl StudioConfig {
    /// Load a JSON config file. A relative `frames` path resolves against the file's directory.
    pub fn from_path(path: &Path) -> FrameResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;
        if let (Some(frames), Some(dir)) = (cfg.frames.as_mut(), path.parent()) {
            if frames.is_relative() {
                *frames = dir.join(&*frames);
            }
        }
        Ok(cfg)
    }

    pub fn from_json_str(json: &str) -> FrameResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| FrameError::config(format!("parse config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Overlay `REMOVE_BG_API_KEY` / `REMOVE_BG_ENDPOINT` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay environment values read through `lookup`. Blank values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_blank(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(endpoint) = non_blank(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
    }

    pub fn validate(&self) -> FrameResult<()> {
        self.placement.validate()?;
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(FrameError::config(format!(
                "endpoint must be an http(s) URL (got '{}')",
                self.endpoint
            )));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(FrameError::config("timeouts must be > 0 seconds"));
        }
        if self.frame.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(FrameError::config("frame id must be non-empty"));
        }
        Ok(())
    }

    pub fn removal_settings(&self) -> RemovalSettings {
        RemovalSettings {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.trim().to_string(),
            request_timeout_secs: self.request_timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
        }
    }

    /// Whether the endpoint is the public remove.bg service.
    pub fn uses_default_endpoint(&self) -> bool {
        self.endpoint.trim() == DEFAULT_ENDPOINT
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
