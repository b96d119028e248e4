use std::path::{Component, Path};

use anyhow::Context as _;

use crate::foundation::error::{FrameError, FrameResult};

/// Where a frame image lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameSource {
    /// `http://` or `https://` URL fetched at load time.
    Url(String),
    /// Path relative to the catalog root, normalized with `/` separators.
    Path(String),
}

impl FrameSource {
    /// Classify a catalog `source` string.
    pub fn parse(source: &str) -> FrameResult<Self> {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Self::Url(trimmed.to_string()));
        }
        Ok(Self::Path(normalize_rel_path(trimmed)?))
    }
}

/// Catalog-relative frame path with `/` separators and no `.` segments.
///
/// Backslashes count as separators. Rooted paths and `..` are rejected so a catalog can only
/// name files beneath its own directory.
pub(crate) fn normalize_rel_path(source: &str) -> FrameResult<String> {
    let unified = source.replace('\\', "/");
    let mut segments = Vec::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(name) => segments.push(name.to_string_lossy()),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(FrameError::validation(format!(
                    "frame path '{source}' leaves the catalog directory"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(FrameError::validation(format!(
                    "frame path '{source}' is absolute"
                )));
            }
        }
    }
    if segments.is_empty() {
        return Err(FrameError::validation(format!(
            "frame path '{source}' names no file"
        )));
    }
    Ok(segments.join("/"))
}

/// Read the bytes behind a frame source.
#[tracing::instrument(skip(http))]
pub async fn load_source_bytes(
    source: &FrameSource,
    root: &Path,
    http: &reqwest::Client,
) -> FrameResult<Vec<u8>> {
    match source {
        FrameSource::Path(rel) => {
            let path = root.join(rel);
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("read frame image '{}'", path.display()))?;
            Ok(bytes)
        }
        FrameSource::Url(url) => {
            let response = http
                .get(url)
                .send()
                .await
                .map_err(|e| FrameError::network(format!("fetch frame '{url}': {e}")))?;
            if !response.status().is_success() {
                return Err(FrameError::network(format!(
                    "fetch frame '{url}': HTTP status {}",
                    response.status()
                )));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| FrameError::network(format!("read frame '{url}': {e}")))?;
            tracing::debug!(url = %url, len = bytes.len(), "fetched frame image");
            Ok(bytes.to_vec())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
