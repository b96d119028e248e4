use std::{
    io::Cursor,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context as _;

use crate::{
    compose::surface::Surface,
    foundation::error::{FrameError, FrameResult},
};

/// File name prefix of exported composites.
pub const EXPORT_PREFIX: &str = "framed-selfie";

/// Encode a surface as PNG bytes.
pub fn encode_png(surface: &Surface) -> FrameResult<Vec<u8>> {
    let img = surface.to_rgba_image()?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// `framed-selfie-<millis>.png`
pub fn export_file_name(millis: u128) -> String {
    format!("{EXPORT_PREFIX}-{millis}.png")
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Hands out timestamp-based export paths that never collide within one run.
#[derive(Clone, Debug, Default)]
pub struct ExportNamer {
    last: Option<u128>,
}

impl ExportNamer {
    /// Next free path in `dir` at or after `millis`.
    ///
    /// The stamp is bumped past the previously issued one and past any existing file.
    pub async fn next_path(&mut self, dir: &Path, millis: u128) -> FrameResult<PathBuf> {
        let mut stamp = match self.last {
            Some(last) if millis <= last => last + 1,
            _ => millis,
        };
        loop {
            let path = dir.join(export_file_name(stamp));
            let taken = tokio::fs::try_exists(&path)
                .await
                .with_context(|| format!("check '{}'", path.display()))?;
            if !taken {
                self.last = Some(stamp);
                return Ok(path);
            }
            stamp += 1;
        }
    }

    /// Encode `surface` and write it under `dir` with a fresh name.
    pub async fn write_png(&mut self, dir: &Path, surface: &Surface) -> FrameResult<PathBuf> {
        let bytes = encode_png(surface)?;
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = self.next_path(dir, now_millis()).await?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "exported composite");
        Ok(path)
    }
}

/// Write raw bytes, creating parent directories.
pub async fn write_bytes(path: &Path, bytes: &[u8]) -> FrameResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("write '{}'", path.display()))
        .map_err(FrameError::from)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/export.rs"]
mod tests;
