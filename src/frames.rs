//! Frame catalog: the decorative frames a subject can be composited into.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::{FrameArt, FrameSource, load_source_bytes},
    foundation::{
        core::Canvas,
        error::{FrameError, FrameResult},
    },
};

/// Border thickness of a frame.
///
/// Deserializes from a number (`20`), a CSS border shorthand (`"20px solid #d4af37"`), or an
/// object (`{"px": 20, "reference": 800}`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "BorderRepr")]
pub struct Border {
    /// Thickness in pixels.
    pub px: f64,
    /// Resolution (short edge, in pixels) at which `px` was measured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<u32>,
}

impl Border {
    /// Border measured directly in output pixels.
    pub fn fixed(px: f64) -> Self {
        Self {
            px,
            reference: None,
        }
    }

    /// Border measured on a canvas whose short edge was `reference` pixels.
    pub fn at_reference(px: f64, reference: u32) -> Self {
        Self {
            px,
            reference: Some(reference),
        }
    }

    /// Border thickness in pixels on `canvas`.
    pub fn resolve(self, canvas: Canvas) -> f64 {
        match self.reference {
            Some(reference) => self.px / f64::from(reference) * f64::from(canvas.min_dim()),
            None => self.px,
        }
    }

    fn validate(self) -> FrameResult<()> {
        if !self.px.is_finite() || self.px < 0.0 {
            return Err(FrameError::validation(format!(
                "border must be finite and >= 0 (got {})",
                self.px
            )));
        }
        if self.reference == Some(0) {
            return Err(FrameError::validation("border reference resolution must be > 0"));
        }
        Ok(())
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum BorderRepr {
    Px(f64),
    Css(String),
    Full {
        px: f64,
        #[serde(default)]
        reference: Option<u32>,
    },
}

impl TryFrom<BorderRepr> for Border {
    type Error = FrameError;

    fn try_from(value: BorderRepr) -> Result<Self, Self::Error> {
        let border = match value {
            BorderRepr::Px(px) => Border::fixed(px),
            BorderRepr::Css(css) => Border::fixed(parse_css_border_width(&css)?),
            BorderRepr::Full { px, reference } => Border { px, reference },
        };
        border.validate()?;
        Ok(border)
    }
}

/// Read the leading width out of a CSS border shorthand such as `"15px solid #1a1a1a"`.
pub fn parse_css_border_width(css: &str) -> FrameResult<f64> {
    let first = css
        .split_whitespace()
        .next()
        .ok_or_else(|| FrameError::validation("border shorthand is empty"))?;
    let number = first.strip_suffix("px").unwrap_or(first);
    number
        .parse::<f64>()
        .map_err(|_| FrameError::validation(format!("invalid border width in '{css}'")))
}

/// Static description of one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameDescriptor {
    /// Stable identifier used for selection.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Image location: relative path or `http(s)` URL.
    pub source: String,
    /// Border inset the subject must stay inside.
    pub border: Border,
    /// Cosmetic drop shadow (CSS `box-shadow` syntax); carried for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<String>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CatalogFile {
    frames: Vec<FrameDescriptor>,
}

/// Ordered set of frames plus the directory relative sources resolve against.
#[derive(Clone, Debug)]
pub struct FrameCatalog {
    frames: Vec<FrameDescriptor>,
    root: PathBuf,
}

impl FrameCatalog {
    /// The frames shipped with the tool.
    ///
    /// The first entry, the default, is fetched over HTTPS. `classic` and `story` name local
    /// artwork (`frame2.png`, `framesam.png`) that is not bundled; relative sources resolve
    /// against the working directory.
    pub fn builtin() -> Self {
        let frame = |id: &str, name: &str, source: &str, border: Border, shadow: Option<&str>| {
            FrameDescriptor {
                id: id.to_string(),
                name: name.to_string(),
                source: source.to_string(),
                border,
                shadow: shadow.map(str::to_string),
            }
        };
        Self {
            frames: vec![
                frame(
                    "modern",
                    "Frame 2",
                    "https://images.pexels.com/photos/1164778/pexels-photo-1164778.jpeg?auto=compress&cs=tinysrgb&w=800&h=800",
                    Border::fixed(15.0),
                    Some("0 10px 40px rgba(0, 0, 0, 0.6)"),
                ),
                frame(
                    "classic",
                    "Frame 1",
                    "frame2.png",
                    Border::fixed(20.0),
                    Some("0 10px 40px rgba(212, 175, 55, 0.4)"),
                ),
                frame(
                    "elegant",
                    "Frame 3",
                    "https://images.pexels.com/photos/1084199/pexels-photo-1084199.jpeg?auto=compress&cs=tinysrgb&w=800&h=800",
                    Border::fixed(18.0),
                    Some("0 10px 40px rgba(192, 192, 192, 0.5)"),
                ),
                frame(
                    "vintage",
                    "Frame 4",
                    "https://images.pexels.com/photos/172276/pexels-photo-172276.jpeg?auto=compress&cs=tinysrgb&w=800&h=800",
                    Border::fixed(25.0),
                    Some("0 10px 40px rgba(139, 69, 19, 0.4)"),
                ),
                frame(
                    "story",
                    "Classic Gold (story)",
                    "framesam.png",
                    Border::at_reference(20.0, 800),
                    None,
                ),
            ],
            root: PathBuf::from("."),
        }
    }

    /// Load a JSON catalog; relative sources resolve against the file's directory.
    pub fn from_path(path: &Path) -> FrameResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read frame catalog '{}'", path.display()))?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json_str(&text, root)
    }

    /// Parse a JSON catalog of the form `{"frames": [...]}`.
    pub fn from_json_str(json: &str, root: impl Into<PathBuf>) -> FrameResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| FrameError::config(format!("parse frame catalog: {e}")))?;
        let catalog = Self {
            frames: file.frames,
            root: root.into(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Serialize the catalog back into its JSON file form.
    pub fn to_json_string(&self) -> FrameResult<String> {
        let file = CatalogFile {
            frames: self.frames.clone(),
        };
        serde_json::to_string_pretty(&file)
            .map_err(|e| FrameError::config(format!("serialize frame catalog: {e}")))
    }

    /// Check ids are unique, sources parse and borders are sane.
    pub fn validate(&self) -> FrameResult<()> {
        if self.frames.is_empty() {
            return Err(FrameError::config("frame catalog is empty"));
        }
        let mut seen = std::collections::HashSet::new();
        for frame in &self.frames {
            if frame.id.trim().is_empty() {
                return Err(FrameError::config("frame id must be non-empty"));
            }
            if !seen.insert(frame.id.as_str()) {
                return Err(FrameError::config(format!("duplicate frame id '{}'", frame.id)));
            }
            FrameSource::parse(&frame.source)?;
            frame.border.validate()?;
        }
        Ok(())
    }

    /// Directory relative sources resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Frames in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &FrameDescriptor> {
        self.frames.iter()
    }

    /// Look up a frame by id.
    pub fn get(&self, id: &str) -> FrameResult<&FrameDescriptor> {
        self.frames
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| FrameError::validation(format!("unknown frame '{id}'")))
    }

    /// The selected frame, or the first catalog entry when nothing is selected.
    pub fn current(&self, selected: Option<&str>) -> FrameResult<&FrameDescriptor> {
        match selected {
            Some(id) => self.get(id),
            None => self
                .frames
                .first()
                .ok_or_else(|| FrameError::config("frame catalog is empty")),
        }
    }

    /// Fetch and decode a frame's artwork.
    pub async fn load(&self, id: &str, http: &reqwest::Client) -> FrameResult<LoadedFrame> {
        let descriptor = self.get(id)?.clone();
        let source = FrameSource::parse(&descriptor.source)?;
        let bytes = load_source_bytes(&source, &self.root, http).await?;
        let art = FrameArt::from_bytes(&bytes)?;
        tracing::debug!(frame = %descriptor.id, dims = ?art.dimensions(), "loaded frame art");
        Ok(LoadedFrame { descriptor, art })
    }
}

/// A frame descriptor together with its decoded artwork.
#[derive(Clone, Debug)]
pub struct LoadedFrame {
    /// Catalog entry.
    pub descriptor: FrameDescriptor,
    /// Decoded image.
    pub art: FrameArt,
}

impl LoadedFrame {
    /// Border thickness in pixels on `canvas`.
    pub fn border_px(&self, canvas: Canvas) -> f64 {
        self.descriptor.border.resolve(canvas)
    }
}

#[cfg(test)]
#[path = "../tests/unit/frames.rs"]
mod tests;
