use std::sync::Arc;

use crate::foundation::{core::Canvas, error::FrameResult};

pub(crate) mod decode;
pub(crate) mod source;
pub(crate) mod svg_raster;

pub use decode::{ImageProbe, decode_image, probe_input, probe_result};
pub use source::{FrameSource, load_source_bytes};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decoded frame artwork.
///
/// Raster frames are stretched over the canvas; SVG frames are rasterized at canvas size so the
/// border stays crisp on large exports.
#[derive(Clone, Debug)]
pub enum FrameArt {
    /// Bitmap frame image.
    Raster(PreparedImage),
    /// Parsed SVG frame image.
    Svg(Arc<usvg::Tree>),
}

impl FrameArt {
    /// Decode frame bytes, detecting SVG documents by content.
    pub fn from_bytes(bytes: &[u8]) -> FrameResult<Self> {
        if decode::looks_like_svg(bytes) {
            return Ok(Self::Svg(Arc::new(svg_raster::parse_svg(bytes)?)));
        }
        Ok(Self::Raster(decode_image(bytes)?))
    }

    /// Intrinsic dimensions of the artwork (rounded up for SVG).
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Raster(img) => (img.width, img.height),
            Self::Svg(tree) => {
                let size = tree.size();
                (
                    (size.width().ceil() as u32).max(1),
                    (size.height().ceil() as u32).max(1),
                )
            }
        }
    }

    /// Rasterize or resample the artwork to exactly fill `canvas`.
    pub fn render_to(&self, canvas: Canvas) -> FrameResult<PreparedImage> {
        match self {
            Self::Raster(img) => decode::resize_premul(img, canvas.width, canvas.height),
            Self::Svg(tree) => {
                let data = svg_raster::rasterize_svg_to_premul_rgba8(tree, canvas.width, canvas.height)?;
                Ok(PreparedImage {
                    width: canvas.width,
                    height: canvas.height,
                    rgba8_premul: Arc::new(data),
                })
            }
        }
    }
}
