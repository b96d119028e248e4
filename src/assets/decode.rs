use std::{io::Cursor, sync::Arc};

use image::imageops::FilterType;

use crate::{
    assets::PreparedImage,
    foundation::{
        error::{FrameError, FrameResult},
        math::premultiply_rgba8_in_place,
    },
};

/// Header-level facts about an encoded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageProbe {
    /// Detected container format.
    pub format: image::ImageFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Check that a user-supplied buffer is an image before it is sent anywhere.
pub fn probe_input(bytes: &[u8]) -> FrameResult<ImageProbe> {
    probe(bytes).map_err(FrameError::input_decode)
}

/// Check that a background-removal result is an image we can composite.
pub fn probe_result(bytes: &[u8]) -> FrameResult<ImageProbe> {
    probe(bytes).map_err(FrameError::composite_decode)
}

fn probe(bytes: &[u8]) -> Result<ImageProbe, String> {
    if bytes.is_empty() {
        return Err("image buffer is empty".to_string());
    }
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| format!("read image header: {e}"))?;
    let format = reader
        .format()
        .ok_or_else(|| "unrecognized image format".to_string())?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| format!("read image dimensions: {e}"))?;
    if width == 0 || height == 0 {
        return Err(format!("image has no pixels ({width}x{height})"));
    }
    Ok(ImageProbe {
        format,
        width,
        height,
    })
}

/// Decode a raster image into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> FrameResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| FrameError::composite_decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(FrameError::composite_decode("decoded image has no pixels"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Resample a premultiplied image to `width`x`height`.
///
/// Filtering premultiplied data keeps transparent fringes from bleeding color.
pub(crate) fn resize_premul(img: &PreparedImage, width: u32, height: u32) -> FrameResult<PreparedImage> {
    if img.width == width && img.height == height {
        return Ok(img.clone());
    }
    let src = image::RgbaImage::from_raw(img.width, img.height, img.rgba8_premul.to_vec())
        .ok_or_else(|| FrameError::composite_decode("image buffer does not match its dimensions"))?;
    let resized = image::imageops::resize(&src, width, height, FilterType::Triangle);
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(resized.into_raw()),
    })
}

pub(crate) fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
