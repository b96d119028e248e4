use crate::foundation::error::{FrameError, FrameResult};

pub(crate) fn parse_svg(bytes: &[u8]) -> FrameResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| FrameError::composite_decode(format!("parse svg tree: {e}")))
}

/// Render `tree` stretched to `width`x`height`.
///
/// tiny-skia pixmaps are premultiplied RGBA8, so the bytes can be composited directly.
pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> FrameResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| FrameError::canvas_unavailable("failed to allocate svg pixmap"))?;

    let size = tree.size();
    if !(size.width() > 0.0 && size.height() > 0.0) {
        return Err(FrameError::composite_decode("svg has invalid width/height"));
    }
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
