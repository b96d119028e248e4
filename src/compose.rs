//! Frame-then-subject compositing onto a canvas.

use crate::{
    assets::{FrameArt, PreparedImage},
    foundation::{
        core::{Canvas, Rect, Size},
        error::FrameResult,
    },
    placement::{PlacementInput, PlacementPolicy, PlacementState},
};

pub(crate) mod blend;
pub(crate) mod export;
pub(crate) mod surface;

pub use export::{EXPORT_PREFIX, ExportNamer, encode_png, export_file_name, now_millis, write_bytes};
pub use surface::Surface;

/// Everything needed to produce one composite.
#[derive(Clone, Copy, Debug)]
pub struct CompositeRequest<'a> {
    /// Frame artwork, stretched to fill the canvas.
    pub frame: &'a FrameArt,
    /// Border thickness in canvas pixels.
    pub border_px: f64,
    /// Background-removed subject.
    pub subject: &'a PreparedImage,
    /// User zoom and pan.
    pub placement: PlacementState,
    /// Output size.
    pub canvas: Canvas,
}

/// A finished composite.
#[derive(Clone, Debug)]
pub struct Composite {
    /// Rendered pixels.
    pub surface: Surface,
    /// Where the subject was drawn.
    pub subject_rect: Rect,
}

/// Draw the frame over the full canvas, then the subject at its placed rectangle.
#[tracing::instrument(skip(req, policy), fields(canvas = %req.canvas))]
pub fn compose(req: &CompositeRequest<'_>, policy: &PlacementPolicy) -> FrameResult<Composite> {
    let subject_rect = policy.place(
        PlacementInput {
            frame: req.canvas.size(),
            border_px: req.border_px,
            subject: Size::new(f64::from(req.subject.width), f64::from(req.subject.height)),
        },
        req.placement,
    )?;

    let mut surface = Surface::new(req.canvas)?;
    let frame = req.frame.render_to(req.canvas)?;
    surface.draw_stretched(&frame)?;
    surface.draw_image(req.subject, subject_rect)?;

    Ok(Composite {
        surface,
        subject_rect,
    })
}

#[cfg(test)]
#[path = "../tests/unit/compose/compose.rs"]
mod tests;
