//! Subject placement inside a frame's border inset.
//!
//! Placement is a pure function of the frame size, its border, the subject size and the user's
//! zoom/pan state. The subject is fit into the inner area, shrunk by a fill factor to leave a
//! visual margin, scaled by the user's zoom, centered, and finally shifted by the user's pan.

use crate::foundation::{
    core::{Rect, Size},
    error::{FrameError, FrameResult},
};

/// Smallest user zoom.
pub const MIN_SCALE: f64 = 0.3;
/// Largest user zoom.
pub const MAX_SCALE: f64 = 3.0;
/// Zoom change applied by one zoom-in/zoom-out step.
pub const SCALE_STEP: f64 = 0.1;
/// Default pan range: offsets live in `[-OFFSET_LIMIT, OFFSET_LIMIT]` offset units.
pub const OFFSET_LIMIT: f64 = 50.0;

/// Constants shared by every placement call.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementPolicy {
    /// Fraction of the fitted size actually used, leaving a margin inside the border.
    pub fill_factor: f64,
    /// Offset units corresponding to a full pan deflection.
    pub offset_unit_span: f64,
    /// Fraction of the inner dimension a full pan deflection moves the subject.
    pub max_offset_fraction: f64,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            fill_factor: 0.85,
            offset_unit_span: OFFSET_LIMIT,
            max_offset_fraction: 0.25,
        }
    }
}

impl PlacementPolicy {
    /// Check the constants are usable.
    pub fn validate(&self) -> FrameResult<()> {
        if !(self.fill_factor.is_finite() && self.fill_factor > 0.0 && self.fill_factor <= 1.0) {
            return Err(FrameError::validation(format!(
                "fill_factor must be in (0, 1] (got {})",
                self.fill_factor
            )));
        }
        if !(self.offset_unit_span.is_finite() && self.offset_unit_span > 0.0) {
            return Err(FrameError::validation("offset_unit_span must be finite and > 0"));
        }
        if !(self.max_offset_fraction.is_finite() && self.max_offset_fraction >= 0.0) {
            return Err(FrameError::validation(
                "max_offset_fraction must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// A placement state whose pan range matches this policy's `offset_unit_span`.
    pub fn state(&self, scale: f64, offset_x: f64, offset_y: f64) -> PlacementState {
        let mut state = PlacementState::with_offset_limit(self.offset_unit_span);
        state.set_scale(scale);
        state.set_offset(offset_x, offset_y);
        state
    }

    /// Zoom 1, no pan, pan range matching this policy.
    pub fn initial_state(&self) -> PlacementState {
        PlacementState::with_offset_limit(self.offset_unit_span)
    }

    /// Map a pan offset in offset units to pixels along an inner dimension.
    pub fn offset_to_px(&self, offset: f64, inner: f64) -> f64 {
        offset / self.offset_unit_span * self.max_offset_fraction * inner
    }

    /// Compute the destination rectangle of the subject on the frame canvas.
    pub fn place(&self, input: PlacementInput, state: PlacementState) -> FrameResult<Rect> {
        self.validate()?;
        input.validate()?;

        let PlacementInput {
            frame,
            border_px,
            subject,
        } = input;
        let inner_w = frame.width - 2.0 * border_px;
        let inner_h = frame.height - 2.0 * border_px;

        let base = (inner_w / subject.width).min(inner_h / subject.height) * self.fill_factor;
        let scale = base * state.scale();
        let scaled_w = subject.width * scale;
        let scaled_h = subject.height * scale;

        // A state built for a wider pan range never shifts past a full deflection.
        let span = self.offset_unit_span;
        let x = border_px
            + (inner_w - scaled_w) / 2.0
            + self.offset_to_px(state.offset_x().clamp(-span, span), inner_w);
        let y = border_px
            + (inner_h - scaled_h) / 2.0
            + self.offset_to_px(state.offset_y().clamp(-span, span), inner_h);

        tracing::debug!(base, scale, x, y, scaled_w, scaled_h, "placed subject");
        Ok(Rect::new(x, y, x + scaled_w, y + scaled_h))
    }
}

/// Geometry inputs of a placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementInput {
    /// Frame (canvas) size in pixels.
    pub frame: Size,
    /// Border thickness in pixels, already normalized to `frame`.
    pub border_px: f64,
    /// Subject image size in pixels.
    pub subject: Size,
}

impl PlacementInput {
    /// Inner area left after removing the border on every side.
    pub fn inner_rect(&self) -> Rect {
        Rect::new(
            self.border_px,
            self.border_px,
            self.frame.width - self.border_px,
            self.frame.height - self.border_px,
        )
    }

    fn validate(&self) -> FrameResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.frame.width) || !positive(self.frame.height) {
            return Err(FrameError::validation("frame dimensions must be finite and > 0"));
        }
        if !positive(self.subject.width) || !positive(self.subject.height) {
            return Err(FrameError::validation("subject dimensions must be finite and > 0"));
        }
        if !(self.border_px.is_finite() && self.border_px >= 0.0) {
            return Err(FrameError::validation("border must be finite and >= 0"));
        }
        if 2.0 * self.border_px >= self.frame.width.min(self.frame.height) {
            return Err(FrameError::validation(format!(
                "border {} leaves no inner area in a {}x{} frame",
                self.border_px, self.frame.width, self.frame.height
            )));
        }
        Ok(())
    }
}

/// User zoom and pan for one subject.
///
/// Values are clamped on every update: zoom to `[MIN_SCALE, MAX_SCALE]`, pan to
/// `[-offset_limit, offset_limit]`. Non-finite updates are ignored.
///
/// Build states through [`PlacementPolicy::state`] so the pan range matches the span the policy
/// remaps; [`PlacementState::new`] uses the default [`OFFSET_LIMIT`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PlacementState {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    offset_limit: f64,
}

impl Default for PlacementState {
    fn default() -> Self {
        Self::with_offset_limit(OFFSET_LIMIT)
    }
}

impl PlacementState {
    /// Build a state with the default pan range, clamping every component.
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        PlacementPolicy::default().state(scale, offset_x, offset_y)
    }

    /// Zoom 1, no pan, offsets clamped to `[-limit, limit]`.
    ///
    /// A non-finite or non-positive limit falls back to [`OFFSET_LIMIT`].
    pub fn with_offset_limit(limit: f64) -> Self {
        let offset_limit = if limit.is_finite() && limit > 0.0 {
            limit
        } else {
            OFFSET_LIMIT
        };
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            offset_limit,
        }
    }

    /// Largest pan magnitude on either axis.
    pub fn offset_limit(&self) -> f64 {
        self.offset_limit
    }

    /// Current zoom.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current horizontal pan in offset units.
    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    /// Current vertical pan in offset units.
    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Set zoom, clamped.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    /// Increase zoom by one step.
    pub fn zoom_in(&mut self) {
        self.set_scale(round_step(self.scale + SCALE_STEP));
    }

    /// Decrease zoom by one step.
    pub fn zoom_out(&mut self) {
        self.set_scale(round_step(self.scale - SCALE_STEP));
    }

    /// Set pan, clamped per axis.
    pub fn set_offset(&mut self, offset_x: f64, offset_y: f64) {
        if offset_x.is_finite() {
            self.offset_x = offset_x.clamp(-self.offset_limit, self.offset_limit);
        }
        if offset_y.is_finite() {
            self.offset_y = offset_y.clamp(-self.offset_limit, self.offset_limit);
        }
    }

    /// Shift pan by a drag delta, clamped.
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        self.set_offset(self.offset_x + dx, self.offset_y + dy);
    }

    /// Return to zoom 1 and no pan, keeping the pan range.
    pub fn reset(&mut self) {
        *self = Self::with_offset_limit(self.offset_limit);
    }
}

// Zoom steps land on exact tenths so repeated stepping does not drift.
fn round_step(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
#[path = "../tests/unit/placement.rs"]
mod tests;
