use std::{fmt, str::FromStr};

use crate::foundation::error::{FrameError, FrameResult};

pub use kurbo::{Rect, Size};

/// Output canvas dimensions in pixels.
///
/// Parses from a preset name (`square`, `square-small`, `portrait`) or from `WxH`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest accepted edge length.
    pub const MAX_DIM: u32 = 16_384;

    /// High resolution square export.
    pub const SQUARE: Canvas = Canvas {
        width: 1800,
        height: 1800,
    };

    /// Square export at the frame catalog's reference resolution.
    pub const SQUARE_SMALL: Canvas = Canvas {
        width: 800,
        height: 800,
    };

    /// Phone-story portrait export.
    pub const PORTRAIT: Canvas = Canvas {
        width: 412,
        height: 917,
    };

    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> FrameResult<Self> {
        if width == 0 || height == 0 {
            return Err(FrameError::canvas_unavailable(format!(
                "canvas must be non-empty (got {width}x{height})"
            )));
        }
        if width > Self::MAX_DIM || height > Self::MAX_DIM {
            return Err(FrameError::canvas_unavailable(format!(
                "canvas too large: {width}x{height} (max {max}x{max})",
                max = Self::MAX_DIM
            )));
        }
        Ok(Self { width, height })
    }

    /// Smaller of the two edges.
    pub fn min_dim(self) -> u32 {
        self.width.min(self.height)
    }

    /// Canvas extent as a floating-point size.
    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Byte length of a tightly packed RGBA8 buffer for this canvas.
    pub fn rgba_len(self) -> FrameResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| FrameError::canvas_unavailable("canvas buffer size overflow"))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::SQUARE
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Canvas {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::SQUARE),
            "square-small" => Ok(Self::SQUARE_SMALL),
            "portrait" => Ok(Self::PORTRAIT),
            other => {
                let (w, h) = other.split_once('x').ok_or_else(|| {
                    FrameError::validation(format!(
                        "unknown canvas '{s}' (expected square, square-small, portrait or WxH)"
                    ))
                })?;
                let parse = |v: &str| {
                    v.trim().parse::<u32>().map_err(|_| {
                        FrameError::validation(format!("invalid canvas dimension '{v}' in '{s}'"))
                    })
                };
                Self::new(parse(w)?, parse(h)?)
            }
        }
    }
}

impl TryFrom<String> for Canvas {
    type Error = FrameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Canvas> for String {
    fn from(value: Canvas) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
