use crate::{
    assets::{PreparedImage, decode::resize_premul},
    compose::blend::{Layer, over_at},
    foundation::{
        core::{Canvas, Rect},
        error::{FrameError, FrameResult},
        math::unpremultiply_rgba8_in_place,
    },
};

/// Premultiplied RGBA8 drawing target.
#[derive(Clone, Debug)]
pub struct Surface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, premultiplied alpha.
    pub data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface covering `canvas`.
    pub fn new(canvas: Canvas) -> FrameResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        let len = canvas.rgba_len()?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            FrameError::canvas_unavailable(format!("allocate {canvas} surface: {e}"))
        })?;
        data.resize(len, 0);
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Draw `img` stretched over the whole surface.
    pub fn draw_stretched(&mut self, img: &PreparedImage) -> FrameResult<()> {
        let fitted = resize_premul(img, self.width, self.height)?;
        over_at(
            &mut self.data,
            self.width,
            self.height,
            Layer {
                data: &fitted.rgba8_premul,
                width: fitted.width,
                height: fitted.height,
                x: 0,
                y: 0,
            },
        );
        Ok(())
    }

    /// Draw `img` resampled into `dest`, clipping at the surface edges.
    ///
    /// The rectangle is snapped to whole pixels; a rectangle that rounds to nothing draws nothing.
    /// Only the visible part of an enlarged image is resampled, so the draw size is not bounded
    /// by the surface.
    pub fn draw_image(&mut self, img: &PreparedImage, dest: Rect) -> FrameResult<()> {
        if !(dest.x0.is_finite() && dest.y0.is_finite() && dest.x1.is_finite() && dest.y1.is_finite())
        {
            return Err(FrameError::validation("draw rectangle must be finite"));
        }
        let dest = dest.abs();
        let w = dest.width().round();
        let h = dest.height().round();
        if w < 1.0 || h < 1.0 {
            return Ok(());
        }
        let (x, y) = (dest.x0.round(), dest.y0.round());
        let (sw, sh) = (f64::from(self.width), f64::from(self.height));
        let (vx0, vy0) = (x.max(0.0), y.max(0.0));
        let (vx1, vy1) = ((x + w).min(sw), (y + h).min(sh));
        if vx0 >= vx1 || vy0 >= vy1 {
            return Ok(());
        }

        let fits_surface = w <= sw && h <= sh;
        let shrinks = w <= f64::from(img.width) && h <= f64::from(img.height);
        if fits_surface || shrinks {
            let scaled = resize_premul(img, w as u32, h as u32)?;
            over_at(
                &mut self.data,
                self.width,
                self.height,
                Layer {
                    data: &scaled.rgba8_premul,
                    width: scaled.width,
                    height: scaled.height,
                    x: x as i64,
                    y: y as i64,
                },
            );
            return Ok(());
        }

        let src = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
            img.width,
            img.height,
            &img.rgba8_premul[..],
        )
        .ok_or_else(|| FrameError::composite_decode("image buffer does not match its dimensions"))?;
        let (pw, ph) = ((vx1 - vx0) as u32, (vy1 - vy0) as u32);
        let mut patch = Vec::with_capacity(pw as usize * ph as usize * 4);
        for py in 0..ph {
            let v = ((vy0 - y + f64::from(py) + 0.5) / h).clamp(0.0, 1.0) as f32;
            for px in 0..pw {
                let u = ((vx0 - x + f64::from(px) + 0.5) / w).clamp(0.0, 1.0) as f32;
                let texel = image::imageops::sample_bilinear(&src, u, v).map_or([0; 4], |p| p.0);
                patch.extend_from_slice(&texel);
            }
        }
        over_at(
            &mut self.data,
            self.width,
            self.height,
            Layer {
                data: &patch,
                width: pw,
                height: ph,
                x: vx0 as i64,
                y: vy0 as i64,
            },
        );
        Ok(())
    }

    /// Straight-alpha copy suitable for encoding.
    pub fn to_rgba_image(&self) -> FrameResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| FrameError::canvas_unavailable("surface buffer does not match its dimensions"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/surface.rs"]
mod tests;
