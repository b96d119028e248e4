use crate::foundation::math::mul_div255_u8;

/// Premultiplied source-over: `src + dst * (1 - src.a)` per channel.
pub(crate) fn source_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    match src[3] {
        0 => dst,
        255 => src,
        a => {
            let keep = 255 - u16::from(a);
            std::array::from_fn(|i| src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), keep)))
        }
    }
}

/// A premultiplied image positioned in destination pixel space.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layer<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub x: i64,
    pub y: i64,
}

/// Blend `layer` onto a `dst_w`x`dst_h` premultiplied buffer.
///
/// Regions falling outside the destination are clipped.
pub(crate) fn over_at(dst: &mut [u8], dst_w: u32, dst_h: u32, layer: Layer<'_>) {
    let Layer {
        data: src,
        width: src_w,
        height: src_h,
        x,
        y,
    } = layer;
    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + i64::from(src_w)).min(i64::from(dst_w));
    let y_end = (y + i64::from(src_h)).min(i64::from(dst_h));
    if x_start >= x_end || y_start >= y_end {
        return;
    }

    for dy in y_start..y_end {
        let sy = (dy - y) as usize;
        for dx in x_start..x_end {
            let sx = (dx - x) as usize;
            let si = (sy * src_w as usize + sx) * 4;
            let di = (dy as usize * dst_w as usize + dx as usize) * 4;
            let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            let d = [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]];
            dst[di..di + 4].copy_from_slice(&source_over(d, s));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blend.rs"]
mod tests;
