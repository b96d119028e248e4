use super::*;

#[test]
fn transparent_source_leaves_destination() {
    assert_eq!(source_over([10, 20, 30, 40], [255, 255, 255, 0]), [10, 20, 30, 40]);
}

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(source_over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn translucent_source_keeps_the_uncovered_share_of_destination() {
    assert_eq!(source_over([0, 0, 0, 0], [100, 110, 120, 200]), [100, 110, 120, 200]);
    // Half-covered opaque blue under premultiplied half red.
    assert_eq!(source_over([0, 0, 255, 255], [128, 0, 0, 128]), [128, 0, 127, 255]);
}

#[test]
fn over_at_clips_negative_and_overflowing_origins() {
    let (w, h) = (4u32, 4u32);
    let mut dst = vec![0u8; (w * h * 4) as usize];
    let red = [255u8, 0, 0, 255].repeat(9);
    let layer = |x: i64, y: i64| Layer {
        data: &red,
        width: 3,
        height: 3,
        x,
        y,
    };

    // 3x3 source starting at (-1, -1) covers pixels (0..2, 0..2).
    over_at(&mut dst, w, h, layer(-1, -1));
    let px = |buf: &[u8], x: usize, y: usize| {
        let i = (y * w as usize + x) * 4;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    };
    assert_eq!(px(&dst, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&dst, 1, 1), [255, 0, 0, 255]);
    assert_eq!(px(&dst, 2, 2), [0, 0, 0, 0]);

    // Fully off-canvas draws are ignored.
    let before = dst.clone();
    over_at(&mut dst, w, h, layer(10, 0));
    over_at(&mut dst, w, h, layer(0, -5));
    assert_eq!(dst, before);

    // Bottom-right overflow is clipped, not wrapped.
    over_at(&mut dst, w, h, layer(3, 3));
    assert_eq!(px(&dst, 3, 3), [255, 0, 0, 255]);
    assert_eq!(px(&dst, 0, 3), [0, 0, 0, 0]);
}
