use std::io::Cursor;

use super::*;
use crate::{
    assets::{FrameArt, PreparedImage},
    frames::{Border, FrameDescriptor},
};

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// Echoes the upload back as its own cut-out.
struct Echo;

impl BackgroundRemover for Echo {
    async fn remove_background(&self, image: Vec<u8>) -> FrameResult<Vec<u8>> {
        Ok(image)
    }
}

fn gold_frame() -> LoadedFrame {
    LoadedFrame {
        descriptor: FrameDescriptor {
            id: "gold".to_string(),
            name: "Gold".to_string(),
            source: "gold.png".to_string(),
            border: Border::fixed(4.0),
            shadow: None,
        },
        art: FrameArt::Raster(PreparedImage {
            width: 1,
            height: 1,
            rgba8_premul: Arc::new(vec![212, 175, 55, 255]),
        }),
    }
}

fn studio() -> Studio<Echo> {
    Studio::new(Echo, PlacementPolicy::default(), Canvas::new(40, 40).unwrap()).unwrap()
}

#[test]
fn add_rejects_non_images_without_consuming_an_id() {
    let mut s = studio();
    let err = s.add_image("notes.txt", b"hello".to_vec()).unwrap_err();
    assert!(matches!(err, FrameError::InputDecode(ref m) if m.starts_with("notes.txt: ")));
    assert!(s.is_empty());

    let id = s.add_image("a.png", png(2, 2)).unwrap();
    assert_eq!(id, ImageId(1));
    assert_eq!(s.get(id).unwrap().status(), &ImageStatus::Pending);
}

#[test]
fn placement_updates_are_clamped_per_image() {
    let mut s = studio();
    let a = s.add_image("a.png", png(2, 2)).unwrap();
    let b = s.add_image("b.png", png(2, 2)).unwrap();

    assert_eq!(s.set_scale(a, 9.0).unwrap().scale(), 3.0);
    let p = s.set_offset(a, -80.0, 12.0).unwrap();
    assert_eq!((p.offset_x(), p.offset_y()), (-50.0, 12.0));
    assert_eq!(s.nudge(a, 0.0, 100.0).unwrap().offset_y(), 50.0);
    assert!((s.zoom_out(a).unwrap().scale() - 2.9).abs() < 1e-12);

    assert_eq!(s.get(b).unwrap().placement(), PlacementState::default());
    assert_eq!(s.reset_placement(a).unwrap(), PlacementState::default());

    assert!(s.zoom_in(ImageId(99)).is_err());
}

#[test]
fn render_requires_frame_and_ready_image() {
    let mut s = studio();
    let id = s.add_image("a.png", png(2, 2)).unwrap();

    let err = s.render(id).unwrap_err();
    assert!(err.to_string().contains("no frame selected"));

    s.select_frame(gold_frame());
    let err = s.render(id).unwrap_err();
    assert!(err.to_string().contains("not ready (pending)"));
}

#[tokio::test]
async fn process_then_render_draws_frame_and_subject() {
    let mut s = studio();
    s.select_frame(gold_frame());
    let id = s.add_image("a.png", png(4, 4)).unwrap();

    s.process(id).await.unwrap();
    assert!(s.get(id).unwrap().status().is_ready());

    let out = s.render(id).unwrap();
    assert_eq!(out.surface.pixel(1, 1), Some([212, 175, 55, 255]));
    assert_eq!(out.surface.pixel(20, 20), Some([200, 10, 10, 255]));
}

#[test]
fn remove_and_clear() {
    let mut s = studio();
    let a = s.add_image("a.png", png(2, 2)).unwrap();
    let b = s.add_image("b.png", png(2, 2)).unwrap();

    assert_eq!(s.remove_image(a).unwrap().label(), "a.png");
    assert!(s.remove_image(a).is_err());
    assert_eq!(s.records().map(ImageRecord::id).collect::<Vec<_>>(), vec![b]);

    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.add_image("c.png", png(2, 2)).unwrap(), ImageId(3));
}

#[test]
fn invalid_policy_is_rejected() {
    let policy = PlacementPolicy {
        fill_factor: 0.0,
        ..PlacementPolicy::default()
    };
    assert!(Studio::new(Echo, policy, Canvas::default()).is_err());
}

#[test]
fn pan_range_follows_policy_offset_span() {
    let policy = PlacementPolicy {
        offset_unit_span: 300.0,
        ..PlacementPolicy::default()
    };
    let mut s = Studio::new(Echo, policy, Canvas::new(40, 40).unwrap()).unwrap();
    let id = s.add_image("a.png", png(2, 2)).unwrap();

    let p = s.set_offset(id, 300.0, -400.0).unwrap();
    assert_eq!((p.offset_x(), p.offset_y()), (300.0, -300.0));
    assert_eq!(s.reset_placement(id).unwrap().offset_limit(), 300.0);
}
