use super::*;

#[test]
fn ids_display_with_prefix_and_order_numerically() {
    assert_eq!(ImageId(7).to_string(), "img-7");
    assert!(ImageId(2) < ImageId(10));
}

#[test]
fn status_display_carries_failure_message() {
    assert_eq!(ImageStatus::Pending.to_string(), "pending");
    assert_eq!(
        ImageStatus::Failed("Insufficient credits".to_string()).to_string(),
        "failed: Insufficient credits"
    );
    assert!(ImageStatus::Ready.is_ready());
    assert!(!ImageStatus::Processing.is_ready());
}

#[test]
fn new_record_starts_pending_with_default_placement() {
    let probe = ImageProbe {
        format: image::ImageFormat::Png,
        width: 3,
        height: 2,
    };
    let rec = ImageRecord::new(
        ImageId(1),
        "a.png".to_string(),
        vec![1, 2, 3],
        probe,
        PlacementState::default(),
    );
    assert_eq!(rec.status(), &ImageStatus::Pending);
    assert_eq!(rec.placement(), PlacementState::default());
    assert!(rec.cutout().is_none());
    assert_eq!(rec.original(), &[1, 2, 3]);
    assert_eq!(rec.label(), "a.png");
}
