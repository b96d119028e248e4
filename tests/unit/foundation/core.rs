use super::*;

#[test]
fn canvas_presets_parse() {
    assert_eq!("square".parse::<Canvas>().unwrap(), Canvas::SQUARE);
    assert_eq!("square-small".parse::<Canvas>().unwrap(), Canvas::SQUARE_SMALL);
    assert_eq!("Portrait".parse::<Canvas>().unwrap(), Canvas::PORTRAIT);
}

#[test]
fn canvas_explicit_dimensions_parse() {
    let c: Canvas = "640x480".parse().unwrap();
    assert_eq!(c.width, 640);
    assert_eq!(c.height, 480);
    assert_eq!(c.min_dim(), 480);
    assert_eq!(c.to_string(), "640x480");
}

#[test]
fn canvas_rejects_empty_and_oversized() {
    assert!(matches!(
        Canvas::new(0, 10),
        Err(FrameError::CanvasUnavailable(_))
    ));
    assert!(matches!(
        Canvas::new(Canvas::MAX_DIM + 1, 10),
        Err(FrameError::CanvasUnavailable(_))
    ));
    assert!("12xabc".parse::<Canvas>().is_err());
    assert!("huge".parse::<Canvas>().is_err());
}

#[test]
fn canvas_serde_uses_string_form() {
    let json = serde_json::to_string(&Canvas::PORTRAIT).unwrap();
    assert_eq!(json, "\"412x917\"");
    let back: Canvas = serde_json::from_str("\"square\"").unwrap();
    assert_eq!(back, Canvas::SQUARE);
}
