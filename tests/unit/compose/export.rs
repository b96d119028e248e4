use std::path::PathBuf;

use super::*;
use crate::foundation::core::Canvas;

#[test]
fn file_name_uses_timestamp() {
    assert_eq!(export_file_name(1700000000123), "framed-selfie-1700000000123.png");
}

#[tokio::test]
async fn namer_never_repeats_within_a_run() {
    let dir = PathBuf::from("target").join("unit_export_names");
    std::fs::create_dir_all(&dir).unwrap();

    let mut namer = ExportNamer::default();
    let a = namer.next_path(&dir, 5).await.unwrap();
    let b = namer.next_path(&dir, 5).await.unwrap();
    let c = namer.next_path(&dir, 3).await.unwrap();
    assert_eq!(a, dir.join("framed-selfie-5.png"));
    assert_eq!(b, dir.join("framed-selfie-6.png"));
    assert_eq!(c, dir.join("framed-selfie-7.png"));
}

#[tokio::test]
async fn namer_skips_existing_files() {
    let dir = PathBuf::from("target").join("unit_export_existing");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("framed-selfie-42.png"), b"x").unwrap();

    let mut namer = ExportNamer::default();
    assert_eq!(
        namer.next_path(&dir, 42).await.unwrap(),
        dir.join("framed-selfie-43.png")
    );
}

#[test]
fn encode_png_roundtrips_dimensions() {
    let mut surface = Surface::new(Canvas::new(5, 3).unwrap()).unwrap();
    surface.data[..4].copy_from_slice(&[255, 255, 255, 255]);
    let bytes = encode_png(&surface).unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (5, 3));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(decoded.get_pixel(4, 2).0[3], 0);
}

#[tokio::test]
async fn write_png_creates_directory() {
    let dir = PathBuf::from("target").join("unit_export_write").join("nested");
    let _ = std::fs::remove_dir_all(&dir);
    let surface = Surface::new(Canvas::new(2, 2).unwrap()).unwrap();

    let path = ExportNamer::default()
        .write_png(&dir, &surface)
        .await
        .unwrap();
    assert!(path.exists());
    assert!(
        path.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("framed-selfie-")
    );
}

#[tokio::test]
async fn write_bytes_creates_parents() {
    let path = PathBuf::from("target")
        .join("unit_export_bytes")
        .join("deep")
        .join("cutout.png");
    let _ = std::fs::remove_file(&path);
    write_bytes(&path, b"abc").await.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"abc");
}
