use std::path::PathBuf;

use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./frames//gold.png").unwrap(), "frames/gold.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn normalize_path_rejects_escapes_anywhere() {
    assert_eq!(normalize_rel_path("frames/./gold.png").unwrap(), "frames/gold.png");
    let err = normalize_rel_path("frames/../../secret.png").unwrap_err();
    assert!(err.to_string().contains("leaves the catalog directory"));
    let err = normalize_rel_path("\\abs.png").unwrap_err();
    assert!(err.to_string().contains("is absolute"));
    assert!(normalize_rel_path("").unwrap_err().to_string().contains("names no file"));
}

#[test]
fn parse_classifies_urls_and_paths() {
    assert_eq!(
        FrameSource::parse("https://example.com/f.png").unwrap(),
        FrameSource::Url("https://example.com/f.png".to_string())
    );
    assert_eq!(
        FrameSource::parse("./frame2.png").unwrap(),
        FrameSource::Path("frame2.png".to_string())
    );
}

#[tokio::test]
async fn load_path_source_reads_relative_to_root() {
    let dir = PathBuf::from("target").join("unit_source");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("f.bin"), b"abc").unwrap();

    let http = reqwest::Client::new();
    let bytes = load_source_bytes(&FrameSource::Path("f.bin".to_string()), &dir, &http)
        .await
        .unwrap();
    assert_eq!(bytes, b"abc");

    let missing = load_source_bytes(&FrameSource::Path("nope.bin".to_string()), &dir, &http).await;
    assert!(matches!(missing, Err(FrameError::Other(_))));
}
