use std::{
    io::Cursor,
    sync::atomic::{AtomicUsize, Ordering},
};

use super::*;
use crate::foundation::error::FrameError;

fn png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

struct Fixed {
    reply: Vec<u8>,
    calls: AtomicUsize,
}

impl BackgroundRemover for Fixed {
    async fn remove_background(&self, _image: Vec<u8>) -> FrameResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

#[tokio::test]
async fn decodes_the_removal_result() {
    let remover = Fixed {
        reply: png(4, 6, [0, 255, 0, 128]),
        calls: AtomicUsize::new(0),
    };
    let cutout = cut_out(&remover, png(8, 8, [1, 2, 3, 255])).await.unwrap();
    assert_eq!((cutout.image.width, cutout.image.height), (4, 6));
    assert_eq!(*cutout.encoded, remover.reply);
    assert_eq!(remover.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn undecodable_input_is_rejected_before_upload() {
    let remover = Fixed {
        reply: png(1, 1, [0, 0, 0, 255]),
        calls: AtomicUsize::new(0),
    };
    let err = cut_out(&remover, b"definitely not an image".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, FrameError::InputDecode(_)));
    assert_eq!(remover.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn garbage_result_is_a_composite_decode_error() {
    let remover = Fixed {
        reply: b"<html>gateway</html>".to_vec(),
        calls: AtomicUsize::new(0),
    };
    let err = cut_out(&remover, png(2, 2, [9, 9, 9, 255])).await.unwrap_err();
    assert!(matches!(err, FrameError::CompositeDecode(_)));
}
