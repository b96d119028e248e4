use std::sync::Arc;

use crate::{
    assets::{decode_image, probe_input, probe_result},
    foundation::error::FrameResult,
    removal::BackgroundRemover,
    studio::record::Cutout,
};

/// Run one image through `decode input -> remove background -> decode result`.
///
/// The input is checked before anything is uploaded, so undecodable files never cost an API call.
#[tracing::instrument(skip(remover, original), fields(input_len = original.len()))]
pub async fn cut_out<R: BackgroundRemover>(remover: &R, original: Vec<u8>) -> FrameResult<Cutout> {
    let probe = probe_input(&original)?;
    tracing::debug!(format = ?probe.format, probe.width, probe.height, "input accepted");

    let encoded = remover.remove_background(original).await?;

    let result = probe_result(&encoded)?;
    let image = decode_image(&encoded)?;
    tracing::debug!(result.width, result.height, "cut-out decoded");

    Ok(Cutout {
        encoded: Arc::new(encoded),
        image,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/studio/pipeline.rs"]
mod tests;
