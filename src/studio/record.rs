use std::{fmt, sync::Arc};

use crate::{
    assets::{ImageProbe, PreparedImage},
    placement::PlacementState,
};

/// Handle of one image in a [`Studio`](crate::studio::Studio).
///
/// Ids are handed out in insertion order and never reused within a studio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

/// Where an image is in the removal pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageStatus {
    /// Added, not sent yet.
    Pending,
    /// Background removal in flight.
    Processing,
    /// Cut-out available; the image can be rendered and exported.
    Ready,
    /// The pipeline failed; holds the user-facing message.
    Failed(String),
}

impl ImageStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Processing => f.write_str("processing"),
            Self::Ready => f.write_str("ready"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// A background-removed subject, both as returned by the API and decoded.
#[derive(Clone, Debug)]
pub struct Cutout {
    /// Encoded bytes exactly as the remover returned them.
    pub encoded: Arc<Vec<u8>>,
    /// Decoded premultiplied pixels.
    pub image: PreparedImage,
}

/// Everything the studio tracks for one image.
#[derive(Clone, Debug)]
pub struct ImageRecord {
    pub(crate) id: ImageId,
    pub(crate) label: String,
    pub(crate) original: Arc<Vec<u8>>,
    pub(crate) probe: ImageProbe,
    pub(crate) cutout: Option<Cutout>,
    pub(crate) status: ImageStatus,
    pub(crate) placement: PlacementState,
}

impl ImageRecord {
    pub(crate) fn new(
        id: ImageId,
        label: String,
        original: Vec<u8>,
        probe: ImageProbe,
        placement: PlacementState,
    ) -> Self {
        Self {
            id,
            label,
            original: Arc::new(original),
            probe,
            cutout: None,
            status: ImageStatus::Pending,
            placement,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Where the image came from (file name, `stdin`, ...).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The user's encoded photo.
    pub fn original(&self) -> &[u8] {
        &self.original
    }

    /// Header facts of the original, checked when the image was added.
    pub fn probe(&self) -> ImageProbe {
        self.probe
    }

    pub fn cutout(&self) -> Option<&Cutout> {
        self.cutout.as_ref()
    }

    pub fn status(&self) -> &ImageStatus {
        &self.status
    }

    pub fn placement(&self) -> PlacementState {
        self.placement
    }
}

#[cfg(test)]
#[path = "../../tests/unit/studio/record.rs"]
mod tests;
