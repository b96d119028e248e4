//! Frame selfies: remove a photo's background and composite the subject onto a decorative frame.
//!
//! The pipeline per image is `decode input -> remove background -> decode cut-out -> place ->
//! composite -> export PNG`. Placement is a pure function ([`PlacementPolicy::place`]); removal
//! goes through the [`BackgroundRemover`] seam so batches can run against a fake.
#![forbid(unsafe_code)]

pub mod assets;
pub mod compose;
pub mod config;
pub mod foundation;
pub mod frames;
pub mod placement;
pub mod removal;
pub mod studio;

pub use assets::{FrameArt, PreparedImage};
pub use compose::{Composite, CompositeRequest, ExportNamer, Surface, compose};
pub use config::StudioConfig;
pub use foundation::core::{Canvas, Rect, Size};
pub use foundation::error::{FrameError, FrameResult};
pub use frames::{Border, FrameCatalog, FrameDescriptor, LoadedFrame};
pub use placement::{PlacementInput, PlacementPolicy, PlacementState};
pub use removal::{BackgroundRemover, RemovalSettings, RemoveBgClient};
pub use studio::{BatchReport, ImageId, ImageRecord, ImageStatus, Studio};
