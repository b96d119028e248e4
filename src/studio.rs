//! Per-image records and the concurrent removal pipeline.
//!
//! A [`Studio`] owns every image the user added, keyed by [`ImageId`]. Background removal runs
//! one task per image; each task works on its own copy of the input and its outcome is written
//! back to that image's record only, so one failure never touches the others.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::task::JoinSet;

use crate::{
    assets::probe_input,
    compose::{Composite, CompositeRequest, ExportNamer, compose, write_bytes},
    foundation::{
        core::Canvas,
        error::{FrameError, FrameResult},
    },
    frames::LoadedFrame,
    placement::{PlacementPolicy, PlacementState},
    removal::BackgroundRemover,
};

pub(crate) mod pipeline;
pub(crate) mod record;

pub use pipeline::cut_out;
pub use record::{Cutout, ImageId, ImageRecord, ImageStatus};

/// Outcome of one [`Studio::process_pending`] run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Images whose cut-out is now available.
    pub ready: Vec<ImageId>,
    /// Images that failed, with the message stored on their record.
    pub failed: Vec<(ImageId, String)>,
}

impl BatchReport {
    pub fn all_ready(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Image arena plus the frame and canvas every image is composed with.
pub struct Studio<R: BackgroundRemover> {
    remover: Arc<R>,
    policy: PlacementPolicy,
    canvas: Canvas,
    frame: Option<LoadedFrame>,
    records: BTreeMap<ImageId, ImageRecord>,
    next_id: u64,
    namer: ExportNamer,
}

impl<R: BackgroundRemover> Studio<R> {
    pub fn new(remover: R, policy: PlacementPolicy, canvas: Canvas) -> FrameResult<Self> {
        policy.validate()?;
        Ok(Self {
            remover: Arc::new(remover),
            policy,
            canvas,
            frame: None,
            records: BTreeMap::new(),
            next_id: 1,
            namer: ExportNamer::default(),
        })
    }

    pub fn remover(&self) -> &R {
        &self.remover
    }

    pub fn policy(&self) -> &PlacementPolicy {
        &self.policy
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    /// Make `frame` the current frame for every subsequent render.
    pub fn select_frame(&mut self, frame: LoadedFrame) {
        tracing::debug!(frame = %frame.descriptor.id, "frame selected");
        self.frame = Some(frame);
    }

    pub fn frame(&self) -> Option<&LoadedFrame> {
        self.frame.as_ref()
    }

    /// Register an encoded photo. It must decode as an image; nothing is uploaded yet.
    pub fn add_image(&mut self, label: impl Into<String>, bytes: Vec<u8>) -> FrameResult<ImageId> {
        let label = label.into();
        let probe = probe_input(&bytes).map_err(|e| match e {
            FrameError::InputDecode(msg) => FrameError::input_decode(format!("{label}: {msg}")),
            other => other,
        })?;
        let id = ImageId(self.next_id);
        self.next_id += 1;
        tracing::debug!(image = %id, %label, probe.width, probe.height, "image added");
        let placement = self.policy.initial_state();
        self.records
            .insert(id, ImageRecord::new(id, label, bytes, probe, placement));
        Ok(id)
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageRecord> {
        self.records.get(&id)
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove the background of one image, whatever its current status.
    ///
    /// The outcome is stored on the record; an error is also returned to the caller.
    #[tracing::instrument(skip(self), fields(image = %id))]
    pub async fn process(&mut self, id: ImageId) -> FrameResult<()> {
        let original = {
            let record = self.record_mut(id)?;
            record.status = ImageStatus::Processing;
            Arc::clone(&record.original)
        };

        let outcome = cut_out(self.remover.as_ref(), original.as_ref().clone()).await;
        let record = self.record_mut(id)?;
        match outcome {
            Ok(cutout) => {
                record.cutout = Some(cutout);
                record.status = ImageStatus::Ready;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(image = %id, error = %err, "background removal failed");
                record.status = ImageStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Remove the background of every pending image concurrently.
    ///
    /// Every pending image is attempted; failures are recorded per image and reported, never
    /// propagated.
    #[tracing::instrument(skip(self))]
    pub async fn process_pending(&mut self) -> BatchReport {
        let mut tasks = JoinSet::new();
        for record in self.records.values_mut() {
            if record.status != ImageStatus::Pending {
                continue;
            }
            record.status = ImageStatus::Processing;
            let id = record.id;
            let remover = Arc::clone(&self.remover);
            let original = Arc::clone(&record.original);
            tasks.spawn(async move {
                let outcome = cut_out(remover.as_ref(), original.as_ref().clone()).await;
                (id, outcome)
            });
        }
        tracing::info!(count = tasks.len(), "processing batch");

        while let Some(joined) = tasks.join_next().await {
            let (id, outcome) = match joined {
                Ok(done) => done,
                Err(err) => {
                    tracing::warn!(error = %err, "removal task did not complete");
                    continue;
                }
            };
            let Some(record) = self.records.get_mut(&id) else {
                continue;
            };
            match outcome {
                Ok(cutout) => {
                    record.cutout = Some(cutout);
                    record.status = ImageStatus::Ready;
                }
                Err(err) => {
                    tracing::warn!(image = %id, error = %err, "background removal failed");
                    record.status = ImageStatus::Failed(err.to_string());
                }
            }
        }

        // A task that panicked leaves its record in flight.
        for record in self.records.values_mut() {
            if record.status == ImageStatus::Processing {
                record.status = ImageStatus::Failed("removal task did not complete".to_string());
            }
        }

        let mut report = BatchReport::default();
        for record in self.records.values() {
            match &record.status {
                ImageStatus::Ready => report.ready.push(record.id),
                ImageStatus::Failed(msg) => report.failed.push((record.id, msg.clone())),
                ImageStatus::Pending | ImageStatus::Processing => {}
            }
        }
        report
    }

    /// Set an image's zoom (clamped).
    pub fn set_scale(&mut self, id: ImageId, scale: f64) -> FrameResult<PlacementState> {
        self.update_placement(id, |p| p.set_scale(scale))
    }

    pub fn zoom_in(&mut self, id: ImageId) -> FrameResult<PlacementState> {
        self.update_placement(id, PlacementState::zoom_in)
    }

    pub fn zoom_out(&mut self, id: ImageId) -> FrameResult<PlacementState> {
        self.update_placement(id, PlacementState::zoom_out)
    }

    /// Set an image's pan in offset units (clamped).
    pub fn set_offset(&mut self, id: ImageId, x: f64, y: f64) -> FrameResult<PlacementState> {
        self.update_placement(id, |p| p.set_offset(x, y))
    }

    /// Shift an image's pan by a drag delta (clamped).
    pub fn nudge(&mut self, id: ImageId, dx: f64, dy: f64) -> FrameResult<PlacementState> {
        self.update_placement(id, |p| p.nudge(dx, dy))
    }

    pub fn reset_placement(&mut self, id: ImageId) -> FrameResult<PlacementState> {
        self.update_placement(id, PlacementState::reset)
    }

    /// Drop one image.
    pub fn remove_image(&mut self, id: ImageId) -> FrameResult<ImageRecord> {
        self.records.remove(&id).ok_or_else(|| unknown_image(id))
    }

    /// Drop every image. Ids keep counting up.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Compose one ready image onto the current frame.
    pub fn render(&self, id: ImageId) -> FrameResult<Composite> {
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| FrameError::validation("no frame selected"))?;
        let record = self.records.get(&id).ok_or_else(|| unknown_image(id))?;
        let cutout = match (&record.status, &record.cutout) {
            (ImageStatus::Ready, Some(cutout)) => cutout,
            (status, _) => {
                return Err(FrameError::validation(format!(
                    "image {id} is not ready ({status})"
                )));
            }
        };

        compose(
            &CompositeRequest {
                frame: &frame.art,
                border_px: frame.border_px(self.canvas),
                subject: &cutout.image,
                placement: record.placement,
                canvas: self.canvas,
            },
            &self.policy,
        )
    }

    /// Render one image and write it as `framed-selfie-<millis>.png` under `dir`.
    pub async fn export(&mut self, id: ImageId, dir: &Path) -> FrameResult<PathBuf> {
        let composite = self.render(id)?;
        self.namer.write_png(dir, &composite.surface).await
    }

    /// Export every ready image, one after another, in insertion order.
    ///
    /// A failed export is reported in its slot; the remaining images are still written.
    pub async fn export_all(&mut self, dir: &Path) -> Vec<(ImageId, FrameResult<PathBuf>)> {
        let ready: Vec<ImageId> = self
            .records
            .values()
            .filter(|r| r.status.is_ready())
            .map(|r| r.id)
            .collect();
        let mut exported = Vec::with_capacity(ready.len());
        for id in ready {
            let result = self.export(id, dir).await;
            if let Err(err) = &result {
                tracing::warn!(image = %id, error = %err, "export failed");
            }
            exported.push((id, result));
        }
        exported
    }

    /// Write an image's cut-out, exactly as the remover returned it, next to `composite_path`
    /// (`<name>.cutout.png`).
    pub async fn export_cutout(&self, id: ImageId, composite_path: &Path) -> FrameResult<PathBuf> {
        let record = self.records.get(&id).ok_or_else(|| unknown_image(id))?;
        let cutout = record
            .cutout
            .as_ref()
            .ok_or_else(|| FrameError::validation(format!("image {id} has no cut-out")))?;
        let path = composite_path.with_extension("cutout.png");
        write_bytes(&path, &cutout.encoded).await?;
        tracing::debug!(image = %id, path = %path.display(), "wrote cut-out");
        Ok(path)
    }

    fn record_mut(&mut self, id: ImageId) -> FrameResult<&mut ImageRecord> {
        self.records.get_mut(&id).ok_or_else(|| unknown_image(id))
    }

    fn update_placement(
        &mut self,
        id: ImageId,
        f: impl FnOnce(&mut PlacementState),
    ) -> FrameResult<PlacementState> {
        let record = self.record_mut(id)?;
        f(&mut record.placement);
        Ok(record.placement)
    }
}

fn unknown_image(id: ImageId) -> FrameError {
    FrameError::validation(format!("unknown image '{id}'"))
}

#[cfg(test)]
#[path = "../tests/unit/studio/studio.rs"]
mod tests;
