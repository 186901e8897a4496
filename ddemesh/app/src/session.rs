use std::path::Path;

use api::{TrackedFrame, TrackingEngine};
use common::{
    acquire_usable_frame, ExportReport, FacePipeline, MeshError, PosedFrame, Result,
};
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A new posed mesh replaced the held one.
    Updated,
    /// Frame rejected, the previous mesh is kept.
    Skipped,
    /// Tracking was lost; the tracker was reset and the held mesh dropped.
    Reset,
}

/// Per-frame driver around one loaded model. Only the latest usable posed
/// mesh is retained.
pub struct TrackingSession<'p> {
    pipeline: &'p FacePipeline,
    held: Option<PosedFrame>,
    frame: TrackedFrame,
}

impl<'p> TrackingSession<'p> {
    pub fn new(pipeline: &'p FacePipeline) -> Self {
        Self {
            pipeline,
            held: None,
            frame: TrackedFrame::default(),
        }
    }

    pub fn held(&self) -> Option<&PosedFrame> {
        self.held.as_ref()
    }

    /// Initial detection: retry until a usable frame or the attempt budget runs out.
    pub fn start<E: TrackingEngine + ?Sized>(&mut self, engine: &mut E) -> Result<()> {
        let config = self.pipeline.config();
        self.frame = acquire_usable_frame(engine, &config.detection, &config.stress)?;
        self.held = Some(self.pipeline.evaluate(&self.frame)?);
        info!("Face acquired for model '{}'", self.pipeline.model());
        Ok(())
    }

    pub fn step<E: TrackingEngine + ?Sized>(&mut self, engine: &mut E) -> Result<FrameOutcome> {
        engine
            .update(&mut self.frame)
            .map_err(|e| MeshError::Engine(format!("{:#}", e)))?;

        match self.pipeline.evaluate(&self.frame) {
            Ok(posed) => {
                debug!("Frame accepted (stress {})", self.frame.failure_stress);
                self.held = Some(posed);
                Ok(FrameOutcome::Updated)
            }
            Err(e @ (MeshError::UnreliableFrame { .. } | MeshError::DimensionMismatch { .. })) => {
                warn!("Invalid face result: {}", e);
                Ok(FrameOutcome::Skipped)
            }
            Err(e @ MeshError::TrackingLost { .. }) => {
                warn!("{}; resetting tracker", e);
                engine.reset();
                self.held = None;
                Ok(FrameOutcome::Reset)
            }
            Err(e) => Err(e),
        }
    }

    /// Export the held mesh to `output`. `None` when nothing usable is held.
    pub fn export_to(&self, output: &Path) -> Result<Option<ExportReport>> {
        let Some(posed) = &self.held else {
            return Ok(None);
        };
        let mesh_path = self.pipeline.config().mesh_path(self.pipeline.model());
        self.pipeline
            .export_to(posed, &mesh_path, output)
            .map(Some)
    }
}
