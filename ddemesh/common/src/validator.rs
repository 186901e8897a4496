use api::{FrameSignal, ModuleLogger, TrackedFrame, TrackingEngine};
use log::{debug, warn};

use crate::config::{DetectionConfig, StressConfig};
use crate::error::{MeshError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Usable,
    /// Skip this frame, keep whatever was computed before.
    Unreliable,
    /// Tracking state is garbage; reset the tracker and start over.
    Corrupt,
}

impl StressConfig {
    pub fn classify(&self, signal: FrameSignal) -> FrameStatus {
        if signal.failure_stress > self.corrupt {
            FrameStatus::Corrupt
        } else if signal.failure_stress > self.unreliable || !signal.tracked {
            FrameStatus::Unreliable
        } else {
            FrameStatus::Usable
        }
    }

    /// Same decision expressed as the error taxonomy.
    pub fn check(&self, signal: FrameSignal) -> Result<()> {
        match self.classify(signal) {
            FrameStatus::Usable => Ok(()),
            FrameStatus::Unreliable => Err(MeshError::UnreliableFrame {
                stress: signal.failure_stress,
            }),
            FrameStatus::Corrupt => Err(MeshError::TrackingLost {
                stress: signal.failure_stress,
            }),
        }
    }
}

/// Initialize `engine` under the given module name.
pub fn initialize_engine<E: TrackingEngine + ?Sized>(engine: &mut E, name: &str) -> Result<()> {
    engine
        .initialize(ModuleLogger::new(name))
        .map_err(|e| MeshError::Engine(format!("{:#}", e)))
}

/// Run the engine until it produces a usable frame, at most
/// `detection.max_attempts` times. Corrupt frames reset the engine before the
/// next attempt.
pub fn acquire_usable_frame<E: TrackingEngine + ?Sized>(
    engine: &mut E,
    detection: &DetectionConfig,
    stress: &StressConfig,
) -> Result<TrackedFrame> {
    let mut frame = TrackedFrame::default();
    for attempt in 1..=detection.max_attempts {
        engine
            .update(&mut frame)
            .map_err(|e| MeshError::Engine(format!("{:#}", e)))?;

        match stress.classify(frame.validate_frame()) {
            FrameStatus::Usable => {
                debug!("Face acquired on attempt {}", attempt);
                return Ok(frame);
            }
            FrameStatus::Unreliable => {
                if frame.tracked {
                    warn!(
                        "Attempt {}: unreliable face result (stress {})",
                        attempt, frame.failure_stress
                    );
                } else {
                    warn!("Attempt {}: face not found", attempt);
                }
            }
            FrameStatus::Corrupt => {
                warn!(
                    "Attempt {}: face result corrupt (stress {}), resetting tracker",
                    attempt, frame.failure_stress
                );
                engine.reset();
            }
        }
    }

    Err(MeshError::DetectionFailed {
        attempts: detection.max_attempts,
    })
}
