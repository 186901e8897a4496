// Tracking engine that replays frames recorded from a live tracker session.

use anyhow::{bail, Context, Result};
use api::{ModuleLogger, TrackedFrame, TrackingEngine};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// On-disk recording: `{"frames": [TrackedFrame, ...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recording {
    pub frames: Vec<TrackedFrame>,
}

pub struct ReplayModule {
    frames: Vec<TrackedFrame>,
    cursor: usize,
    resets: u32,
    logger: Option<ModuleLogger>,
}

impl ReplayModule {
    pub fn new(frames: Vec<TrackedFrame>) -> Self {
        Self {
            frames,
            cursor: 0,
            resets: 0,
            logger: None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open recording {:?}", path))?;
        let recording: Recording = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse recording {:?}", path))?;
        Ok(Self::new(recording.frames))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }
}

impl TrackingEngine for ReplayModule {
    fn initialize(&mut self, logger: ModuleLogger) -> Result<()> {
        logger.info(&format!("Replaying {} recorded frame(s)", self.frames.len()));
        self.logger = Some(logger);
        Ok(())
    }

    fn update(&mut self, frame: &mut TrackedFrame) -> Result<()> {
        let Some(next) = self.frames.get(self.cursor) else {
            bail!("Recording exhausted after {} frame(s)", self.frames.len());
        };
        *frame = next.clone();
        self.cursor += 1;

        if let Some(logger) = &self.logger {
            logger.trace(&format!(
                "Frame {}: stress {}, tracked {}",
                self.cursor, frame.failure_stress, frame.tracked
            ));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.resets += 1;
        if let Some(logger) = &self.logger {
            logger.debug(&format!("Tracker reset #{} at frame {}", self.resets, self.cursor));
        }
    }

    fn unload(&mut self) {
        if let Some(logger) = &self.logger {
            logger.info(&format!(
                "Unloading replay. {} of {} frame(s) consumed, {} reset(s)",
                self.cursor,
                self.frames.len(),
                self.resets
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec2};
    use std::io::Write;

    #[test]
    fn replays_in_order_then_errors() {
        let first = TrackedFrame {
            tracked: true,
            ..Default::default()
        };
        let second = TrackedFrame {
            failure_stress: 5.0,
            ..Default::default()
        };
        let mut module = ReplayModule::new(vec![first.clone(), second.clone()]);
        let mut frame = TrackedFrame::default();

        module.update(&mut frame).unwrap();
        assert_eq!(frame, first);
        module.update(&mut frame).unwrap();
        assert_eq!(frame, second);
        assert!(module.is_exhausted());
        assert!(module.update(&mut frame).is_err());
    }

    #[test]
    fn loads_recording_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"frames": [{{"coefficients": [0.5, 0.25], "rotation": [0.0, 0.0, 0.0, 1.0],
                "failure_stress": 1.0, "tracked": true, "pupil": [0.1, -0.2]}},
               {{"tracked": false}}]}}"#
        )
        .unwrap();

        let mut module = ReplayModule::from_path(file.path()).unwrap();
        assert_eq!(module.remaining(), 2);

        let mut frame = TrackedFrame::default();
        module.update(&mut frame).unwrap();
        assert_eq!(frame.coefficients, vec![0.5, 0.25]);
        assert_eq!(frame.rotation, Quat::IDENTITY);
        assert_eq!(frame.pupil, Vec2::new(0.1, -0.2));
        assert!(frame.tracked);

        // Missing fields fall back to the defaults
        module.update(&mut frame).unwrap();
        assert_eq!(frame.coefficients.len(), api::EXPRESSION_COUNT);
        assert!(!frame.tracked);
    }

    #[test]
    fn reset_is_counted() {
        let mut module = ReplayModule::new(Vec::new());
        module.reset();
        module.reset();
        assert_eq!(module.resets(), 2);
    }
}
