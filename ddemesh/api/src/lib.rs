use anyhow::Result;
use glam::{Quat, Vec2};
use serde::{Deserialize, Serialize};

/// Number of expression coefficients the tracking engine reports per frame.
pub const EXPRESSION_COUNT: usize = 46;

/// Nominal range of a single expression coefficient. Values outside it are
/// engine extremes and are passed through untouched.
pub const EXPR_COEF_MIN: f32 = -1.0;
pub const EXPR_COEF_MAX: f32 = 1.0;

/// Confidence signal the engine attaches to every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSignal {
    pub failure_stress: f32,
    pub tracked: bool,
}

/// Everything the engine hands over for one tracked frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackedFrame {
    pub coefficients: Vec<f32>,
    /// Head rotation as (x, y, z, w). Assumed unit length.
    pub rotation: Quat,
    pub failure_stress: f32,
    pub tracked: bool,
    pub pupil: Vec2,
}

impl Default for TrackedFrame {
    fn default() -> Self {
        Self {
            coefficients: vec![0.0; EXPRESSION_COUNT],
            rotation: Quat::IDENTITY,
            failure_stress: 0.0,
            tracked: false,
            pupil: Vec2::ZERO,
        }
    }
}

impl TrackedFrame {
    pub fn validate_frame(&self) -> FrameSignal {
        FrameSignal {
            failure_stress: self.failure_stress,
            tracked: self.tracked,
        }
    }

    pub fn coefficients(&self) -> &[f32] {
        &self.coefficients
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn pupil_position(&self) -> Vec2 {
        self.pupil
    }

    /// Number of coefficients outside `[EXPR_COEF_MIN, EXPR_COEF_MAX]`.
    pub fn out_of_range_count(&self) -> usize {
        self.coefficients
            .iter()
            .filter(|c| !(EXPR_COEF_MIN..=EXPR_COEF_MAX).contains(*c))
            .count()
    }
}

/// Logger handed to engines so their output carries a per-module target.
pub struct ModuleLogger {
    target: String,
}

impl ModuleLogger {
    pub fn new(module_name: &str) -> Self {
        Self {
            target: format!("ddemesh::plugins::{}", module_name),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn error(&self, message: &str) {
        self.log(log::Level::Error, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(log::Level::Warn, message);
    }

    pub fn info(&self, message: &str) {
        self.log(log::Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(log::Level::Debug, message);
    }

    pub fn trace(&self, message: &str) {
        self.log(log::Level::Trace, message);
    }

    fn log(&self, level: log::Level, message: &str) {
        log::log!(target: self.target.as_str(), level, "{}", message);
    }
}

/// Capability boundary to an external face tracker.
///
/// The core never sees the tracker's internal state; it only receives the
/// frame values written by `update`.
pub trait TrackingEngine {
    fn initialize(&mut self, logger: ModuleLogger) -> Result<()>;
    /// Run the tracker on its next input and write the results into `frame`.
    fn update(&mut self, frame: &mut TrackedFrame) -> Result<()>;
    /// Discard all accumulated tracking state.
    fn reset(&mut self);
    fn unload(&mut self);
}
