use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Scale and offset applied to the static (non-blendshape) part of a model
/// before rotation: `p' = (p + offset) * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticCalibration {
    pub scale: f32,
    pub offset: Vec3,
}

impl Default for StaticCalibration {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl StaticCalibration {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec3::ZERO,
    };

    pub fn new(scale: f32, offset: Vec3) -> Self {
        Self { scale, offset }
    }

    pub fn apply(&self, point: Vec3) -> Vec3 {
        (point + self.offset) * self.scale
    }

    pub fn is_finite(&self) -> bool {
        self.scale.is_finite() && self.offset.is_finite()
    }
}

/// Per-model static-vertex calibration, keyed by model name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationTable {
    pub models: BTreeMap<String, StaticCalibration>,
}

impl Default for CalibrationTable {
    fn default() -> Self {
        let mut models = BTreeMap::new();
        models.insert(
            "Man".to_string(),
            StaticCalibration::new(0.069982, Vec3::new(0.0, -109.965637, -4.265675)),
        );
        models.insert(
            "OldMan".to_string(),
            StaticCalibration::new(0.167268, Vec3::new(0.0, 0.35782, 0.62820)),
        );
        Self { models }
    }
}

impl CalibrationTable {
    pub fn empty() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    /// Calibration for `model`, or identity when the model has no entry.
    pub fn lookup(&self, model: &str) -> StaticCalibration {
        self.models.get(model).copied().unwrap_or_default()
    }

    pub fn insert(&mut self, model: &str, calibration: StaticCalibration) {
        self.models.insert(model.to_string(), calibration);
    }
}
