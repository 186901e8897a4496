use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};

/// Coefficient slots driven by the measured pupil position instead of the
/// tracker's own estimate.
///
/// The slot positions are part of the blendshape database contract. Defaults
/// match the 46-expression layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GazeLayout {
    /// Set to `+pupil.x`.
    pub horizontal: [usize; 2],
    /// Set to `-pupil.x`.
    pub horizontal_mirrored: [usize; 2],
    /// Set to `+pupil.y`.
    pub vertical: [usize; 2],
    /// Set to `-pupil.y`.
    pub vertical_mirrored: [usize; 2],
}

impl Default for GazeLayout {
    fn default() -> Self {
        Self {
            horizontal: [6, 7],
            horizontal_mirrored: [10, 11],
            vertical: [12, 13],
            vertical_mirrored: [4, 5],
        }
    }
}

impl GazeLayout {
    fn slots(&self, pupil: Vec2) -> [(usize, f32); 8] {
        let [h0, h1] = self.horizontal;
        let [hm0, hm1] = self.horizontal_mirrored;
        let [v0, v1] = self.vertical;
        let [vm0, vm1] = self.vertical_mirrored;
        [
            (h0, pupil.x),
            (h1, pupil.x),
            (hm0, -pupil.x),
            (hm1, -pupil.x),
            (v0, pupil.y),
            (v1, pupil.y),
            (vm0, -pupil.y),
            (vm1, -pupil.y),
        ]
    }

    /// Smallest coefficient vector length this layout can write into.
    pub fn required_len(&self) -> usize {
        self.slots(Vec2::ZERO)
            .iter()
            .map(|(index, _)| index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Overwrite the gaze slots of `coefficients` from `pupil`. No other slot
    /// is touched.
    pub fn apply(&self, coefficients: &mut [f32], pupil: Vec2) -> Result<()> {
        let required = self.required_len();
        if coefficients.len() < required {
            return Err(MeshError::DimensionMismatch {
                expected: required,
                actual: coefficients.len(),
            });
        }

        for (index, value) in self.slots(pupil) {
            coefficients[index] = value;
        }
        Ok(())
    }
}
