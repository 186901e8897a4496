use glam::Vec3;

use crate::blendshape::BlendshapeDatabase;
use crate::error::{MeshError, Result};

impl BlendshapeDatabase {
    /// `base[i] + sum_k coefficients[k] * delta[k][i]` for every vertex.
    ///
    /// Coefficients are used as given: no clamping or renormalization.
    pub fn deform(&self, coefficients: &[f32]) -> Result<Vec<Vec3>> {
        if coefficients.len() != self.expression_count() {
            return Err(MeshError::DimensionMismatch {
                expected: self.expression_count(),
                actual: coefficients.len(),
            });
        }

        let mut vertices = self.base_vertices.clone();
        for (delta, &weight) in self.delta_shapes.iter().zip(coefficients) {
            for (vertex, offset) in vertices.iter_mut().zip(delta) {
                *vertex += *offset * weight;
            }
        }
        Ok(vertices)
    }
}
