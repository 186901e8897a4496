use glam::{Mat3, Quat, Vec3};

/// Head pose rotation derived once per frame from the tracker quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadRotation {
    matrix: Mat3,
}

impl Default for HeadRotation {
    fn default() -> Self {
        Self {
            matrix: Mat3::IDENTITY,
        }
    }
}

impl HeadRotation {
    /// Closed-form quaternion to rotation matrix.
    ///
    /// The quaternion is not renormalized; a non-unit input yields a scaled,
    /// non-orthonormal matrix.
    pub fn from_quat(q: Quat) -> Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let (xy, yz, zx) = (x * y, y * z, z * x);
        let (x2, y2, z2) = (x * x, y * y, z * z);
        let (xw, yw, zw) = (x * w, y * w, z * w);

        let rows = [
            Vec3::new(1.0 - 2.0 * (y2 + z2), 2.0 * (xy - zw), 2.0 * (zx + yw)),
            Vec3::new(2.0 * (xy + zw), 1.0 - 2.0 * (x2 + z2), 2.0 * (yz - xw)),
            Vec3::new(2.0 * (zx - yw), 2.0 * (yz + xw), 1.0 - 2.0 * (x2 + y2)),
        ];
        // Mat3 is column-major
        Self {
            matrix: Mat3::from_cols(rows[0], rows[1], rows[2]).transpose(),
        }
    }

    pub fn matrix(&self) -> Mat3 {
        self.matrix
    }

    /// Row `i` of the rotation.
    pub fn row(&self, i: usize) -> Vec3 {
        self.matrix.row(i)
    }

    /// Flip z into the tracker's camera space, then rotate.
    ///
    /// Order matters: rotating first and negating afterwards changes the sign
    /// convention of the whole output mesh.
    pub fn apply(&self, point: Vec3) -> Vec3 {
        let flipped = Vec3::new(point.x, point.y, -point.z);
        Vec3::new(
            self.row(0).dot(flipped),
            self.row(1).dot(flipped),
            self.row(2).dot(flipped),
        )
    }

    pub fn apply_all(&self, points: &mut [Vec3]) {
        for p in points.iter_mut() {
            *p = self.apply(*p);
        }
    }
}
