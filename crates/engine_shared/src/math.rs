// crates/engine_shared/src/math.rs
use glam::{Mat4, Quat, Vec3};

/// Chainable model transform.
///
/// Each call right-multiplies, so `translate(..).scale(..)` scales the quad
/// first and then moves it, which is what per-tile placement wants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3D {
    matrix: Mat4,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform3D {
    pub const fn new() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    pub fn translate(self, x: f32, y: f32, z: f32) -> Self {
        self.then(Mat4::from_translation(Vec3::new(x, y, z)))
    }

    pub fn scale(self, x: f32, y: f32, z: f32) -> Self {
        self.then(Mat4::from_scale(Vec3::new(x, y, z)))
    }

    pub fn rotate_x(self, radians: f32) -> Self {
        self.then(Mat4::from_quat(Quat::from_rotation_x(radians)))
    }

    pub fn rotate_y(self, radians: f32) -> Self {
        self.then(Mat4::from_quat(Quat::from_rotation_y(radians)))
    }

    pub fn rotate_z(self, radians: f32) -> Self {
        self.then(Mat4::from_quat(Quat::from_rotation_z(radians)))
    }

    /// Inverse of `to_cols_array_2d`.
    pub fn from_cols_array_2d(cols: &[[f32; 4]; 4]) -> Self {
        Self {
            matrix: Mat4::from_cols_array_2d(cols),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Column-major layout, ready for a uniform/instance buffer.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.matrix.to_cols_array_2d()
    }

    /// World-space position of the transformed origin.
    pub fn origin(&self) -> Vec3 {
        self.matrix.transform_point3(Vec3::ZERO)
    }

    fn then(self, op: Mat4) -> Self {
        Self {
            matrix: self.matrix * op,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_then_scale_keeps_center() {
        let tf = Transform3D::new().translate(1.5, 2.5, 0.0).scale(0.1, 0.1, 0.1);
        assert_eq!(tf.origin(), Vec3::new(1.5, 2.5, 0.0));

        // A unit corner lands at center + half the scaled size.
        let corner = tf.matrix().transform_point3(Vec3::new(0.5, 0.5, 0.0));
        assert!((corner.x - 1.55).abs() < 1e-5);
        assert!((corner.y - 2.55).abs() < 1e-5);
    }

    #[test]
    fn column_arrays_round_trip() {
        let tf = Transform3D::new().translate(3.0, -1.0, 0.5).scale(2.0, 2.0, 1.0);
        assert_eq!(Transform3D::from_cols_array_2d(&tf.to_cols_array_2d()), tf);
    }

    #[test]
    fn identity_by_default() {
        assert_eq!(Transform3D::default().matrix(), Mat4::IDENTITY);
    }
}
