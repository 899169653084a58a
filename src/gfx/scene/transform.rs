use cgmath::{Matrix4, Rad, Vector3};

/// Local placement of a node relative to its parent
///
/// Rotation is Euler XYZ in radians, applied as `Rx * Ry * Rz`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vector3::new(x, y, z);
    }

    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Vector3::new(x, y, z);
    }

    /// `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, SquareMatrix, Vector4};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_is_identity() {
        assert_eq!(Transform::default().matrix(), Matrix4::identity());
    }

    #[test]
    fn test_rotation_applies_before_translation() {
        let mut transform = Transform::from_position(1.0, 2.0, 3.0);
        transform.set_rotation(FRAC_PI_2, 0.0, 0.0);

        // +Y rotated a quarter turn about X lands on +Z
        let p = transform.matrix() * Vector4::new(0.0, 1.0, 0.0, 1.0);
        let expected = Vector4::new(1.0, 2.0, 4.0, 1.0);
        assert!((p - expected).magnitude() < 1e-5);
    }
}
