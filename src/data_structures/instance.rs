//! Object transformation data.
//!
//! Per-object transform: position, rotation, and scale. Hull corners are
//! pushed through this transform to derive world-space bounding boxes.

use std::ops::Mul;

use cgmath::{ElementWise, One};

/// Per-object transformation: position, rotation (as quaternion), and scale.
///
/// Scene objects carry exactly one of these; the placement engine mutates
/// it and everything geometric (bounding boxes, rays) is derived from it.
#[derive(Clone, Debug)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Create a new instance with identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Transform a local-space point into world space.
    pub fn transform_point(&self, p: cgmath::Vector3<f32>) -> cgmath::Vector3<f32> {
        self.position + self.rotation * self.scale.mul_element_wise(p)
    }

    /// Rotate a local-space direction into world space (no translation).
    pub fn transform_dir(&self, d: cgmath::Vector3<f32>) -> cgmath::Vector3<f32> {
        self.rotation * d
    }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        let new_rotation = self.rotation * rhs.rotation;
        let new_scale = self.scale.mul_element_wise(rhs.scale);
        let scaled_rhs_pos = self.scale.mul_element_wise(rhs.position);
        let new_position = self.position + (self.rotation * scaled_rhs_pos);

        Instance {
            position: new_position,
            rotation: new_rotation,
            scale: new_scale,
        }
    }
}

impl From<cgmath::Vector3<f32>> for Instance {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Deg, Rotation3, Vector3};

    #[test]
    fn transform_point_applies_scale_rotation_translation() {
        let instance = Instance {
            position: Vector3::new(1.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::from_angle_z(Deg(90.0)),
            scale: Vector3::new(2.0, 1.0, 1.0),
        };
        let p = instance.transform_point(Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn composition_matches_sequential_transform() {
        let a = Instance {
            position: Vector3::new(0.0, 1.0, 0.0),
            rotation: cgmath::Quaternion::from_angle_z(Deg(45.0)),
            scale: Vector3::new(1.0, 1.0, 1.0),
        };
        let b = Instance::from(Vector3::new(1.0, 0.0, 0.0));
        let composed = a.clone() * b.clone();
        let p = Vector3::new(0.5, 0.5, 0.5);
        let direct = a.transform_point(b.transform_point(p));
        let via_product = composed.transform_point(p);
        assert_relative_eq!(direct.x, via_product.x, epsilon = 1e-5);
        assert_relative_eq!(direct.y, via_product.y, epsilon = 1e-5);
        assert_relative_eq!(direct.z, via_product.z, epsilon = 1e-5);
    }
}
