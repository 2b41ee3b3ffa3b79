//! A single live object within one scene attempt.

use std::cell::Cell;
use std::collections::HashMap;

use cgmath::{Deg, Rotation3, Vector3};

use crate::data_structures::aabb::Aabb;
use crate::data_structures::face::Face;
use crate::data_structures::instance::Instance;
use crate::resources::{Pose, Ray, Shape};

/// One object of the scene under construction.
///
/// Owns its transform, the local hull corners its bounding box is derived
/// from, the directional rays used for pointing checks, and the per-face
/// adjacency bookkeeping of touching relations. The world bounding box is
/// recomputed lazily after any transform mutation.
#[derive(Clone, Debug)]
pub struct SceneObject {
    id: u32,
    pub shape: Shape,
    pub color: String,
    pub pose: Pose,
    hull: Vec<Vector3<f32>>,
    rays: Vec<Ray>,
    instance: Instance,
    bbox: Cell<Option<Aabb>>,
    touching: HashMap<Face, u32>,
}

impl SceneObject {
    pub fn new(
        id: u32,
        shape: Shape,
        color: String,
        pose: Pose,
        hull: Vec<Vector3<f32>>,
        rays: Vec<Ray>,
    ) -> Self {
        let mut object = Self {
            id,
            shape,
            color,
            pose,
            hull,
            rays,
            instance: Instance::new(),
            bbox: Cell::new(None),
            touching: HashMap::new(),
        };
        object.set_to_ground();
        object
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Stable label used in exports, e.g. `block_0`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.shape, self.id)
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn position(&self) -> Vector3<f32> {
        self.instance.position
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.instance.position = position;
        self.bbox.set(None);
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.instance.position += offset;
        self.bbox.set(None);
    }

    /// Rotate about the world z axis by `deg` degrees, then re-ground.
    pub fn rotate_z(&mut self, deg: f32) {
        let rotation = cgmath::Quaternion::from_angle_z(Deg(deg));
        self.instance.rotation = rotation * self.instance.rotation;
        self.bbox.set(None);
        self.set_to_ground();
    }

    /// Shift along z so the hull bottom rests exactly on the ground plane.
    ///
    /// Keeps x and y untouched so re-grounding after a rotation does not
    /// disturb an already-sampled position.
    pub fn set_to_ground(&mut self) {
        let bottom = self.world_bbox().min.z;
        self.instance.position.z -= bottom;
        self.bbox.set(None);
    }

    /// World-space bounding box of the transformed hull corners.
    pub fn world_bbox(&self) -> Aabb {
        if let Some(bbox) = self.bbox.get() {
            return bbox;
        }
        let instance = &self.instance;
        let bbox = Aabb::from_points(self.hull.iter().map(|&c| instance.transform_point(c)))
            .unwrap_or(Aabb {
                min: instance.position,
                max: instance.position,
            });
        self.bbox.set(Some(bbox));
        bbox
    }

    /// Directional rays in world space.
    pub fn world_rays(&self) -> Vec<Ray> {
        self.rays
            .iter()
            .map(|ray| Ray {
                origin: self.instance.transform_point(ray.origin),
                dir: self.instance.transform_dir(ray.dir),
            })
            .collect()
    }

    /// Local direction of the first (primary) ray, if the shape has any.
    pub fn primary_ray_dir(&self) -> Option<Vector3<f32>> {
        self.rays.first().map(|ray| ray.dir)
    }

    pub fn touching(&self) -> &HashMap<Face, u32> {
        &self.touching
    }

    pub fn set_touching(&mut self, face: Face, other: u32) {
        self.touching.insert(face, other);
    }

    /// Lateral faces not currently occupied by a touching partner.
    ///
    /// Top and bottom are excluded: stacking is the unresolved on-top-of
    /// relation and the bottom always faces the ground.
    pub fn free_faces(&self) -> Vec<Face> {
        Face::LATERAL
            .into_iter()
            .filter(|face| !self.touching.contains_key(face))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{CatalogProvider, ShapeProvider};
    use approx::assert_relative_eq;

    fn block() -> SceneObject {
        let provider = CatalogProvider;
        let hull = provider.hull(Shape::Block, Pose::Upright).unwrap();
        let rays = provider.rays(Shape::Block, Pose::Upright).unwrap();
        SceneObject::new(0, Shape::Block, "blue".to_string(), Pose::Upright, hull, rays)
    }

    #[test]
    fn new_object_rests_on_ground() {
        let object = block();
        assert_relative_eq!(object.world_bbox().min.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn rotation_keeps_object_grounded_and_in_place() {
        let mut object = block();
        object.set_position(Vector3::new(2.0, 3.0, object.position().z));
        object.rotate_z(37.0);
        assert_relative_eq!(object.position().x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(object.position().y, 3.0, epsilon = 1e-5);
        assert_relative_eq!(object.world_bbox().min.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn bbox_follows_translation() {
        let mut object = block();
        let before = object.world_bbox();
        object.translate(Vector3::new(1.0, 0.0, 0.0));
        let after = object.world_bbox();
        assert_relative_eq!(after.min.x, before.min.x + 1.0, epsilon = 1e-5);
    }

    #[test]
    fn occupied_faces_are_not_free() {
        let mut object = block();
        assert_eq!(object.free_faces().len(), 4);
        object.set_touching(Face::Front, 7);
        let free = object.free_faces();
        assert_eq!(free.len(), 3);
        assert!(!free.contains(&Face::Front));
    }
}
