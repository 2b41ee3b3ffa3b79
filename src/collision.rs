//! AABB collision gate.

use crate::data_structures::registry::Registry;
use crate::data_structures::scene_object::SceneObject;

/// Ids of every registered object whose world AABB overlaps `subject`.
///
/// The subject itself and anything in `exempt` are skipped. A non-empty
/// result rejects a placement; touching relations pass the relation
/// target in `exempt` because flush contact is inclusive overlap by
/// design.
pub fn colliding(subject: &SceneObject, registry: &Registry, exempt: &[u32]) -> Vec<u32> {
    let subject_bbox = subject.world_bbox();
    registry
        .all()
        .iter()
        .filter(|other| other.id() != subject.id() && !exempt.contains(&other.id()))
        .filter(|other| other.world_bbox().overlaps(&subject_bbox))
        .map(|other| other.id())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{CatalogProvider, Pose, Shape, ShapeProvider};
    use cgmath::Vector3;

    fn block_at(id: u32, x: f32) -> SceneObject {
        let provider = CatalogProvider;
        let mut object = SceneObject::new(
            id,
            Shape::Block,
            "blue".to_string(),
            Pose::Upright,
            provider.hull(Shape::Block, Pose::Upright).unwrap(),
            provider.rays(Shape::Block, Pose::Upright).unwrap(),
        );
        object.set_position(Vector3::new(x, 0.0, object.position().z));
        object
    }

    #[test]
    fn reports_overlapping_neighbours_only() {
        let mut registry = Registry::new();
        registry.register(block_at(0, 0.0)).unwrap();
        registry.register(block_at(1, 0.5)).unwrap();
        registry.register(block_at(2, 10.0)).unwrap();

        let subject = registry.get(0).unwrap().clone();
        let hits = colliding(&subject, &registry, &[]);
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn exempt_set_suppresses_expected_contact() {
        let mut registry = Registry::new();
        registry.register(block_at(0, 0.0)).unwrap();
        registry.register(block_at(1, 0.5)).unwrap();

        let subject = registry.get(0).unwrap().clone();
        assert!(colliding(&subject, &registry, &[1]).is_empty());
    }

    #[test]
    fn subject_never_collides_with_itself() {
        let mut registry = Registry::new();
        registry.register(block_at(0, 0.0)).unwrap();
        let subject = registry.get(0).unwrap().clone();
        assert!(colliding(&subject, &registry, &[]).is_empty());
    }
}
