//! Ray-march visibility for pointing relations.
//!
//! An observer points at whatever its directional rays reach. Each ray
//! is marched through the scene: take the nearest AABB hit, record the
//! object if it is new and not the observer, step just past the hit and
//! continue. The march is bounded by a hard step cap so a degenerate
//! scene can never hang the generator.

use cgmath::InnerSpace;

use crate::data_structures::registry::Registry;
use crate::data_structures::scene_object::SceneObject;

/// Small advance past each hit so the same surface is never re-hit.
const STEP_EPSILON: f32 = 0.01;

/// Upper bound on march steps per ray.
const MAX_RAY_STEPS: usize = 64;

/// All objects the observer's rays reach, in order of first hit.
///
/// Never contains the observer itself and never contains the same object
/// twice, even when several rays hit it. Ties on equal hit distance
/// resolve to the earlier-registered object.
pub fn pointed_at(observer: &SceneObject, registry: &Registry) -> Vec<u32> {
    let mut results = Vec::new();

    for ray in observer.world_rays() {
        if ray.dir.magnitude2() < 1e-12 {
            continue;
        }
        let dir = ray.dir.normalize();
        let mut current = ray.origin;

        for _ in 0..MAX_RAY_STEPS {
            let mut nearest: Option<(u32, f32, f32)> = None;
            for other in registry.all() {
                if other.id() == observer.id() {
                    continue;
                }
                if let Some((entry, exit)) = other.world_bbox().ray_span(current, dir) {
                    if nearest.map_or(true, |(_, best, _)| entry < best) {
                        nearest = Some((other.id(), entry, exit));
                    }
                }
            }
            let Some((id, _, exit)) = nearest else {
                break;
            };
            if !results.contains(&id) {
                results.push(id);
            }
            // March past the far side of the hit so the next cast sees
            // only what lies beyond it.
            current += dir * (exit + STEP_EPSILON);
        }
    }

    results
}
