//! The placement engine: turns an instruction list into transforms.
//!
//! One call to [`Placement::realize_structure`] is one scene attempt.
//! The anchor is placed first at the configured position, remaining
//! grounded objects are scattered around it, then relational
//! instructions are resolved in ascending id order. Every placement that
//! can collide runs inside a bounded retry loop; exhausting a budget is
//! a typed failure the attempt orchestrator can retry, never a hang.

use cgmath::{InnerSpace, Vector3, Zero};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::collision::colliding;
use crate::config::GenConfig;
use crate::data_structures::face::Face;
use crate::data_structures::registry::Registry;
use crate::data_structures::scene_object::SceneObject;
use crate::error::{GenError, ParseError};
use crate::instruction::{partition, Action, Instruction};
use crate::resources::ShapeProvider;
use crate::visibility::pointed_at;

/// A realized touching relation, recorded from the target's side:
/// `subject` sits flush against `face` of `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchingPair {
    pub target: u32,
    pub face: Face,
    pub subject: u32,
}

/// Relation annotations produced alongside the final transforms.
///
/// `pointing` holds every observer→target pair the post-pass ray march
/// finds, which covers both requested pointing relations and incidental
/// ones that fall out of the arrangement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    pub touching: Vec<TouchingPair>,
    pub pointing: Vec<(u32, u32)>,
}

/// Placement engine for one scene attempt.
pub struct Placement<'a, P, R> {
    config: &'a GenConfig,
    provider: &'a P,
    rng: &'a mut R,
}

impl<'a, P: ShapeProvider, R: Rng> Placement<'a, P, R> {
    pub fn new(config: &'a GenConfig, provider: &'a P, rng: &'a mut R) -> Self {
        Self {
            config,
            provider,
            rng,
        }
    }

    /// Realize every instruction into the registry.
    ///
    /// On error the registry may hold a partial scene; the caller clears
    /// it before retrying the attempt.
    pub fn realize_structure(
        &mut self,
        registry: &mut Registry,
        instructions: &[Instruction],
    ) -> Result<Annotations, GenError> {
        let (grounded, relational) = partition(instructions);
        let Some((anchor, rest)) = grounded.split_first() else {
            return Err(ParseError::MissingGrounded.into());
        };

        // The anchor goes first and is never collision-checked.
        let mut anchor_object = self.create_object(anchor)?;
        anchor_object.translate(self.config.anchor());
        registry.register(anchor_object)?;

        for instruction in rest {
            let mut object = self.create_object(instruction)?;
            object.rotate_z(90.0);
            self.scatter(&mut object, registry)?;
            registry.register(object)?;
        }

        let mut annotations = Annotations::default();
        for instruction in &relational {
            let object = self.create_object(instruction)?;
            match instruction.action {
                Action::Touching(target) => {
                    self.resolve_touching(object, target, registry, &mut annotations)?;
                }
                Action::Pointing(target) => {
                    self.resolve_pointing(object, target, registry)?;
                }
                Action::OnTopOf(_) => {
                    // Stacking semantics were never settled; surface that
                    // instead of guessing.
                    return Err(GenError::UnsupportedRelation {
                        id: instruction.id,
                        relation: "on_top_of",
                    });
                }
                Action::Grounded => {}
            }
        }

        for object in registry.all() {
            for target in pointed_at(object, registry) {
                annotations.pointing.push((object.id(), target));
            }
        }
        Ok(annotations)
    }

    fn create_object(&mut self, instruction: &Instruction) -> Result<SceneObject, GenError> {
        let hull = self.provider.hull(instruction.shape, instruction.pose)?;
        let rays = self.provider.rays(instruction.shape, instruction.pose)?;
        let mut object = SceneObject::new(
            instruction.id,
            instruction.shape,
            instruction.color.clone(),
            instruction.pose,
            hull,
            rays,
        );
        if self.config.random_object_rotation {
            let deg = self.rng.gen_range(0.0..360.0);
            object.rotate_z(deg);
        }
        Ok(object)
    }

    /// Uniform polar sample around the anchor.
    ///
    /// The radial distance is uniform in radius, not in area, so samples
    /// are biased toward the anchor. That matches the established
    /// behaviour of generated datasets and is kept on purpose.
    fn sample_position(&mut self) -> Vector3<f32> {
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = self.rng.gen_range(0.0..=self.config.placement_radius);
        self.config.anchor() + Vector3::new(distance * angle.cos(), distance * angle.sin(), 0.0)
    }

    /// Collision-gated random placement for one grounded object.
    fn scatter(&mut self, object: &mut SceneObject, registry: &Registry) -> Result<(), GenError> {
        for _ in 0..self.config.place_attempts {
            let pos = self.sample_position();
            object.set_position(Vector3::new(pos.x, pos.y, object.position().z));
            let collisions = colliding(object, registry, &[]);
            if collisions.is_empty() {
                return Ok(());
            }
            log::debug!(
                "object {} collides with {:?}, resampling",
                object.id(),
                collisions
            );
        }
        Err(GenError::PlacementExhausted {
            id: object.id(),
            attempts: self.config.place_attempts,
        })
    }

    /// Place `object` flush against a free face of `target`, recording
    /// the adjacency symmetrically on success.
    fn resolve_touching(
        &mut self,
        mut object: SceneObject,
        target: u32,
        registry: &mut Registry,
        annotations: &mut Annotations,
    ) -> Result<(), GenError> {
        object.rotate_z(90.0);
        for _ in 0..self.config.place_attempts {
            let Some(target_object) = registry.get(target) else {
                return Err(ParseError::ForwardTarget {
                    id: object.id(),
                    target,
                }
                .into());
            };
            let faces = target_object.free_faces();
            let Some(&face) = (if self.config.random_face_choice {
                faces.choose(self.rng)
            } else {
                faces.first()
            }) else {
                break;
            };
            let target_pos = target_object.position();
            let target_bbox = target_object.world_bbox();

            // Align horizontally with the target, then shift along the
            // face axis until the boxes are flush.
            object.set_position(Vector3::new(target_pos.x, target_pos.y, object.position().z));
            let (axis, sign) = face.axis_sign();
            let idx = axis.index();
            let object_bbox = object.world_bbox();
            let offset = if sign > 0 {
                target_bbox.max[idx] - object_bbox.min[idx]
            } else {
                target_bbox.min[idx] - object_bbox.max[idx]
            };
            let mut delta = Vector3::zero();
            delta[idx] = offset;
            object.translate(delta);

            if colliding(&object, registry, &[target]).is_empty() {
                let object_id = object.id();
                object.set_touching(face.opposite(), target);
                registry.register(object)?;
                if let Some(target_object) = registry.get_mut(target) {
                    target_object.set_touching(face, object_id);
                }
                annotations.touching.push(TouchingPair {
                    target,
                    face,
                    subject: object_id,
                });
                return Ok(());
            }
            log::debug!("object {} collides while touching {}, retrying", object.id(), target);
        }
        Err(GenError::PlacementExhausted {
            id: object.id(),
            attempts: self.config.place_attempts,
        })
    }

    /// Scatter `object` and yaw it so its primary ray passes through the
    /// target's center.
    fn resolve_pointing(
        &mut self,
        mut object: SceneObject,
        target: u32,
        registry: &mut Registry,
    ) -> Result<(), GenError> {
        for _ in 0..self.config.place_attempts {
            let Some(target_object) = registry.get(target) else {
                return Err(ParseError::ForwardTarget {
                    id: object.id(),
                    target,
                }
                .into());
            };
            let target_center = target_object.world_bbox().center();

            let pos = self.sample_position();
            object.set_position(Vector3::new(pos.x, pos.y, object.position().z));

            match object.primary_ray_dir() {
                Some(local_dir) => {
                    let world_dir = object.instance().transform_dir(local_dir);
                    let current_yaw = world_dir.y.atan2(world_dir.x);
                    let to_target = target_center - object.position();
                    if to_target.magnitude2() > 1e-12 {
                        let desired_yaw = to_target.y.atan2(to_target.x);
                        object.rotate_z((desired_yaw - current_yaw).to_degrees());
                    }
                }
                None => {
                    log::warn!(
                        "object {} has no directional rays; placing without orientation",
                        object.id()
                    );
                }
            }

            if colliding(&object, registry, &[]).is_empty() {
                registry.register(object)?;
                return Ok(());
            }
        }
        Err(GenError::PlacementExhausted {
            id: object.id(),
            attempts: self.config.place_attempts,
        })
    }
}
