//! scene-ngin
//!
//! A procedural scene generator that turns a symbolic object/relation
//! list into concrete, collision-free 3D transforms for use as labeled
//! training data. The core is a greedy stochastic placement engine:
//! randomized sampling, AABB collision rejection, and bounded retries at
//! three nested granularities (per-object placement, per-scene
//! structure, per-rule generation). Rendering, rule derivation, and
//! persistence are external collaborators behind small interfaces.
//!
//! High-level modules
//! - `batch`: parallel fan-out of scene generation across workers
//! - `collision`: the AABB overlap gate placements must pass
//! - `config`: the YAML-backed generation knobs
//! - `data_structures`: scene data models (transforms, objects, registry)
//! - `export`: finalized-scene JSON and ground-truth CSV output
//! - `generate`: per-rule attempt orchestration and retry accounting
//! - `instruction`: the parsed symbolic instruction model
//! - `oracle`: the logic-engine boundary (subprocess with a timeout)
//! - `placement`: anchor/scatter/relation resolution per scene attempt
//! - `resources`: shape hulls and pointing rays per shape and pose
//! - `visibility`: bounded ray-march used for pointing relations
//!

pub mod batch;
pub mod collision;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod export;
pub mod generate;
pub mod instruction;
pub mod oracle;
pub mod placement;
pub mod resources;
pub mod visibility;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use crate::config::GenConfig;
pub use crate::data_structures::registry::Registry;
pub use crate::data_structures::scene_object::SceneObject;
pub use crate::error::GenError;
pub use crate::resources::{CatalogProvider, Pose, Shape, ShapeProvider};
