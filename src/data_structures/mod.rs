//! Data models used by the generation engine.
//!
//! Everything a scene is made of lives here: transforms, bounding boxes,
//! face bookkeeping, scene objects and the registry that owns them for
//! the duration of one generation attempt.

pub mod aabb;
pub mod face;
pub mod instance;
pub mod registry;
pub mod scene_object;
