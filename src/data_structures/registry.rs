//! The set of live objects for one scene attempt.

use crate::data_structures::scene_object::SceneObject;
use crate::error::RegistryError;

/// Owns every `SceneObject` of the scene attempt currently under
/// construction. One registry per attempt, owned by the attempt's call
/// stack; workers never share one.
#[derive(Debug, Default)]
pub struct Registry {
    objects: Vec<SceneObject>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new object. Ids must be unique; the registry never
    /// silently overwrites.
    pub fn register(&mut self, object: SceneObject) -> Result<(), RegistryError> {
        if self.objects.iter().any(|o| o.id() == object.id()) {
            return Err(RegistryError::DuplicateId { id: object.id() });
        }
        self.objects.push(object);
        Ok(())
    }

    /// All live objects in insertion order.
    pub fn all(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn get(&self, id: u32) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Drop every live object. Called between scene attempts.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
