//! Generation configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Knobs of the generator, loaded from a YAML file.
///
/// Every field has a default so a partial config file is fine.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// Max sampling radius around the anchor for grounded and pointing
    /// placement.
    pub placement_radius: f32,
    /// Fixed world position of the scene anchor.
    pub anchor_position: [f32; 3],
    /// Pick a uniformly random free face for touching relations instead
    /// of the first available.
    pub random_face_choice: bool,
    /// Apply an extra uniform random z-rotation to every created object.
    pub random_object_rotation: bool,
    /// Structure attempts per rule before the rule is abandoned.
    pub resolve_attempts: u32,
    /// Collision-retry budget per object placement.
    pub place_attempts: u32,
    /// Scenes to generate in one batch run.
    pub num_scenes: usize,
    /// Base RNG seed; worker `i` runs with `seed + i`.
    pub seed: u64,
    /// Wall-clock budget for one oracle query, in seconds.
    pub oracle_timeout_secs: u64,
    /// Where scene files and the ground-truth CSV land.
    pub output_dir: PathBuf,
    /// Command line of the external logic engine, if one is configured.
    pub oracle_command: Option<Vec<String>>,
    /// Canned instruction lists (one raw fact list per line) used when
    /// no oracle command is configured.
    pub structures_file: Option<PathBuf>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            placement_radius: 5.0,
            anchor_position: [0.0, 0.0, 0.0],
            random_face_choice: true,
            random_object_rotation: false,
            resolve_attempts: 10,
            place_attempts: 50,
            num_scenes: 1,
            seed: 0,
            oracle_timeout_secs: 5,
            output_dir: PathBuf::from("output"),
            oracle_command: None,
            structures_file: None,
        }
    }
}

impl GenConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    pub fn anchor(&self) -> cgmath::Vector3<f32> {
        self.anchor_position.into()
    }
}
