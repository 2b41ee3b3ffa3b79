//! Scene-level attempt orchestration.
//!
//! The middle level of the nested retry policy: one call to
//! [`generate_scene`] makes up to `resolve_attempts` full structure
//! attempts for one rule. Each attempt queries the oracle, parses the
//! fact list, and runs the placement engine against a fresh registry;
//! any failure clears the registry and counts against the budget.
//! Per-object retries live below in the placement engine, batch-level
//! fan-out above in the batch driver.

use rand::Rng;

use crate::config::GenConfig;
use crate::data_structures::registry::Registry;
use crate::error::GenError;
use crate::export::SceneExport;
use crate::instruction::parse_items;
use crate::oracle::InstructionOracle;
use crate::placement::Placement;
use crate::resources::ShapeProvider;

/// Result of one rule's generation, with attempt accounting.
#[derive(Debug)]
pub struct SceneOutcome {
    pub scene_index: usize,
    pub result: Result<SceneExport, GenError>,
    /// Structure attempts consumed, including the successful one.
    pub attempts: u32,
    /// Oracle timeouts among the failed attempts.
    pub timeouts: u32,
}

impl SceneOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Generate one scene, retrying whole structure attempts up to the
/// configured cap. Exhaustion is reported, never propagated as a panic.
pub fn generate_scene<P, O, R>(
    config: &GenConfig,
    provider: &P,
    oracle: &O,
    rng: &mut R,
    scene_index: usize,
) -> SceneOutcome
where
    P: ShapeProvider,
    O: InstructionOracle + ?Sized,
    R: Rng,
{
    let scene_name = format!("scene_{}", scene_index);
    let mut timeouts = 0;
    let mut registry = Registry::new();

    for attempt in 1..=config.resolve_attempts {
        let derived = match oracle.derive_structure() {
            Ok(derived) => derived,
            Err(e) => {
                if e.is_timeout() {
                    timeouts += 1;
                }
                log::warn!("[{}] attempt {}: oracle failed: {}", scene_name, attempt, e);
                continue;
            }
        };

        let instructions = match parse_items(&derived.facts) {
            Ok(instructions) => instructions,
            Err(e) => {
                log::warn!("[{}] attempt {}: {}", scene_name, attempt, e);
                continue;
            }
        };

        let mut placement = Placement::new(config, provider, rng);
        match placement.realize_structure(&mut registry, &instructions) {
            Ok(annotations) => {
                log::info!("[{}] success on attempt {}", scene_name, attempt);
                let export = SceneExport::from_scene(
                    scene_name,
                    derived.rule,
                    derived.query,
                    &registry,
                    &annotations,
                );
                return SceneOutcome {
                    scene_index,
                    result: Ok(export),
                    attempts: attempt,
                    timeouts,
                };
            }
            Err(e) => {
                log::warn!("[{}] attempt {} failed: {}", scene_name, attempt, e);
                // Discard the partial scene before the next attempt.
                registry.clear();
            }
        }
    }

    log::warn!(
        "[{}] all {} attempts failed",
        scene_name,
        config.resolve_attempts
    );
    SceneOutcome {
        scene_index,
        result: Err(GenError::AttemptsExhausted {
            attempts: config.resolve_attempts,
        }),
        attempts: config.resolve_attempts,
        timeouts,
    }
}
