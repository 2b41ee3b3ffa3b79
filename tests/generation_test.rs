//! End-to-end generation scenarios against the public API.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use scene_ngin::config::GenConfig;
use scene_ngin::data_structures::registry::Registry;
use scene_ngin::export::SceneExport;
use scene_ngin::generate::generate_scene;
use scene_ngin::instruction::parse_items;
use scene_ngin::oracle::FixedOracle;
use scene_ngin::placement::{Annotations, Placement};
use scene_ngin::resources::CatalogProvider;
use scene_ngin::visibility::pointed_at;

fn realize(raw: &str, config: &GenConfig, seed: u64) -> (Registry, Annotations) {
    let instructions = parse_items(raw).expect("valid instructions");
    let provider = CatalogProvider;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut registry = Registry::new();
    let annotations = Placement::new(config, &provider, &mut rng)
        .realize_structure(&mut registry, &instructions)
        .expect("structure should resolve");
    (registry, annotations)
}

#[test]
fn should_place_anchor_and_flush_touching_pair() {
    let mut config = GenConfig::default();
    config.placement_radius = 5.0;
    config.anchor_position = [0.0, 0.0, 0.0];
    config.random_object_rotation = false;

    let raw = "item(0, blue, block, upright, grounded) \
               item(1, red, pyramid, upright, touching(0))";
    let (registry, annotations) = realize(raw, &config, 17);

    // The anchor sits exactly on the configured anchor position.
    let anchor = registry.get(0).expect("anchor registered");
    assert_relative_eq!(anchor.position().x, 0.0);
    assert_relative_eq!(anchor.position().y, 0.0);
    assert_relative_eq!(anchor.position().z, 0.0);

    // The pyramid is flush against one face of the block, with the
    // adjacency recorded symmetrically.
    assert_eq!(annotations.touching.len(), 1);
    let pair = annotations.touching[0];
    assert_eq!((pair.target, pair.subject), (0, 1));
    let subject = registry.get(1).expect("subject registered");
    assert_eq!(anchor.touching()[&pair.face], 1);
    assert_eq!(subject.touching()[&pair.face.opposite()], 0);

    let (axis, sign) = pair.face.axis_sign();
    let idx = axis.index();
    let target_bbox = anchor.world_bbox();
    let subject_bbox = subject.world_bbox();
    if sign > 0 {
        assert_relative_eq!(target_bbox.max[idx], subject_bbox.min[idx], epsilon = 1e-4);
    } else {
        assert_relative_eq!(target_bbox.min[idx], subject_bbox.max[idx], epsilon = 1e-4);
    }

    // Neither participant overlaps anything but the other.
    for object in registry.all() {
        for other in registry.all() {
            if object.id() != other.id() {
                let is_the_pair = (object.id() == 0 && other.id() == 1)
                    || (object.id() == 1 && other.id() == 0);
                assert_eq!(
                    object.world_bbox().overlaps(&other.world_bbox()),
                    is_the_pair
                );
            }
        }
    }
}

#[test]
fn should_keep_annotations_stable_under_export_round_trip() {
    let mut config = GenConfig::default();
    config.random_object_rotation = false;
    let raw = "item(0, blue, block, upright, grounded) \
               item(1, red, wedge, upright, grounded) \
               item(2, green, pyramid, flat, pointing(0)) \
               item(3, yellow, block, upright, touching(1))";
    let (registry, annotations) = realize(raw, &config, 23);

    let export = SceneExport::from_scene(
        "scene_0".to_string(),
        "rule".to_string(),
        "query".to_string(),
        &registry,
        &annotations,
    );

    // Serialization drops or alters nothing.
    let json = serde_json::to_string(&export).unwrap();
    let back: SceneExport = serde_json::from_str(&json).unwrap();
    assert_eq!(export, back);

    // Every exported annotation survives a fresh geometric recomputation.
    for &(observer, target) in &back.annotations.pointing {
        let observer = registry.get(observer).expect("observer exists");
        assert!(
            pointed_at(observer, &registry).contains(&target),
            "{} no longer points at {}",
            observer.name(),
            target
        );
    }
    for pair in &back.annotations.touching {
        let target = registry.get(pair.target).unwrap();
        let subject = registry.get(pair.subject).unwrap();
        assert_eq!(target.touching()[&pair.face], pair.subject);
        assert_eq!(subject.touching()[&pair.face.opposite()], pair.target);
        let (axis, sign) = pair.face.axis_sign();
        let idx = axis.index();
        if sign > 0 {
            assert_relative_eq!(
                target.world_bbox().max[idx],
                subject.world_bbox().min[idx],
                epsilon = 1e-4
            );
        } else {
            assert_relative_eq!(
                target.world_bbox().min[idx],
                subject.world_bbox().max[idx],
                epsilon = 1e-4
            );
        }
    }
}

#[test]
fn should_generate_through_the_scene_orchestrator() {
    let mut config = GenConfig::default();
    config.resolve_attempts = 5;
    let oracle = FixedOracle::new(vec![
        "item(0, blue, block, upright, grounded) \
         item(1, red, wedge, upright, grounded) \
         item(2, green, pyramid, flat, pointing(0))"
            .to_string(),
    ]);
    let mut rng = StdRng::seed_from_u64(31);
    let outcome = generate_scene(&config, &CatalogProvider, &oracle, &mut rng, 7);
    let export = outcome.result.expect("scene resolves");
    assert_eq!(export.scene_name, "scene_7");
    assert_eq!(export.objects.len(), 3);
    assert!(export
        .annotations
        .pointing
        .iter()
        .any(|&(observer, _)| observer == 2));
}
