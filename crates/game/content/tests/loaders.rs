use std::fs;
use std::path::PathBuf;

use gameplay_content::{ContentFactory, SimulationConfig};
use gameplay_core::{AbilityId, EffectId, ExecutionType, ManaPolicy};
use tempfile::TempDir;

fn sample_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../client/data")
}

#[test]
fn bundled_sample_content_loads() {
    let factory = ContentFactory::new(sample_dir());
    let db = factory.load_database().unwrap();

    let fireball = db.ability(AbilityId(1)).unwrap();
    assert_eq!(fireball.execution_type, ExecutionType::SpawnProjectileApplyOnHit);
    assert!(db.effect(fireball.cooldown_effect_id).is_some());
    assert!(db.tags().find_by_name("Status.Burning").is_some());
    assert!(db.effect(EffectId(3)).unwrap().is_periodic);

    let config = factory.load_config().unwrap();
    assert_eq!(config.mana_policy, ManaPolicy::Serialized);
    assert!(config.fixed_dt > 0.0);
}

#[test]
fn missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ContentFactory::new(dir.path()).load_config().unwrap();
    assert_eq!(config, SimulationConfig::default());
}

#[test]
fn dangling_effect_reference_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tags.ron"), r#"(tags: [(id: 1, name: "Stun")])"#).unwrap();
    fs::write(dir.path().join("effects.ron"), "(effects: [])").unwrap();
    fs::write(
        dir.path().join("abilities.ron"),
        r#"(abilities: [(id: 1, execution: ApplyEffectToTarget, primary_effect: Some(9))])"#,
    )
    .unwrap();

    let err = ContentFactory::new(dir.path()).load_database().unwrap_err();
    assert!(err.to_string().contains("unknown effect:9"), "{err}");
}

#[test]
fn unreadable_files_name_the_path() {
    let dir = TempDir::new().unwrap();
    let err = ContentFactory::new(dir.path()).load_tags().unwrap_err();
    assert!(err.to_string().contains("tags.ron"));
}
