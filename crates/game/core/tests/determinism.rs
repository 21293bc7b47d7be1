//! Replay determinism: identical request scripts yield identical worlds.

mod common;

use common::run;
use gameplay_core::Attribute;

#[test]
fn same_script_same_world() {
    let first = run(false);
    let second = run(false);
    assert_eq!(first, second);
    assert!(first.events().len() > 100);
    assert!(first.entities().any(|e| e.attributes.get(Attribute::Health) < 500.0));
}
