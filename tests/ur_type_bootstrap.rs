//! Bootstrapping the built-in hierarchy under a caller-chosen namespace
//!
//! The ur-type singletons are process-wide, so this runs in its own test
//! binary with a single test.

use xmlschema_structures::components::{builtin_types, SIMPLE_UR_TYPE_ID, UR_TYPE_ID};
use xmlschema_structures::{complex_ur_type, simple_ur_type, Component, Schema};

#[test]
fn test_custom_namespace_bootstrap() {
    let ur = complex_ur_type(Some("urn:custom"));
    assert_eq!(ur.namespace.as_deref(), Some("urn:custom"));
    assert_eq!(ur.base_type, Some(UR_TYPE_ID));

    let simple = simple_ur_type(None);
    assert_eq!(simple.target_namespace(), Some("urn:custom"));
    assert_eq!(simple.base_type, Some(UR_TYPE_ID));

    let table = builtin_types();
    assert_eq!(table.builtin_namespace(), "urn:custom");
    assert_eq!(table.lookup("anySimpleType"), Some(SIMPLE_UR_TYPE_ID));

    let schema = Schema::new();
    let string = schema.lookup("string").unwrap();
    assert_eq!(
        schema.qualified_name(string).as_deref(),
        Some("{urn:custom}string")
    );

    let reinit = std::panic::catch_unwind(|| complex_ur_type(Some("urn:other")));
    assert!(reinit.is_err());
}
