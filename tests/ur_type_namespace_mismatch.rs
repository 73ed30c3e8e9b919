//! The simple ur-type must share the complex ur-type's namespace
//!
//! Runs in its own test binary because the ur-type singletons are
//! process-wide.

use xmlschema_structures::{complex_ur_type, simple_ur_type, Component};

#[test]
fn test_simple_ur_type_rejects_foreign_namespace() {
    let ur = complex_ur_type(Some("urn:a"));
    assert_eq!(ur.namespace.as_deref(), Some("urn:a"));

    let mismatch = std::panic::catch_unwind(|| simple_ur_type(Some("urn:b")));
    assert!(mismatch.is_err());

    let simple = simple_ur_type(Some("urn:a"));
    assert_eq!(simple.target_namespace(), Some("urn:a"));
}
