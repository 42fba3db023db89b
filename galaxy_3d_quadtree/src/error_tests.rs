//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Galaxy3dError, Galaxy3dResult};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_invalid_argument_display() {
    let err = Galaxy3dError::InvalidArgument("viewing distance must be positive".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid argument"));
    assert!(display.contains("viewing distance must be positive"));
}

#[test]
fn test_invalid_node_display() {
    let err = Galaxy3dError::InvalidNode("stale key".to_string());
    let display = format!("{}", err);
    assert_eq!(display, "Invalid node: stale key");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Galaxy3dError::InvalidArgument("x".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug1 = format!("{:?}", Galaxy3dError::InvalidArgument("a".to_string()));
    assert!(debug1.contains("InvalidArgument"));

    let debug2 = format!("{:?}", Galaxy3dError::InvalidNode("b".to_string()));
    assert!(debug2.contains("InvalidNode"));
}

#[test]
fn test_error_clone_and_eq() {
    let err1 = Galaxy3dError::InvalidNode("test".to_string());
    let err2 = err1.clone();
    assert_eq!(err1, err2);
    assert_ne!(err1, Galaxy3dError::InvalidArgument("test".to_string()));
}

// ============================================================================
// RESULT ALIAS
// ============================================================================

#[test]
fn test_result_propagation() {
    fn inner() -> Galaxy3dResult<u32> {
        Err(Galaxy3dError::InvalidArgument("inner".to_string()))
    }

    fn outer() -> Galaxy3dResult<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    match outer() {
        Err(Galaxy3dError::InvalidArgument(msg)) => assert_eq!(msg, "inner"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_quadtree_err_macro_builds_invalid_argument() {
    let err = crate::quadtree_err!("galaxy3d::Test", "bad value {}", 42);
    assert_eq!(err, Galaxy3dError::InvalidArgument("bad value 42".to_string()));
}
