//! Integration tests for the quad tree logging system
//!
//! These tests install a capturing logger and check what the quad tree
//! reports while loading and initializing.
//!
//! Run with: cargo test --test logging_integration_tests

use galaxy_3d_quadtree::galaxy3d::log::{self, Logger, LogEntry, LogSeverity};
use galaxy_3d_quadtree::galaxy3d::quad_tree::{ObjectKey, ObjectState, QuadTree};
use galaxy_3d_quadtree::galaxy3d::Galaxy3dError;
use galaxy_3d_quadtree::glam::{DMat3, DVec3};
use slotmap::SlotMap;
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn loaded_tree() -> QuadTree {
    let mut objects = SlotMap::<ObjectKey, ObjectState>::with_key();
    let mut tree = QuadTree::new(50.0).unwrap();
    for x in [0.0, 120.0, -480.0] {
        let key = objects.insert(ObjectState::point(DVec3::new(x, 0.0, x)));
        tree.insert(key, &objects[key], &DMat3::IDENTITY);
    }
    tree
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_invalid_distance_logs_error_with_location() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut tree = loaded_tree();
    let result = tree.initialize(-1.0);
    assert!(matches!(result, Err(Galaxy3dError::InvalidArgument(_))));

    {
        let captured = entries.lock().unwrap();
        let error = captured
            .iter()
            .find(|entry| entry.severity == LogSeverity::Error)
            .expect("an error entry should be logged");
        assert_eq!(error.source, "galaxy3d::QuadTree");
        assert!(error.message.contains("Viewing distance"));
        assert!(error.file.is_some());
        assert!(error.line.is_some());
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_initialize_logs_summary() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut tree = loaded_tree();
    tree.initialize(600.0).unwrap();

    {
        let captured = entries.lock().unwrap();
        let info: Vec<&LogEntry> = captured
            .iter()
            .filter(|entry| entry.severity == LogSeverity::Info)
            .collect();
        assert_eq!(info.len(), 1);
        assert!(info[0].message.contains("viewing distance 600"));
        assert!(info[0].file.is_none());
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_min_severity_filters_insert_traces() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);
    let previous = log::min_severity();

    // Default filter: per-insertion traces never reach the logger
    loaded_tree();
    assert!(entries.lock().unwrap().iter().all(|entry| entry.severity >= LogSeverity::Info));

    log::set_min_severity(LogSeverity::Trace);
    loaded_tree();
    {
        let captured = entries.lock().unwrap();
        assert!(captured.iter().any(|entry| entry.severity == LogSeverity::Trace));
        assert!(captured.iter().any(|entry| entry.message.contains("Grew root")));
    }

    log::set_min_severity(previous);
    log::reset_logger();
}
