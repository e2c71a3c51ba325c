// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test utilities for tc-bridge integration tests
//!
//! This module provides utilities for:
//! - Temporary directory management
//! - Environment isolation
//! - Sample input streams

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

// ============================================================================
// Temporary Directory Management
// ============================================================================

/// Counter for generating unique test directory names
static TEST_DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A temporary directory that is removed when dropped
pub struct TempTestDir {
    path: PathBuf,
}

impl TempTestDir {
    /// Create a new temporary test directory
    ///
    /// The directory is created under the system temp directory with a
    /// unique name based on the test name and a counter.
    pub fn new(test_name: &str) -> Self {
        let counter = TEST_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir_name = format!(
            "tc-bridge-test-{}-{}-{}",
            test_name,
            std::process::id(),
            counter
        );
        let path = std::env::temp_dir().join(dir_name);

        fs::create_dir_all(&path).expect("Failed to create temp test directory");

        Self { path }
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a file within the temp directory with the given content
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(relative_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Read a file from the temp directory
    pub fn read_file(&self, relative_path: &str) -> String {
        let file_path = self.path.join(relative_path);
        fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the temp directory
    #[allow(dead_code)]
    pub fn file_exists(&self, relative_path: &str) -> bool {
        self.path.join(relative_path).exists()
    }
}

impl Drop for TempTestDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

// ============================================================================
// Environment Isolation
// ============================================================================

/// Serializes tests that touch process environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Take the environment lock for the duration of a test
#[allow(dead_code)]
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Restores an environment variable to its previous value on drop
pub struct EnvGuard {
    key: String,
    original: Option<String>,
}

impl EnvGuard {
    /// Set an environment variable, returning a guard that restores it on drop
    #[allow(dead_code)]
    pub fn set(key: &str, value: &str) -> Self {
        let original = std::env::var(key).ok();
        // SAFETY: callers hold the environment lock
        unsafe { std::env::set_var(key, value) };
        Self {
            key: key.to_string(),
            original,
        }
    }

    /// Remove an environment variable, returning a guard that restores it on drop
    #[allow(dead_code)]
    pub fn remove(key: &str) -> Self {
        let original = std::env::var(key).ok();
        // SAFETY: callers hold the environment lock
        unsafe { std::env::remove_var(key) };
        Self {
            key: key.to_string(),
            original,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: callers hold the environment lock
        unsafe {
            match &self.original {
                Some(val) => std::env::set_var(&self.key, val),
                None => std::env::remove_var(&self.key),
            }
        }
    }
}

// ============================================================================
// Sample Inputs
// ============================================================================

/// Generate a lifecycle event stream with the given outcome counts
///
/// Every test gets a `logstart` and one terminal report; the stream ends
/// with `sessionfinish`.
#[allow(dead_code)]
pub fn sample_event_stream(passed: usize, failed: usize, skipped: usize) -> String {
    let mut lines = vec![r#"{"event":"suitestart","name":"pytest"}"#.to_string()];

    let mut push_test = |name: String, outcome: &str, when: &str, longrepr: &str| {
        let nodeid = format!("tests/test_sample.py::{name}");
        lines.push(format!(r#"{{"event":"logstart","nodeid":"{nodeid}"}}"#));
        lines.push(format!(
            r#"{{"event":"report","nodeid":"{nodeid}","outcome":"{outcome}","when":"{when}","duration":0.5,"longrepr":{longrepr}}}"#
        ));
    };

    for i in 0..passed {
        push_test(format!("test_passes_{i}"), "passed", "call", "null");
    }
    for i in 0..failed {
        push_test(
            format!("test_fails_{i}"),
            "failed",
            "call",
            r#""assert 1 == 2""#,
        );
    }
    for i in 0..skipped {
        push_test(
            format!("test_skipped_{i}"),
            "skipped",
            "setup",
            r#"["tests/test_sample.py",3,"not today"]"#,
        );
    }

    lines.push(r#"{"event":"sessionfinish"}"#.to_string());
    let mut stream = lines.join("\n");
    stream.push('\n');
    stream
}

/// A single lint diagnostic as one JSON line
#[allow(dead_code)]
pub fn sample_diagnostic(filename: &str, line: u32, column: u32, code: &str) -> String {
    format!(
        r#"{{"filename":"{filename}","line_number":{line},"column_number":{column},"code":"{code}","text":"problem","physical_line":"x = 1\n"}}"#
    )
}

/// Service message lines with the given name
#[allow(dead_code)]
pub fn lines_named<'a>(output: &'a str, name: &str) -> Vec<&'a str> {
    let prefix = format!("##teamcity[{name} ");
    output
        .lines()
        .filter(|line| line.starts_with(&prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_cleanup() {
        let path = {
            let temp = TempTestDir::new("cleanup");
            temp.create_file("a/b.txt", "x");
            assert_eq!(temp.read_file("a/b.txt"), "x");
            temp.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_sample_event_stream_shape() {
        let stream = sample_event_stream(2, 1, 1);
        // suitestart + 4 * (logstart, report) + sessionfinish
        assert_eq!(stream.lines().count(), 10);
    }

    #[test]
    fn test_env_guard_restores() {
        let _lock = lock_env();
        let key = "TC_BRIDGE_TEST_UTILS_GUARD";
        {
            let _guard = EnvGuard::set(key, "test_value");
            assert_eq!(std::env::var(key).ok(), Some("test_value".to_string()));
        }
        assert!(std::env::var(key).is_err());
    }
}
