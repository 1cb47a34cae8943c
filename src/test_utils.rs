//! Test utilities for StudyBuddy
//!
//! Temporary directories, test files, a scripted reply gateway, a blob store
//! that can be made to fail, and error assertion helpers shared by the unit
//! tests.

use crate::error::{kind_of, Result, StudyBuddyError};
use crate::gateway::ReplyGateway;
use crate::storage::{BlobStore, MemoryBlobStore};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Gateway that answers from a queue of scripted outcomes
///
/// `Ok` entries are returned as replies and `Err` entries as network
/// failures. Once the queue is empty every call fails. Sent messages are
/// recorded for later inspection.
#[derive(Default)]
pub struct ScriptedGateway {
    outcomes: Mutex<VecDeque<std::result::Result<String, String>>>,
    sent: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    /// Gateway that replies with each of `replies` in turn
    pub fn replying(replies: &[&str]) -> Self {
        let gateway = Self::default();
        for reply in replies {
            gateway.push_reply(reply);
        }
        gateway
    }

    /// Gateway whose every call fails
    pub fn failing() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn push_reply(&self, reply: &str) {
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .push_back(Ok(reply.to_string()));
    }

    /// Queue a network failure
    pub fn push_failure(&self, reason: &str) {
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .push_back(Err(reason.to_string()));
    }

    /// Messages sent so far, oldest first
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl ReplyGateway for ScriptedGateway {
    async fn send(&self, message: &str) -> Result<String> {
        self.sent
            .lock()
            .expect("sent lock")
            .push(message.to_string());
        let outcome = self.outcomes.lock().expect("outcomes lock").pop_front();
        match outcome {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(reason)) => Err(StudyBuddyError::Network(reason).into()),
            None => Err(StudyBuddyError::Network("connection refused".to_string()).into()),
        }
    }
}

/// In-memory blob store whose writes can be switched to fail
///
/// Clones share the same entries and the same switch, so a test can keep one
/// handle while the storage adapter owns another. Reads always succeed.
#[derive(Debug, Clone, Default)]
pub struct FlakyBlobStore {
    inner: Arc<MemoryBlobStore>,
    failing: Arc<AtomicBool>,
}

impl FlakyBlobStore {
    /// Create a store that accepts writes
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write and remove fail, or succeed again
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StudyBuddyError::Storage("disk unavailable".to_string()).into());
        }
        Ok(())
    }
}

impl BlobStore for FlakyBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check()?;
        self.inner.remove(key)
    }

    fn write_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        self.check()?;
        self.inner.write_all(entries)
    }
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T: std::fmt::Debug>(result: Result<T>, expected: &str) {
    match result {
        Ok(value) => panic!("Expected error containing '{}', got Ok({:?})", expected, value),
        Err(e) => {
            let message = e.to_string();
            assert!(
                message.contains(expected),
                "Expected error containing '{}', got '{}'",
                expected,
                message
            );
        }
    }
}

/// Assert that an error is a `StudyBuddyError` matching `predicate`
///
/// # Panics
///
/// Panics if the result is Ok, the error is not a `StudyBuddyError`, or the
/// predicate rejects it
pub fn assert_error_kind<T: std::fmt::Debug>(
    result: Result<T>,
    predicate: impl Fn(&StudyBuddyError) -> bool,
) {
    match result {
        Ok(value) => panic!("Expected error, got Ok({:?})", value),
        Err(e) => match kind_of(&e) {
            Some(kind) => assert!(predicate(kind), "Unexpected error kind: {:?}", kind),
            None => panic!("Expected StudyBuddyError, got {:?}", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "notes.json", "{}");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_scripted_gateway_plays_queue_then_fails() {
        let gateway = ScriptedGateway::replying(&["one"]);
        gateway.push_failure("down");

        assert_eq!(gateway.send("a").await.unwrap(), "one");
        assert_error_contains(gateway.send("b").await, "down");
        assert_error_kind(gateway.send("c").await, |e| {
            matches!(e, StudyBuddyError::Network(_))
        });
        assert_eq!(gateway.sent(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_flaky_blob_store_switch_is_shared_by_clones() {
        let store = FlakyBlobStore::new();
        let handle = store.clone();
        store.write("k", "v").unwrap();

        handle.set_failing(true);
        assert_error_kind(store.write("k", "w"), |e| {
            matches!(e, StudyBuddyError::Storage(_))
        });
        assert!(store.remove("k").is_err());
        assert_eq!(store.read("k").unwrap(), Some("v".to_string()));

        handle.set_failing(false);
        store.write_all(&[("k", "w")]).unwrap();
        assert_eq!(handle.read("k").unwrap(), Some("w".to_string()));
    }
}
