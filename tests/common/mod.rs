use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use pixelfin_core::errors::LedgerError;
use pixelfin_core::storage::StorageBackend;

/// In-memory storage double with per-operation failure injection.
///
/// Clones share state, so a test can hold a handle while the store owns
/// the boxed backend.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    blobs: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .inner
            .blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        storage
    }

    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.inner.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub fn blob(&self, key: &str) -> Option<String> {
        self.inner.blobs.lock().unwrap().get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, LedgerError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage("injected read failure".into()));
        }
        Ok(self.inner.blobs.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LedgerError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage("injected write failure".into()));
        }
        self.inner
            .blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LedgerError> {
        if self.inner.fail_removes.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage("injected remove failure".into()));
        }
        self.inner.blobs.lock().unwrap().remove(key);
        Ok(())
    }
}
