pub mod json_backend;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over key/value persistence backends holding serialized blobs.
///
/// One fixed key addresses the ledger's transaction sequence; reading an
/// absent key yields `None` rather than an error.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::JsonStorage;
