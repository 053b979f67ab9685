use std::path::PathBuf;

/// Storage key under which the serialized transaction sequence lives.
pub const TRANSACTIONS_STORAGE_KEY: &str = "@pixelfin/transactions/v1";

/// Runtime configuration for the ledger store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Key addressing the persisted transaction blob.
    pub storage_key: String,
    /// Base directory override for file-backed storage. `None` resolves to
    /// the platform data directory.
    pub base_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: TRANSACTIONS_STORAGE_KEY.into(),
            base_dir: None,
        }
    }
}
