//! Owned ledger state and the read/mutate API surfaced to presentation.

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    config::StoreConfig,
    currency,
    errors::LedgerError,
    ledger::{codec, Transaction, TransactionKind},
    storage::{JsonStorage, StorageBackend},
    trend::{self, TrendSummary},
};

const LOAD_ERROR: &str = "Unable to load your saved transactions.";
const REFRESH_ERROR: &str = "Unable to refresh your saved transactions.";
const PERSIST_ERROR: &str = "Unable to save your latest change.";
const CLEAR_ERROR: &str = "Unable to clear saved transactions.";
const AMOUNT_ERROR: &str = "Transaction amount must be greater than zero.";

/// Lifecycle state of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Loading,
    Ready,
}

/// Owns the in-memory transaction sequence and mediates every read and
/// mutation against the persistence boundary.
///
/// All mutating operations take `&mut self`, so exclusive access is the
/// single-logical-writer guarantee; multi-threaded callers wrap the store
/// in a `Mutex` around the whole read-append-persist sequence.
pub struct LedgerStore {
    transactions: Vec<Transaction>,
    state: StoreState,
    error: Option<String>,
    storage: Box<dyn StorageBackend>,
    storage_key: String,
}

impl LedgerStore {
    pub fn new(storage: Box<dyn StorageBackend>, config: StoreConfig) -> Self {
        Self {
            transactions: Vec::new(),
            state: StoreState::Uninitialized,
            error: None,
            storage,
            storage_key: config.storage_key,
        }
    }

    /// Opens a store over file-backed storage resolved from `config`.
    pub fn open(config: StoreConfig) -> Result<Self, LedgerError> {
        let storage = JsonStorage::new(config.base_dir.clone())?;
        Ok(Self::new(Box::new(storage), config))
    }

    /// Reads and decodes the persisted blob, replacing the in-memory ledger.
    ///
    /// A boundary read or parse failure resets the ledger to empty and
    /// surfaces a user-visible error; record-level rejections inside an
    /// otherwise readable blob are handled silently by the codec.
    pub fn load(&mut self) -> Result<(), LedgerError> {
        self.load_with_message(LOAD_ERROR)
    }

    /// Re-runs `load` to pick up out-of-band changes to the persisted blob.
    pub fn refresh(&mut self) -> Result<(), LedgerError> {
        self.load_with_message(REFRESH_ERROR)
    }

    /// Validates, appends, and persists a new transaction.
    ///
    /// Returns the fresh transaction id. In-memory state advances only
    /// after the persistence write succeeds, so a failed write leaves the
    /// ledger exactly as previously persisted.
    pub fn record(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        note: Option<&str>,
    ) -> Result<String, LedgerError> {
        let sanitized = currency::sanitize_amount(amount);
        if amount <= 0.0 || sanitized <= 0.0 {
            self.error = Some(AMOUNT_ERROR.to_string());
            return Err(LedgerError::InvalidAmount);
        }

        let entry = Transaction::new(
            kind,
            currency::to_cents(sanitized),
            note.map(str::to_string),
        );
        let mut next = self.transactions.clone();
        next.push(entry.clone());

        if let Err(err) = self.persist(&next) {
            warn!(error = %err, "failed to persist new transaction");
            self.error = Some(PERSIST_ERROR.to_string());
            return Err(err);
        }

        debug!(id = %entry.id, "transaction recorded");
        self.transactions = next;
        self.error = None;
        Ok(entry.id)
    }

    pub fn add_saving(&mut self, amount: f64, note: Option<&str>) -> Result<String, LedgerError> {
        self.record(TransactionKind::Saving, amount, note)
    }

    pub fn add_expense(&mut self, amount: f64, note: Option<&str>) -> Result<String, LedgerError> {
        self.record(TransactionKind::Expense, amount, note)
    }

    /// Erases the persisted blob and empties the in-memory ledger.
    ///
    /// If the erase fails the ledger is left unchanged so memory never
    /// diverges from what is durably persisted.
    pub fn clear(&mut self) -> Result<(), LedgerError> {
        if let Err(err) = self.storage.remove(&self.storage_key) {
            warn!(error = %err, "failed to clear stored transactions");
            self.error = Some(CLEAR_ERROR.to_string());
            return Err(err);
        }
        self.transactions.clear();
        self.error = None;
        Ok(())
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn loading(&self) -> bool {
        self.state == StoreState::Loading
    }

    /// Latest user-visible failure, cleared by the next successful operation.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Signed sum over the entire ledger, in currency units.
    pub fn balance(&self) -> f64 {
        let cents: i64 = self.transactions.iter().map(Transaction::signed_cents).sum();
        currency::cents_to_units(cents)
    }

    /// Trend summary for the trailing window ending now.
    pub fn trend(&self) -> TrendSummary {
        trend::analyze(&self.transactions, Utc::now())
    }

    fn load_with_message(&mut self, failure_message: &str) -> Result<(), LedgerError> {
        self.state = StoreState::Loading;
        match self.read_from_storage() {
            Ok(transactions) => {
                debug!(count = transactions.len(), "ledger loaded");
                self.transactions = transactions;
                self.error = None;
                self.state = StoreState::Ready;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load ledger from storage");
                self.transactions.clear();
                self.error = Some(failure_message.to_string());
                self.state = StoreState::Ready;
                Err(err)
            }
        }
    }

    fn read_from_storage(&self) -> Result<Vec<Transaction>, LedgerError> {
        let Some(raw) = self.storage.get(&self.storage_key)? else {
            return Ok(Vec::new());
        };
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        Ok(codec::decode(&value).transactions)
    }

    fn persist(&self, transactions: &[Transaction]) -> Result<(), LedgerError> {
        let blob = codec::encode(transactions)?;
        self.storage.set(&self.storage_key, &blob)
    }
}
