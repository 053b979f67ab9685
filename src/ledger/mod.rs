//! Ledger domain model and the persisted-blob codec.

pub mod codec;
pub mod transaction;

pub use codec::{decode, encode, DecodeReport};
pub use transaction::{Transaction, TransactionKind};
