use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency;

/// Direction of a financial event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Saving,
    Expense,
}

/// An immutable financial event.
///
/// Amounts are held as strictly positive integer cents; the serialized
/// `amount` field stays a currency-unit number for the persisted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(rename = "amount", with = "amount_units")]
    pub amount_cents: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a fresh event with a unique id stamped at the current instant.
    pub fn new(kind: TransactionKind, amount_cents: i64, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            amount_cents,
            note: normalize_note(note),
            created_at: Utc::now(),
        }
    }

    /// Amount in currency units.
    pub fn amount(&self) -> f64 {
        currency::cents_to_units(self.amount_cents)
    }

    /// Signed contribution to the running balance, in cents.
    pub fn signed_cents(&self) -> i64 {
        match self.kind {
            TransactionKind::Saving => self.amount_cents,
            TransactionKind::Expense => -self.amount_cents,
        }
    }
}

/// Drops empty or whitespace-only notes; keeps meaningful text verbatim.
pub(crate) fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|text| !text.trim().is_empty())
}

mod amount_units {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::currency;

    pub fn serialize<S>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(currency::cents_to_units(*cents))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let units = f64::deserialize(deserializer)?;
        Ok(currency::to_cents(currency::sanitize_amount(units)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_transactions_get_unique_ids() {
        let a = Transaction::new(TransactionKind::Saving, 100, None);
        let b = Transaction::new(TransactionKind::Saving, 100, None);
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn whitespace_note_is_dropped() {
        let txn = Transaction::new(TransactionKind::Expense, 250, Some("   ".into()));
        assert!(txn.note.is_none());
        let txn = Transaction::new(TransactionKind::Expense, 250, Some("groceries".into()));
        assert_eq!(txn.note.as_deref(), Some("groceries"));
    }

    #[test]
    fn signed_cents_follow_kind() {
        let saving = Transaction::new(TransactionKind::Saving, 1050, None);
        let expense = Transaction::new(TransactionKind::Expense, 1050, None);
        assert_eq!(saving.signed_cents(), 1050);
        assert_eq!(expense.signed_cents(), -1050);
    }

    #[test]
    fn serializes_to_wire_field_names() {
        let txn = Transaction::new(TransactionKind::Saving, 1234, Some("rainy day".into()));
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "saving");
        assert_eq!(value["amount"], 12.34);
        assert_eq!(value["note"], "rainy day");
        assert!(value["createdAt"].is_string());
        assert!(value.get("amount_cents").is_none());
    }

    #[test]
    fn noteless_transactions_skip_the_field() {
        let txn = Transaction::new(TransactionKind::Expense, 500, None);
        let value = serde_json::to_value(&txn).unwrap();
        assert!(value.get("note").is_none());
    }
}
