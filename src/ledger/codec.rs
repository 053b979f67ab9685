//! Total decoder for the persisted transaction blob.
//!
//! The stored payload is untrusted input of unknown shape. Decoding never
//! fails: malformed records are dropped one by one and only the count of
//! rejections is reported, through tracing.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::currency;
use crate::errors::LedgerError;

use super::transaction::{Transaction, TransactionKind};

/// Outcome of a decode pass over a deserialized payload.
#[derive(Debug, Clone, Default)]
pub struct DecodeReport {
    /// Accepted transactions, sorted ascending by creation instant.
    pub transactions: Vec<Transaction>,
    /// Number of records dropped by validation.
    pub rejected: usize,
}

/// Decodes an arbitrary deserialized value into a well-formed ledger.
///
/// A payload that is not an array reads as "no ledger yet". Within an
/// array, each record is validated field by field; a bad record never
/// aborts the pass. Duplicate ids keep the first occurrence.
pub fn decode(raw: &Value) -> DecodeReport {
    let Some(items) = raw.as_array() else {
        if !raw.is_null() {
            tracing::warn!("expected stored transactions to be an array");
        }
        return DecodeReport::default();
    };

    let mut seen = HashSet::new();
    let mut transactions = Vec::with_capacity(items.len());
    let mut rejected = 0usize;

    for item in items {
        match decode_record(item, &mut seen) {
            Some(txn) => transactions.push(txn),
            None => rejected += 1,
        }
    }

    transactions.sort_by_key(|txn| txn.created_at);

    if rejected > 0 {
        tracing::warn!(rejected, "ignored invalid transaction records while decoding ledger");
    }

    DecodeReport {
        transactions,
        rejected,
    }
}

/// Serializes a ledger into the persisted JSON form.
pub fn encode(transactions: &[Transaction]) -> Result<String, LedgerError> {
    Ok(serde_json::to_string(transactions)?)
}

fn decode_record(item: &Value, seen: &mut HashSet<String>) -> Option<Transaction> {
    let record = item.as_object()?;

    let id = record.get("id")?.as_str()?;
    if id.trim().is_empty() || seen.contains(id) {
        return None;
    }

    let kind = match record.get("type")?.as_str()? {
        "saving" => TransactionKind::Saving,
        "expense" => TransactionKind::Expense,
        _ => return None,
    };

    let amount = record.get("amount")?.as_f64()?;
    let created_at = parse_instant(record.get("createdAt")?.as_str()?)?;

    let amount_cents = currency::to_cents(currency::sanitize_amount(amount));
    if amount_cents <= 0 {
        return None;
    }

    let note = record
        .get("note")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string);

    seen.insert(id.to_string());

    Some(Transaction {
        id: id.to_string(),
        kind,
        amount_cents,
        note,
        created_at,
    })
}

/// Parses a stored instant, canonicalizing to UTC.
///
/// RFC 3339 is the written form; older payloads may carry RFC 2822, naive
/// datetimes, or bare dates, so those are accepted on read.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
