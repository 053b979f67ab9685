//! Windowed trend analysis over the ledger.
//!
//! `analyze` is a pure function of the transaction sequence and a reference
//! instant: it buckets the trailing window into daily net figures, compares
//! against the preceding window of the same length, and classifies a mood
//! that drives presentation theming.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::currency;
use crate::ledger::{Transaction, TransactionKind};

/// Length of the trailing analysis window, in calendar days.
pub const TREND_WINDOW_DAYS: u32 = 7;

/// Net movement of the current window relative to the preceding one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// Qualitative classification derived from direction and totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMood {
    Happy,
    Neutral,
    Sad,
}

impl TrendMood {
    /// Background color token mapped 1:1 from the mood.
    pub fn background_tint(self) -> &'static str {
        match self {
            TrendMood::Happy => "#163b2a",
            TrendMood::Neutral => "#0b0d0f",
            TrendMood::Sad => "#3b1f29",
        }
    }
}

/// Per-day aggregate within the current window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub savings: f64,
    pub expenses: f64,
    pub net: f64,
}

/// Derived, read-only view over the ledger for the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub points: Vec<TrendPoint>,
    pub window_days: u32,
    pub total_savings: f64,
    pub total_expenses: f64,
    pub net: f64,
    pub average_daily_net: f64,
    pub direction: TrendDirection,
    pub mood: TrendMood,
    pub background_tint: &'static str,
    pub change_from_previous_window: f64,
    pub previous_window_net: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct DailyBucket {
    savings_cents: i64,
    expenses_cents: i64,
}

/// Computes the trend summary for the window ending on `now`'s UTC day.
///
/// Transactions outside both the current and the preceding window are
/// ignored here; they still count toward the full-history balance, which
/// is a separate computation.
pub fn analyze(transactions: &[Transaction], now: DateTime<Utc>) -> TrendSummary {
    let window_len = i64::from(TREND_WINDOW_DAYS);
    let today = now.date_naive();
    let window_start = today - Duration::days(window_len - 1);
    let previous_start = window_start - Duration::days(window_len);
    let previous_end = window_start - Duration::days(1);

    let mut buckets: HashMap<NaiveDate, DailyBucket> = HashMap::new();
    let mut previous_net_cents = 0i64;

    for txn in transactions {
        let day = txn.created_at.date_naive();
        if day >= window_start && day <= today {
            let bucket = buckets.entry(day).or_default();
            match txn.kind {
                TransactionKind::Saving => bucket.savings_cents += txn.amount_cents,
                TransactionKind::Expense => bucket.expenses_cents += txn.amount_cents,
            }
        } else if day >= previous_start && day <= previous_end {
            previous_net_cents += txn.signed_cents();
        }
    }

    let mut points = Vec::with_capacity(TREND_WINDOW_DAYS as usize);
    let mut total_savings_cents = 0i64;
    let mut total_expenses_cents = 0i64;

    for offset in 0..window_len {
        let day = window_start + Duration::days(offset);
        let bucket = buckets.get(&day).copied().unwrap_or_default();
        total_savings_cents += bucket.savings_cents;
        total_expenses_cents += bucket.expenses_cents;
        points.push(TrendPoint {
            date: day,
            savings: currency::cents_to_units(bucket.savings_cents),
            expenses: currency::cents_to_units(bucket.expenses_cents),
            net: currency::cents_to_units(bucket.savings_cents - bucket.expenses_cents),
        });
    }

    let net_cents = total_savings_cents - total_expenses_cents;
    let direction = if net_cents > previous_net_cents {
        TrendDirection::Up
    } else if net_cents < previous_net_cents {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    };
    let mood = classify_mood(net_cents, direction, total_savings_cents, total_expenses_cents);

    TrendSummary {
        points,
        window_days: TREND_WINDOW_DAYS,
        total_savings: currency::cents_to_units(total_savings_cents),
        total_expenses: currency::cents_to_units(total_expenses_cents),
        net: currency::cents_to_units(net_cents),
        average_daily_net: currency::to_currency(
            currency::cents_to_units(net_cents) / f64::from(TREND_WINDOW_DAYS),
        ),
        direction,
        mood,
        background_tint: mood.background_tint(),
        change_from_previous_window: currency::cents_to_units(net_cents - previous_net_cents),
        previous_window_net: currency::cents_to_units(previous_net_cents),
    }
}

// Branch order is observable behavior; edge-case totals can change mood if
// these are reordered or merged.
fn classify_mood(
    net_cents: i64,
    direction: TrendDirection,
    savings_cents: i64,
    expenses_cents: i64,
) -> TrendMood {
    if net_cents <= 0 && direction == TrendDirection::Down {
        return TrendMood::Sad;
    }
    if net_cents >= 0 && direction == TrendDirection::Up {
        return TrendMood::Happy;
    }
    if savings_cents > expenses_cents && direction != TrendDirection::Down {
        return TrendMood::Happy;
    }
    // expenses > savings * 1.25, kept in integer cents.
    if expenses_cents * 4 > savings_cents * 5 {
        return TrendMood::Sad;
    }
    TrendMood::Neutral
}
