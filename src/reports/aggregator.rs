//! Monthly aggregation of transactions
//!
//! Transactions are bucketed by the calendar month containing their date.
//! Every month of the requested window appears exactly once, oldest first,
//! whether or not it has transactions.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Money, Month, Transaction, TransactionKind};

/// Report window lengths offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeRange {
    #[serde(rename = "3months")]
    ThreeMonths,
    #[default]
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "12months")]
    TwelveMonths,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::TwelveMonths,
    ];

    pub fn months(&self) -> u32 {
        match self {
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::TwelveMonths => 12,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ThreeMonths => "Last 3 Months",
            Self::SixMonths => "Last 6 Months",
            Self::TwelveMonths => "Last 12 Months",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}months", self.months())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    /// Accepts `3months`, `3m`, `3mo` or plain `3` (likewise 6 and 12)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let digits = lower
            .strip_suffix("months")
            .or_else(|| lower.strip_suffix("month"))
            .or_else(|| lower.strip_suffix("mo"))
            .or_else(|| lower.strip_suffix('m'))
            .unwrap_or(&lower)
            .trim();
        match digits {
            "3" => Ok(Self::ThreeMonths),
            "6" => Ok(Self::SixMonths),
            "12" => Ok(Self::TwelveMonths),
            _ => Err(format!(
                "Invalid time range '{}': expected 3months, 6months or 12months",
                s
            )),
        }
    }
}

/// A run of calendar months ending with the anchor month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub anchor: Month,
    pub months: u32,
}

impl ReportWindow {
    pub fn new(anchor: Month, months: u32) -> Self {
        Self { anchor, months }
    }

    pub fn from_range(anchor: Month, range: TimeRange) -> Self {
        Self::new(anchor, range.months())
    }

    /// The months of the window, oldest first
    pub fn month_list(&self) -> Vec<Month> {
        trailing_months(self.anchor, self.months)
    }

    /// Oldest month of the window; the anchor itself for an empty window
    pub fn first_month(&self) -> Month {
        self.anchor.minus(self.months.saturating_sub(1))
    }

    pub fn start_date(&self) -> NaiveDate {
        self.first_month().start_date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.anchor.end_date()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.months > 0 && date >= self.start_date() && date <= self.end_date()
    }

    /// Label such as "Sep 2026 - Feb 2027"
    pub fn period_label(&self) -> String {
        format!("{} - {}", self.first_month().label(), self.anchor.label())
    }
}

/// Totals for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub month: Month,
    /// Chart label such as "Jan 2025"
    pub label: String,
    pub income: Money,
    pub expenses: Money,
    pub net: Money,
}

impl MonthBucket {
    fn empty(month: Month) -> Self {
        Self {
            month,
            label: month.label(),
            income: Money::zero(),
            expenses: Money::zero(),
            net: Money::zero(),
        }
    }
}

/// The `count` calendar months ending with `anchor`, oldest first
pub fn trailing_months(anchor: Month, count: u32) -> Vec<Month> {
    anchor.trailing(count)
}

/// Bucket transactions into the `count` months ending with `anchor`
///
/// Transactions outside the window are ignored. `count == 0` yields an empty
/// vector.
pub fn aggregate(transactions: &[Transaction], anchor: Month, count: u32) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = trailing_months(anchor, count)
        .into_iter()
        .map(MonthBucket::empty)
        .collect();
    let index: HashMap<Month, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (b.month, i))
        .collect();

    let mut counted = 0usize;
    for txn in transactions {
        let Some(&i) = index.get(&Month::containing(txn.date)) else {
            continue;
        };
        let bucket = &mut buckets[i];
        match txn.kind {
            TransactionKind::Income => bucket.income += txn.amount,
            TransactionKind::Expense => bucket.expenses += txn.amount,
        }
        counted += 1;
    }

    for bucket in &mut buckets {
        bucket.net = bucket.income - bucket.expenses;
    }

    debug!(
        anchor = %anchor,
        months = count,
        counted,
        skipped = transactions.len() - counted,
        "aggregated transactions by month"
    );
    buckets
}
