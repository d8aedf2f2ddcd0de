//! Bill model
//!
//! Bills carry a due date and a paid flag. Their status is always computed
//! relative to a caller-supplied "today" so it can be tested deterministically.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::ids::BillId;
use super::money::Money;
use super::validation::FieldErrors;
use super::Entity;

/// Bills due within this many days are flagged as due soon
pub const DUE_SOON_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub name: String,
    pub amount: Money,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub recurring: bool,
}

/// Due status of a bill relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Paid,
    Overdue,
    DueToday,
    /// Due within the next week; carries the number of days left
    DueSoon(i64),
    Upcoming,
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => f.pad("Paid"),
            Self::Overdue => f.pad("Overdue"),
            Self::DueToday => f.pad("Due Today"),
            Self::DueSoon(1) => f.pad("1 day left"),
            Self::DueSoon(days) => f.pad(&format!("{} days left", days)),
            Self::Upcoming => f.pad("Upcoming"),
        }
    }
}

impl Bill {
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    pub fn due_status(&self, today: NaiveDate) -> DueStatus {
        if self.is_paid {
            return DueStatus::Paid;
        }
        match self.days_until_due(today) {
            days if days < 0 => DueStatus::Overdue,
            0 => DueStatus::DueToday,
            days if days <= DUE_SOON_DAYS => DueStatus::DueSoon(days),
            _ => DueStatus::Upcoming,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_status(today) == DueStatus::Overdue
    }

    /// Unpaid bills first, then by due date ascending
    pub fn display_order(a: &Bill, b: &Bill) -> Ordering {
        a.is_paid
            .cmp(&b.is_paid)
            .then_with(|| a.due_date.cmp(&b.due_date))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillDraft {
    pub name: String,
    pub amount: Money,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub recurring: bool,
}

impl BillDraft {
    pub fn new(name: impl Into<String>, amount: Money, due_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            amount,
            due_date,
            is_paid: false,
            recurring: false,
        }
    }

    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    pub fn paid(mut self, is_paid: bool) -> Self {
        self.is_paid = is_paid;
        self
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(self.name.trim().is_empty(), "name", "Bill name is required");
        errors.check(
            !self.amount.is_positive(),
            "amount",
            "Amount must be greater than 0",
        );
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
}

impl BillPatch {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.check(name.trim().is_empty(), "name", "Bill name is required");
        }
        if let Some(amount) = self.amount {
            errors.check(
                !amount.is_positive(),
                "amount",
                "Amount must be greater than 0",
            );
        }
        errors
    }
}

impl Entity for Bill {
    type Id = BillId;
    type Draft = BillDraft;
    type Patch = BillPatch;

    const KIND: &'static str = "Bill";

    fn id(&self) -> BillId {
        self.id
    }

    fn from_draft(id: BillId, draft: BillDraft) -> Self {
        Self {
            id,
            name: draft.name,
            amount: draft.amount,
            due_date: draft.due_date,
            is_paid: draft.is_paid,
            recurring: draft.recurring,
        }
    }

    fn apply_patch(&mut self, patch: BillPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(is_paid) = patch.is_paid {
            self.is_paid = is_paid;
        }
        if let Some(recurring) = patch.recurring {
            self.recurring = recurring;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bill(id: u64, due: NaiveDate, paid: bool) -> Bill {
        Bill::from_draft(
            BillId::new(id),
            BillDraft::new("Rent", Money::from_units(1_500), due).paid(paid),
        )
    }

    #[test]
    fn test_due_status() {
        let today = date(2025, 3, 10);
        assert_eq!(bill(1, date(2025, 3, 1), true).due_status(today), DueStatus::Paid);
        assert_eq!(bill(1, date(2025, 3, 9), false).due_status(today), DueStatus::Overdue);
        assert_eq!(bill(1, today, false).due_status(today), DueStatus::DueToday);
        assert_eq!(
            bill(1, date(2025, 3, 13), false).due_status(today),
            DueStatus::DueSoon(3)
        );
        assert_eq!(
            bill(1, date(2025, 3, 17), false).due_status(today),
            DueStatus::DueSoon(7)
        );
        assert_eq!(bill(1, date(2025, 3, 18), false).due_status(today), DueStatus::Upcoming);
    }

    #[test]
    fn test_due_status_labels() {
        assert_eq!(DueStatus::DueSoon(3).to_string(), "3 days left");
        assert_eq!(DueStatus::DueSoon(1).to_string(), "1 day left");
        assert_eq!(DueStatus::DueToday.to_string(), "Due Today");
    }

    #[test]
    fn test_display_order_unpaid_first() {
        let mut bills = vec![
            bill(1, date(2025, 3, 1), true),
            bill(2, date(2025, 3, 20), false),
            bill(3, date(2025, 3, 5), false),
        ];
        bills.sort_by(Bill::display_order);
        let ids: Vec<u64> = bills.iter().map(|b| b.id.value()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_draft_validation() {
        let errors = BillDraft::new("", Money::zero(), date(2025, 1, 1)).validate();
        assert_eq!(errors.len(), 2);
    }
}
