//! Savings goal model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;
use super::validation::FieldErrors;
use super::Entity;

/// A savings target with a deadline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,
    /// May exceed the target
    #[serde(default)]
    pub current_amount: Money,
    pub target_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Goal {
    /// Percentage saved, capped at 100; zero for a zero target
    pub fn progress(&self) -> f64 {
        self.current_amount
            .percent_of(self.target_amount)
            .clamp(0.0, 100.0)
    }

    /// Amount still to save, never negative
    pub fn remaining(&self) -> Money {
        let remaining = self.target_amount - self.current_amount;
        if remaining.is_negative() {
            Money::zero()
        } else {
            remaining
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Days from `today` until the target date; negative once it has passed
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} of {})",
            self.name, self.current_amount, self.target_amount
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDraft {
    pub name: String,
    pub target_amount: Money,
    #[serde(default)]
    pub current_amount: Money,
    pub target_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GoalDraft {
    pub fn new(name: impl Into<String>, target_amount: Money, target_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            target_amount,
            current_amount: Money::zero(),
            target_date,
            description: None,
        }
    }

    pub fn with_current(mut self, current_amount: Money) -> Self {
        self.current_amount = current_amount;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The target date must lie strictly after `today`
    pub fn validate(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(self.name.trim().is_empty(), "name", "Goal name is required");
        errors.check(
            !self.target_amount.is_positive(),
            "target_amount",
            "Target amount must be greater than 0",
        );
        errors.check(
            self.current_amount.is_negative(),
            "current_amount",
            "Current amount cannot be negative",
        );
        errors.check(
            self.target_date <= today,
            "target_date",
            "Target date must be in the future",
        );
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl GoalPatch {
    /// Validate the fields the patch sets; a new target date must be in the future
    pub fn validate(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.check(name.trim().is_empty(), "name", "Goal name is required");
        }
        if let Some(target) = self.target_amount {
            errors.check(
                !target.is_positive(),
                "target_amount",
                "Target amount must be greater than 0",
            );
        }
        if let Some(current) = self.current_amount {
            errors.check(
                current.is_negative(),
                "current_amount",
                "Current amount cannot be negative",
            );
        }
        if let Some(date) = self.target_date {
            errors.check(
                date <= today,
                "target_date",
                "Target date must be in the future",
            );
        }
        errors
    }
}

impl Entity for Goal {
    type Id = GoalId;
    type Draft = GoalDraft;
    type Patch = GoalPatch;

    const KIND: &'static str = "Goal";

    fn id(&self) -> GoalId {
        self.id
    }

    fn from_draft(id: GoalId, draft: GoalDraft) -> Self {
        Self {
            id,
            name: draft.name,
            target_amount: draft.target_amount,
            current_amount: draft.current_amount,
            target_date: draft.target_date,
            description: draft.description,
        }
    }

    fn apply_patch(&mut self, patch: GoalPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(target) = patch.target_amount {
            self.target_amount = target;
        }
        if let Some(current) = patch.current_amount {
            self.current_amount = current;
        }
        if let Some(date) = patch.target_date {
            self.target_date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goal(target: i64, current: i64) -> Goal {
        Goal::from_draft(
            GoalId::new(1),
            GoalDraft::new("Emergency fund", Money::from_units(target), date(2026, 12, 31))
                .with_current(Money::from_units(current)),
        )
    }

    #[test]
    fn test_progress_and_completion() {
        let g = goal(10_000, 2_500);
        assert_eq!(g.progress(), 25.0);
        assert_eq!(g.remaining(), Money::from_units(7_500));
        assert!(!g.is_complete());

        let over = goal(1_000, 1_500);
        assert_eq!(over.progress(), 100.0);
        assert_eq!(over.remaining(), Money::zero());
        assert!(over.is_complete());
    }

    #[test]
    fn test_zero_target_progress_is_zero() {
        let mut g = goal(1, 0);
        g.target_amount = Money::zero();
        assert_eq!(g.progress(), 0.0);
    }

    #[test]
    fn test_target_date_must_be_future() {
        let today = date(2025, 6, 1);
        let draft = GoalDraft::new("Vacation", Money::from_units(2_000), today);
        assert!(draft.validate(today).message_for("target_date").is_some());

        let draft = GoalDraft::new("Vacation", Money::from_units(2_000), date(2025, 6, 2));
        assert!(draft.validate(today).is_empty());
    }

    #[test]
    fn test_draft_rejects_blank_name_and_negative_current() {
        let draft = GoalDraft::new(" ", Money::from_units(10), date(2030, 1, 1))
            .with_current(Money::from_cents(-1));
        let errors = draft.validate(date(2025, 1, 1));
        assert!(errors.message_for("name").is_some());
        assert!(errors.message_for("current_amount").is_some());
    }

    #[test]
    fn test_days_left() {
        let g = goal(100, 0);
        assert_eq!(g.days_left(date(2026, 12, 30)), 1);
    }
}
