//! Budget model
//!
//! A spending limit for one expense category over a month or a year. The
//! `spent` figure is stored alongside the limit and only changes when it is
//! edited or explicitly re-synced from transactions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::Category;
use super::ids::BudgetId;
use super::money::Money;
use super::period::Month;
use super::transaction::TransactionKind;
use super::validation::FieldErrors;
use super::Entity;

/// Progress at or above this percentage is flagged as a warning
pub const WARNING_THRESHOLD: f64 = 75.0;

/// How often a budget resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Inclusive date range of the period containing `today`
    pub fn current_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let month = Month::containing(today);
        match self {
            Self::Monthly => (month.start_date(), month.end_date()),
            Self::Yearly => {
                let first = Month::new(month.year(), 1).unwrap_or(month);
                let last = Month::new(month.year(), 12).unwrap_or(month);
                (first.start_date(), last.end_date())
            }
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" | "y" => Ok(Self::Yearly),
            other => Err(format!("Unknown budget period: {}", other)),
        }
    }
}

/// Where a budget stands relative to its limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    OverBudget,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OnTrack => "On track",
            Self::Warning => "Warning",
            Self::OverBudget => "Over budget",
        };
        f.pad(label)
    }
}

/// A spending limit for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub category: Category,
    pub limit: Money,
    #[serde(default)]
    pub spent: Money,
    #[serde(default)]
    pub period: BudgetPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Budget {
    /// Spent as a percentage of the limit, capped at 100
    pub fn progress(&self) -> f64 {
        self.spent.percent_of(self.limit).clamp(0.0, 100.0)
    }

    /// Limit minus spent; negative when over budget
    pub fn remaining(&self) -> Money {
        self.limit - self.spent
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.limit
    }

    pub fn status(&self) -> BudgetStatus {
        if self.is_over_budget() {
            BudgetStatus::OverBudget
        } else if self.progress() >= WARNING_THRESHOLD {
            BudgetStatus::Warning
        } else {
            BudgetStatus::OnTrack
        }
    }
}

/// Payload for creating a budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetDraft {
    pub category: Category,
    pub limit: Money,
    #[serde(default)]
    pub spent: Money,
    #[serde(default)]
    pub period: BudgetPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BudgetDraft {
    pub fn new(category: Category, limit: Money) -> Self {
        Self {
            category,
            limit,
            spent: Money::zero(),
            period: BudgetPeriod::Monthly,
            description: None,
        }
    }

    pub fn with_period(mut self, period: BudgetPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn with_spent(mut self, spent: Money) -> Self {
        self.spent = spent;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !self.category.allowed_for(TransactionKind::Expense) {
            errors.push(
                "category",
                format!("Category '{}' cannot be budgeted", self.category),
            );
        }
        errors.check(
            !self.limit.is_positive(),
            "limit",
            "Budget limit must be greater than 0",
        );
        errors.check(self.spent.is_negative(), "spent", "Spent cannot be negative");
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetPeriod>,
    /// `Some(None)` clears the description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl BudgetPatch {
    /// Validate only the fields the patch sets
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(category) = self.category {
            if !category.allowed_for(TransactionKind::Expense) {
                errors.push(
                    "category",
                    format!("Category '{}' cannot be budgeted", category),
                );
            }
        }
        if let Some(limit) = self.limit {
            errors.check(
                !limit.is_positive(),
                "limit",
                "Budget limit must be greater than 0",
            );
        }
        if let Some(spent) = self.spent {
            errors.check(spent.is_negative(), "spent", "Spent cannot be negative");
        }
        errors
    }
}

impl Entity for Budget {
    type Id = BudgetId;
    type Draft = BudgetDraft;
    type Patch = BudgetPatch;

    const KIND: &'static str = "Budget";

    fn id(&self) -> BudgetId {
        self.id
    }

    fn from_draft(id: BudgetId, draft: BudgetDraft) -> Self {
        Self {
            id,
            category: draft.category,
            limit: draft.limit,
            spent: draft.spent,
            period: draft.period,
            description: draft.description,
        }
    }

    fn apply_patch(&mut self, patch: BudgetPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(spent) = patch.spent {
            self.spent = spent;
        }
        if let Some(period) = patch.period {
            self.period = period;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}
