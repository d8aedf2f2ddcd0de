//! Transaction model
//!
//! Amounts are always stored positive; whether money came in or went out is
//! carried by the transaction kind.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::Category;
use super::ids::TransactionId;
use super::money::Money;
use super::validation::FieldErrors;
use super::Entity;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Always positive
    pub amount: Money,

    pub category: Category,

    pub description: String,

    pub date: NaiveDate,

    #[serde(default)]
    pub recurring: bool,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with the sign implied by the kind (expenses negative)
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// The payload this transaction would be created from
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            description: self.description.clone(),
            date: self.date,
            recurring: self.recurring,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.signed_amount()
        )
    }
}

/// Payload for creating a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub recurring: bool,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        amount: Money,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            category,
            description: description.into(),
            date,
            recurring: false,
        }
    }

    pub fn expense(
        amount: Money,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::new(TransactionKind::Expense, amount, category, description, date)
    }

    pub fn income(
        amount: Money,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::new(TransactionKind::Income, amount, category, description, date)
    }

    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    /// Check the draft against the transaction form rules
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(
            !self.amount.is_positive(),
            "amount",
            "Amount must be greater than 0",
        );
        if self.amount.exceeds_max() {
            errors.push("amount", format!("Amount cannot exceed {}", Money::MAX));
        }
        if !self.category.allowed_for(self.kind) {
            errors.push(
                "category",
                format!(
                    "Category '{}' is not available for {} transactions",
                    self.category, self.kind
                ),
            );
        }
        errors.check(
            self.description.trim().is_empty(),
            "description",
            "Description is required",
        );
        errors
    }
}

/// Partial update; `None` fields keep their stored values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Entity for Transaction {
    type Id = TransactionId;
    type Draft = TransactionDraft;
    type Patch = TransactionPatch;

    const KIND: &'static str = "Transaction";

    fn id(&self) -> TransactionId {
        self.id
    }

    fn from_draft(id: TransactionId, draft: TransactionDraft) -> Self {
        Self {
            id,
            kind: draft.kind,
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            recurring: draft.recurring,
        }
    }

    fn apply_patch(&mut self, patch: TransactionPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(recurring) = patch.recurring {
            self.recurring = recurring;
        }
    }

    /// Newest first; equal dates keep insertion order
    fn list_order(a: &Self, b: &Self) -> std::cmp::Ordering {
        b.date.cmp(&a.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn coffee() -> Transaction {
        Transaction::from_draft(
            TransactionId::new(1),
            TransactionDraft::expense(
                Money::from_cents(450),
                Category::Food,
                "Coffee",
                date(2025, 1, 15),
            ),
        )
    }

    #[test]
    fn test_signed_amount_follows_kind() {
        let expense = coffee();
        assert_eq!(expense.signed_amount(), Money::from_cents(-450));

        let mut income = coffee();
        income.kind = TransactionKind::Income;
        assert_eq!(income.signed_amount(), Money::from_cents(450));
    }

    #[test]
    fn test_draft_validation() {
        let draft = TransactionDraft::expense(Money::zero(), Category::Salary, "  ", date(2025, 1, 1));
        let errors = draft.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.message_for("amount").is_some());
        assert!(errors.message_for("category").is_some());
        assert!(errors.message_for("description").is_some());

        let ok = TransactionDraft::income(
            Money::from_units(3000),
            Category::Salary,
            "Payroll",
            date(2025, 1, 1),
        );
        assert!(ok.validate().is_empty());
    }

    #[test]
    fn test_draft_rejects_amount_above_max() {
        let draft = TransactionDraft::income(
            Money::from_cents(i64::MAX),
            Category::Salary,
            "Payroll",
            date(2025, 1, 1),
        );
        let errors = draft.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.message_for("amount").is_some());
    }

    #[test]
    fn test_apply_patch_keeps_omitted_fields() {
        let mut txn = coffee();
        txn.apply_patch(TransactionPatch {
            amount: Some(Money::from_cents(500)),
            ..Default::default()
        });

        assert_eq!(txn.amount, Money::from_cents(500));
        assert_eq!(txn.description, "Coffee");
        assert_eq!(txn.category, Category::Food);
        assert_eq!(txn.date, date(2025, 1, 15));
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let json = serde_json::to_value(coffee()).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["category"], "food");
        assert_eq!(json["amount"], 450);
        assert_eq!(json["date"], "2025-01-15");
    }

    #[test]
    fn test_display() {
        assert_eq!(coffee().to_string(), "2025-01-15 Coffee -$4.50");
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}
