//! Core data models for WealthFlow
//!
//! This module contains the records the application tracks (transactions,
//! budgets, savings goals and bills) together with the value types they are
//! built from: money, categories, months and ids.

pub mod bill;
pub mod budget;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;
pub mod validation;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

pub use bill::{Bill, BillDraft, BillPatch, DueStatus};
pub use budget::{Budget, BudgetDraft, BudgetPatch, BudgetPeriod, BudgetStatus};
pub use category::{Category, UnknownCategory};
pub use goal::{Goal, GoalDraft, GoalPatch};
pub use ids::{BillId, BudgetId, GoalId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use period::{Month, MonthParseError};
pub use transaction::{Transaction, TransactionDraft, TransactionKind, TransactionPatch};
pub use validation::{FieldError, FieldErrors};

/// A record kept in a repository
///
/// Entities are created from a draft (the repository assigns the id) and
/// changed by merging a patch over the stored value.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Id: Copy
        + Ord
        + Hash
        + fmt::Display
        + From<u64>
        + Into<u64>
        + Send
        + Sync
        + Serialize
        + DeserializeOwned
        + 'static;
    type Draft: Send + 'static;
    type Patch: Send + 'static;

    /// Entity name used in errors and log events
    const KIND: &'static str;

    fn id(&self) -> Self::Id;

    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch);

    /// Order of `list()` results; the sort is stable so ties keep id order
    fn list_order(_a: &Self, _b: &Self) -> Ordering {
        Ordering::Equal
    }
}
