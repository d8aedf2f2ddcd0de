//! Budget service
//!
//! CRUD for category budgets plus the figures the budget overview shows.
//! A budget's `spent` amount is stored, not derived. [`BudgetService::sync_spent`]
//! recomputes it on request from the expense transactions of the budget's
//! current period.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{WealthError, WealthResult};
use crate::models::{
    Budget, BudgetDraft, BudgetId, BudgetPatch, BudgetPeriod, Category, Entity, Money,
    Transaction,
};
use crate::storage::Storage;

/// Totals across all budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BudgetTotals {
    pub limit: Money,
    pub spent: Money,
}

impl BudgetTotals {
    pub fn remaining(&self) -> Money {
        self.limit - self.spent
    }

    pub fn progress(&self) -> f64 {
        self.spent.percent_of(self.limit).clamp(0.0, 100.0)
    }
}

pub fn totals(budgets: &[Budget]) -> BudgetTotals {
    BudgetTotals {
        limit: budgets.iter().map(|b| b.limit).sum(),
        spent: budgets.iter().map(|b| b.spent).sum(),
    }
}

/// Expenses in `category` dated within the period that contains `today`
pub fn spent_in_period(
    transactions: &[Transaction],
    category: Category,
    period: BudgetPeriod,
    today: NaiveDate,
) -> Money {
    let (start, end) = period.current_range(today);
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.category == category)
        .filter(|t| t.date >= start && t.date <= end)
        .map(|t| t.amount)
        .sum()
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> WealthResult<Vec<Budget>> {
        self.storage.budgets.list().await
    }

    pub async fn get(&self, id: BudgetId) -> WealthResult<Budget> {
        self.storage.budgets.get(id).await
    }

    pub async fn totals(&self) -> WealthResult<BudgetTotals> {
        Ok(totals(&self.list().await?))
    }

    /// Reject a second budget for the same category and period
    async fn ensure_unique(
        &self,
        category: Category,
        period: BudgetPeriod,
        except: Option<BudgetId>,
    ) -> WealthResult<()> {
        let clash = self
            .list()
            .await?
            .into_iter()
            .any(|b| b.category == category && b.period == period && Some(b.id) != except);
        if clash {
            return Err(WealthError::Validation(format!(
                "A {} budget for '{}' already exists",
                period, category
            )));
        }
        Ok(())
    }

    pub async fn create(&self, draft: BudgetDraft) -> WealthResult<Budget> {
        draft.validate().into_result()?;
        self.ensure_unique(draft.category, draft.period, None).await?;

        let budget = self.storage.budgets.create(draft).await?;
        info!(id = %budget.id, category = %budget.category, limit = %budget.limit, "budget created");
        Ok(budget)
    }

    pub async fn update(&self, id: BudgetId, patch: BudgetPatch) -> WealthResult<Budget> {
        patch.validate().into_result()?;
        let current = self.get(id).await?;
        if patch.category.is_some() || patch.period.is_some() {
            let mut merged = current.clone();
            merged.apply_patch(patch.clone());
            self.ensure_unique(merged.category, merged.period, Some(id))
                .await?;
        }

        let budget = self.storage.budgets.update(id, patch).await?;
        info!(id = %budget.id, "budget updated");
        Ok(budget)
    }

    pub async fn delete(&self, id: BudgetId) -> WealthResult<()> {
        self.storage.budgets.remove(id).await?;
        info!(id = %id, "budget deleted");
        Ok(())
    }

    /// Recompute `spent` for one budget from transactions
    pub async fn sync_spent(&self, id: BudgetId, today: NaiveDate) -> WealthResult<Budget> {
        let budget = self.get(id).await?;
        let transactions = self.storage.transactions.list().await?;
        self.store_spent(&budget, &transactions, today).await
    }

    /// Recompute `spent` for every budget; returns the updated budgets
    pub async fn sync_all(&self, today: NaiveDate) -> WealthResult<Vec<Budget>> {
        let transactions = self.storage.transactions.list().await?;
        let mut synced = Vec::new();
        for budget in self.list().await? {
            synced.push(self.store_spent(&budget, &transactions, today).await?);
        }
        Ok(synced)
    }

    async fn store_spent(
        &self,
        budget: &Budget,
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> WealthResult<Budget> {
        let spent = spent_in_period(transactions, budget.category, budget.period, today);
        if spent == budget.spent {
            debug!(id = %budget.id, %spent, "budget spent unchanged");
            return Ok(budget.clone());
        }

        let updated = self
            .storage
            .budgets
            .update(
                budget.id,
                BudgetPatch {
                    spent: Some(spent),
                    ..Default::default()
                },
            )
            .await?;
        info!(id = %updated.id, previous = %budget.spent, %spent, "budget spent synced");
        Ok(updated)
    }
}
