//! Transaction service
//!
//! Validates transaction drafts and patches before they reach the store and
//! provides the filtered, sorted views used by the transaction list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::info;

use crate::error::WealthResult;
use crate::models::{
    Category, Entity, Transaction, TransactionDraft, TransactionId, TransactionKind,
    TransactionPatch,
};
use crate::storage::Storage;

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the description
    pub search: Option<String>,
    pub kind: Option<TransactionKind>,
    pub category: Option<Category>,
    /// Inclusive date range start
    pub start_date: Option<NaiveDate>,
    /// Inclusive date range end
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() && !txn.description.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if self.kind.is_some_and(|kind| txn.kind != kind) {
            return false;
        }
        if self.category.is_some_and(|category| txn.category != category) {
            return false;
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        true
    }
}

/// Sort orders offered by the transaction list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionSort {
    /// Newest first
    #[default]
    Date,
    /// Largest first
    Amount,
    /// Alphabetical
    Description,
}

impl TransactionSort {
    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::Date => b.date.cmp(&a.date),
            Self::Amount => b.amount.cmp(&a.amount),
            Self::Description => a
                .description
                .to_lowercase()
                .cmp(&b.description.to_lowercase()),
        }
    }
}

impl fmt::Display for TransactionSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Description => "description",
        };
        f.pad(name)
    }
}

impl FromStr for TransactionSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "description" | "name" => Ok(Self::Description),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Apply a filter and sort to an already loaded list
pub fn filter_and_sort(
    transactions: Vec<Transaction>,
    filter: &TransactionFilter,
    sort: TransactionSort,
) -> Vec<Transaction> {
    let mut matched: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| filter.matches(t))
        .collect();
    matched.sort_by(|a, b| sort.compare(a, b));
    if let Some(limit) = filter.limit {
        matched.truncate(limit);
    }
    matched
}

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All transactions, newest first
    pub async fn list(&self) -> WealthResult<Vec<Transaction>> {
        self.storage.transactions.list().await
    }

    /// Transactions matching `filter`, in `sort` order
    pub async fn query(
        &self,
        filter: &TransactionFilter,
        sort: TransactionSort,
    ) -> WealthResult<Vec<Transaction>> {
        Ok(filter_and_sort(self.list().await?, filter, sort))
    }

    /// The `count` newest transactions
    pub async fn recent(&self, count: usize) -> WealthResult<Vec<Transaction>> {
        let mut all = self.list().await?;
        all.truncate(count);
        Ok(all)
    }

    pub async fn get(&self, id: TransactionId) -> WealthResult<Transaction> {
        self.storage.transactions.get(id).await
    }

    pub async fn create(&self, mut draft: TransactionDraft) -> WealthResult<Transaction> {
        draft.description = draft.description.trim().to_string();
        draft.validate().into_result()?;

        let txn = self.storage.transactions.create(draft).await?;
        info!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "transaction created");
        Ok(txn)
    }

    /// Merge `patch` over the stored transaction; the merged result must still
    /// pass the draft rules
    pub async fn update(
        &self,
        id: TransactionId,
        mut patch: TransactionPatch,
    ) -> WealthResult<Transaction> {
        let mut merged = self.get(id).await?;
        if let Some(description) = patch.description.as_mut() {
            *description = description.trim().to_string();
        }
        merged.apply_patch(patch.clone());
        merged.to_draft().validate().into_result()?;

        let txn = self.storage.transactions.update(id, patch).await?;
        info!(id = %txn.id, "transaction updated");
        Ok(txn)
    }

    pub async fn delete(&self, id: TransactionId) -> WealthResult<()> {
        self.storage.transactions.remove(id).await?;
        info!(id = %id, "transaction deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::storage::Latency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded() -> Storage {
        let storage = Storage::in_memory(Latency::none());
        let service = TransactionService::new(&storage);
        for draft in [
            TransactionDraft::expense(Money::from_cents(450), Category::Food, "Starbucks", date(2025, 1, 3)),
            TransactionDraft::income(Money::from_units(3_000), Category::Salary, "Payroll", date(2025, 1, 1)),
            TransactionDraft::expense(Money::from_units(60), Category::Transportation, "Uber ride", date(2025, 1, 9)),
            TransactionDraft::expense(Money::from_units(25), Category::Food, "Pizza night", date(2025, 1, 5)),
        ] {
            service.create(draft).await.unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft_before_store() {
        let storage = Storage::in_memory(Latency::none());
        let service = TransactionService::new(&storage);

        let err = service
            .create(TransactionDraft::expense(Money::zero(), Category::Food, "x", date(2025, 1, 1)))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_trims_description() {
        let storage = Storage::in_memory(Latency::none());
        let service = TransactionService::new(&storage);
        let txn = service
            .create(TransactionDraft::expense(
                Money::from_units(5),
                Category::Food,
                "  Bagel ",
                date(2025, 1, 1),
            ))
            .await
            .unwrap();
        assert_eq!(txn.description, "Bagel");
    }

    #[tokio::test]
    async fn test_update_validates_merged_result() {
        let storage = seeded().await;
        let service = TransactionService::new(&storage);
        let payroll = service
            .query(&TransactionFilter::new().search("payroll"), TransactionSort::Date)
            .await
            .unwrap()
            .remove(0);

        // Salary is not an expense category
        let err = service
            .update(
                payroll.id,
                TransactionPatch {
                    kind: Some(TransactionKind::Expense),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.get(payroll.id).await.unwrap(), payroll);
    }

    #[tokio::test]
    async fn test_filter_by_search_kind_and_category() {
        let storage = seeded().await;
        let service = TransactionService::new(&storage);

        let found = service
            .query(&TransactionFilter::new().search("UBER"), TransactionSort::Date)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "Uber ride");

        let income = service
            .query(&TransactionFilter::new().kind(TransactionKind::Income), TransactionSort::Date)
            .await
            .unwrap();
        assert_eq!(income.len(), 1);

        let food = service
            .query(&TransactionFilter::new().category(Category::Food), TransactionSort::Date)
            .await
            .unwrap();
        assert_eq!(food.len(), 2);
    }

    #[tokio::test]
    async fn test_recent_returns_newest_first() {
        let storage = seeded().await;
        let service = TransactionService::new(&storage);

        let recent = service.recent(2).await.unwrap();
        let names: Vec<_> = recent.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["Uber ride", "Pizza night"]);
    }

    #[tokio::test]
    async fn test_sort_orders() {
        let storage = seeded().await;
        let service = TransactionService::new(&storage);
        let all = TransactionFilter::new();

        let by_date: Vec<_> = service
            .query(&all, TransactionSort::Date)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.description)
            .collect();
        assert_eq!(by_date, vec!["Uber ride", "Pizza night", "Starbucks", "Payroll"]);

        let by_amount = service.query(&all, TransactionSort::Amount).await.unwrap();
        assert_eq!(by_amount[0].description, "Payroll");
        assert_eq!(by_amount[3].description, "Starbucks");

        let by_name = service.query(&all, TransactionSort::Description).await.unwrap();
        assert_eq!(by_name[0].description, "Payroll");
        assert_eq!(by_name[3].description, "Uber ride");
    }

    #[tokio::test]
    async fn test_recent_and_delete() {
        let storage = seeded().await;
        let service = TransactionService::new(&storage);

        let recent = service.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].description, "Uber ride");

        service.delete(recent[0].id).await.unwrap();
        assert!(service.get(recent[0].id).await.unwrap_err().is_not_found());
        assert_eq!(service.list().await.unwrap().len(), 3);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("Amount".parse::<TransactionSort>().unwrap(), TransactionSort::Amount);
        assert!("size".parse::<TransactionSort>().is_err());
    }
}
