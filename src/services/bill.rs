//! Bill service

use chrono::NaiveDate;
use tracing::info;

use crate::error::WealthResult;
use crate::models::{Bill, BillDraft, BillId, BillPatch, DueStatus, Money};
use crate::storage::Storage;

/// Service for bills
pub struct BillService<'a> {
    storage: &'a Storage,
}

impl<'a> BillService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All bills, unpaid first and then by due date
    pub async fn list(&self) -> WealthResult<Vec<Bill>> {
        let mut bills = self.storage.bills.list().await?;
        bills.sort_by(Bill::display_order);
        Ok(bills)
    }

    pub async fn get(&self, id: BillId) -> WealthResult<Bill> {
        self.storage.bills.get(id).await
    }

    pub async fn create(&self, mut draft: BillDraft) -> WealthResult<Bill> {
        draft.name = draft.name.trim().to_string();
        draft.validate().into_result()?;

        let bill = self.storage.bills.create(draft).await?;
        info!(id = %bill.id, name = %bill.name, due = %bill.due_date, "bill created");
        Ok(bill)
    }

    pub async fn update(&self, id: BillId, mut patch: BillPatch) -> WealthResult<Bill> {
        if let Some(name) = patch.name.as_mut() {
            *name = name.trim().to_string();
        }
        patch.validate().into_result()?;

        let bill = self.storage.bills.update(id, patch).await?;
        info!(id = %bill.id, "bill updated");
        Ok(bill)
    }

    pub async fn delete(&self, id: BillId) -> WealthResult<()> {
        self.storage.bills.remove(id).await?;
        info!(id = %id, "bill deleted");
        Ok(())
    }

    /// Flip the paid flag
    pub async fn toggle_paid(&self, id: BillId) -> WealthResult<Bill> {
        let bill = self.get(id).await?;
        let updated = self
            .storage
            .bills
            .update(
                id,
                BillPatch {
                    is_paid: Some(!bill.is_paid),
                    ..Default::default()
                },
            )
            .await?;
        info!(id = %id, paid = updated.is_paid, "bill paid status toggled");
        Ok(updated)
    }

    /// Unpaid bills that are overdue or due within the next week
    pub async fn needing_attention(&self, today: NaiveDate) -> WealthResult<Vec<Bill>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|b| {
                matches!(
                    b.due_status(today),
                    DueStatus::Overdue | DueStatus::DueToday | DueStatus::DueSoon(_)
                )
            })
            .collect())
    }

    /// Sum of unpaid bill amounts
    pub async fn unpaid_total(&self) -> WealthResult<Money> {
        Ok(self
            .list()
            .await?
            .iter()
            .filter(|b| !b.is_paid)
            .map(|b| b.amount)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Latency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded(storage: &Storage) {
        let service = BillService::new(storage);
        for (name, amount, due, paid) in [
            ("Rent", 1_500, date(2025, 4, 1), false),
            ("Internet", 60, date(2025, 3, 12), false),
            ("Gym", 40, date(2025, 3, 5), true),
            ("Insurance", 120, date(2025, 5, 20), false),
        ] {
            service
                .create(BillDraft::new(name, Money::from_units(amount), due).paid(paid))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_list_puts_unpaid_first_by_due_date() {
        let storage = Storage::in_memory(Latency::none());
        seeded(&storage).await;

        let names: Vec<_> = BillService::new(&storage)
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Internet", "Rent", "Insurance", "Gym"]);
    }

    #[tokio::test]
    async fn test_toggle_paid_round_trip() {
        let storage = Storage::in_memory(Latency::none());
        seeded(&storage).await;
        let service = BillService::new(&storage);

        let paid = service.toggle_paid(BillId::new(1)).await.unwrap();
        assert!(paid.is_paid);
        let unpaid = service.toggle_paid(BillId::new(1)).await.unwrap();
        assert!(!unpaid.is_paid);
        assert!(service
            .toggle_paid(BillId::new(42))
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_needing_attention_and_unpaid_total() {
        let storage = Storage::in_memory(Latency::none());
        seeded(&storage).await;
        let service = BillService::new(&storage);

        let attention = service.needing_attention(date(2025, 3, 10)).await.unwrap();
        let names: Vec<_> = attention.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Internet"]);

        assert_eq!(service.unpaid_total().await.unwrap(), Money::from_units(1_680));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let storage = Storage::in_memory(Latency::none());
        let err = BillService::new(&storage)
            .create(BillDraft::new("  ", Money::from_units(10), date(2025, 1, 1)))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
