//! Savings goal service

use chrono::NaiveDate;
use tracing::info;

use crate::error::{WealthError, WealthResult};
use crate::models::{Goal, GoalDraft, GoalId, GoalPatch, Money};
use crate::storage::Storage;

/// Service for savings goals
pub struct GoalService<'a> {
    storage: &'a Storage,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> WealthResult<Vec<Goal>> {
        self.storage.goals.list().await
    }

    pub async fn get(&self, id: GoalId) -> WealthResult<Goal> {
        self.storage.goals.get(id).await
    }

    /// Create a goal; its target date must be after `today`
    pub async fn create(&self, mut draft: GoalDraft, today: NaiveDate) -> WealthResult<Goal> {
        draft.name = draft.name.trim().to_string();
        draft.validate(today).into_result()?;

        let goal = self.storage.goals.create(draft).await?;
        info!(id = %goal.id, name = %goal.name, target = %goal.target_amount, "goal created");
        Ok(goal)
    }

    /// Update a goal; a changed target date must be after `today`, an
    /// unchanged one may already have passed
    pub async fn update(
        &self,
        id: GoalId,
        mut patch: GoalPatch,
        today: NaiveDate,
    ) -> WealthResult<Goal> {
        if let Some(name) = patch.name.as_mut() {
            *name = name.trim().to_string();
        }
        patch.validate(today).into_result()?;

        let goal = self.storage.goals.update(id, patch).await?;
        info!(id = %goal.id, "goal updated");
        Ok(goal)
    }

    pub async fn delete(&self, id: GoalId) -> WealthResult<()> {
        self.storage.goals.remove(id).await?;
        info!(id = %id, "goal deleted");
        Ok(())
    }

    /// Add `amount` to the goal's saved amount
    pub async fn contribute(&self, id: GoalId, amount: Money) -> WealthResult<Goal> {
        if !amount.is_positive() {
            return Err(WealthError::Validation(
                "Contribution must be greater than 0".into(),
            ));
        }

        let goal = self.get(id).await?;
        let updated = self
            .storage
            .goals
            .update(
                id,
                GoalPatch {
                    current_amount: Some(goal.current_amount + amount),
                    ..Default::default()
                },
            )
            .await?;
        info!(id = %id, %amount, total = %updated.current_amount, "goal contribution");
        if updated.is_complete() && !goal.is_complete() {
            info!(id = %id, name = %updated.name, "goal reached");
        }
        Ok(updated)
    }
}
