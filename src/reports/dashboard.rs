//! Dashboard summary
//!
//! The at-a-glance figures for the current month: income, expenses and net,
//! budget totals, the newest transactions, this month's spending by category
//! and a six-month trend.

use chrono::NaiveDate;

use super::aggregator::{aggregate, MonthBucket};
use super::financial::{breakdown, CategoryAmount};
use crate::display::truncate;
use crate::error::WealthResult;
use crate::models::{Budget, Money, Month, Transaction};
use crate::services::budget::{totals, BudgetTotals};
use crate::storage::Storage;

/// Number of newest transactions shown
pub const RECENT_COUNT: usize = 5;

/// Length of the dashboard trend, in months
pub const TREND_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub month: Month,
    pub month_income: Money,
    pub month_expenses: Money,
    pub month_net: Money,
    pub budgets: BudgetTotals,
    pub recent: Vec<Transaction>,
    pub expenses_by_category: Vec<CategoryAmount>,
    pub trend: Vec<MonthBucket>,
}

impl DashboardSummary {
    /// Build the summary for the month containing `today`
    ///
    /// `transactions` must be newest first, as returned by the repository.
    pub fn compile(transactions: &[Transaction], budgets: &[Budget], today: NaiveDate) -> Self {
        let month = Month::containing(today);
        let this_month: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| month.contains(t.date))
            .collect();

        let month_income: Money = this_month
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum();
        let month_expenses: Money = this_month
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum();

        Self {
            month,
            month_income,
            month_expenses,
            month_net: month_income - month_expenses,
            budgets: totals(budgets),
            recent: transactions.iter().take(RECENT_COUNT).cloned().collect(),
            expenses_by_category: breakdown(this_month.into_iter().filter(|t| t.is_expense())),
            trend: aggregate(transactions, month, TREND_MONTHS),
        }
    }

    pub async fn generate(storage: &Storage, today: NaiveDate) -> WealthResult<Self> {
        let transactions = storage.transactions.list().await?;
        let budgets = storage.budgets.list().await?;
        Ok(Self::compile(&transactions, &budgets, today))
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Dashboard: {}\n", self.month.label()));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:<20} {:>14}\n", "Income", self.month_income));
        output.push_str(&format!("{:<20} {:>14}\n", "Expenses", self.month_expenses));
        output.push_str(&format!("{:<20} {:>14}\n", "Net", self.month_net));
        output.push_str(&format!(
            "{:<20} {:>14} of {} ({:.0}%)\n",
            "Budget spent",
            self.budgets.spent,
            self.budgets.limit,
            self.budgets.progress()
        ));

        output.push_str("\nRecent Transactions\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if self.recent.is_empty() {
            output.push_str("No transactions yet.\n");
        }
        for txn in &self.recent {
            output.push_str(&format!(
                "{:<12} {:<30} {:>14}\n",
                txn.date.format("%b %d"),
                truncate(&txn.description, 30),
                txn.signed_amount()
            ));
        }

        if !self.expenses_by_category.is_empty() {
            output.push_str("\nSpending This Month\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for row in &self.expenses_by_category {
                output.push_str(&format!(
                    "{:<24} {:>14} {:>7.1}%\n",
                    row.category.label(),
                    row.amount,
                    row.percentage
                ));
            }
        }

        output.push_str("\nSix-Month Trend\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for bucket in &self.trend {
            output.push_str(&format!(
                "{:<10} {:>14} {:>14} {:>14}\n",
                bucket.month.short_label(),
                bucket.income,
                bucket.expenses,
                bucket.net
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetDraft, Category, TransactionDraft};
    use crate::storage::Latency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_figures() {
        let storage = Storage::in_memory(Latency::none());
        for draft in [
            TransactionDraft::income(Money::from_units(4_000), Category::Salary, "Payroll", date(2025, 3, 1)),
            TransactionDraft::expense(Money::from_units(80), Category::Food, "Groceries", date(2025, 3, 4)),
            TransactionDraft::expense(Money::from_units(20), Category::Entertainment, "Movie", date(2025, 3, 6)),
            TransactionDraft::expense(Money::from_units(500), Category::Shopping, "TV", date(2025, 2, 20)),
            TransactionDraft::expense(Money::from_units(5), Category::Food, "Coffee", date(2025, 3, 7)),
            TransactionDraft::expense(Money::from_units(7), Category::Food, "Bagel", date(2025, 3, 8)),
        ] {
            storage.transactions.create(draft).await.unwrap();
        }
        storage
            .budgets
            .create(BudgetDraft::new(Category::Food, Money::from_units(400)).with_spent(Money::from_units(92)))
            .await
            .unwrap();

        let summary = DashboardSummary::generate(&storage, date(2025, 3, 15)).await.unwrap();
        assert_eq!(summary.month_income, Money::from_units(4_000));
        assert_eq!(summary.month_expenses, Money::from_units(112));
        assert_eq!(summary.month_net, Money::from_units(3_888));
        assert_eq!(summary.budgets.limit, Money::from_units(400));
        assert_eq!(summary.budgets.spent, Money::from_units(92));

        assert_eq!(summary.recent.len(), RECENT_COUNT);
        assert_eq!(summary.recent[0].description, "Bagel");

        assert_eq!(summary.expenses_by_category[0].category, Category::Food);
        assert_eq!(summary.expenses_by_category[0].amount, Money::from_units(92));
        assert_eq!(summary.expenses_by_category.len(), 2);

        assert_eq!(summary.trend.len(), 6);
        assert_eq!(summary.trend[4].expenses, Money::from_units(500));

        let text = summary.format_terminal();
        assert!(text.contains("Mar 2025"));
        assert!(text.contains("Bagel"));
    }

    #[test]
    fn test_empty_dashboard() {
        let summary = DashboardSummary::compile(&[], &[], date(2025, 3, 15));
        assert_eq!(summary.month_net, Money::zero());
        assert_eq!(summary.budgets.progress(), 0.0);
        assert!(summary.format_terminal().contains("No transactions yet."));
    }
}
