//! Financial report
//!
//! Compiles the figures of the reports screen from a list of transactions
//! and a window of months: income and expense totals, savings rate,
//! per-category breakdowns, monthly averages and chart-ready trend series.
//! Compilation is pure and total: an empty input gives zeros, never an error.

use serde::Serialize;
use tracing::debug;

use super::aggregator::{aggregate, MonthBucket, ReportWindow};
use crate::error::WealthResult;
use crate::models::{Category, Money, Transaction, TransactionKind};
use crate::storage::Storage;

/// One row of a category breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub category: Category,
    pub amount: Money,
    /// Share of the breakdown's total, 0 when that total is zero
    pub percentage: f64,
}

/// Parallel series for charting, aligned by month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expenses: Vec<f64>,
    pub net: Vec<f64>,
}

/// Per-month averages over the whole window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyAverages {
    pub income: Money,
    pub expenses: Money,
    pub savings: Money,
}

/// Compiled report for a window of months
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialReport {
    pub window: ReportWindow,
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_savings: Money,
    /// Net savings as a percentage of income; 0 without income
    pub savings_rate: f64,
    pub expenses_by_category: Vec<CategoryAmount>,
    pub income_by_category: Vec<CategoryAmount>,
    pub monthly: Vec<MonthBucket>,
    pub averages: MonthlyAverages,
    pub transaction_count: usize,
}

/// Savings rate in percent; 0 when there is no income
pub fn savings_rate(income: Money, net: Money) -> f64 {
    if income.is_positive() {
        net.cents() as f64 / income.cents() as f64 * 100.0
    } else {
        0.0
    }
}

/// Group amounts by category, largest first
///
/// Equal amounts keep the order in which their categories first appeared.
pub fn breakdown<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<CategoryAmount> {
    let mut sums: Vec<(Category, Money)> = Vec::new();
    for txn in transactions {
        match sums.iter_mut().find(|(c, _)| *c == txn.category) {
            Some((_, sum)) => *sum += txn.amount,
            None => sums.push((txn.category, txn.amount)),
        }
    }

    let total: Money = sums.iter().map(|(_, amount)| *amount).sum();
    let mut rows: Vec<CategoryAmount> = sums
        .into_iter()
        .map(|(category, amount)| CategoryAmount {
            category,
            amount,
            percentage: amount.percent_of(total),
        })
        .collect();
    rows.sort_by(|a, b| b.amount.cmp(&a.amount));
    rows
}

impl FinancialReport {
    /// Compile the report from transactions in any order
    pub fn compile(transactions: &[Transaction], window: ReportWindow) -> Self {
        let in_window: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| window.contains(t.date))
            .collect();

        let (income, expenses): (Vec<&Transaction>, Vec<&Transaction>) = in_window
            .iter()
            .copied()
            .partition(|t| t.kind == TransactionKind::Income);

        let total_income: Money = income.iter().map(|t| t.amount).sum();
        let total_expenses: Money = expenses.iter().map(|t| t.amount).sum();
        let net_savings = total_income - total_expenses;

        let averages = MonthlyAverages {
            income: total_income.split_evenly(window.months),
            expenses: total_expenses.split_evenly(window.months),
            savings: net_savings.split_evenly(window.months),
        };

        debug!(
            period = %window.period_label(),
            transactions = in_window.len(),
            %total_income,
            %total_expenses,
            "compiled financial report"
        );

        Self {
            window,
            total_income,
            total_expenses,
            net_savings,
            savings_rate: savings_rate(total_income, net_savings),
            expenses_by_category: breakdown(expenses),
            income_by_category: breakdown(income),
            monthly: aggregate(transactions, window.anchor, window.months),
            averages,
            transaction_count: in_window.len(),
        }
    }

    /// Load all transactions and compile the report
    pub async fn generate(storage: &Storage, window: ReportWindow) -> WealthResult<Self> {
        let transactions = storage.transactions.list().await?;
        Ok(Self::compile(&transactions, window))
    }

    pub fn has_income(&self) -> bool {
        !self.income_by_category.is_empty()
    }

    /// The `n` largest expense categories
    pub fn top_expense_categories(&self, n: usize) -> &[CategoryAmount] {
        &self.expenses_by_category[..n.min(self.expenses_by_category.len())]
    }

    pub fn trend_series(&self) -> TrendSeries {
        TrendSeries {
            labels: self.monthly.iter().map(|b| b.label.clone()).collect(),
            income: self.monthly.iter().map(|b| b.income.as_f64()).collect(),
            expenses: self.monthly.iter().map(|b| b.expenses.as_f64()).collect(),
            net: self.monthly.iter().map(|b| b.net.as_f64()).collect(),
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Financial Report: {}\n",
            self.window.period_label()
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:<24} {:>14}\n", "Total Income", self.total_income));
        output.push_str(&format!("{:<24} {:>14}\n", "Total Expenses", self.total_expenses));
        output.push_str(&format!("{:<24} {:>14}\n", "Net Savings", self.net_savings));
        output.push_str(&format!("{:<24} {:>13.1}%\n", "Savings Rate", self.savings_rate));
        output.push('\n');
        output.push_str(&format!("{:<24} {:>14}\n", "Avg Monthly Income", self.averages.income));
        output.push_str(&format!("{:<24} {:>14}\n", "Avg Monthly Expenses", self.averages.expenses));
        output.push_str(&format!("{:<24} {:>14}\n", "Avg Monthly Savings", self.averages.savings));

        output.push_str(&format!(
            "\n{:<10} {:>14} {:>14} {:>14}\n",
            "Month", "Income", "Expenses", "Savings"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for bucket in &self.monthly {
            output.push_str(&format!(
                "{:<10} {:>14} {:>14} {:>14}\n",
                bucket.label, bucket.income, bucket.expenses, bucket.net
            ));
        }

        if !self.expenses_by_category.is_empty() {
            output.push_str("\nTop Expense Categories\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for row in self.top_expense_categories(5) {
                output.push_str(&format!(
                    "{:<24} {:>14} {:>7.1}%\n",
                    row.category.label(),
                    row.amount,
                    row.percentage
                ));
            }
        }

        if self.has_income() {
            output.push_str("\nIncome Sources\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for row in &self.income_by_category {
                output.push_str(&format!(
                    "{:<24} {:>14} {:>7.1}%\n",
                    row.category.label(),
                    row.amount,
                    row.percentage
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entity, Month, TransactionDraft, TransactionId};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        let drafts = vec![
            TransactionDraft::income(Money::from_units(3_000), Category::Salary, "Payroll", date(2025, 1, 1)),
            TransactionDraft::income(Money::from_units(3_000), Category::Salary, "Payroll", date(2025, 2, 1)),
            TransactionDraft::income(Money::from_units(600), Category::Freelance, "Logo design", date(2025, 2, 10)),
            TransactionDraft::expense(Money::from_units(1_200), Category::Utilities, "Rent", date(2025, 1, 3)),
            TransactionDraft::expense(Money::from_units(300), Category::Food, "Groceries", date(2025, 1, 12)),
            TransactionDraft::expense(Money::from_units(150), Category::Transportation, "Gas", date(2025, 2, 5)),
            TransactionDraft::expense(Money::from_units(300), Category::Shopping, "Jacket", date(2025, 2, 20)),
            // Outside the window
            TransactionDraft::expense(Money::from_units(999), Category::Food, "Old", date(2024, 10, 1)),
        ];
        drafts
            .into_iter()
            .enumerate()
            .map(|(i, d)| Transaction::from_draft(TransactionId::new(i as u64 + 1), d))
            .collect()
    }

    fn window() -> ReportWindow {
        ReportWindow::new(Month::new(2025, 2).unwrap(), 3)
    }

    #[test]
    fn test_totals_and_savings_rate() {
        let report = FinancialReport::compile(&sample(), window());
        assert_eq!(report.total_income, Money::from_units(6_600));
        assert_eq!(report.total_expenses, Money::from_units(1_950));
        assert_eq!(report.net_savings, Money::from_units(4_650));
        assert!((report.savings_rate - 4_650.0 / 6_600.0 * 100.0).abs() < 1e-9);
        assert_eq!(report.transaction_count, 7);
    }

    #[test]
    fn test_expense_breakdown_partitions_total() {
        let report = FinancialReport::compile(&sample(), window());
        let sum: Money = report.expenses_by_category.iter().map(|r| r.amount).sum();
        assert_eq!(sum, report.total_expenses);

        let pct: f64 = report.expenses_by_category.iter().map(|r| r.percentage).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_order_and_ties() {
        let report = FinancialReport::compile(&sample(), window());
        let order: Vec<_> = report
            .expenses_by_category
            .iter()
            .map(|r| r.category)
            .collect();
        // Food and Shopping tie at $300; Food appeared first
        assert_eq!(
            order,
            vec![
                Category::Utilities,
                Category::Food,
                Category::Shopping,
                Category::Transportation
            ]
        );
        assert_eq!(report.top_expense_categories(2).len(), 2);
        assert_eq!(report.top_expense_categories(10).len(), 4);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let report = FinancialReport::compile(&[], window());
        assert_eq!(report.total_income, Money::zero());
        assert_eq!(report.savings_rate, 0.0);
        assert!(report.expenses_by_category.is_empty());
        assert!(!report.has_income());
        assert_eq!(report.monthly.len(), 3);
        assert_eq!(report.averages.savings, Money::zero());
        assert!(report.savings_rate.is_finite());
    }

    #[test]
    fn test_expenses_without_income_give_zero_rate() {
        let only_expenses: Vec<_> = sample().into_iter().filter(|t| t.is_expense()).collect();
        let report = FinancialReport::compile(&only_expenses, window());
        assert_eq!(report.savings_rate, 0.0);
        assert!(report.net_savings.is_negative());
    }

    #[test]
    fn test_averages_divide_by_window_length() {
        let report = FinancialReport::compile(&sample(), window());
        assert_eq!(report.averages.income, Money::from_units(2_200));
        assert_eq!(report.averages.expenses, Money::from_units(650));
        assert_eq!(report.averages.savings, Money::from_units(1_550));
    }

    #[test]
    fn test_trend_series_is_aligned() {
        let series = FinancialReport::compile(&sample(), window()).trend_series();
        assert_eq!(series.labels, vec!["Dec 2024", "Jan 2025", "Feb 2025"]);
        assert_eq!(series.income, vec![0.0, 3_000.0, 3_600.0]);
        assert_eq!(series.expenses, vec![0.0, 1_500.0, 450.0]);
        assert_eq!(series.net, vec![0.0, 1_500.0, 3_150.0]);
    }

    #[test]
    fn test_format_terminal_mentions_key_figures() {
        let text = FinancialReport::compile(&sample(), window()).format_terminal();
        assert!(text.contains("Dec 2024 - Feb 2025"));
        assert!(text.contains("$6,600.00"));
        assert!(text.contains("Bills & Utilities"));
        assert!(text.contains("Income Sources"));
    }
}
