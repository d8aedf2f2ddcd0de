//! Budget display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::{format_percentage, progress_bar};
use crate::models::Budget;
use crate::services::BudgetTotals;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format budgets with progress bars and a totals line
pub fn format_budget_table(budgets: &[Budget], totals: &BudgetTotals) -> String {
    if budgets.is_empty() {
        return "No budgets set.\n".to_string();
    }

    let rows = budgets.iter().map(|b| BudgetRow {
        id: b.id.to_string(),
        category: b.category.label().to_string(),
        period: b.period.to_string(),
        spent: b.spent.to_string(),
        limit: b.limit.to_string(),
        remaining: b.remaining().to_string(),
        progress: format!("{} {}", progress_bar(b.progress(), 10), format_percentage(b.progress())),
        status: b.status().to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!(
        "{}\nTotal: {} of {} spent ({}), {} remaining\n",
        table,
        totals.spent,
        totals.limit,
        format_percentage(totals.progress()),
        totals.remaining()
    )
}

pub fn format_budget_details(budget: &Budget) -> String {
    let mut output = String::new();
    output.push_str(&format!("Budget:    {} ({})\n", budget.category.label(), budget.id));
    output.push_str(&format!("Period:    {}\n", budget.period));
    output.push_str(&format!("Limit:     {}\n", budget.limit));
    output.push_str(&format!("Spent:     {}\n", budget.spent));
    output.push_str(&format!("Remaining: {}\n", budget.remaining()));
    output.push_str(&format!(
        "Progress:  {} {}\n",
        progress_bar(budget.progress(), 20),
        format_percentage(budget.progress())
    ));
    output.push_str(&format!("Status:    {}\n", budget.status()));
    if let Some(description) = &budget.description {
        output.push_str(&format!("Notes:     {}\n", description));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetDraft, BudgetId, Category, Entity, Money};
    use crate::services::budget::totals;

    #[test]
    fn test_budget_table() {
        let budgets = vec![Budget::from_draft(
            BudgetId::new(1),
            BudgetDraft::new(Category::Food, Money::from_units(400)).with_spent(Money::from_units(320)),
        )];
        let text = format_budget_table(&budgets, &totals(&budgets));
        assert!(text.contains("Food & Dining"));
        assert!(text.contains("Warning"));
        assert!(text.contains("Total: $320.00 of $400.00 spent (80%), $80.00 remaining"));
    }

    #[test]
    fn test_empty_budget_table() {
        assert_eq!(format_budget_table(&[], &totals(&[])), "No budgets set.\n");
    }
}
