//! Bill display formatting

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::truncate;
use crate::models::{Bill, DueStatus, Money};

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Bill")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Recurring")]
    recurring: String,
}

fn status_marker(status: DueStatus) -> String {
    match status {
        DueStatus::Paid => format!("✓ {}", status),
        DueStatus::Overdue => format!("! {}", status),
        DueStatus::DueToday | DueStatus::DueSoon(_) => format!("• {}", status),
        DueStatus::Upcoming => status.to_string(),
    }
}

/// Bills in the given order plus the unpaid total across all bills
pub fn format_bill_table(bills: &[Bill], unpaid: Money, today: NaiveDate) -> String {
    if bills.is_empty() {
        return "No bills tracked.\n".to_string();
    }

    let rows = bills.iter().map(|b| BillRow {
        id: b.id.to_string(),
        name: truncate(&b.name, 28),
        amount: b.amount.to_string(),
        due: b.due_date.format("%Y-%m-%d").to_string(),
        status: status_marker(b.due_status(today)),
        recurring: if b.recurring { "monthly" } else { "" }.to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\nUnpaid total: {}\n", table, unpaid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillDraft, BillId, Entity};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bill_table() {
        let bills = vec![
            Bill::from_draft(
                BillId::new(1),
                BillDraft::new("Rent", Money::from_units(1_200), date(2025, 3, 1)).recurring(true),
            ),
            Bill::from_draft(
                BillId::new(2),
                BillDraft::new("Gym", Money::from_units(40), date(2025, 2, 20)).paid(true),
            ),
        ];
        let text = format_bill_table(&bills, Money::from_units(1_200), date(2025, 2, 27));
        assert!(text.contains("2 days left"));
        assert!(text.contains("✓ Paid"));
        assert!(text.contains("monthly"));
        assert!(text.contains("Unpaid total: $1,200.00"));
    }
}
