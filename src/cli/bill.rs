//! Bill CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use super::today;
use crate::display::format_bill_table;
use crate::error::WealthResult;
use crate::models::{BillDraft, BillId, BillPatch, Money};
use crate::services::BillService;
use crate::storage::Storage;

/// Bill subcommands
#[derive(Subcommand, Debug)]
pub enum BillCommands {
    /// List bills, unpaid first
    List {
        /// Only overdue bills and bills due within a week
        #[arg(short, long)]
        attention: bool,
    },
    /// Track a new bill
    Add {
        name: String,
        amount: Money,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: NaiveDate,
        /// Repeats every month
        #[arg(short, long)]
        recurring: bool,
    },
    /// Edit a bill
    Edit {
        id: BillId,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<Money>,
        #[arg(short, long)]
        due: Option<NaiveDate>,
        #[arg(short, long)]
        recurring: Option<bool>,
    },
    /// Delete a bill
    Delete {
        id: BillId,
    },
    /// Mark a bill paid, or unpaid again
    Toggle {
        id: BillId,
    },
}

/// Handle a bill command
pub async fn handle_bill_command(storage: &Storage, cmd: BillCommands) -> WealthResult<()> {
    let service = BillService::new(storage);
    let today = today();

    match cmd {
        BillCommands::List { attention } => {
            let bills = if attention {
                service.needing_attention(today).await?
            } else {
                service.list().await?
            };
            let unpaid = service.unpaid_total().await?;
            print!("{}", format_bill_table(&bills, unpaid, today));
        }

        BillCommands::Add {
            name,
            amount,
            due,
            recurring,
        } => {
            let bill = service
                .create(BillDraft::new(name, amount, due).recurring(recurring))
                .await?;
            println!(
                "Created bill {}: {} {} due {}",
                bill.id, bill.name, bill.amount, bill.due_date
            );
        }

        BillCommands::Edit {
            id,
            name,
            amount,
            due,
            recurring,
        } => {
            let patch = BillPatch {
                name,
                amount,
                due_date: due,
                is_paid: None,
                recurring,
            };
            let bill = service.update(id, patch).await?;
            println!("Updated bill {} ({})", bill.id, bill.due_status(today));
        }

        BillCommands::Delete { id } => {
            service.delete(id).await?;
            println!("Deleted bill {}", id);
        }

        BillCommands::Toggle { id } => {
            let bill = service.toggle_paid(id).await?;
            let state = if bill.is_paid { "paid" } else { "unpaid" };
            println!("{} marked {}", bill.name, state);
        }
    }

    Ok(())
}
