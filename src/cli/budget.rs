//! Budget CLI commands

use clap::Subcommand;

use super::today;
use crate::display::{format_budget_details, format_budget_table};
use crate::error::WealthResult;
use crate::models::{BudgetDraft, BudgetId, BudgetPatch, BudgetPeriod, Category, Money};
use crate::services::budget::totals;
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// List budgets with progress
    List,
    /// Show one budget
    Show {
        id: BudgetId,
    },
    /// Create a budget for an expense category
    Add {
        category: Category,
        /// Spending limit
        limit: Money,
        /// monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: BudgetPeriod,
        /// Amount already spent
        #[arg(short, long)]
        spent: Option<Money>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Edit a budget
    Edit {
        id: BudgetId,
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(short, long)]
        limit: Option<Money>,
        #[arg(short, long)]
        spent: Option<Money>,
        #[arg(short, long)]
        period: Option<BudgetPeriod>,
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
    },
    /// Delete a budget
    Delete {
        id: BudgetId,
    },
    /// Recompute spent amounts from this period's expense transactions
    Sync {
        /// Only this budget
        id: Option<BudgetId>,
    },
}

/// Handle a budget command
pub async fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> WealthResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::List => {
            let budgets = service.list().await?;
            print!("{}", format_budget_table(&budgets, &totals(&budgets)));
        }

        BudgetCommands::Show { id } => {
            let budget = service.get(id).await?;
            print!("{}", format_budget_details(&budget));
        }

        BudgetCommands::Add {
            category,
            limit,
            period,
            spent,
            description,
        } => {
            let mut draft = BudgetDraft::new(category, limit).with_period(period);
            if let Some(spent) = spent {
                draft = draft.with_spent(spent);
            }
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            let budget = service.create(draft).await?;
            println!(
                "Created {} budget {} for {}: {}",
                budget.period,
                budget.id,
                budget.category.label(),
                budget.limit
            );
        }

        BudgetCommands::Edit {
            id,
            category,
            limit,
            spent,
            period,
            description,
            clear_description,
        } => {
            let description = if clear_description {
                Some(None)
            } else {
                description.map(Some)
            };
            let patch = BudgetPatch {
                category,
                limit,
                spent,
                period,
                description,
            };
            let budget = service.update(id, patch).await?;
            println!("Updated budget {}", budget.id);
            print!("{}", format_budget_details(&budget));
        }

        BudgetCommands::Delete { id } => {
            service.delete(id).await?;
            println!("Deleted budget {}", id);
        }

        BudgetCommands::Sync { id } => {
            let synced = match id {
                Some(id) => vec![service.sync_spent(id, today()).await?],
                None => service.sync_all(today()).await?,
            };
            for budget in &synced {
                println!(
                    "{:<20} spent {} of {}",
                    budget.category.label(),
                    budget.spent,
                    budget.limit
                );
            }
            println!("Synced {} budget(s)", synced.len());
        }
    }

    Ok(())
}
