//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management.

use chrono::NaiveDate;
use clap::Subcommand;

use super::{rules_from, today};
use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::WealthResult;
use crate::models::{Category, Money, TransactionDraft, TransactionId, TransactionKind, TransactionPatch};
use crate::services::{TransactionFilter, TransactionService, TransactionSort};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Amount, always positive (e.g. "45.50")
        amount: Money,
        /// Description
        description: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: TransactionKind,
        /// Category; classified from the description when omitted
        #[arg(short, long)]
        category: Option<Category>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Mark as recurring
        #[arg(long)]
        recurring: bool,
    },
    /// List transactions
    List {
        /// Case-insensitive text search in the description
        #[arg(short, long)]
        search: Option<String>,
        /// Only income or only expenses
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionKind>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<Category>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Sort by date, amount or description
        #[arg(long, default_value = "date")]
        sort: TransactionSort,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: TransactionId,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: TransactionId,
        #[arg(short, long)]
        amount: Option<Money>,
        #[arg(long)]
        description: Option<String>,
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionKind>,
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        recurring: Option<bool>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: TransactionId,
    },
    /// Show which category a description would be filed under
    Classify {
        /// Description text, e.g. "UBER TRIP 1234"
        description: String,
    },
}

/// Handle a transaction command
pub async fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> WealthResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            description,
            kind,
            category,
            date,
            recurring,
        } => {
            let category = match category {
                Some(category) => category,
                None => {
                    let guessed = rules_from(settings).classify(&description);
                    let category = if guessed.allowed_for(kind) {
                        guessed
                    } else {
                        Category::Other
                    };
                    println!("Auto-categorized as {}", category.label());
                    category
                }
            };
            let draft = TransactionDraft::new(
                kind,
                amount,
                category,
                description,
                date.unwrap_or_else(today),
            )
            .recurring(recurring);

            let txn = service.create(draft).await?;
            println!("Created transaction {}", txn.id);
            println!("  {}", txn);
        }

        TransactionCommands::List {
            search,
            kind,
            category,
            from,
            to,
            sort,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(text) = search {
                filter = filter.search(text);
            }
            if let Some(kind) = kind {
                filter = filter.kind(kind);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if from.is_some() || to.is_some() {
                filter = filter.date_range(
                    from.unwrap_or(NaiveDate::MIN),
                    to.unwrap_or(NaiveDate::MAX),
                );
            }

            let transactions = service.query(&filter, sort).await?;
            print!("{}", format_transaction_register(&transactions));
        }

        TransactionCommands::Show { id } => {
            let txn = service.get(id).await?;
            print!("{}", format_transaction_details(&txn));
        }

        TransactionCommands::Edit {
            id,
            amount,
            description,
            kind,
            category,
            date,
            recurring,
        } => {
            let patch = TransactionPatch {
                kind,
                amount,
                category,
                description,
                date,
                recurring,
            };
            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            let txn = service.update(id, patch).await?;
            println!("Updated transaction {}", txn.id);
            println!("  {}", txn);
        }

        TransactionCommands::Delete { id } => {
            service.delete(id).await?;
            println!("Deleted transaction {}", id);
        }

        TransactionCommands::Classify { description } => {
            let category = rules_from(settings).classify(&description);
            println!("{}", category);
        }
    }

    Ok(())
}
