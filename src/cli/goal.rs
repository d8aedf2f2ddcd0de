//! Savings goal CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use super::today;
use crate::display::{format_goal_details, format_goal_table};
use crate::error::WealthResult;
use crate::models::{GoalDraft, GoalId, GoalPatch, Money};
use crate::services::GoalService;
use crate::storage::Storage;

/// Goal subcommands
#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// List goals with progress
    List,
    /// Show one goal
    Show {
        id: GoalId,
    },
    /// Create a savings goal
    Add {
        name: String,
        /// Target amount
        target: Money,
        /// Target date (YYYY-MM-DD), must be in the future
        #[arg(short, long)]
        by: NaiveDate,
        /// Amount already saved
        #[arg(short, long)]
        current: Option<Money>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Edit a goal
    Edit {
        id: GoalId,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        target: Option<Money>,
        #[arg(short, long)]
        current: Option<Money>,
        #[arg(short, long)]
        by: Option<NaiveDate>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a goal
    Delete {
        id: GoalId,
    },
    /// Add money to a goal
    Contribute {
        id: GoalId,
        amount: Money,
    },
}

/// Handle a goal command
pub async fn handle_goal_command(storage: &Storage, cmd: GoalCommands) -> WealthResult<()> {
    let service = GoalService::new(storage);
    let today = today();

    match cmd {
        GoalCommands::List => {
            let goals = service.list().await?;
            print!("{}", format_goal_table(&goals, today));
        }

        GoalCommands::Show { id } => {
            let goal = service.get(id).await?;
            print!("{}", format_goal_details(&goal, today));
        }

        GoalCommands::Add {
            name,
            target,
            by,
            current,
            description,
        } => {
            let mut draft = GoalDraft::new(name, target, by);
            if let Some(current) = current {
                draft = draft.with_current(current);
            }
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            let goal = service.create(draft, today).await?;
            println!("Created goal {}: {} by {}", goal.id, goal.target_amount, goal.target_date);
        }

        GoalCommands::Edit {
            id,
            name,
            target,
            current,
            by,
            description,
        } => {
            let patch = GoalPatch {
                name,
                target_amount: target,
                current_amount: current,
                target_date: by,
                description: description.map(Some),
            };
            let goal = service.update(id, patch, today).await?;
            println!("Updated goal {}", goal.id);
            print!("{}", format_goal_details(&goal, today));
        }

        GoalCommands::Delete { id } => {
            service.delete(id).await?;
            println!("Deleted goal {}", id);
        }

        GoalCommands::Contribute { id, amount } => {
            let goal = service.contribute(id, amount).await?;
            println!(
                "Added {} to {}: {} of {} saved",
                amount, goal.name, goal.current_amount, goal.target_amount
            );
            if goal.is_complete() {
                println!("Goal reached!");
            }
        }
    }

    Ok(())
}
