//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod bank;
pub mod bill;
pub mod budget;
pub mod goal;
pub mod import;
pub mod logging;
pub mod report;
pub mod transaction;

use chrono::{Local, NaiveDate};

use crate::config::Settings;
use crate::services::RuleSet;

pub use bank::{handle_bank_command, BankCommands};
pub use bill::{handle_bill_command, BillCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use import::{handle_import_command, ImportArgs};
pub use logging::init_logging;
pub use report::{handle_dashboard_command, handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

/// Today in the local timezone
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Classifier rules from settings, falling back to the built-in table
pub(crate) fn rules_from(settings: &Settings) -> RuleSet {
    RuleSet::from_settings(settings.classifier_rules.as_deref())
}
