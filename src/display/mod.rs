//! Display formatting for terminal output
//!
//! Tables for each record type plus small formatting helpers. Reports carry
//! their own `format_terminal`.

pub mod bill;
pub mod budget;
pub mod goal;
pub mod report;
pub mod transaction;

pub use bill::format_bill_table;
pub use budget::{format_budget_details, format_budget_table};
pub use goal::{format_goal_details, format_goal_table};
pub use report::{format_bar, format_percentage, progress_bar, truncate};
pub use transaction::{format_transaction_details, format_transaction_register};
