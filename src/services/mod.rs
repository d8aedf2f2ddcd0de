//! Service layer for WealthFlow
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-entity operations.

pub mod bank;
pub mod bill;
pub mod budget;
pub mod classifier;
pub mod goal;
pub mod import;
pub mod transaction;

pub use bank::{
    BankConnection, BankSimulator, Credentials, ImportResult, RandomSource, SupportedBank,
};
pub use bill::BillService;
pub use budget::{BudgetService, BudgetTotals};
pub use classifier::{classify, default_rules, CategoryRule, RuleSet};
pub use goal::GoalService;
pub use import::{ColumnMapping, ImportService, ImportSummary};
pub use transaction::{TransactionFilter, TransactionService, TransactionSort};
