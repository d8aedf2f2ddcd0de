//! WealthFlow - personal finance tracking
//!
//! This library provides the core of the WealthFlow application: income and
//! expense transactions, category budgets, savings goals and bills, monthly
//! financial reports with CSV/JSON export, and a simulated bank connection
//! that imports synthetic transactions.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, budgets, goals, bills)
//! - `storage`: Async repositories with in-memory and JSON-file adapters
//! - `services`: Business logic, keyword classifier, bank simulation, CSV import
//! - `reports`: Monthly aggregation, financial report and dashboard
//! - `export`: Report export to CSV and JSON
//! - `display`: Terminal tables
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use wealthflow::storage::{Latency, Storage};
//! use wealthflow::reports::{FinancialReport, ReportWindow, TimeRange};
//!
//! let storage = Storage::in_memory(Latency::none());
//! let window = ReportWindow::from_range(Month::current(), TimeRange::SixMonths);
//! let report = FinancialReport::generate(&storage, window).await?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{WealthError, WealthResult};
