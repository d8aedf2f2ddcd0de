//! Reports module for WealthFlow
//!
//! Monthly aggregation, the financial report compiled from it, and the
//! dashboard summary.

pub mod aggregator;
pub mod dashboard;
pub mod financial;

pub use aggregator::{aggregate, trailing_months, MonthBucket, ReportWindow, TimeRange};
pub use dashboard::DashboardSummary;
pub use financial::{CategoryAmount, FinancialReport, MonthlyAverages, TrendSeries};
