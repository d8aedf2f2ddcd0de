//! Export module for WealthFlow
//!
//! Writes the financial report to disk:
//! - CSV: the sectioned report document (spreadsheet-compatible)
//! - JSON: the full compiled report for other tools

pub mod csv;
pub mod json;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

pub use self::csv::{default_file_name, write_report_csv};
pub use self::json::{write_report_json, ReportExport, EXPORT_SCHEMA_VERSION};

/// Output format of `report export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// `wealthflow-report-<yyyy-mm-dd>.<ext>`
    pub fn default_file_name(&self, date: NaiveDate) -> String {
        match self {
            Self::Csv => default_file_name(date),
            Self::Json => format!("wealthflow-report-{}.json", date.format("%Y-%m-%d")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.pad("csv"),
            Self::Json => f.pad("json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown export format: {}. Use csv or json", other)),
        }
    }
}
