//! JSON report export
//!
//! Machine-readable form of the financial report, wrapped with a schema
//! version and generation time.

use std::io::Write;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{WealthError, WealthResult};
use crate::reports::{FinancialReport, TrendSeries};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize)]
pub struct ReportExport<'a> {
    pub schema_version: &'static str,
    pub app_version: &'static str,
    pub generated_at: NaiveDateTime,
    pub period: String,
    pub report: &'a FinancialReport,
    pub trend: TrendSeries,
}

impl<'a> ReportExport<'a> {
    pub fn new(report: &'a FinancialReport, generated_at: NaiveDateTime) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            app_version: env!("CARGO_PKG_VERSION"),
            generated_at,
            period: report.window.period_label(),
            report,
            trend: report.trend_series(),
        }
    }
}

/// Write `report` as pretty-printed JSON
pub fn write_report_json<W: Write>(
    report: &FinancialReport,
    generated_at: NaiveDateTime,
    writer: &mut W,
) -> WealthResult<()> {
    let export = ReportExport::new(report, generated_at);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| WealthError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| WealthError::Export(e.to_string()))?;
    Ok(())
}
