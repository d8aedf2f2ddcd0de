//! CLI commands for reports
//!
//! Shows or exports the financial report over a trailing window of months,
//! and prints the dashboard summary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;

use super::today;
use crate::config::Settings;
use crate::error::{WealthError, WealthResult};
use crate::export::{write_report_csv, write_report_json, ExportFormat};
use crate::models::Month;
use crate::reports::{DashboardSummary, FinancialReport, ReportWindow, TimeRange};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Print the financial report
    Show {
        /// 3months, 6months or 12months; defaults to the configured range
        #[arg(short, long)]
        range: Option<TimeRange>,
        /// Last month of the window (YYYY-MM), defaults to this month
        #[arg(long)]
        month: Option<Month>,
    },
    /// Write the financial report to a file
    Export {
        #[arg(short, long)]
        range: Option<TimeRange>,
        #[arg(long)]
        month: Option<Month>,
        /// csv or json
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,
        /// Output path; defaults to wealthflow-report-<date>.<ext> in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn window(settings: &Settings, range: Option<TimeRange>, month: Option<Month>) -> ReportWindow {
    ReportWindow::from_range(
        month.unwrap_or_else(|| Month::containing(today())),
        range.unwrap_or(settings.default_report_range),
    )
}

/// Handle report commands
pub async fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> WealthResult<()> {
    match cmd {
        ReportCommands::Show { range, month } => {
            let report = FinancialReport::generate(storage, window(settings, range, month)).await?;
            print!("{}", report.format_terminal());
        }

        ReportCommands::Export {
            range,
            month,
            format,
            output,
        } => {
            let report = FinancialReport::generate(storage, window(settings, range, month)).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(format.default_file_name(today())));

            let file = File::create(&path).map_err(|e| {
                WealthError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            let generated_at = Local::now().naive_local();
            match format {
                ExportFormat::Csv => write_report_csv(&report, generated_at, &mut writer)?,
                ExportFormat::Json => write_report_json(&report, generated_at, &mut writer)?,
            }
            writer
                .flush()
                .map_err(|e| WealthError::Export(e.to_string()))?;

            println!(
                "Exported {} report ({}) to {}",
                format,
                report.window.period_label(),
                path.display()
            );
        }
    }

    Ok(())
}

/// Print the dashboard summary for the current month
pub async fn handle_dashboard_command(storage: &Storage) -> WealthResult<()> {
    let summary = DashboardSummary::generate(storage, today()).await?;
    print!("{}", summary.format_terminal());
    Ok(())
}
