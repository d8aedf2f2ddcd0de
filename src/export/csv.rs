//! Comma-delimited financial report document
//!
//! The document is a sequence of titled sections (summary, monthly trends,
//! expense breakdown and, when there is income, income breakdown) meant to
//! be opened in a spreadsheet.

use std::io::Write;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{WealthError, WealthResult};
use crate::reports::{CategoryAmount, FinancialReport};

pub const REPORT_TITLE: &str = "WealthFlow Financial Report";

/// Default file name for a report exported on `date`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("wealthflow-report-{}.csv", date.format("%Y-%m-%d"))
}

fn export_err(e: std::io::Error) -> WealthError {
    WealthError::Export(e.to_string())
}

/// Write `report` as a sectioned CSV document
pub fn write_report_csv<W: Write>(
    report: &FinancialReport,
    generated_at: NaiveDateTime,
    writer: &mut W,
) -> WealthResult<()> {
    writeln!(writer, "{}", REPORT_TITLE).map_err(export_err)?;
    writeln!(
        writer,
        "Generated: {}",
        generated_at.format("%b %d, %Y at %H:%M")
    )
    .map_err(export_err)?;
    writeln!(writer, "Period: {}", report.window.period_label()).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    writeln!(writer, "FINANCIAL SUMMARY").map_err(export_err)?;
    writeln!(writer, "Metric,Amount").map_err(export_err)?;
    for (metric, amount) in [
        ("Total Income", report.total_income),
        ("Total Expenses", report.total_expenses),
        ("Net Savings", report.net_savings),
    ] {
        writeln!(writer, "{},{}", metric, escape_csv(&amount.to_string())).map_err(export_err)?;
    }
    writeln!(writer, "Savings Rate,{:.1}%", report.savings_rate).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    writeln!(writer, "MONTHLY TRENDS").map_err(export_err)?;
    writeln!(writer, "Month,Income,Expenses,Savings").map_err(export_err)?;
    for bucket in &report.monthly {
        writeln!(
            writer,
            "{},{},{},{}",
            bucket.label,
            escape_csv(&bucket.income.to_string()),
            escape_csv(&bucket.expenses.to_string()),
            escape_csv(&bucket.net.to_string())
        )
        .map_err(export_err)?;
    }

    writeln!(writer).map_err(export_err)?;
    writeln!(writer, "EXPENSE BREAKDOWN BY CATEGORY").map_err(export_err)?;
    write_breakdown(writer, &report.expenses_by_category)?;

    if report.has_income() {
        writeln!(writer).map_err(export_err)?;
        writeln!(writer, "INCOME BREAKDOWN BY CATEGORY").map_err(export_err)?;
        write_breakdown(writer, &report.income_by_category)?;
    }

    Ok(())
}

fn write_breakdown<W: Write>(writer: &mut W, rows: &[CategoryAmount]) -> WealthResult<()> {
    writeln!(writer, "Category,Amount,Percentage").map_err(export_err)?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{:.1}%",
            escape_csv(row.category.as_str()),
            escape_csv(&row.amount.to_string()),
            row.percentage
        )
        .map_err(export_err)?;
    }
    Ok(())
}

/// Quote a field if it contains a delimiter, quote or newline
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
