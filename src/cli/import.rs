//! CSV statement import command

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Args;

use super::rules_from;
use crate::config::Settings;
use crate::display::format_transaction_register;
use crate::error::{WealthError, WealthResult};
use crate::services::ImportService;
use crate::storage::Storage;

/// Arguments of `import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the CSV statement
    pub file: PathBuf,
    /// Date format of the statement, e.g. %m/%d/%Y
    #[arg(long)]
    pub date_format: Option<String>,
    /// Treat positive amounts as spending (credit card exports)
    #[arg(long)]
    pub invert: bool,
    /// Show the parsed rows without saving them
    #[arg(long)]
    pub preview: bool,
}

/// Handle the import command
pub async fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    args: ImportArgs,
) -> WealthResult<()> {
    let file = File::open(&args.file).map_err(|e| {
        WealthError::Import(format!("Failed to open {}: {}", args.file.display(), e))
    })?;
    let rules = rules_from(settings);
    let service = ImportService::new(storage, &rules);

    let date_format = args.date_format.clone();
    let invert = args.invert;
    let parsed = service.parse_detected(BufReader::new(file), |mut mapping| {
        if let Some(format) = &date_format {
            mapping = mapping.with_date_format(format);
        }
        if invert {
            mapping = mapping.inverted();
        }
        mapping
    })?;
    let preview = service.preview(parsed).await?;

    if args.preview {
        for entry in &preview {
            match &entry.row {
                Some(row) => println!(
                    "{:>4}  {:?}  {} {} {} [{}]",
                    entry.row_number,
                    entry.status,
                    row.draft.date,
                    row.draft.description,
                    row.draft.amount,
                    row.draft.category
                ),
                None => println!("{:>4}  {:?}", entry.row_number, entry.status),
            }
        }
        return Ok(());
    }

    let summary = service.import_preview(preview).await?;
    print!("{}", format_transaction_register(&summary.imported));
    println!(
        "Imported {}, skipped {} duplicate(s), {} error(s)",
        summary.imported_count(),
        summary.duplicates_skipped,
        summary.errors.len()
    );
    for (row, message) in &summary.errors {
        println!("  row {}: {}", row, message);
    }
    Ok(())
}
