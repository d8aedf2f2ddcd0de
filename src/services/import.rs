//! CSV statement import
//!
//! Reads a bank statement exported as CSV, turns each row into a transaction
//! draft (sign gives the type, the classifier gives the category), flags rows
//! already present in storage, and creates the rest.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::info;

use super::classifier::RuleSet;
use super::transaction::TransactionService;
use crate::error::{WealthError, WealthResult};
use crate::models::{Category, Money, Transaction, TransactionDraft, TransactionKind};
use crate::storage::Storage;

/// Where each field lives in a statement row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: usize,
    /// Single signed amount column
    pub amount_column: Option<usize>,
    /// Separate debit/credit columns, used when there is no amount column
    pub outflow_column: Option<usize>,
    pub inflow_column: Option<usize>,
    pub description_column: usize,
    pub date_format: String,
    pub has_header: bool,
    /// Credit card exports often show purchases as positive
    pub invert_amounts: bool,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: 0,
            amount_column: Some(1),
            outflow_column: None,
            inflow_column: None,
            description_column: 2,
            date_format: "%Y-%m-%d".to_string(),
            has_header: true,
            invert_amounts: false,
        }
    }
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert_amounts = true;
        self
    }

    /// Guess the mapping from a header row
    pub fn detect(headers: &StringRecord) -> Self {
        let mut mapping = Self {
            amount_column: None,
            ..Self::default()
        };
        let mut description = None;

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();
            if h.contains("date") || h.contains("posted") {
                mapping.date_column = idx;
            } else if h.contains("amount") && mapping.amount_column.is_none() {
                mapping.amount_column = Some(idx);
            } else if h.contains("debit") || h.contains("withdrawal") || h.contains("outflow") {
                mapping.outflow_column = Some(idx);
            } else if h.contains("credit") || h.contains("deposit") || h.contains("inflow") {
                mapping.inflow_column = Some(idx);
            } else if description.is_none()
                && (h.contains("description")
                    || h.contains("payee")
                    || h.contains("merchant")
                    || h.contains("name")
                    || h.contains("memo"))
            {
                description = Some(idx);
            }
        }

        if let Some(idx) = description {
            mapping.description_column = idx;
        }
        if mapping.amount_column.is_none()
            && (mapping.outflow_column.is_none() || mapping.inflow_column.is_none())
        {
            mapping.amount_column = Some(1);
        }
        mapping
    }
}

/// A statement row ready for import
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based data row number, header excluded
    pub row_number: usize,
    pub draft: TransactionDraft,
}

impl ParsedRow {
    fn key(&self) -> DuplicateKey {
        DuplicateKey::of(&self.draft.kind, self.draft.amount, &self.draft.description, self.draft.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DuplicateKey {
    date: NaiveDate,
    cents: i64,
    income: bool,
    description: String,
}

impl DuplicateKey {
    fn of(kind: &TransactionKind, amount: Money, description: &str, date: NaiveDate) -> Self {
        Self {
            date,
            cents: amount.cents(),
            income: *kind == TransactionKind::Income,
            description: description.trim().to_lowercase(),
        }
    }

    fn of_transaction(txn: &Transaction) -> Self {
        Self::of(&txn.kind, txn.amount, &txn.description, txn.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    New,
    /// Same date, type, amount and description as a stored transaction or
    /// an earlier row
    Duplicate,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportPreviewEntry {
    pub row_number: usize,
    pub row: Option<ParsedRow>,
    pub status: ImportStatus,
}

#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub imported: Vec<Transaction>,
    pub duplicates_skipped: usize,
    /// Error message keyed by row number
    pub errors: BTreeMap<usize, String>,
}

impl ImportSummary {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }
}

pub struct ImportService<'a> {
    storage: &'a Storage,
    rules: &'a RuleSet,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage, rules: &'a RuleSet) -> Self {
        Self { storage, rules }
    }

    /// Parse every row; a bad row yields an error entry and does not stop
    /// the rest. Without a mapping, columns are detected from the header.
    pub fn parse<R: Read>(
        &self,
        input: R,
        mapping: Option<&ColumnMapping>,
    ) -> WealthResult<Vec<Result<ParsedRow, String>>> {
        match mapping {
            Some(mapping) => {
                let reader = reader_for(input, mapping.has_header);
                Ok(self.read_rows(reader, mapping))
            }
            None => self.parse_detected(input, |detected| detected),
        }
    }

    /// Parse with the mapping detected from the header, after `adjust`
    pub fn parse_detected<R: Read>(
        &self,
        input: R,
        adjust: impl FnOnce(ColumnMapping) -> ColumnMapping,
    ) -> WealthResult<Vec<Result<ParsedRow, String>>> {
        let mut reader = reader_for(input, true);
        let headers = reader
            .headers()
            .map_err(|e| WealthError::Import(format!("Failed to read CSV header: {}", e)))?;
        let mapping = adjust(ColumnMapping::detect(headers));
        Ok(self.read_rows(reader, &mapping))
    }

    fn read_rows<R: Read>(
        &self,
        mut reader: csv::Reader<R>,
        mapping: &ColumnMapping,
    ) -> Vec<Result<ParsedRow, String>> {
        reader
            .records()
            .enumerate()
            .map(|(idx, record)| {
                record
                    .map_err(|e| format!("Error reading CSV record: {}", e))
                    .and_then(|r| self.parse_record(&r, idx + 1, mapping))
            })
            .collect()
    }

    fn parse_record(
        &self,
        record: &StringRecord,
        row_number: usize,
        mapping: &ColumnMapping,
    ) -> Result<ParsedRow, String> {
        let date_str = record
            .get(mapping.date_column)
            .ok_or_else(|| "Missing date column".to_string())?;
        let date = parse_date(date_str, &mapping.date_format)?;

        let mut amount = parse_signed_amount(record, mapping)?;
        if mapping.invert_amounts {
            amount = -amount;
        }
        if amount.is_zero() {
            return Err("Amount is zero".to_string());
        }

        let description = record
            .get(mapping.description_column)
            .map(str::trim)
            .unwrap_or_default();
        if description.is_empty() {
            return Err("Missing description".to_string());
        }

        let kind = if amount.is_negative() {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        };
        let mut category = self.rules.classify(description);
        if !category.allowed_for(kind) {
            category = Category::Other;
        }

        Ok(ParsedRow {
            row_number,
            draft: TransactionDraft::new(kind, amount.abs(), category, description, date),
        })
    }

    /// Mark each parsed row as new, duplicate or error
    pub async fn preview(
        &self,
        parsed: Vec<Result<ParsedRow, String>>,
    ) -> WealthResult<Vec<ImportPreviewEntry>> {
        let mut seen: HashSet<DuplicateKey> = self
            .storage
            .transactions
            .list()
            .await?
            .iter()
            .map(DuplicateKey::of_transaction)
            .collect();

        let mut preview = Vec::with_capacity(parsed.len());
        for (idx, result) in parsed.into_iter().enumerate() {
            let entry = match result {
                Ok(row) => {
                    let status = if seen.insert(row.key()) {
                        ImportStatus::New
                    } else {
                        ImportStatus::Duplicate
                    };
                    ImportPreviewEntry {
                        row_number: row.row_number,
                        row: Some(row),
                        status,
                    }
                }
                Err(message) => ImportPreviewEntry {
                    row_number: idx + 1,
                    row: None,
                    status: ImportStatus::Error(message),
                },
            };
            preview.push(entry);
        }
        Ok(preview)
    }

    /// Create transactions for the `New` entries
    pub async fn import_preview(&self, preview: Vec<ImportPreviewEntry>) -> WealthResult<ImportSummary> {
        let service = TransactionService::new(self.storage);
        let mut summary = ImportSummary::default();

        for entry in preview {
            match (entry.status, entry.row) {
                (ImportStatus::New, Some(row)) => match service.create(row.draft).await {
                    Ok(txn) => summary.imported.push(txn),
                    Err(e) if e.is_validation() => {
                        summary.errors.insert(entry.row_number, e.to_string());
                    }
                    Err(e) => return Err(e),
                },
                (ImportStatus::Duplicate, _) => summary.duplicates_skipped += 1,
                (ImportStatus::Error(message), _) => {
                    summary.errors.insert(entry.row_number, message);
                }
                (ImportStatus::New, None) => {}
            }
        }

        info!(
            imported = summary.imported_count(),
            duplicates = summary.duplicates_skipped,
            errors = summary.errors.len(),
            "statement import finished"
        );
        Ok(summary)
    }

    /// Parse, preview and import in one step
    pub async fn import<R: Read>(
        &self,
        input: R,
        mapping: Option<&ColumnMapping>,
    ) -> WealthResult<ImportSummary> {
        let parsed = self.parse(input, mapping)?;
        let preview = self.preview(parsed).await?;
        self.import_preview(preview).await
    }
}

fn reader_for<R: Read>(input: R, has_header: bool) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn parse_date(s: &str, primary_format: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    std::iter::once(primary_format)
        .chain(["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%m-%d-%Y"])
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

fn parse_signed_amount(record: &StringRecord, mapping: &ColumnMapping) -> Result<Money, String> {
    if let Some(col) = mapping.amount_column {
        let raw = record
            .get(col)
            .ok_or_else(|| "Missing amount column".to_string())?;
        return parse_amount(raw);
    }

    let cell = |col: Option<usize>| -> Result<Money, String> {
        match col.and_then(|c| record.get(c)).map(str::trim) {
            None | Some("") => Ok(Money::zero()),
            Some(raw) => parse_amount(raw).map(|m| m.abs()),
        }
    };
    Ok(cell(mapping.inflow_column)? - cell(mapping.outflow_column)?)
}

/// Accepts `$`, thousands separators and accounting parentheses
fn parse_amount(s: &str) -> Result<Money, String> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '(' | ')'))
        .collect();

    let (negative, value) = if cleaned.starts_with('(') && cleaned.ends_with(')') {
        (true, &cleaned[1..cleaned.len() - 1])
    } else if let Some(stripped) = cleaned.strip_prefix('-') {
        (true, stripped)
    } else {
        (false, cleaned.as_str())
    };

    Money::parse(value)
        .map(|m| if negative { -m } else { m })
        .map_err(|e| format!("Could not parse amount '{}': {}", s.trim(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Latency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const STATEMENT: &str = "\
Date,Amount,Description
2025-01-15,-4.50,STARBUCKS #12
2025-01-16,2500.00,ACME PAYROLL
2025-01-17,-60.00,SHELL OIL
";

    #[tokio::test]
    async fn test_parse_classifies_and_signs() {
        let storage = Storage::in_memory(Latency::none());
        let rules = RuleSet::default();
        let service = ImportService::new(&storage, &rules);

        let rows = service.parse(STATEMENT.as_bytes(), None).unwrap();
        assert_eq!(rows.len(), 3);

        let coffee = &rows[0].as_ref().unwrap().draft;
        assert_eq!(coffee.kind, TransactionKind::Expense);
        assert_eq!(coffee.amount, Money::from_cents(450));
        assert_eq!(coffee.category, Category::Food);
        assert_eq!(coffee.date, date(2025, 1, 15));

        let pay = &rows[1].as_ref().unwrap().draft;
        assert_eq!(pay.kind, TransactionKind::Income);
        assert_eq!(pay.category, Category::Salary);

        assert_eq!(rows[2].as_ref().unwrap().draft.category, Category::Transportation);
    }

    #[tokio::test]
    async fn test_import_skips_duplicates_on_second_run() {
        let storage = Storage::in_memory(Latency::none());
        let rules = RuleSet::default();
        let service = ImportService::new(&storage, &rules);

        let first = service.import(STATEMENT.as_bytes(), None).await.unwrap();
        assert_eq!(first.imported_count(), 3);
        assert_eq!(first.duplicates_skipped, 0);

        let second = service.import(STATEMENT.as_bytes(), None).await.unwrap();
        assert_eq!(second.imported_count(), 0);
        assert_eq!(second.duplicates_skipped, 3);
        assert_eq!(storage.transactions.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_bad_rows_reported_not_fatal() {
        let storage = Storage::in_memory(Latency::none());
        let rules = RuleSet::default();
        let service = ImportService::new(&storage, &rules);

        let csv = "Date,Amount,Description\nyesterday,-5.00,Coffee\n2025-02-01,abc,Lunch\n2025-02-02,-9.99,Lunch\n";
        let summary = service.import(csv.as_bytes(), None).await.unwrap();

        assert_eq!(summary.imported_count(), 1);
        assert_eq!(summary.errors.len(), 2);
        assert!(summary.errors[&1].contains("Could not parse date"));
        assert!(summary.errors[&2].contains("Could not parse amount"));
    }

    #[test]
    fn test_detect_debit_credit_columns() {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_reader("Posted Date,Payee,Debit,Credit".as_bytes());
        let headers = reader.records().next().unwrap().unwrap();
        let mapping = ColumnMapping::detect(&headers);

        assert_eq!(mapping.date_column, 0);
        assert_eq!(mapping.description_column, 1);
        assert_eq!(mapping.outflow_column, Some(2));
        assert_eq!(mapping.inflow_column, Some(3));
        assert!(mapping.amount_column.is_none());
    }

    #[tokio::test]
    async fn test_debit_credit_and_us_dates() {
        let storage = Storage::in_memory(Latency::none());
        let rules = RuleSet::default();
        let service = ImportService::new(&storage, &rules);

        let csv = "Posted Date,Payee,Debit,Credit\n01/15/2025,NETFLIX.COM,15.49,\n01/16/2025,UPWORK,,\"1,200.00\"\n";
        let rows = service.parse(csv.as_bytes(), None).unwrap();

        let netflix = &rows[0].as_ref().unwrap().draft;
        assert_eq!(netflix.kind, TransactionKind::Expense);
        assert_eq!(netflix.amount, Money::from_cents(1_549));
        assert_eq!(netflix.date, date(2025, 1, 15));
        assert_eq!(netflix.category, Category::Entertainment);

        let upwork = &rows[1].as_ref().unwrap().draft;
        assert_eq!(upwork.kind, TransactionKind::Income);
        assert_eq!(upwork.amount, Money::from_units(1_200));
        assert_eq!(upwork.category, Category::Freelance);
    }

    #[tokio::test]
    async fn test_inverted_credit_card_export() {
        let storage = Storage::in_memory(Latency::none());
        let rules = RuleSet::default();
        let service = ImportService::new(&storage, &rules);

        let csv = "Trans Date,Description,Amount\n03/02/2025,SPOTIFY USA,10.99\n03/05/2025,PAYMENT THANK YOU,-250.00\n";
        let rows = service
            .parse_detected(csv.as_bytes(), |m| m.with_date_format("%m/%d/%Y").inverted())
            .unwrap();

        let spotify = &rows[0].as_ref().unwrap().draft;
        assert_eq!(spotify.kind, TransactionKind::Expense);
        assert_eq!(spotify.date, date(2025, 3, 2));
        assert_eq!(spotify.category, Category::Entertainment);
        assert_eq!(rows[1].as_ref().unwrap().draft.kind, TransactionKind::Income);
    }

    #[test]
    fn test_explicit_mapping_without_header() {
        let storage = Storage::in_memory(Latency::none());
        let rules = RuleSet::default();
        let service = ImportService::new(&storage, &rules);

        let mapping = ColumnMapping {
            has_header: false,
            ..ColumnMapping::new()
        };
        let rows = service
            .parse("2025-04-01,-12.00,LYFT RIDE\n".as_bytes(), Some(&mapping))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_ref().unwrap().draft.category, Category::Transportation);
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("(50.00)").unwrap(), Money::from_cents(-5_000));
        assert_eq!(parse_amount("$1,234.50").unwrap(), Money::from_cents(123_450));
        assert_eq!(parse_amount("-7").unwrap(), Money::from_units(-7));
        assert!(parse_amount("n/a").is_err());
    }

    #[tokio::test]
    async fn test_income_keyword_on_expense_falls_back_to_other() {
        let storage = Storage::in_memory(Latency::none());
        let rules = RuleSet::default();
        let service = ImportService::new(&storage, &rules);

        let csv = "Date,Amount,Description\n2025-01-15,-30.00,PAYROLL SERVICE FEE\n";
        let rows = service.parse(csv.as_bytes(), None).unwrap();
        assert_eq!(rows[0].as_ref().unwrap().draft.category, Category::Other);
    }
}
