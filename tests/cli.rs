use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn wealthflow(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wealthflow").unwrap();
    cmd.env("WEALTHFLOW_DATA_DIR", data_dir.path())
        .env_remove("WEALTHFLOW_LOG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn classify_uses_keyword_table() {
    let dir = TempDir::new().unwrap();
    wealthflow(&dir)
        .args(["transaction", "classify", "UBER TRIP 8841"])
        .assert()
        .success()
        .stdout("transportation\n");

    wealthflow(&dir)
        .args(["txn", "classify", "Mystery purchase"])
        .assert()
        .success()
        .stdout("other\n");
}

#[test]
fn added_transaction_is_listed_and_persisted() {
    let dir = TempDir::new().unwrap();
    wealthflow(&dir)
        .args(["transaction", "add", "4.50", "STARBUCKS #221", "--date", "2025-01-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Auto-categorized as Food & Dining"))
        .stdout(predicate::str::contains("Created transaction txn-1"));

    assert!(dir.path().join("data").join("transactions.json").exists());

    wealthflow(&dir)
        .args(["transaction", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STARBUCKS #221"))
        .stdout(predicate::str::contains("-$4.50"));
}

#[test]
fn invalid_amount_is_rejected() {
    let dir = TempDir::new().unwrap();
    wealthflow(&dir)
        .args(["transaction", "add", "0", "Nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Amount must be greater than 0"));
}

#[test]
fn dry_run_leaves_data_untouched() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "latency": { "enabled": false } }"#,
    )
    .unwrap();

    wealthflow(&dir)
        .args(["--dry-run", "bill", "add", "Rent", "1200", "--due", "2030-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created bill bill-1"));

    wealthflow(&dir)
        .args(["bill", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No bills tracked."));
}

#[test]
fn budget_add_and_list() {
    let dir = TempDir::new().unwrap();
    wealthflow(&dir)
        .args(["budget", "add", "food", "400", "--spent", "100"])
        .assert()
        .success();

    wealthflow(&dir)
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food & Dining"))
        .stdout(predicate::str::contains("$300.00 remaining"));

    wealthflow(&dir)
        .args(["budget", "add", "salary", "400"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be budgeted"));
}

#[test]
fn unknown_goal_is_not_found() {
    let dir = TempDir::new().unwrap();
    wealthflow(&dir)
        .args(["goal", "delete", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn report_export_writes_csv_document() {
    let dir = TempDir::new().unwrap();
    wealthflow(&dir)
        .args([
            "transaction", "add", "2500", "ACME PAYROLL", "--type", "income", "--date",
            "2025-01-01",
        ])
        .assert()
        .success();

    let output = dir.path().join("report.csv");
    wealthflow(&dir)
        .args(["report", "export", "--range", "3months", "--month", "2025-01", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nov 2024 - Jan 2025"));

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("WealthFlow Financial Report\n"));
    assert!(text.contains("Period: Nov 2024 - Jan 2025"));
    assert!(text.contains("Total Income,\"$2,500.00\""));
    assert!(text.contains("Savings Rate,100.0%"));
    assert!(text.contains("INCOME BREAKDOWN BY CATEGORY\nCategory,Amount,Percentage\nsalary,\"$2,500.00\",100.0%"));
}

#[test]
fn statement_import_skips_duplicates() {
    let dir = TempDir::new().unwrap();
    let statement = dir.path().join("statement.csv");
    std::fs::write(
        &statement,
        "Date,Amount,Description\n2025-02-01,-60.00,SHELL OIL\n2025-02-02,-12.99,NETFLIX.COM\n",
    )
    .unwrap();

    wealthflow(&dir)
        .arg("import")
        .arg(&statement)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2, skipped 0 duplicate(s), 0 error(s)"));

    wealthflow(&dir)
        .arg("import")
        .arg(&statement)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 0, skipped 2 duplicate(s)"));
}

#[test]
fn bank_list_shows_supported_banks() {
    let dir = TempDir::new().unwrap();
    wealthflow(&dir)
        .args(["bank", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chase"))
        .stdout(predicate::str::contains("Bank of America"));
}
