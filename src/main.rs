use anyhow::Result;
use clap::{Parser, Subcommand};

use wealthflow::cli::{
    handle_bank_command, handle_bill_command, handle_budget_command, handle_dashboard_command,
    handle_goal_command, handle_import_command, handle_report_command, handle_transaction_command,
    init_logging, BankCommands, BillCommands, BudgetCommands, GoalCommands, ImportArgs,
    ReportCommands, TransactionCommands,
};
use wealthflow::config::{Settings, WealthPaths};
use wealthflow::storage::{Latency, Storage};

#[derive(Parser)]
#[command(
    name = "wealthflow",
    version,
    about = "Personal finance tracker: transactions, budgets, goals, bills and reports",
    long_about = "WealthFlow records income and expenses, tracks budgets, savings goals \
                  and bills, and compiles monthly financial reports you can export \
                  as CSV or JSON."
)]
struct Cli {
    /// Work on an in-memory copy of the data; nothing is written back
    #[arg(long, global = true)]
    dry_run: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Bill tracking commands
    #[command(subcommand)]
    Bill(BillCommands),

    /// Financial report commands
    #[command(subcommand)]
    Report(ReportCommands),

    /// This month at a glance
    Dashboard,

    /// Simulated bank connection
    #[command(subcommand)]
    Bank(BankCommands),

    /// Import transactions from a CSV bank statement
    Import(ImportArgs),

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = WealthPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = if cli.dry_run {
        Storage::detached(&paths, Latency::from_settings(&settings.latency))?
    } else {
        Storage::open(&paths)?
    };

    match cli.command {
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd).await?
        }
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, cmd).await?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&storage, cmd).await?,
        Some(Commands::Bill(cmd)) => handle_bill_command(&storage, cmd).await?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd).await?,
        Some(Commands::Dashboard) => handle_dashboard_command(&storage).await?,
        Some(Commands::Bank(cmd)) => handle_bank_command(&storage, &settings, cmd).await?,
        Some(Commands::Import(args)) => handle_import_command(&storage, &settings, args).await?,
        Some(Commands::Config) => {
            println!("WealthFlow Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Default report range: {}", settings.default_report_range);
            println!(
                "  Mock latency:         {}",
                if settings.latency.enabled { "enabled" } else { "disabled" }
            );
            println!(
                "  Bank failure rates:   auth {:.0}%, connect {:.0}%",
                settings.bank.auth_failure_rate * 100.0,
                settings.bank.connect_failure_rate * 100.0
            );
            println!(
                "  Classifier rules:     {}",
                if settings.classifier_rules.is_some() { "custom" } else { "built-in" }
            );
        }
        None => {
            println!("WealthFlow - personal finance from the command line");
            println!();
            println!("Run 'wealthflow --help' for usage information.");
            println!("Run 'wealthflow dashboard' for this month at a glance.");
        }
    }

    Ok(())
}
