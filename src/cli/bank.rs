//! Simulated bank connection commands

use clap::Subcommand;

use super::rules_from;
use crate::config::Settings;
use crate::display::format_transaction_register;
use crate::error::{WealthError, WealthResult};
use crate::services::bank::DEFAULT_ACCOUNT_NUMBER;
use crate::services::{BankSimulator, Credentials, SupportedBank};
use crate::storage::Storage;

/// Bank subcommands
#[derive(Subcommand, Debug)]
pub enum BankCommands {
    /// List the banks that can be connected
    List,
    /// Sign in, connect an account and import its recent transactions
    Connect {
        /// Bank key or name, e.g. chase or "Bank of America"
        bank: SupportedBank,
        /// Online banking username
        #[arg(short, long)]
        username: String,
        /// Password; prompted without echo when not given
        #[arg(long, env = "WEALTHFLOW_BANK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Account number to connect
        #[arg(short, long, default_value = DEFAULT_ACCOUNT_NUMBER)]
        account: String,
    },
}

/// Handle bank commands
pub async fn handle_bank_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BankCommands,
) -> WealthResult<()> {
    match cmd {
        BankCommands::List => {
            for bank in SupportedBank::ALL {
                println!("{:<16} {}", bank.key(), bank.name());
            }
        }

        BankCommands::Connect {
            bank,
            username,
            password,
            account,
        } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password(&format!("{} password: ", bank.name()))?,
            };
            let credentials = Credentials::new(username, password);
            let simulator = BankSimulator::with_settings(settings.bank.clone(), rules_from(settings));

            println!("Connecting to {}...", bank.name());
            let (connection, result) = simulator
                .run_connection_flow(bank, &credentials, &account, storage)
                .await?;

            println!(
                "Connected to {} account {}",
                connection.bank_name, connection.masked_account_number
            );
            println!("Imported {} transaction(s)", result.imported_count);
            print!("{}", format_transaction_register(&result.transactions));
        }
    }

    Ok(())
}

/// Prompt for a password (hidden input)
fn prompt_password(prompt: &str) -> WealthResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| WealthError::Validation(format!("Failed to read password: {}", e)))
}
