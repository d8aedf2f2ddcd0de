//! Simulated bank connection
//!
//! There is no real bank integration. Authentication and connection succeed
//! or fail by a random draw against configured failure rates, and an import
//! produces synthetic transactions that are categorized by the classifier and
//! stored through the transaction repository.
//!
//! The random source is injected so tests can force either outcome.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::classifier::RuleSet;
use crate::config::BankSettings;
use crate::error::{WealthError, WealthResult};
use crate::models::{Category, Money, Transaction, TransactionDraft, TransactionKind};
use crate::storage::Storage;

/// Source of uniform draws in `[0, 1)`
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;

    /// Uniform integer in `low..=high`
    fn next_in_range(&self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        let span = (high - low + 1) as f64;
        low + ((self.next_unit() * span) as u64).min(high - low)
    }
}

/// Draws derived from the random bits of v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRandom;

impl RandomSource for UuidRandom {
    fn next_unit(&self) -> f64 {
        // Top 53 bits map exactly onto the f64 mantissa
        let bits = (Uuid::new_v4().as_u128() >> 75) as u64;
        bits as f64 / (1u64 << 53) as f64
    }
}

/// Always returns the same draw
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.0
    }
}

/// Replays a list of draws, then repeats `fallback`
#[derive(Debug)]
pub struct SequenceRandom {
    draws: Mutex<VecDeque<f64>>,
    fallback: f64,
}

impl SequenceRandom {
    pub fn new(draws: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            draws: Mutex::new(draws.into_iter().collect()),
            fallback,
        }
    }

    /// Draws not consumed yet
    pub fn remaining(&self) -> usize {
        self.draws.lock().map(|d| d.len()).unwrap_or(0)
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        self.draws
            .lock()
            .ok()
            .and_then(|mut d| d.pop_front())
            .unwrap_or(self.fallback)
    }
}

/// Banks offered by the connection flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedBank {
    Chase,
    BankOfAmerica,
    WellsFargo,
    Citibank,
    CapitalOne,
    UsBank,
}

impl SupportedBank {
    pub const ALL: [SupportedBank; 6] = [
        SupportedBank::Chase,
        SupportedBank::BankOfAmerica,
        SupportedBank::WellsFargo,
        SupportedBank::Citibank,
        SupportedBank::CapitalOne,
        SupportedBank::UsBank,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Chase => "chase",
            Self::BankOfAmerica => "bankofamerica",
            Self::WellsFargo => "wells_fargo",
            Self::Citibank => "citibank",
            Self::CapitalOne => "capital_one",
            Self::UsBank => "us_bank",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Chase => "Chase Bank",
            Self::BankOfAmerica => "Bank of America",
            Self::WellsFargo => "Wells Fargo",
            Self::Citibank => "Citibank",
            Self::CapitalOne => "Capital One",
            Self::UsBank => "US Bank",
        }
    }
}

impl fmt::Display for SupportedBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for SupportedBank {
    type Err = String;

    /// Matches the key or the display name, ignoring case, spaces and `-`/`_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squash = |v: &str| {
            v.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        };
        let needle = squash(s);
        Self::ALL
            .iter()
            .copied()
            .find(|b| squash(b.key()) == needle || squash(b.name()) == needle)
            .ok_or_else(|| {
                let keys: Vec<_> = Self::ALL.iter().map(|b| b.key()).collect();
                format!("Unsupported bank '{}'. Choose one of: {}", s, keys.join(", "))
            })
    }
}

/// Online banking login; wiped from memory on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Token issued by a successful authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub issued_at: DateTime<Local>,
    pub expires_at: DateTime<Local>,
}

impl AuthSession {
    pub fn is_expired_at(&self, now: DateTime<Local>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Local::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => f.pad("connected"),
            Self::Disconnected => f.pad("disconnected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankConnection {
    pub connection_id: String,
    pub bank: SupportedBank,
    pub bank_name: String,
    pub masked_account_number: String,
    pub status: ConnectionStatus,
    pub connected_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub imported_count: usize,
    pub transactions: Vec<Transaction>,
}

/// Placeholder account number used when none is given
pub const DEFAULT_ACCOUNT_NUMBER: &str = "1234567890";

/// Show only the last four digits of an account number
pub fn mask_account_number(account: &str) -> String {
    let digits: Vec<char> = account.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("****{}", tail)
}

/// Synthetic statement line: description, kind and amount range in cents
struct Template {
    description: &'static str,
    kind: TransactionKind,
    min_cents: u64,
    max_cents: u64,
}

const fn expense(description: &'static str, min_cents: u64, max_cents: u64) -> Template {
    Template {
        description,
        kind: TransactionKind::Expense,
        min_cents,
        max_cents,
    }
}

const TEMPLATES: &[Template] = &[
    expense("STARBUCKS COFFEE #1234", 350, 1_200),
    expense("WHOLE FOODS MARKET", 2_500, 18_000),
    expense("CHIPOTLE ONLINE", 900, 3_500),
    expense("UBER TRIP", 800, 4_500),
    expense("SHELL OIL 5744", 2_000, 7_000),
    expense("NETFLIX.COM", 1_549, 2_299),
    expense("SPOTIFY USA", 1_099, 1_699),
    expense("AMAZON MKTPLACE PMTS", 1_500, 25_000),
    expense("TARGET T-1842", 1_000, 12_000),
    expense("COMCAST CABLE COMM", 6_000, 14_000),
    expense("CVS/PHARMACY #0421", 500, 6_000),
    expense("CITY PARKING METER", 200, 2_500),
    Template {
        description: "ACME CORP PAYROLL",
        kind: TransactionKind::Income,
        min_cents: 150_000,
        max_cents: 450_000,
    },
    Template {
        description: "UPWORK ESCROW INC",
        kind: TransactionKind::Income,
        min_cents: 20_000,
        max_cents: 120_000,
    },
];

/// Days back from today that synthetic transactions may be dated
const IMPORT_WINDOW_DAYS: u64 = 30;

/// Mock bank API
pub struct BankSimulator {
    settings: BankSettings,
    rules: RuleSet,
    random: Arc<dyn RandomSource>,
}

impl BankSimulator {
    pub fn new(settings: BankSettings, rules: RuleSet, random: Arc<dyn RandomSource>) -> Self {
        Self {
            settings,
            rules,
            random,
        }
    }

    /// Simulator drawing from UUID randomness
    pub fn with_settings(settings: BankSettings, rules: RuleSet) -> Self {
        Self::new(settings, rules, Arc::new(UuidRandom))
    }

    async fn simulate_latency(&self) {
        if self.settings.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settings.latency_ms)).await;
        }
    }

    /// Log in to the bank
    ///
    /// Blank credentials are rejected before any draw.
    pub async fn authenticate(&self, credentials: &Credentials) -> WealthResult<AuthSession> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(WealthError::Validation(
                "Please enter both username and password".into(),
            ));
        }

        self.simulate_latency().await;
        if self.random.next_unit() < self.settings.auth_failure_rate {
            warn!(username = %credentials.username, "simulated authentication failure");
            return Err(WealthError::SimulatedAuth(
                "Invalid credentials. Please check your username and password.".into(),
            ));
        }

        let issued_at = Local::now();
        let expires_at = issued_at
            .checked_add_signed(self.settings.token_lifetime()?)
            .ok_or_else(|| WealthError::Config("bank session expiry is out of range".into()))?;
        let session = AuthSession {
            token: URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes()),
            issued_at,
            expires_at,
        };
        info!(expires_at = %session.expires_at, "bank session issued");
        Ok(session)
    }

    /// Open a connection to one account
    pub async fn connect(
        &self,
        bank: SupportedBank,
        account_ref: &str,
        session: &AuthSession,
    ) -> WealthResult<BankConnection> {
        if session.is_expired() {
            return Err(WealthError::SimulatedAuth(
                "Session expired. Please sign in again.".into(),
            ));
        }
        if account_ref.trim().is_empty() {
            return Err(WealthError::Validation("Account number is required".into()));
        }

        self.simulate_latency().await;
        if self.random.next_unit() < self.settings.connect_failure_rate {
            warn!(bank = %bank, "simulated connection failure");
            return Err(WealthError::SimulatedConnection(format!(
                "Unable to connect to {}. Please try again later.",
                bank
            )));
        }

        let connection = BankConnection {
            connection_id: Uuid::new_v4().to_string(),
            bank,
            bank_name: bank.name().to_string(),
            masked_account_number: mask_account_number(account_ref),
            status: ConnectionStatus::Connected,
            connected_at: Local::now(),
        };
        info!(bank = %bank, account = %connection.masked_account_number, "bank account connected");
        Ok(connection)
    }

    /// Generate synthetic drafts dated within the last month before `today`
    pub fn synthesize(&self, today: NaiveDate) -> Vec<TransactionDraft> {
        let count = self
            .random
            .next_in_range(self.settings.import_min as u64, self.settings.import_max as u64);

        (0..count)
            .map(|_| {
                let index = self.random.next_in_range(0, TEMPLATES.len() as u64 - 1) as usize;
                let template = &TEMPLATES[index];
                let cents = self
                    .random
                    .next_in_range(template.min_cents, template.max_cents);
                let days_back = self.random.next_in_range(0, IMPORT_WINDOW_DAYS);

                let mut category = self.rules.classify(template.description);
                if !category.allowed_for(template.kind) {
                    category = Category::Other;
                }
                TransactionDraft::new(
                    template.kind,
                    Money::from_cents(cents as i64),
                    category,
                    template.description,
                    today - ChronoDuration::days(days_back as i64),
                )
            })
            .collect()
    }

    /// Pull synthetic transactions from a connection and store them
    pub async fn import_transactions(
        &self,
        connection: &BankConnection,
        storage: &Storage,
    ) -> WealthResult<ImportResult> {
        if connection.status != ConnectionStatus::Connected {
            return Err(WealthError::SimulatedConnection(format!(
                "Connection {} is not active",
                connection.connection_id
            )));
        }

        self.simulate_latency().await;
        let mut transactions = Vec::new();
        for draft in self.synthesize(Local::now().date_naive()) {
            transactions.push(storage.transactions.create(draft).await?);
        }

        info!(
            bank = %connection.bank,
            imported = transactions.len(),
            "bank transactions imported"
        );
        Ok(ImportResult {
            imported_count: transactions.len(),
            transactions,
        })
    }

    /// Authenticate, connect and import in one go; the first failure stops
    /// the flow and nothing is retried
    pub async fn run_connection_flow(
        &self,
        bank: SupportedBank,
        credentials: &Credentials,
        account_ref: &str,
        storage: &Storage,
    ) -> WealthResult<(BankConnection, ImportResult)> {
        let session = self.authenticate(credentials).await?;
        let connection = self.connect(bank, account_ref, &session).await?;
        let result = self.import_transactions(&connection, storage).await?;
        Ok((connection, result))
    }
}
