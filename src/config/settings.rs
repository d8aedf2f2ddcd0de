//! User settings for WealthFlow
//!
//! Manages user preferences: the default report window, the mock-store latency profile, the bank simulation parameters and
//! an optional replacement for the categorization rule table.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::paths::WealthPaths;
use crate::error::WealthError;
use crate::reports::TimeRange;
use crate::services::classifier::CategoryRule;

/// Artificial latency applied by the in-memory mock repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySettings {
    /// Whether any delay is applied at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Delay for list-all calls
    #[serde(default = "default_list_ms")]
    pub list_ms: u64,
    /// Delay for get-by-id calls
    #[serde(default = "default_get_ms")]
    pub get_ms: u64,
    /// Delay for create and update calls
    #[serde(default = "default_write_ms")]
    pub write_ms: u64,
    /// Delay for delete calls
    #[serde(default = "default_delete_ms")]
    pub delete_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_list_ms() -> u64 {
    300
}

fn default_get_ms() -> u64 {
    200
}

fn default_write_ms() -> u64 {
    400
}

fn default_delete_ms() -> u64 {
    300
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            list_ms: default_list_ms(),
            get_ms: default_get_ms(),
            write_ms: default_write_ms(),
            delete_ms: default_delete_ms(),
        }
    }
}

/// Parameters of the simulated bank connection flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSettings {
    /// Probability that an authentication attempt fails
    #[serde(default = "default_auth_failure_rate")]
    pub auth_failure_rate: f64,
    /// Probability that a connection attempt fails
    #[serde(default = "default_connect_failure_rate")]
    pub connect_failure_rate: f64,
    /// Lifetime of an issued session token, in minutes
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_minutes: i64,
    /// Smallest number of synthetic transactions produced by one import
    #[serde(default = "default_import_min")]
    pub import_min: usize,
    /// Largest number of synthetic transactions produced by one import
    #[serde(default = "default_import_max")]
    pub import_max: usize,
    /// Delay applied to each simulated bank call
    #[serde(default = "default_bank_latency")]
    pub latency_ms: u64,
}

/// Longest session a simulated bank will issue: one year
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 60 * 24 * 365;

impl BankSettings {
    /// Token lifetime as a duration, rejecting values outside `1..=MAX_TOKEN_LIFETIME_MINUTES`
    pub fn token_lifetime(&self) -> Result<TimeDelta, WealthError> {
        let minutes = self.token_lifetime_minutes;
        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&minutes) {
            return Err(WealthError::Config(format!(
                "bank.token_lifetime_minutes must be between 1 and {}, got {}",
                MAX_TOKEN_LIFETIME_MINUTES, minutes
            )));
        }
        TimeDelta::try_minutes(minutes).ok_or_else(|| {
            WealthError::Config(format!("bank.token_lifetime_minutes out of range: {}", minutes))
        })
    }
}

fn default_auth_failure_rate() -> f64 {
    0.15
}

fn default_connect_failure_rate() -> f64 {
    0.10
}

fn default_token_lifetime() -> i64 {
    30
}

fn default_import_min() -> usize {
    5
}

fn default_import_max() -> usize {
    15
}

fn default_bank_latency() -> u64 {
    1000
}

impl Default for BankSettings {
    fn default() -> Self {
        Self {
            auth_failure_rate: default_auth_failure_rate(),
            connect_failure_rate: default_connect_failure_rate(),
            token_lifetime_minutes: default_token_lifetime(),
            import_min: default_import_min(),
            import_max: default_import_max(),
            latency_ms: default_bank_latency(),
        }
    }
}

/// User settings for WealthFlow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Report window used when none is given on the command line
    #[serde(default)]
    pub default_report_range: TimeRange,

    /// Latency profile for the mock repositories
    #[serde(default)]
    pub latency: LatencySettings,

    /// Simulated bank parameters
    #[serde(default)]
    pub bank: BankSettings,

    /// Replacement categorization rules; the built-in table is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier_rules: Option<Vec<CategoryRule>>,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_report_range: TimeRange::default(),
            latency: LatencySettings::default(),
            bank: BankSettings::default(),
            classifier_rules: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &WealthPaths) -> Result<Self, WealthError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| WealthError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| WealthError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &WealthPaths) -> Result<(), WealthError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| WealthError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| WealthError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject values the bank simulation cannot work with
    pub fn validate(&self) -> Result<(), WealthError> {
        for (name, rate) in [
            ("auth_failure_rate", self.bank.auth_failure_rate),
            ("connect_failure_rate", self.bank.connect_failure_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(WealthError::Config(format!(
                    "bank.{} must be between 0 and 1, got {}",
                    name, rate
                )));
            }
        }

        if self.bank.import_max == 0 || self.bank.import_min > self.bank.import_max {
            return Err(WealthError::Config(format!(
                "bank import range {}..={} is empty",
                self.bank.import_min, self.bank.import_max
            )));
        }

        self.bank.token_lifetime()?;

        Ok(())
    }
}
