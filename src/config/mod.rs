//! Configuration module for WealthFlow
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Latency and bank simulation parameters

pub mod paths;
pub mod settings;

pub use paths::WealthPaths;
pub use settings::{BankSettings, LatencySettings, Settings};
