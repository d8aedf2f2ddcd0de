//! Artificial delays for the mock repositories
//!
//! The in-memory stores stand in for a remote API, so each call waits for a
//! fixed time before touching data. Tests disable the delay or run on a
//! paused tokio clock.

use std::time::Duration;

use crate::config::LatencySettings;

/// Kind of repository call, each with its own delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Write,
    Delete,
}

/// Delay profile applied before each repository call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency {
    list: Duration,
    get: Duration,
    write: Duration,
    delete: Duration,
}

impl Latency {
    /// No delay at all
    pub const fn none() -> Self {
        Self {
            list: Duration::ZERO,
            get: Duration::ZERO,
            write: Duration::ZERO,
            delete: Duration::ZERO,
        }
    }

    pub fn from_settings(settings: &LatencySettings) -> Self {
        if !settings.enabled {
            return Self::none();
        }
        Self {
            list: Duration::from_millis(settings.list_ms),
            get: Duration::from_millis(settings.get_ms),
            write: Duration::from_millis(settings.write_ms),
            delete: Duration::from_millis(settings.delete_ms),
        }
    }

    pub fn delay_for(&self, op: Operation) -> Duration {
        match op {
            Operation::List => self.list,
            Operation::Get => self.get,
            Operation::Write => self.write,
            Operation::Delete => self.delete,
        }
    }

    pub fn is_disabled(&self) -> bool {
        *self == Self::none()
    }

    /// Sleep for the delay configured for `op`
    pub async fn wait(&self, op: Operation) {
        let delay = self.delay_for(op);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_profile() {
        let latency = Latency::from_settings(&LatencySettings::default());
        assert_eq!(latency.delay_for(Operation::List), Duration::from_millis(300));
        assert_eq!(latency.delay_for(Operation::Get), Duration::from_millis(200));
        assert_eq!(latency.delay_for(Operation::Write), Duration::from_millis(400));
        assert_eq!(latency.delay_for(Operation::Delete), Duration::from_millis(300));
    }

    #[test]
    fn test_disabled_settings_mean_no_delay() {
        let settings = LatencySettings {
            enabled: false,
            ..LatencySettings::default()
        };
        assert!(Latency::from_settings(&settings).is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_advances_clock() {
        let latency = Latency::from_settings(&LatencySettings::default());
        let start = tokio::time::Instant::now();
        latency.wait(Operation::Write).await;
        assert!(start.elapsed() >= Duration::from_millis(400));
    }
}
