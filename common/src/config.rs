use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Host used when a caller does not name one.
pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(2_000);

const MIN_RETRY_INTERVAL: Duration = Duration::from_millis(1);

/// Forces the connect strategy for every host, including local ones.
pub static FORCE_CLIENT: AtomicBool = AtomicBool::new(false);

pub fn set_force_client(enabled: bool) {
    FORCE_CLIENT.store(enabled, Ordering::Relaxed);
}

pub fn force_client() -> bool {
    FORCE_CLIENT.load(Ordering::Relaxed)
}

/// Retry policy for anything that waits on a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Delay between two probe attempts.
    pub retry_interval: Duration,
    /// Bounds the retries, never the first attempt.
    pub timeout: Duration,
}

impl PollingConfig {
    pub fn new(retry_interval: Duration, timeout: Duration) -> Self {
        Self {
            retry_interval,
            timeout,
        }
    }

    pub fn from_millis(retry_ms: u64, timeout_ms: u64) -> Self {
        Self::new(
            Duration::from_millis(retry_ms),
            Duration::from_millis(timeout_ms),
        )
    }

    /// Retry interval clamped to at least one millisecond.
    pub fn effective_retry_interval(&self) -> Duration {
        self.retry_interval.max(MIN_RETRY_INTERVAL)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_INTERVAL, DEFAULT_TIMEOUT)
    }
}

/// Settings gathered by a front end and applied once at start-up.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Never bind; always probe by connecting.
    pub force_client: bool,
    pub polling: PollingConfig,
}

impl Config {
    /// Publishes the process-wide switches.
    pub fn apply(&self) {
        set_force_client(self.force_client);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_interval_is_clamped_to_one_millisecond() {
        let cfg = PollingConfig::from_millis(0, 0);
        assert_eq!(cfg.effective_retry_interval(), Duration::from_millis(1));

        let cfg = PollingConfig::from_millis(50, 1000);
        assert_eq!(cfg.effective_retry_interval(), Duration::from_millis(50));
    }

    #[test]
    fn default_polling_matches_documented_values() {
        let cfg = PollingConfig::default();
        assert_eq!(cfg.retry_interval, Duration::from_millis(100));
        assert_eq!(cfg.timeout, Duration::from_millis(5000));
    }
}
