//! Scheduler tuning

use std::time::Duration;

use event_common::NotificationConfig;

/// Give-up rule for reminders whose delivery keeps failing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` retries forever
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    pub fn with_ceiling(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// How far past now a periodic scan looks for events
    pub lookahead: chrono::Duration,
    /// Half-width of the dispatch window around an event's start
    pub dispatch_window: chrono::Duration,
    pub scan_interval: Duration,
    pub dispatch_interval: Duration,
    /// Upper bound for a single store call
    pub store_timeout: Duration,
    pub max_concurrent_sends: usize,
    pub retry: RetryPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from(&NotificationConfig::default())
    }
}

impl From<&NotificationConfig> for SchedulerConfig {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            lookahead: secs(config.lookahead_secs),
            dispatch_window: secs(config.dispatch_window_secs),
            scan_interval: config.scan_interval(),
            dispatch_interval: config.dispatch_interval(),
            store_timeout: config.store_timeout(),
            max_concurrent_sends: config.max_concurrent_sends.max(1),
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
            },
        }
    }
}

fn secs(value: u64) -> chrono::Duration {
    chrono::Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX / 1000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();

        assert_eq!(config.lookahead, chrono::Duration::hours(6));
        assert_eq!(config.dispatch_window, chrono::Duration::hours(3));
        assert_eq!(config.scan_interval, Duration::from_secs(2 * 3600));
        assert_eq!(config.dispatch_interval, Duration::from_secs(3600));
        assert_eq!(config.store_timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrent_sends, 8);
        assert_eq!(config.retry, RetryPolicy::unbounded());
    }

    #[test]
    fn test_zero_concurrency_is_raised() {
        let notification = NotificationConfig {
            max_concurrent_sends: 0,
            max_attempts: Some(5),
            ..NotificationConfig::default()
        };
        let config = SchedulerConfig::from(&notification);

        assert_eq!(config.max_concurrent_sends, 1);
        assert_eq!(config.retry, RetryPolicy::with_ceiling(5));
    }
}
