//! # Policy defaults.
//!
//! Provides [`Config`], the settings behind [`Chain::with_defaults`](crate::Chain::with_defaults).
//!
//! ## Sentinel values
//! - `retry_bound = 0` → unbounded retries (until success or cancellation)
//! - `replicas = 0` → treated as a single run, same as `1`

use std::time::Duration;

use crate::policies::Retry;

/// Default policy settings for a chain.
///
/// ## Field semantics
/// - `retry`: register a retry loop at all
/// - `retry_bound`: attempts per loop (`0` = unbounded)
/// - `retry_delay`: wait between attempts
/// - `replicas`: concurrent runs (`0`/`1` = no fan-out registered)
/// - `recover`: isolate every attempt from panics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Whether a retry policy is registered.
    pub retry: bool,

    /// Maximum attempts per retry loop.
    ///
    /// - `0` = unbounded
    /// - `n > 0` = at most `n` runs, then `RetryExhausted`
    pub retry_bound: u32,

    /// Fixed delay between attempts.
    pub retry_delay: Duration,

    /// Number of concurrent replicas.
    ///
    /// Values `0` and `1` both mean one run; no replica policy is registered for them.
    pub replicas: usize,

    /// Whether panics are converted to errors at every attempt.
    pub recover: bool,
}

impl Config {
    /// Returns the replica count when a fan-out is actually requested.
    ///
    /// - `None` → single run, no replica policy
    /// - `Some(n)` → `n > 1` concurrent replicas
    #[inline]
    pub fn replica_count(&self) -> Option<usize> {
        if self.replicas > 1 {
            Some(self.replicas)
        } else {
            None
        }
    }

    /// Returns the retry policy, if enabled.
    #[inline]
    pub fn retry_policy(&self) -> Option<Retry> {
        self.retry.then(|| Retry::new(self.retry_bound, self.retry_delay))
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `retry = true`, `retry_bound = 3`, `retry_delay = 1s`
    /// - `replicas = 1` (no fan-out)
    /// - `recover = true`
    fn default() -> Self {
        Self {
            retry: true,
            retry_bound: 3,
            retry_delay: Duration::from_secs(1),
            replicas: 1,
            recover: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replica_sentinels() {
        for replicas in [0, 1] {
            let cfg = Config {
                replicas,
                ..Config::default()
            };
            assert_eq!(cfg.replica_count(), None);
        }
        let cfg = Config {
            replicas: 3,
            ..Config::default()
        };
        assert_eq!(cfg.replica_count(), Some(3));
    }

    #[test]
    fn retry_policy_follows_flag() {
        let cfg = Config::default();
        let retry = cfg.retry_policy().unwrap();
        assert_eq!(retry.bound, 3);
        assert!(!retry.is_unbounded());

        let cfg = Config {
            retry: false,
            ..Config::default()
        };
        assert!(cfg.retry_policy().is_none());
    }
}
