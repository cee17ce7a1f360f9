//! # Events emitted by policy layers.
//!
//! The [`EventKind`] enum classifies what a policy observed; the [`Event`] struct carries
//! a timestamp, a global sequence number and the optional metadata relevant to that kind.
//!
//! Events are delivered synchronously to the logger injected with
//! [`Chain::with_logger`](crate::Chain::with_logger).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Replicas run in parallel, so use `seq` to restore the order in which events were built.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskchain::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::AttemptFailed)
//!     .with_runnable("fetch")
//!     .with_reason("boom")
//!     .with_attempt(3)
//!     .with_delay(Duration::from_millis(250));
//!
//! assert_eq!(ev.kind, EventKind::AttemptFailed);
//! assert_eq!(ev.runnable.as_deref(), Some("fetch"));
//! assert_eq!(ev.delay_ms, Some(250));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of policy events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Retry ===
    /// An attempt inside a retry loop failed.
    ///
    /// Sets:
    /// - `runnable`: wrapped runnable name
    /// - `attempt`: attempt number (1-based)
    /// - `delay_ms`: delay waited after this failure
    /// - `reason`: failure message
    AttemptFailed,

    /// A bounded retry loop ran out of attempts.
    ///
    /// Sets:
    /// - `runnable`: wrapped runnable name
    /// - `attempt`: configured bound
    RetryExhausted,

    /// Cancellation fired while waiting between attempts.
    ///
    /// Sets:
    /// - `runnable`: wrapped runnable name
    /// - `attempt`: attempts made so far
    RetryCanceled,

    // === Replicas ===
    /// A replica finished without error.
    ///
    /// Sets:
    /// - `runnable`: wrapped runnable name
    /// - `replica`: replica number (1-based)
    ReplicaFinished,

    /// A replica returned an error.
    ///
    /// Sets:
    /// - `runnable`: wrapped runnable name
    /// - `replica`: replica number (1-based)
    /// - `reason`: failure message
    ReplicaFailed,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::AttemptFailed => "attempt_failed",
            EventKind::RetryExhausted => "retry_exhausted",
            EventKind::RetryCanceled => "retry_canceled",
            EventKind::ReplicaFinished => "replica_finished",
            EventKind::ReplicaFailed => "replica_failed",
        }
    }
}

/// Policy event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the wrapped runnable, if applicable.
    pub runnable: Option<Arc<str>>,
    /// Attempt number (starting from 1).
    pub attempt: Option<u32>,
    /// Replica number (starting from 1).
    pub replica: Option<usize>,
    /// Delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (error messages).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            runnable: None,
            attempt: None,
            replica: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a runnable name.
    #[inline]
    pub fn with_runnable(mut self, name: impl Into<Arc<str>>) -> Self {
        self.runnable = Some(name.into());
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a replica number.
    #[inline]
    pub fn with_replica(mut self, n: usize) -> Self {
        self.replica = Some(n);
        self
    }

    /// Attaches a retry delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns `true` for kinds that report a failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::AttemptFailed
                | EventKind::RetryExhausted
                | EventKind::ReplicaFailed
        )
    }
}
