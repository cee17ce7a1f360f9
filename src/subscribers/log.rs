//! # Logger that renders events as `tracing` records.
//!
//! [`LogWriter`] maps every [`EventKind`] to one structured `tracing` record, so the
//! output goes wherever the binary's `tracing` subscriber sends it.
//!
//! ## Output (with the `fmt` subscriber)
//! ```text
//! ERROR taskchain: retrying with error runnable="fetch" attempt=1 delay_ms=200 error="execution failed: boom"
//! ERROR taskchain: retries exhausted runnable="fetch" bound=3
//!  WARN taskchain: cancelled during retry delay runnable="fetch" attempts=2
//!  INFO taskchain: replica finished without error runnable="fetch" replica_n=2
//! ERROR taskchain: replica returned error runnable="fetch" replica_n=3 error="execution failed: boom"
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskchain::{Chain, LogWriter};
//!
//! let chain = Chain::new().with_logger(Arc::new(LogWriter));
//! assert!(chain.logger().is_some());
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Logger that forwards events to `tracing` under the `taskchain` target.
///
/// Enabled via the `logging` feature (on by default).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let runnable = e.runnable.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::AttemptFailed => {
                tracing::error!(
                    target: "taskchain",
                    seq = e.seq,
                    runnable,
                    attempt = e.attempt,
                    delay_ms = e.delay_ms,
                    error = reason,
                    "retrying with error"
                );
            }
            EventKind::RetryExhausted => {
                tracing::error!(
                    target: "taskchain",
                    seq = e.seq,
                    runnable,
                    bound = e.attempt,
                    "retries exhausted"
                );
            }
            EventKind::RetryCanceled => {
                tracing::warn!(
                    target: "taskchain",
                    seq = e.seq,
                    runnable,
                    attempts = e.attempt,
                    "cancelled during retry delay"
                );
            }
            EventKind::ReplicaFinished => {
                tracing::info!(
                    target: "taskchain",
                    seq = e.seq,
                    runnable,
                    replica_n = e.replica,
                    "replica finished without error"
                );
            }
            EventKind::ReplicaFailed => {
                tracing::error!(
                    target: "taskchain",
                    seq = e.seq,
                    runnable,
                    replica_n = e.replica,
                    error = reason,
                    "replica returned error"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
