//! # Retry policy: sequential attempts with a fixed delay.
//!
//! ```text
//! Retrying::run(ctx)
//!   ctx cancelled? ──► Err(Canceled)                      (no attempt made)
//!   loop {
//!     ├─► inner.run(ctx) ── Ok ──► return Ok
//!     ├─► Err(e): attempt += 1, publish AttemptFailed, keep e
//!     ├─► select (biased):
//!     │     ctx.cancelled() ──► Err(RetryCanceled { errors })
//!     │     sleep(delay)    ──► continue below
//!     └─► bound > 0 && attempt == bound ? Err(RetryExhausted { bound, errors }) : next attempt
//!   }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**, never concurrently.
//! - `bound` is a count: `bound = 3` means at most three runs. `bound = 0` retries
//!   until success or cancellation.
//! - Bounded loops keep every failure, in attempt order. Unbounded loops keep only the
//!   latest one so memory stays constant.
//! - The delay is also waited after the final bounded attempt, so a cancellation that
//!   lands during that attempt is reported as `RetryCanceled`, not `RetryExhausted`.
//! - Cancellation wins over an elapsed delay and is never retried past.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::chain::Decorator;
use crate::error::TaskError;
use crate::events::{Event, EventKind};
use crate::runnables::{Runnable, RunnableRef};
use crate::subscribers::{LoggerRef, publish};

/// Longest delay handed to the timer; tokio rejects deadlines much further out.
const MAX_DELAY: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Retry decorator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retry {
    /// Maximum number of attempts (`0` = unbounded).
    pub bound: u32,
    /// Wait between attempts.
    pub delay: Duration,
}

impl Retry {
    /// Creates a retry policy; `bound = 0` retries forever.
    pub fn new(bound: u32, delay: Duration) -> Self {
        Self { bound, delay }
    }

    /// Returns `true` when the loop only ends on success or cancellation.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.bound == 0
    }
}

impl Decorator for Retry {
    fn decorate(&self, next: RunnableRef, logger: Option<&LoggerRef>) -> RunnableRef {
        Arc::new(Retrying {
            inner: next,
            bound: self.bound,
            delay: self.delay.min(MAX_DELAY),
            logger: logger.cloned(),
        })
    }
}

struct Retrying {
    inner: RunnableRef,
    bound: u32,
    delay: Duration,
    logger: Option<LoggerRef>,
}

impl Retrying {
    fn is_last(&self, attempt: u32) -> bool {
        self.bound != 0 && attempt >= self.bound
    }
}

#[async_trait]
impl Runnable for Retrying {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        if ctx.is_cancelled() {
            return Err(TaskError::Canceled);
        }

        let logger = self.logger.as_ref();
        let mut errors: Vec<TaskError> = Vec::new();
        let mut attempt: u32 = 0;

        loop {
            let err = match self.inner.run(ctx.clone()).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };
            attempt = attempt.saturating_add(1);
            let last = self.is_last(attempt);

            publish(logger, || {
                Event::new(EventKind::AttemptFailed)
                    .with_runnable(self.name())
                    .with_attempt(attempt)
                    .with_delay(self.delay)
                    .with_reason(err.to_string())
            });

            if self.bound == 0 {
                errors.clear();
            }
            errors.push(err);

            tokio::select! {
                biased;
                _ = ctx.cancelled() => {
                    publish(logger, || {
                        Event::new(EventKind::RetryCanceled)
                            .with_runnable(self.name())
                            .with_attempt(attempt)
                    });
                    return Err(TaskError::RetryCanceled { errors });
                }
                _ = time::sleep(self.delay) => {}
            }

            if last {
                publish(logger, || {
                    Event::new(EventKind::RetryExhausted)
                        .with_runnable(self.name())
                        .with_attempt(self.bound)
                });
                return Err(TaskError::RetryExhausted {
                    bound: self.bound,
                    errors,
                });
            }
        }
    }
}
