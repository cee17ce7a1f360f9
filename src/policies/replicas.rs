//! # Replica policy: run N copies concurrently as one unit.
//!
//! ```text
//! Replicated::run(ctx)
//!   └─► TaskGroup::new(&ctx)
//!         ├─► replica 1: inner.run(group_token) ── Ok  → publish ReplicaFinished
//!         │                                     └─ Err → Replica { index: 1, source }
//!         ├─► replica 2: ...
//!         └─► replica N: ...
//!       wait(): Ok when all succeeded, else the first replica error
//! ```
//!
//! ## Rules
//! - `count = 0` is treated as `1`.
//! - Exactly `max(count, 1)` runs are started, each replica runs **once**.
//! - The first failure cancels the group token so running siblings are asked to stop;
//!   later failures are not reported (first-to-fail wins).
//! - A replica that stops with a cancellation error after the group token was cancelled
//!   publishes no `ReplicaFailed` event; only the failure that caused the stop is logged.
//! - The call returns only after every replica has finished.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::chain::Decorator;
use crate::core::TaskGroup;
use crate::error::TaskError;
use crate::events::{Event, EventKind};
use crate::runnables::{Runnable, RunnableRef};
use crate::subscribers::{LoggerRef, publish};

/// Replica decorator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Replicas {
    /// Requested replica count (`0` = treated as `1`).
    pub count: usize,
}

impl Replicas {
    /// Creates a replica policy.
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Number of runs actually started per invocation.
    #[inline]
    pub fn effective_count(&self) -> usize {
        self.count.max(1)
    }
}

impl Decorator for Replicas {
    fn decorate(&self, next: RunnableRef, logger: Option<&LoggerRef>) -> RunnableRef {
        Arc::new(Replicated {
            inner: next,
            count: self.effective_count(),
            logger: logger.cloned(),
        })
    }
}

struct Replicated {
    inner: RunnableRef,
    count: usize,
    logger: Option<LoggerRef>,
}

#[async_trait]
impl Runnable for Replicated {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        let mut group = TaskGroup::new(&ctx);

        for index in 1..=self.count {
            let inner = Arc::clone(&self.inner);
            let logger = self.logger.clone();
            group.spawn(move |token| async move {
                match inner.run(token.clone()).await {
                    Ok(()) => {
                        publish(logger.as_ref(), || {
                            Event::new(EventKind::ReplicaFinished)
                                .with_runnable(inner.name())
                                .with_replica(index)
                        });
                        Ok(())
                    }
                    Err(e) => {
                        // Siblings stopped by an earlier failure are not reported.
                        let stopped = token.is_cancelled() && e.is_canceled();
                        if !stopped {
                            publish(logger.as_ref(), || {
                                Event::new(EventKind::ReplicaFailed)
                                    .with_runnable(inner.name())
                                    .with_replica(index)
                                    .with_reason(e.to_string())
                            });
                        }
                        Err(TaskError::Replica {
                            index,
                            source: Box::new(e),
                        })
                    }
                }
            });
        }

        group.wait().await
    }
}
