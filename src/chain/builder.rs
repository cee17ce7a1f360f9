//! # Chain: ordered policy composition.
//!
//! A [`Chain`] accumulates decorators and applies them to a leaf runnable.
//!
//! ## Ordering
//! Registration order is **outside-in**: the first registered decorator becomes the
//! outermost wrapper, the last registered sits closest to the leaf.
//!
//! ```text
//! Chain::new().a().b().c().apply(leaf)
//!
//!   apply folds from the last registration outward:
//!     leaf ─► c(leaf) ─► b(c(leaf)) ─► a(b(c(leaf)))
//!
//!   run():  a ─► b ─► c ─► leaf
//! ```
//!
//! Swapping two registrations changes semantics:
//! - `replicas(3).retry(2, d)` runs three replicas, each with its own retry loop.
//! - `retry(2, d).replicas(3)` retries the whole three-way fan-out as one unit.
//! - `retry(2, d).recover()` isolates every attempt: a panic counts as a failed
//!   attempt and the next attempt still runs.
//! - `recover().retry(2, d)` catches a panic once, outside the loop, and no further
//!   attempt runs.
//!
//! ## Value semantics
//! Every registration method takes `&self` and returns a new chain; a chain that was
//! already handed out never changes.
//!
//! ## Logger
//! [`Chain::with_logger`] sets the logger used by **every** decorator at apply time,
//! wherever the call appears in the builder expression.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::chain::decorator::{Decorator, FnDecorator};
use crate::config::Config;
use crate::error::TaskError;
use crate::policies::{OnCancel, OnError, Recover, Replicas, Retry};
use crate::runnables::RunnableRef;
use crate::subscribers::LoggerRef;

/// Ordered sequence of decorators plus an optional logger.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use taskchain::{Chain, RunFn, Runnable, TaskError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let app = Chain::new()
///     .retry(3, Duration::ZERO)
///     .recover()
///     .apply(RunFn::arc(|_ctx: CancellationToken| async { Ok::<_, TaskError>(()) }));
///
/// assert!(app.run(CancellationToken::new()).await.is_ok());
/// # }
/// ```
#[derive(Clone, Default)]
pub struct Chain {
    layers: Vec<Arc<dyn Decorator>>,
    logger: Option<LoggerRef>,
}

impl Chain {
    /// Creates an empty chain; applying it returns the leaf unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the conventional chain described by `cfg`.
    ///
    /// Registers, outside-in: `replicas` (only when more than one is requested),
    /// `retry` (when enabled) and `recover` (when enabled). Every replica thus runs its
    /// own retry loop and every attempt is fault-isolated.
    pub fn with_defaults(cfg: &Config) -> Self {
        let mut chain = Self::new();
        if let Some(count) = cfg.replica_count() {
            chain = chain.replicas(count);
        }
        if let Some(retry) = cfg.retry_policy() {
            chain = chain.layer(retry);
        }
        if cfg.recover {
            chain = chain.recover();
        }
        chain
    }

    /// Registers a [`Retry`] policy (`bound = 0` retries until success or cancellation).
    pub fn retry(&self, bound: u32, delay: Duration) -> Self {
        self.layer(Retry::new(bound, delay))
    }

    /// Registers a [`Replicas`] policy (`count = 0` is treated as `1`).
    pub fn replicas(&self, count: usize) -> Self {
        self.layer(Replicas::new(count))
    }

    /// Registers a [`Recover`] fault isolation boundary.
    pub fn recover(&self) -> Self {
        self.layer(Recover)
    }

    /// Registers an [`OnCancel`] hook.
    pub fn on_cancel(&self, cleanup: impl Fn() + Send + Sync + 'static) -> Self {
        self.layer(OnCancel::new(cleanup))
    }

    /// Registers an [`OnError`] hook.
    pub fn on_error(&self, observer: impl Fn(&TaskError) + Send + Sync + 'static) -> Self {
        self.layer(OnError::new(observer))
    }

    /// Registers an arbitrary transformer at the current position.
    ///
    /// ```rust
    /// use taskchain::{Chain, RunnableRef};
    ///
    /// let chain = Chain::new().recover().extend(|next: RunnableRef| next);
    /// assert_eq!(chain.len(), 2);
    /// ```
    pub fn extend(
        &self,
        f: impl Fn(RunnableRef) -> RunnableRef + Send + Sync + 'static,
    ) -> Self {
        self.layer(FnDecorator(f))
    }

    /// Registers any [`Decorator`] at the current position.
    pub fn layer(&self, decorator: impl Decorator) -> Self {
        let mut next = self.clone();
        next.layers.push(Arc::new(decorator));
        next
    }

    /// Returns a chain whose decorators all receive `logger`.
    pub fn with_logger(&self, logger: LoggerRef) -> Self {
        let mut next = self.clone();
        next.logger = Some(logger);
        next
    }

    /// Returns the configured logger.
    pub fn logger(&self) -> Option<&LoggerRef> {
        self.logger.as_ref()
    }

    /// Number of registered decorators.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no decorator is registered.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Wraps `leaf` with every registered decorator.
    ///
    /// The last registered decorator is applied first, so the first registered one ends
    /// up outermost.
    pub fn apply(&self, leaf: RunnableRef) -> RunnableRef {
        let logger = self.logger.as_ref();
        self.layers
            .iter()
            .rev()
            .fold(leaf, |next, decorator| decorator.decorate(next, logger))
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("layers", &self.layers.len())
            .field("logger", &self.logger.as_ref().map(|l| l.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    use crate::events::{Event, EventKind};
    use crate::runnables::{RunFn, Runnable};
    use crate::subscribers::Subscribe;

    type Trace = Arc<Mutex<Vec<String>>>;

    /// Records `"<label>:enter"` / `"<label>:exit"` around the wrapped run.
    struct Traced {
        label: &'static str,
        trace: Trace,
        inner: RunnableRef,
    }

    #[async_trait]
    impl Runnable for Traced {
        async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
            self.trace.lock().unwrap().push(format!("{}:enter", self.label));
            let res = self.inner.run(ctx).await;
            self.trace.lock().unwrap().push(format!("{}:exit", self.label));
            res
        }
    }

    fn traced(
        label: &'static str,
        trace: &Trace,
    ) -> impl Fn(RunnableRef) -> RunnableRef + Send + Sync + 'static {
        let trace = Arc::clone(trace);
        move |inner: RunnableRef| -> RunnableRef {
            Arc::new(Traced {
                label,
                trace: Arc::clone(&trace),
                inner,
            })
        }
    }

    fn leaf(trace: &Trace) -> RunnableRef {
        let trace = Arc::clone(trace);
        RunFn::arc(move |_ctx: CancellationToken| {
            trace.lock().unwrap().push("leaf".into());
            async { Ok::<_, TaskError>(()) }
        })
    }

    fn counted(calls: &Arc<AtomicUsize>, f: fn(usize) -> Result<(), TaskError>) -> RunnableRef {
        let calls = Arc::clone(calls);
        RunFn::arc(move |_ctx: CancellationToken| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { f(n) }
        })
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<EventKind>>);

    impl Subscribe for Recorder {
        fn on_event(&self, event: &Event) {
            self.0.lock().unwrap().push(event.kind);
        }
    }

    #[tokio::test]
    async fn first_registered_is_outermost() {
        let trace: Trace = Arc::default();
        let app = Chain::new()
            .extend(traced("a", &trace))
            .extend(traced("b", &trace))
            .extend(traced("c", &trace))
            .apply(leaf(&trace));

        app.run(CancellationToken::new()).await.unwrap();
        assert_eq!(
            *trace.lock().unwrap(),
            vec!["a:enter", "b:enter", "c:enter", "leaf", "c:exit", "b:exit", "a:exit"]
        );
    }

    #[tokio::test]
    async fn empty_chain_returns_leaf() {
        let trace: Trace = Arc::default();
        let leaf = leaf(&trace);
        let app = Chain::new().apply(Arc::clone(&leaf));

        assert!(Arc::ptr_eq(&app, &leaf));
    }

    #[test]
    fn registrations_never_mutate_snapshots() {
        let base = Chain::new().recover();
        let with_retry = base.retry(2, Duration::ZERO);
        let with_replicas = base.replicas(3).on_cancel(|| {});

        assert_eq!(base.len(), 1);
        assert_eq!(with_retry.len(), 2);
        assert_eq!(with_replicas.len(), 3);

        let logged = base.with_logger(Arc::new(Recorder::default()));
        assert!(base.logger().is_none());
        assert!(logged.logger().is_some());
    }

    #[tokio::test]
    async fn retry_then_recover_isolates_each_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Chain::new()
            .retry(2, Duration::ZERO)
            .recover()
            .apply(counted(&calls, |n| {
                if n > 0 {
                    panic!("attempt {n} exploded");
                }
                Ok(())
            }));

        let err = app.run(CancellationToken::new()).await.unwrap_err();
        match &err {
            TaskError::RetryExhausted { bound, errors } => {
                assert_eq!(*bound, 2);
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().all(|e| matches!(e, TaskError::Panicked { .. })));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn recover_then_retry_catches_once_outside() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Chain::new()
            .recover()
            .retry(2, Duration::ZERO)
            .apply(counted(&calls, |n| {
                if n > 0 {
                    panic!("attempt {n} exploded");
                }
                Ok(())
            }));

        let err = app.run(CancellationToken::new()).await.unwrap_err();
        match &err {
            TaskError::Panicked { reason } => assert_eq!(reason, "attempt 1 exploded"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn replicas_before_retry_gives_each_replica_a_loop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Chain::new()
            .replicas(3)
            .retry(2, Duration::ZERO)
            .apply(counted(&calls, |n| {
                if n == 1 {
                    Err(TaskError::fail("first call fails"))
                } else {
                    Ok(())
                }
            }));

        app.run(CancellationToken::new()).await.unwrap();
        // Only the replica that failed retried.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn retry_before_replicas_retries_whole_fan_out() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Chain::new()
            .retry(2, Duration::ZERO)
            .replicas(3)
            .apply(counted(&calls, |n| {
                if n == 1 {
                    Err(TaskError::fail("first call fails"))
                } else {
                    Ok(())
                }
            }));

        app.run(CancellationToken::new()).await.unwrap();
        // The failed fan-out is rerun in full.
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn retried_fan_out_exhausts_with_replica_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Chain::new()
            .retry(2, Duration::ZERO)
            .replicas(3)
            .apply(counted(&calls, |_| Err(TaskError::fail("boom"))));

        let err = app.run(CancellationToken::new()).await.unwrap_err();
        match &err {
            TaskError::RetryExhausted { errors, .. } => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().all(|e| matches!(e, TaskError::Replica { .. })));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn retry_three_over_two_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Chain::new().retry(3, Duration::ZERO).apply(counted(&calls, |n| {
            if n < 3 {
                Err(TaskError::fail(format!("fail-{n}")))
            } else {
                Ok(())
            }
        }));

        assert!(app.run(CancellationToken::new()).await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn on_cancel_fires_through_retry() {
        let fired = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        let inner = {
            let token = token.clone();
            RunFn::arc(move |_ctx: CancellationToken| {
                token.cancel();
                async { Err::<(), _>(TaskError::fail("lost connection")) }
            })
        };
        let app = {
            let fired = Arc::clone(&fired);
            Chain::new()
                .on_cancel(move || {
                    fired.fetch_add(1, Ordering::SeqCst);
                })
                .retry(0, Duration::from_secs(1))
                .apply(inner)
        };

        let err = app.run(token).await.unwrap_err();
        assert!(matches!(err, TaskError::RetryCanceled { .. }));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn logger_reaches_decorators_registered_before_it() {
        let recorder = Arc::new(Recorder::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Chain::new()
            .retry(2, Duration::ZERO)
            .with_logger(recorder.clone())
            .apply(counted(&calls, |_| Err(TaskError::fail("boom"))));

        app.run(CancellationToken::new()).await.unwrap_err();
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                EventKind::AttemptFailed,
                EventKind::AttemptFailed,
                EventKind::RetryExhausted
            ]
        );
    }

    #[test]
    fn defaults_follow_config() {
        let cfg = Config::default();
        assert_eq!(Chain::with_defaults(&cfg).len(), 2);

        let cfg = Config {
            replicas: 4,
            ..Config::default()
        };
        assert_eq!(Chain::with_defaults(&cfg).len(), 3);

        let cfg = Config {
            retry: false,
            recover: false,
            ..Config::default()
        };
        assert!(Chain::with_defaults(&cfg).is_empty());
    }
}
