//! # Cancellation hook: cleanup when a run ends because of cancellation.
//!
//! Runs the wrapped runnable and, if and only if the returned error is classified as
//! cancellation ([`TaskError::is_canceled`]), invokes the cleanup exactly once before
//! returning. The error itself is returned unchanged.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::chain::Decorator;
use crate::error::TaskError;
use crate::runnables::{Runnable, RunnableRef};
use crate::subscribers::LoggerRef;

type Cleanup = Arc<dyn Fn() + Send + Sync>;

/// Cancellation hook decorator.
#[derive(Clone)]
pub struct OnCancel {
    cleanup: Cleanup,
}

impl OnCancel {
    /// Creates a hook running `cleanup` after a cancelled run.
    pub fn new(cleanup: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            cleanup: Arc::new(cleanup),
        }
    }
}

impl fmt::Debug for OnCancel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnCancel").finish_non_exhaustive()
    }
}

impl Decorator for OnCancel {
    fn decorate(&self, next: RunnableRef, _logger: Option<&LoggerRef>) -> RunnableRef {
        Arc::new(CancelHooked {
            inner: next,
            cleanup: Arc::clone(&self.cleanup),
        })
    }
}

struct CancelHooked {
    inner: RunnableRef,
    cleanup: Cleanup,
}

#[async_trait]
impl Runnable for CancelHooked {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        let res = self.inner.run(ctx).await;
        if res.as_ref().is_err_and(|e| e.is_canceled()) {
            (self.cleanup)();
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::runnables::RunFn;

    fn hooked(fired: &Arc<AtomicUsize>, result: fn() -> Result<(), TaskError>) -> RunnableRef {
        let fired = Arc::clone(fired);
        let inner = RunFn::arc(move |_ctx: CancellationToken| async move { result() });
        OnCancel::new(move || {
            fired.fetch_add(1, Ordering::SeqCst);
        })
        .decorate(inner, None)
    }

    #[tokio::test]
    async fn fires_once_on_cancellation() {
        let fired = Arc::new(AtomicUsize::new(0));
        let r = hooked(&fired, || Err(TaskError::Canceled));

        let err = r.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, TaskError::Canceled));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fires_on_wrapped_cancellation() {
        let fired = Arc::new(AtomicUsize::new(0));
        let r = hooked(&fired, || {
            Err(TaskError::RetryCanceled {
                errors: vec![TaskError::fail("boom")],
            })
        });

        let err = r.run(CancellationToken::new()).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn silent_on_failure_and_success() {
        let fired = Arc::new(AtomicUsize::new(0));

        let failing = hooked(&fired, || Err(TaskError::fail("boom")));
        failing.run(CancellationToken::new()).await.unwrap_err();

        let ok = hooked(&fired, || Ok(()));
        ok.run(CancellationToken::new()).await.unwrap();

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn real_cancellation_triggers_cleanup() {
        let fired = Arc::new(AtomicUsize::new(0));
        let inner = RunFn::arc(|ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err::<(), _>(TaskError::Canceled)
        });
        let r = {
            let fired = Arc::clone(&fired);
            OnCancel::new(move || {
                fired.fetch_add(1, Ordering::SeqCst);
            })
            .decorate(inner, None)
        };

        let token = CancellationToken::new();
        let handle = tokio::spawn({
            let token = token.clone();
            async move { r.run(token).await }
        });
        token.cancel();

        assert!(handle.await.unwrap().unwrap_err().is_canceled());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
