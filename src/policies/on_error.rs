//! # Error hook: observe every error a run returns.
//!
//! The observer is called synchronously with a reference to the error, which is then
//! returned unchanged. Successful runs do not call it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::chain::Decorator;
use crate::error::TaskError;
use crate::runnables::{Runnable, RunnableRef};
use crate::subscribers::LoggerRef;

type Observer = Arc<dyn Fn(&TaskError) + Send + Sync>;

/// Error hook decorator.
#[derive(Clone)]
pub struct OnError {
    observer: Observer,
}

impl OnError {
    /// Creates a hook calling `observer` with every error.
    pub fn new(observer: impl Fn(&TaskError) + Send + Sync + 'static) -> Self {
        Self {
            observer: Arc::new(observer),
        }
    }
}

impl fmt::Debug for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnError").finish_non_exhaustive()
    }
}

impl Decorator for OnError {
    fn decorate(&self, next: RunnableRef, _logger: Option<&LoggerRef>) -> RunnableRef {
        Arc::new(ErrorHooked {
            inner: next,
            observer: Arc::clone(&self.observer),
        })
    }
}

struct ErrorHooked {
    inner: RunnableRef,
    observer: Observer,
}

#[async_trait]
impl Runnable for ErrorHooked {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        self.inner.run(ctx).await.inspect_err(|e| (self.observer)(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::runnables::RunFn;

    #[tokio::test]
    async fn sees_errors_not_successes() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let hook = {
            let seen = Arc::clone(&seen);
            OnError::new(move |e| seen.lock().unwrap().push(e.as_label().to_string()))
        };

        let failing =
            RunFn::arc(|_ctx: CancellationToken| async { Err::<(), _>(TaskError::fail("boom")) });
        let err = hook
            .decorate(failing, None)
            .run(CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "execution failed: boom");

        let ok = RunFn::arc(|_ctx: CancellationToken| async { Ok::<_, TaskError>(()) });
        hook.decorate(ok, None)
            .run(CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["task_failed".to_string()]);
    }
}
