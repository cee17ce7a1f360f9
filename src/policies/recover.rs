//! # Fault isolation: turn panics into errors.
//!
//! The wrapped run is polled inside [`catch_unwind`](futures::FutureExt::catch_unwind);
//! a panic becomes [`TaskError::Panicked`] with the payload message. That includes a
//! panic resumed by a nested [`TaskGroup`](crate::TaskGroup) on behalf of a replica.
//!
//! The boundary does not retry and does not log. Cancellation is signalled through the
//! token, not by unwinding, so it is never caught here.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if the runnable panics while holding a lock on state it shares.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::chain::Decorator;
use crate::error::TaskError;
use crate::runnables::{Runnable, RunnableRef};
use crate::subscribers::LoggerRef;

/// Fault isolation decorator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Recover;

impl Decorator for Recover {
    fn decorate(&self, next: RunnableRef, _logger: Option<&LoggerRef>) -> RunnableRef {
        Arc::new(Recovering { inner: next })
    }
}

struct Recovering {
    inner: RunnableRef,
}

#[async_trait]
impl Runnable for Recovering {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        match AssertUnwindSafe(self.inner.run(ctx)).catch_unwind().await {
            Ok(res) => res,
            Err(payload) => Err(TaskError::Panicked {
                reason: panic_message(payload.as_ref()),
            }),
        }
    }
}

/// Extracts the message of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::policies::Replicas;
    use crate::runnables::RunFn;

    fn recover(inner: RunnableRef) -> RunnableRef {
        Recover.decorate(inner, None)
    }

    #[tokio::test]
    async fn static_str_panic_is_recovered() {
        let inner = RunFn::arc(|_ctx: CancellationToken| async {
            if true {
                panic!("invalid state");
            }
            Ok::<_, TaskError>(())
        });

        let err = recover(inner).run(CancellationToken::new()).await.unwrap_err();
        match err {
            TaskError::Panicked { reason } => assert_eq!(reason, "invalid state"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn formatted_panic_is_recovered() {
        let inner = RunFn::arc(|_ctx: CancellationToken| async {
            let idx = 7;
            let v = vec![1u8, 2, 3];
            let _ = v[idx];
            Ok::<_, TaskError>(())
        });

        let err = recover(inner).run(CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.as_label(), "panic_recovered");
        assert!(err.to_string().contains("index out of bounds"), "{err}");
    }

    #[tokio::test]
    async fn non_string_payload() {
        let inner = RunFn::arc(|_ctx: CancellationToken| async {
            if true {
                std::panic::panic_any(42u32);
            }
            Ok::<_, TaskError>(())
        });

        let err = recover(inner).run(CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "panic recovered: unknown panic");
    }

    #[tokio::test]
    async fn results_pass_through() {
        let ok = RunFn::arc(|_ctx: CancellationToken| async { Ok::<_, TaskError>(()) });
        assert!(recover(ok).run(CancellationToken::new()).await.is_ok());

        let failing =
            RunFn::arc(|_ctx: CancellationToken| async { Err::<(), _>(TaskError::fail("boom")) });
        let err = recover(failing).run(CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "execution failed: boom");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn panic_in_replica_stops_at_boundary() {
        let inner = RunFn::arc(|_ctx: CancellationToken| async {
            if true {
                panic!("replica fault");
            }
            Ok::<_, TaskError>(())
        });
        let replicated = Replicas::new(3).decorate(inner, None);

        let err = recover(replicated)
            .run(CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "panic recovered: replica fault");
    }
}
