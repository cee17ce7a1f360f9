//! # Function-backed runnable (`RunFn`)
//!
//! [`RunFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a fresh
//! future per run. It adds no behavior of its own.
//!
//! ## Concurrency semantics
//! - Every call to [`Runnable::run`] creates a **new** future that owns its state, so
//!   replicas and retries never share a future.
//! - If state must be shared between runs, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use taskchain::{RunFn, RunnableRef, TaskError};
//!
//! let r: RunnableRef = RunFn::new(|ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return Err(TaskError::Canceled);
//!     }
//!     Ok(())
//! })
//! .with_name("worker")
//! .into_ref();
//!
//! assert_eq!(r.name(), "worker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::runnables::runnable::{Runnable, RunnableRef};

/// Function-backed runnable.
///
/// Wraps a closure that *creates* a new future per run.
#[derive(Debug)]
pub struct RunFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> RunFn<F> {
    /// Wraps `f`; the runnable is named `"fn"` until [`RunFn::with_name`] is called.
    pub fn new(f: F) -> Self {
        Self {
            name: Cow::Borrowed("fn"),
            f,
        }
    }

    /// Returns the runnable with a diagnostic name.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F, Fut> RunFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    /// Wraps `f` and returns it as a shared handle.
    ///
    /// ```rust
    /// use tokio_util::sync::CancellationToken;
    /// use taskchain::{RunFn, RunnableRef, TaskError};
    ///
    /// let r: RunnableRef = RunFn::arc(|_ctx: CancellationToken| async { Ok::<_, TaskError>(()) });
    /// assert_eq!(r.name(), "fn");
    /// ```
    pub fn arc(f: F) -> RunnableRef {
        Arc::new(Self::new(f))
    }

    /// Wraps `f` under a diagnostic name and returns it as a shared handle.
    ///
    /// ```rust
    /// use tokio_util::sync::CancellationToken;
    /// use taskchain::{RunFn, RunnableRef, TaskError};
    ///
    /// let r: RunnableRef = RunFn::named("sync", |_ctx: CancellationToken| async {
    ///     Ok::<_, TaskError>(())
    /// });
    /// assert_eq!(r.name(), "sync");
    /// ```
    pub fn named(name: impl Into<Cow<'static, str>>, f: F) -> RunnableRef {
        Arc::new(Self::new(f).with_name(name))
    }

    /// Converts into a shared handle.
    pub fn into_ref(self) -> RunnableRef {
        Arc::new(self)
    }
}

#[async_trait]
impl<F, Fut> Runnable for RunFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        (self.f)(ctx).await
    }
}
