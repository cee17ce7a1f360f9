//! # The decorator capability.
//!
//! A [`Decorator`] turns one runnable into another. Built-in policies
//! ([`Retry`](crate::Retry), [`Replicas`](crate::Replicas), [`Recover`](crate::Recover),
//! [`OnCancel`](crate::OnCancel), [`OnError`](crate::OnError)) implement it, and so can
//! user types registered with [`Chain::layer`](crate::Chain::layer).

use crate::runnables::RunnableRef;
use crate::subscribers::LoggerRef;

/// Transformer `Runnable -> Runnable`.
///
/// `logger` is the chain's logger at apply time; decorators that publish events keep
/// a clone of it in the runnable they return.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use taskchain::{Decorator, LoggerRef, Runnable, RunnableRef, TaskError};
///
/// struct SkipWhenCancelled;
///
/// struct Skipping(RunnableRef);
///
/// #[async_trait]
/// impl Runnable for Skipping {
///     fn name(&self) -> &str { self.0.name() }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
///         if ctx.is_cancelled() {
///             return Ok(());
///         }
///         self.0.run(ctx).await
///     }
/// }
///
/// impl Decorator for SkipWhenCancelled {
///     fn decorate(&self, next: RunnableRef, _logger: Option<&LoggerRef>) -> RunnableRef {
///         Arc::new(Skipping(next))
///     }
/// }
/// ```
pub trait Decorator: Send + Sync + 'static {
    /// Wraps `next`, returning the decorated runnable.
    fn decorate(&self, next: RunnableRef, logger: Option<&LoggerRef>) -> RunnableRef;
}

/// Decorator backed by a plain `Fn(RunnableRef) -> RunnableRef`.
pub(crate) struct FnDecorator<F>(pub(crate) F);

impl<F> Decorator for FnDecorator<F>
where
    F: Fn(RunnableRef) -> RunnableRef + Send + Sync + 'static,
{
    fn decorate(&self, next: RunnableRef, _logger: Option<&LoggerRef>) -> RunnableRef {
        (self.0)(next)
    }
}
