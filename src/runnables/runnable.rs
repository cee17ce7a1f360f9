//! # The runnable capability.
//!
//! A [`Runnable`] runs to completion or fails, honoring cancellation signalled through
//! the [`CancellationToken`] it receives. [`RunnableRef`] is the shared handle every
//! policy layer wraps and every group spawns.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// # Shared handle to a runnable.
///
/// This is the type decorators consume and produce.
pub type RunnableRef = Arc<dyn Runnable>;

/// # Asynchronous, cancelable unit of work.
///
/// Implementors should check `ctx` regularly and return promptly once it is cancelled,
/// conventionally with [`TaskError::Canceled`]. Nothing preempts a runnable that ignores
/// its token.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use taskchain::{Runnable, TaskError};
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Runnable for Ticker {
///     fn name(&self) -> &str { "ticker" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
///         loop {
///             tokio::select! {
///                 _ = ctx.cancelled() => return Err(TaskError::Canceled),
///                 _ = tokio::time::sleep(std::time::Duration::from_millis(100)) => {}
///             }
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Runnable: Send + Sync + 'static {
    /// Returns a human-readable name used in events and group errors.
    ///
    /// Wrappers produced by policies forward the name of the runnable they wrap.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Runs until completion, failure or cancellation.
    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError>;
}
