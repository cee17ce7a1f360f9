//! # TaskGroup: structured fan-out with cancel-on-first-error.
//!
//! Spawns tasks under one shared [`CancellationToken`] derived from the caller's token,
//! waits for all of them and reports the first error.
//!
//! ## Rules
//! - The group token is a **child** of the parent: cancelling the group never cancels
//!   the parent or the parent's other children.
//! - The first task error cancels the group token; remaining tasks are asked to stop.
//! - [`TaskGroup::wait`] returns only after **every** spawned task has finished.
//! - A panicking task cancels the group like an error does; once the others have
//!   finished, the panic is resumed on the waiting task so a fault isolation boundary
//!   above (or the caller) observes it.
//! - Dropping the group before `wait` completes aborts the tasks still running.
//!
//! ```text
//! TaskGroup::new(&parent) ── token = parent.child_token()
//!     ├─► spawn(f) ──► tokio task: f(token.clone())
//!     ├─► spawn(f) ──► tokio task: f(token.clone())
//!     └─► wait():
//!           join_next() until empty
//!             ├─ Ok(Ok)       → continue
//!             ├─ Ok(Err(e))   → first? keep e; token.cancel()
//!             └─ Err(panic)   → token.cancel(); keep payload
//!           panic kept? resume_unwind : first error or Ok
//! ```

use std::any::Any;
use std::fmt;
use std::future::Future;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Set of concurrent tasks sharing one cancellable scope.
pub struct TaskGroup {
    token: CancellationToken,
    set: JoinSet<Result<(), TaskError>>,
}

impl TaskGroup {
    /// Creates an empty group whose token is a child of `parent`.
    pub fn new(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
            set: JoinSet::new(),
        }
    }

    /// Returns the group's shared token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Number of tasks not yet observed by [`TaskGroup::wait`].
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns `true` if no task is pending.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Spawns the future built by `f` from the group token.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(&mut self, f: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let fut = f(self.token.clone());
        self.set.spawn(fut);
    }

    /// Waits for all tasks and returns the first error observed, if any.
    ///
    /// # Panics
    /// Resumes the panic of a task that panicked, after all other tasks finished.
    pub async fn wait(mut self) -> Result<(), TaskError> {
        let mut first: Option<TaskError> = None;
        let mut panic: Option<Box<dyn Any + Send>> = None;

        while let Some(joined) = self.set.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.token.cancel();
                    if first.is_none() {
                        tracing::debug!(
                            error = %e,
                            pending = self.set.len(),
                            "group member failed, cancelling group"
                        );
                        first = Some(e);
                    }
                }
                Err(join_err) if join_err.is_panic() => {
                    self.token.cancel();
                    if panic.is_none() {
                        panic = Some(join_err.into_panic());
                    }
                }
                Err(_aborted) => {
                    // Only the runtime aborts our tasks, and only while shutting down.
                    self.token.cancel();
                    first.get_or_insert(TaskError::Canceled);
                }
            }
        }

        if let Some(payload) = panic {
            std::panic::resume_unwind(payload);
        }
        match first {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for TaskGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGroup")
            .field("pending", &self.set.len())
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
