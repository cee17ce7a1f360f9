//! # taskchain
//!
//! **taskchain** is a small supervision layer for async runnables.
//!
//! It lets you stack execution policies around a unit of work (bounded or unbounded
//! retry, N-way replication, panic isolation, cleanup on cancellation) and launch a
//! fixed set of independent units concurrently as one supervised group.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Chain::new()                                  (registration order = outside-in)
//!     .replicas(3) ──┐
//!     .retry(2, d) ──┼─► Vec<Arc<dyn Decorator>> + Option<LoggerRef>
//!     .recover() ────┘
//!     .apply(leaf) ──► Replicated ─► Retrying ─► Recovering ─► leaf
//!                          │
//!                          └─► TaskGroup (child token, first error cancels the rest)
//!
//!   Launcher::new([app, other, ...])
//!     └─► TaskGroup ──► app.run(group_token)      ─┐
//!                   ──► other.run(group_token)    ─┼─► first error → Group { index, name, .. }
//!                   ──► ...                       ─┘
//! ```
//!
//! ### Cancellation
//! ```text
//! caller token
//!   └─► launcher group token (child)        cancelled on first member failure
//!         └─► replica group token (child)   cancelled on first replica failure
//!               └─► leaf runs observe it cooperatively
//! ```
//! Cancellation flows downward only: a failing group never cancels its parent.
//!
//! ### Retry loop
//! ```text
//! loop {
//!   ├─► inner.run(ctx) ── Ok ──► return Ok
//!   ├─► Err: publish AttemptFailed, keep error
//!   ├─► select { ctx.cancelled() ──► RetryCanceled { errors }, sleep(delay) ──► continue }
//!   └─► bound reached ──► RetryExhausted { bound, errors }
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Runnables**     | Async cancelable units, closures adapted with no overhead.   | [`Runnable`], [`RunnableRef`], [`RunFn`]    |
//! | **Composition**   | Ordered decorator chain, custom decorators.                  | [`Chain`], [`Decorator`]                    |
//! | **Policies**      | Retry, replicas, panic recovery, cancel and error hooks.     | [`Retry`], [`Replicas`], [`Recover`], [`OnCancel`], [`OnError`] |
//! | **Concurrency**   | Structured fan-out and top-level launcher.                   | [`TaskGroup`], [`Launcher`], [`launch`]     |
//! | **Errors**        | One error tree carrying layer, replica and attempt context.  | [`TaskError`]                               |
//! | **Observability** | Policy events delivered to an injected logger.               | [`Subscribe`], [`Event`], [`EventKind`]     |
//! | **Configuration** | Defaults for a conventional chain.                           | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging` (default): exports [`LogWriter`], which renders events as `tracing` records.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskchain::{Chain, Launcher, RunFn, Runnable, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let calls = Arc::new(AtomicUsize::new(0));
//!
//!     // Fails twice, then succeeds.
//!     let flaky = {
//!         let calls = Arc::clone(&calls);
//!         RunFn::new(move |_ctx: CancellationToken| {
//!             let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
//!             async move {
//!                 if n < 3 { Err(TaskError::fail("not yet")) } else { Ok(()) }
//!             }
//!         })
//!         .with_name("flaky")
//!         .into_ref()
//!     };
//!
//!     let app = Chain::new()
//!         .retry(3, Duration::ZERO)
//!         .recover()
//!         .apply(flaky);
//!
//!     let idle = RunFn::arc(|_ctx: CancellationToken| async { Ok::<_, TaskError>(()) });
//!
//!     Launcher::new([app, idle]).run(CancellationToken::new()).await?;
//!     assert_eq!(calls.load(Ordering::SeqCst), 3);
//!     Ok(())
//! }
//! ```

mod chain;
mod config;
mod core;
mod error;
mod events;
mod policies;
mod runnables;
mod subscribers;

// ---- Public re-exports ----

pub use chain::{Chain, Decorator};
pub use config::Config;
pub use crate::core::{Launcher, TaskGroup, launch};
pub use error::TaskError;
pub use events::{Event, EventKind};
pub use policies::{OnCancel, OnError, Recover, Replicas, Retry};
pub use runnables::{RunFn, Runnable, RunnableRef};
pub use subscribers::{LoggerRef, Subscribe};

// Optional: expose the built-in `tracing` logger.
// Enabled by default; opt out with `default-features = false`.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
