//! Execution policies applied by a [`Chain`](crate::Chain).
//!
//! Each policy is a small [`Decorator`](crate::Decorator) value holding its
//! configuration; decorating produces a private runnable type that implements the
//! behavior and forwards the wrapped runnable's name.
//!
//! ## Contents
//! - [`Retry`]    sequential attempts with a fixed delay, bounded or unbounded
//! - [`Replicas`] N concurrent runs supervised as one unit
//! - [`Recover`]  fault isolation, panics become [`TaskError::Panicked`](crate::TaskError::Panicked)
//! - [`OnCancel`] cleanup callback after a cancelled run
//! - [`OnError`]  observer callback for every error
//!
//! ## Quick wiring
//! ```text
//! Chain::new().replicas(3).retry(2, delay).recover().apply(leaf)
//!
//!   Replicated ──► Retrying ──► Recovering ──► leaf     (one loop per replica)
//! ```

mod on_cancel;
mod on_error;
mod recover;
mod replicas;
mod retry;

pub use on_cancel::OnCancel;
pub use on_error::OnError;
pub use recover::Recover;
pub use replicas::Replicas;
pub use retry::Retry;
