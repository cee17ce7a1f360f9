//! # Runnable abstraction and the function adapter.
//!
//! - [`Runnable`] - trait for async cancelable units of work
//! - [`RunnableRef`] - shared handle (`Arc<dyn Runnable>`)
//! - [`RunFn`] - adapter turning a `Fn(CancellationToken) -> Future` closure into a runnable

mod run_fn;
mod runnable;

pub use run_fn::RunFn;
pub use runnable::{Runnable, RunnableRef};
