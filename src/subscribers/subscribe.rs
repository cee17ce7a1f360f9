//! # Logger contract
//!
//! `Subscribe` is the extension point for observing what policy layers do. A chain holds
//! at most one logger ([`LoggerRef`]) and hands it to every decorator when it is applied.
//!
//! ## Contract
//! - `on_event` is called **synchronously** from the policy that produced the event,
//!   possibly from several replicas at once. Keep it cheap and non-blocking; forward to
//!   a channel if the handling is slow.
//! - The logger is shared read-only; interior state needs its own synchronization.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use taskchain::{Event, Subscribe};
//!
//! #[derive(Default)]
//! struct FailureCounter(AtomicUsize);
//!
//! impl Subscribe for FailureCounter {
//!     fn on_event(&self, ev: &Event) {
//!         if ev.is_failure() {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

use std::sync::Arc;

use crate::events::Event;

/// Shared handle to a logger.
pub type LoggerRef = Arc<dyn Subscribe>;

/// Contract for event loggers.
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    fn on_event(&self, event: &Event);

    /// Human-readable name (for diagnostics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Publishes `event` to `logger` when one is configured.
#[inline]
pub(crate) fn publish(logger: Option<&LoggerRef>, event: impl FnOnce() -> Event) {
    if let Some(l) = logger {
        l.on_event(&event());
    }
}
