//! # Loggers for policy events.
//!
//! This module provides the [`Subscribe`] trait and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Chain::with_logger(LoggerRef)
//!        │
//!        └─► Chain::apply(leaf) ──► each Decorator::decorate(next, Some(&logger))
//!                                        │
//!                    Retry / Replicas ───┴──► logger.on_event(&Event)
//!                                                  │
//!                                        ┌─────────┴─────────┐
//!                                        ▼                   ▼
//!                                    LogWriter            Custom
//!                                 (tracing records)   (metrics, tests)
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use subscribe::publish;
pub use subscribe::{LoggerRef, Subscribe};
