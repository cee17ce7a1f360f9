//! Policy events: the data model handed to loggers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: `Retry` (attempt failures, exhaustion, cancellation) and `Replicas`
//!   (per-replica outcome). Fault isolation and hooks never log.
//! - **Consumers**: the [`Subscribe`](crate::Subscribe) implementation injected with
//!   [`Chain::with_logger`](crate::Chain::with_logger).

mod event;

pub use event::{Event, EventKind};
