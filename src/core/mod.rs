//! Concurrency core: the fan-out primitive and the top-level launcher.
//!
//! - [`group`]: [`TaskGroup`], spawn under one child token, wait for all, first error
//!   cancels the rest;
//! - [`launcher`]: [`Launcher`], a fixed set of runnables run as one unit.
//!
//! The replica policy reuses [`TaskGroup`] at a smaller scale.

mod group;
mod launcher;

pub use group::TaskGroup;
pub use launcher::{Launcher, launch};
