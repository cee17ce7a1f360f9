//! # Decorator composition.
//!
//! - [`Decorator`] - the `Runnable -> Runnable` transformer capability
//! - [`Chain`] - ordered builder applying decorators outside-in by registration order

mod builder;
mod decorator;

pub use builder::Chain;
pub use decorator::Decorator;
