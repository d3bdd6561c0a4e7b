//! Request handlers.

pub mod ads;
pub mod health;

pub use ads::*;
pub use health::*;
