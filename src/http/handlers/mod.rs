//! Route handlers, one module per resource.

pub mod guest;
pub mod health;
pub mod wish;
