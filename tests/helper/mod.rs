//! Shared test utilities

pub mod endpoint;

pub use endpoint::*;
