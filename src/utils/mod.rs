// src/utils/mod.rs

//! Utility functions and helpers.

pub mod http;
pub mod name;
pub mod retry;

pub use name::canonical_name;
pub use retry::RetryPolicy;
