//! Error handling
//!
//! Defines error types for the authentication layer.

pub mod types;

pub use types::*;
