//! Shared domain types for Palaver.
//!
//! This crate contains the types used across the Palaver service:
//! chat messages, filter/page values, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod message;
