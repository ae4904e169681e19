//! Business logic and repository trait definitions for Palaver.
//!
//! This crate holds the message ingestion pipeline (validation, content
//! filtering, statistics, sanitization) and the session query and search
//! services, plus the "port" (repository trait) that the infrastructure
//! layer implements. It depends only on `palaver-types` -- never on
//! `palaver-infra` or any database/IO crate.

pub mod filter;
pub mod repository;
pub mod sanitize;
pub mod service;
pub mod stats;
pub mod validate;
