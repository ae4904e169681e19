//! Infrastructure layer for Palaver.
//!
//! Contains implementations of the repository traits defined in
//! `palaver-core`: SQLite storage with split read/write pools, plus the
//! data-directory and configuration loaders.

pub mod config;
pub mod sqlite;
