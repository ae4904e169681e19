//! Repository traits (ports) for persistence.
//!
//! Implementations live in palaver-infra. Service code depends only on
//! these traits, so storage can be swapped without touching the pipeline.

pub mod message;

pub use message::MessageRepository;
