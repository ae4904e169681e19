//! Business logic services.

pub mod message;

pub use message::MessageService;
