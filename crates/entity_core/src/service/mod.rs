//! Caller-facing services layered over repositories.
//!
//! # Responsibility
//! - Give callers one stable entry point per entity bundle.
//! - Keep callers decoupled from the concrete repository type.

pub mod entity_manager;

pub use entity_manager::EntityManager;
