//! Domain layer for kbot
//!
//! Contains the inbound message model, the payload and counter naming rules,
//! and the static service resource attached to all emitted telemetry.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
