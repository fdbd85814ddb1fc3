//! Modelos del sistema
//!
//! Descriptores de las seis entidades y de sus campos.

pub mod entity;

pub use entity::{EntityDescriptor, EntityKind, FieldRule, FieldSpec};
