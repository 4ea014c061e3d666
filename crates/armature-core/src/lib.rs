//! Armature Core Types and the Domain Model
//!
//! This crate provides the foundational types for the Armature model builder:
//!
//! - **Identifiers**: element/connector keys and string-interned guids
//!   ([`identifier`] module)
//! - **Identity**: the common identity record shared by every entity kind
//!   ([`identity`] module)
//! - **Entities**: packages, classes, attributes, operations, associations,
//!   dependencies, constraints, diagrams and skipped items
//! - **Model**: the immutable, arena-backed resolved model ([`model::Model`])
//!
//! Entities in the model never hold references to each other; every
//! cross-entity relationship is an [`identifier::ElementId`] or
//! [`identifier::ConnectorId`] key resolved through the owning [`model::Model`].

pub mod attribute;
pub mod class;
pub mod connector;
pub mod constraint;
pub mod diagram;
pub mod identifier;
pub mod identity;
pub mod model;
pub mod operation;
pub mod package;
pub mod skipped;
pub mod typeref;

pub use identifier::{ConnectorId, ElementId, Guid};
pub use identity::{Identity, Notes, Visibility};
pub use model::{Model, ModelError};
