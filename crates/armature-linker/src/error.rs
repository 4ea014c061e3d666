//! Fatal build errors.
//!
//! Everything here aborts the whole build: a partially linked model is
//! unsafe for any consumer, so there is deliberately no partial-success
//! mode. Recoverable defects never reach this type; they are logged and
//! recorded in the [`crate::report::BuildReport`] instead.

use thiserror::Error;

use armature_core::{
    identifier::{ConnectorId, ElementId},
    model::ModelError,
};

use crate::repository::Table;

/// A structural defect that makes the snapshot unbuildable.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{table:?} row {id} is missing required field '{field}'")]
    MissingField {
        table: Table,
        id: ElementId,
        field: &'static str,
    },

    #[error("association {id} is missing its resolved {end} end after linking")]
    HalfOpenAssociation { id: ConnectorId, end: &'static str },

    #[error("dependency {id} is missing its resolved {end} end after linking")]
    HalfOpenDependency { id: ConnectorId, end: &'static str },

    #[error("dependency {id} mixes a class endpoint with a package endpoint")]
    MixedDependencyEnds { id: ConnectorId },

    #[error(
        "association {id} coupling is not symmetric between classes {source_class} and {target}"
    )]
    AsymmetricAssociation {
        id: ConnectorId,
        source_class: ElementId,
        target: ElementId,
    },

    #[error(
        "classes unreachable from any inheritance root (closed cycle with no entry point): {names}"
    )]
    UnreachableClasses { names: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}
