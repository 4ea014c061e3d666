//! Dependency builders.
//!
//! Dependencies use the same half-open completion protocol as associations,
//! with one extra wrinkle: an endpoint resolves either to a class or to a
//! package (via the package's backing element), and the two kinds must not
//! mix on one edge.

use armature_core::{
    connector::DependencyEnds,
    identifier::{ConnectorId, ElementId},
    identity::Identity,
    model::Model,
};

use crate::{builders::connector_identity, error::BuildError, row::RawRow};

/// A resolved dependency endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyEndpoint {
    Class(ElementId),
    Package(ElementId),
}

/// Stages one dependency between two classes or two packages.
#[derive(Debug, Clone)]
pub struct DependencyBuilder {
    pub(crate) id: ConnectorId,
    pub(crate) identity: Identity,
    pub(crate) source: Option<DependencyEndpoint>,
    pub(crate) target: Option<DependencyEndpoint>,
    built: bool,
}

impl DependencyBuilder {
    pub fn from_row(id: ConnectorId, row: &RawRow) -> Result<Self, BuildError> {
        Ok(Self {
            id,
            identity: connector_identity(row)?,
            source: None,
            target: None,
            built: false,
        })
    }

    /// Resolve the source endpoint; idempotent like the association
    /// transitions.
    pub fn complete_source(&mut self, endpoint: DependencyEndpoint) {
        if self.source.is_none() {
            self.source = Some(endpoint);
        }
    }

    /// Resolve the target endpoint; idempotent.
    pub fn complete_target(&mut self, endpoint: DependencyEndpoint) {
        if self.target.is_none() {
            self.target = Some(endpoint);
        }
    }

    /// The validated endpoint pair. Fails when either end is still
    /// unresolved or when a class endpoint meets a package endpoint.
    pub fn ends(&self) -> Result<DependencyEnds, BuildError> {
        let source = self.source.ok_or(BuildError::HalfOpenDependency {
            id: self.id,
            end: "source",
        })?;
        let target = self.target.ok_or(BuildError::HalfOpenDependency {
            id: self.id,
            end: "target",
        })?;
        match (source, target) {
            (DependencyEndpoint::Class(source), DependencyEndpoint::Class(target)) => {
                Ok(DependencyEnds::Classes { source, target })
            }
            (DependencyEndpoint::Package(source), DependencyEndpoint::Package(target)) => {
                Ok(DependencyEnds::Packages { source, target })
            }
            _ => Err(BuildError::MixedDependencyEnds { id: self.id }),
        }
    }

    /// Materialize the dependency into the arena.
    pub fn build(&mut self, model: &mut Model) -> Result<(), BuildError> {
        if self.built {
            return Ok(());
        }
        let ends = self.ends()?;
        model.append_dependency(self.id, self.identity.clone(), ends)?;
        self.built = true;
        Ok(())
    }
}
