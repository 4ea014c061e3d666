//! Package builders.

use armature_core::{
    identifier::{ElementId, Guid},
    identity::Identity,
    model::Model,
    package::PackageData,
};

use crate::{
    builders::{diagram::DiagramBuilder, entity_identity},
    error::BuildError,
    repository::Table,
    row::{RawRow, fields},
};

/// Stages one package (or the synthetic model root).
///
/// Child packages and classes are kept as ordered registry keys, filled in
/// arrival-or-repaired order during populate.
#[derive(Debug)]
pub struct PackageBuilder {
    pub(crate) identity: Identity,
    pub(crate) position: i64,
    pub(crate) element_id: Option<ElementId>,
    pub(crate) child_packages: Vec<ElementId>,
    pub(crate) classes: Vec<ElementId>,
    pub(crate) diagrams: Vec<DiagramBuilder>,
    pub(crate) self_dependent_hits: usize,
    built: Option<ElementId>,
}

impl PackageBuilder {
    /// The synthetic model root: no row behind it, no element id, a
    /// synthetic guid.
    pub fn root() -> Self {
        Self {
            identity: Identity::new(None, Guid::synthetic("model-root"), "Model"),
            position: 0,
            element_id: None,
            child_packages: Vec::new(),
            classes: Vec::new(),
            diagrams: Vec::new(),
            self_dependent_hits: 0,
            built: None,
        }
    }

    pub fn from_row(row: &RawRow) -> Result<Self, BuildError> {
        Ok(Self {
            identity: entity_identity(Table::Package, row)?,
            position: row.position().unwrap_or(0),
            element_id: row.element_id(fields::package::ELEMENT_ID),
            child_packages: Vec::new(),
            classes: Vec::new(),
            diagrams: Vec::new(),
            self_dependent_hits: 0,
            built: None,
        })
    }

    pub fn id(&self) -> Option<ElementId> {
        self.identity.id
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Materialize the package into the arena.
    ///
    /// This is the container-parameterized lifecycle variant: the parent
    /// key decides whether this builds as the synthetic root (`None`) or as
    /// a child of an already-built package. Memoized: the first call
    /// registers the package, later calls return the same key.
    pub fn build(
        &mut self,
        parent: Option<ElementId>,
        model: &mut Model,
    ) -> Result<ElementId, BuildError> {
        if let Some(key) = self.built {
            return Ok(key);
        }
        let key = model.append_package(
            parent,
            self.identity.clone(),
            PackageData {
                position: self.position,
                element_id: self.element_id,
                self_dependent: self.self_dependent_hits > 0,
            },
        )?;
        self.built = Some(key);
        Ok(key)
    }

    pub fn built_key(&self) -> Option<ElementId> {
        self.built
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_is_memoized() {
        let mut model = Model::new();
        let mut root = PackageBuilder::root();

        let first = root.build(None, &mut model).unwrap();
        let second = root.build(None, &mut model).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, ElementId::MODEL_ROOT);
        // The side effect ran once: a second append would have failed.
        assert_eq!(model.package_count(), 1);
    }

    #[test]
    fn nested_build_branches_on_parent() {
        let mut model = Model::new();
        let mut root = PackageBuilder::root();
        let root_key = root.build(None, &mut model).unwrap();

        let row = RawRow::from([
            ("id", "10"),
            ("guid", "{PKG}"),
            ("name", "domain"),
            ("position", "1"),
            ("element_id", "110"),
        ]);
        let mut package = PackageBuilder::from_row(&row).unwrap();
        let key = package.build(Some(root_key), &mut model).unwrap();

        assert_eq!(key, ElementId(10));
        assert_eq!(model.package(key).unwrap().depth(), 0);
        assert_eq!(model.package(key).unwrap().element_id(), Some(ElementId(110)));
    }
}
