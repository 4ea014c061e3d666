//! Class builders: features, graph edges, self flags and coupling sets.

use std::collections::BTreeSet;

use armature_core::{
    class::ClassData,
    identifier::ElementId,
    identity::Identity,
    model::{ConstraintOwner, Model},
    skipped::SkippedItem,
};

use crate::{
    builders::{
        attribute::AttributeBuilder, constraint::ConstraintBuilder, diagram::DiagramBuilder,
        entity_identity, operation::OperationBuilder,
    },
    error::BuildError,
    repository::Table,
    row::{RawRow, fields},
};

/// Element type strings that stage as classes.
pub(crate) const CLASS_TYPES: [&str; 3] = ["Class", "Enumeration", "Interface"];

/// Stages one class with everything it owns.
///
/// Inheritance edges, the three self-reference counters and the symmetric
/// association bookkeeping are filled by the connector scan; the coupling
/// sets are filled by the link pass; features materialize last, except
/// enumeration literals which go out eagerly with the class itself.
#[derive(Debug)]
pub struct ClassBuilder {
    pub(crate) identity: Identity,
    pub(crate) owner_package: ElementId,
    pub(crate) position: i64,
    pub(crate) is_enumeration: bool,
    pub(crate) is_interface: bool,
    pub(crate) is_abstract: bool,
    pub(crate) is_persistent: bool,
    pub(crate) is_leaf: bool,
    pub(crate) is_root_marker: bool,
    pub(crate) is_association_class: bool,

    pub(crate) attributes: Vec<AttributeBuilder>,
    pub(crate) operations: Vec<OperationBuilder>,
    pub(crate) constraints: Vec<ConstraintBuilder>,
    pub(crate) diagrams: Vec<DiagramBuilder>,
    pub(crate) skipped: Vec<SkippedItem>,

    pub(crate) superclasses: Vec<ElementId>,
    pub(crate) subclasses: Vec<ElementId>,
    pub(crate) self_inherited_hits: usize,
    pub(crate) self_dependent_hits: usize,
    pub(crate) self_association_hits: usize,

    /// Classes this class points at as an association source; used for the
    /// symmetric-coupling validation in the link pass.
    pub(crate) association_targets: BTreeSet<ElementId>,
    /// Classes pointing at this class as an association source.
    pub(crate) association_sources: BTreeSet<ElementId>,

    pub(crate) uses: BTreeSet<ElementId>,
    pub(crate) used_by: BTreeSet<ElementId>,

    built: Option<ElementId>,
    features_built: bool,
}

impl ClassBuilder {
    pub fn from_row(row: &RawRow, owner_package: ElementId) -> Result<Self, BuildError> {
        let object_type = row.text(fields::element::OBJECT_TYPE);
        Ok(Self {
            identity: entity_identity(Table::Element, row)?,
            owner_package,
            position: row.position().unwrap_or(0),
            is_enumeration: object_type.eq_ignore_ascii_case("Enumeration"),
            is_interface: object_type.eq_ignore_ascii_case("Interface"),
            is_abstract: row.flag(fields::element::IS_ABSTRACT),
            is_persistent: row.flag(fields::element::IS_PERSISTENT),
            is_leaf: row.flag(fields::element::IS_LEAF),
            is_root_marker: row.flag(fields::element::IS_ROOT),
            is_association_class: row.flag(fields::element::IS_ASSOCIATION_CLASS),
            attributes: Vec::new(),
            operations: Vec::new(),
            constraints: Vec::new(),
            diagrams: Vec::new(),
            skipped: Vec::new(),
            superclasses: Vec::new(),
            subclasses: Vec::new(),
            self_inherited_hits: 0,
            self_dependent_hits: 0,
            self_association_hits: 0,
            association_targets: BTreeSet::new(),
            association_sources: BTreeSet::new(),
            uses: BTreeSet::new(),
            used_by: BTreeSet::new(),
            built: None,
            features_built: false,
        })
    }

    pub fn id(&self) -> ElementId {
        self.identity.id.expect("class identity carries an id")
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn position(&self) -> Option<i64> {
        Some(self.position)
    }

    /// Whether this class is an inheritance build root.
    pub fn is_inheritance_root(&self) -> bool {
        self.superclasses.is_empty()
    }

    /// Record a superclass edge discovered by the connector scan; a
    /// connector seen again does not duplicate the edge.
    pub fn add_superclass(&mut self, superclass: ElementId) {
        if !self.superclasses.contains(&superclass) {
            self.superclasses.push(superclass);
        }
    }

    /// Record a subclass edge discovered by the connector scan.
    pub fn add_subclass(&mut self, subclass: ElementId) {
        if !self.subclasses.contains(&subclass) {
            self.subclasses.push(subclass);
        }
    }

    /// Materialize the class itself, its skipped items, and - eagerly -
    /// its enumeration literals, which carry no external type reference.
    ///
    /// Memoized; every superclass must already be in the arena.
    pub fn build(&mut self, model: &mut Model) -> Result<ElementId, BuildError> {
        if let Some(key) = self.built {
            return Ok(key);
        }
        let key = model.append_class(
            self.owner_package,
            self.identity.clone(),
            ClassData {
                position: self.position,
                is_enumeration: self.is_enumeration,
                is_abstract: self.is_abstract,
                is_persistent: self.is_persistent,
                is_leaf: self.is_leaf,
                is_root_marker: self.is_root_marker,
                is_interface: self.is_interface,
                is_association_class: self.is_association_class,
                self_inherited: self.self_inherited_hits > 0,
                self_dependent: self.self_dependent_hits > 0,
                uses: self.uses.clone(),
                used_by: self.used_by.clone(),
            },
            self.superclasses.clone(),
        )?;
        for item in &self.skipped {
            model.append_skipped(key, item.clone())?;
        }
        if self.is_enumeration {
            for attribute in &mut self.attributes {
                attribute.build(key, model)?;
            }
        }
        self.built = Some(key);
        Ok(key)
    }

    /// Materialize attributes, operations and class constraints. Runs only
    /// after every class in every package is in the arena, so cross-package
    /// type references resolve. Memoized.
    pub fn build_features(&mut self, model: &mut Model) -> Result<(), BuildError> {
        if self.features_built {
            return Ok(());
        }
        let key = self.built.expect("class is built before its features");
        for attribute in &mut self.attributes {
            // Enumeration literals already went out with the class.
            attribute.build(key, model)?;
        }
        for operation in &mut self.operations {
            operation.build(key, model)?;
        }
        for constraint in &self.constraints {
            model.append_constraint(ConstraintOwner::Class(key), constraint.to_constraint())?;
        }
        self.features_built = true;
        Ok(())
    }

    pub fn built_key(&self) -> Option<ElementId> {
        self.built
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armature_core::{identifier::Guid, package::PackageData};

    fn class_row(id: i64, name: &str, object_type: &str) -> RawRow {
        let id = id.to_string();
        let mut row = RawRow::new();
        row.set("id", id);
        row.set("guid", format!("{{{name}}}"));
        row.set("name", name);
        row.set("object_type", object_type);
        row
    }

    fn model_with_package() -> (Model, ElementId) {
        let mut model = Model::new();
        let root = model
            .append_package(
                None,
                Identity::new(None, Guid::synthetic("model-root"), "Model"),
                PackageData::default(),
            )
            .unwrap();
        let pkg = model
            .append_package(
                Some(root),
                Identity::new(Some(ElementId(10)), Guid::new("{P}"), "domain"),
                PackageData::default(),
            )
            .unwrap();
        (model, pkg)
    }

    #[test]
    fn build_is_memoized_and_returns_the_same_key() {
        let (mut model, pkg) = model_with_package();
        let mut builder = ClassBuilder::from_row(&class_row(20, "Account", "Class"), pkg).unwrap();

        let first = builder.build(&mut model).unwrap();
        let second = builder.build(&mut model).unwrap();

        assert_eq!(first, second);
        assert_eq!(model.class_count(), 1);
    }

    #[test]
    fn self_counters_become_flags() {
        let (mut model, pkg) = model_with_package();
        let mut builder = ClassBuilder::from_row(&class_row(20, "Node", "Class"), pkg).unwrap();
        builder.self_inherited_hits = 1;
        builder.self_dependent_hits = 2;

        let key = builder.build(&mut model).unwrap();
        let class = model.class(key).unwrap();

        assert!(class.self_inherited());
        assert!(class.self_dependent());
        // Self-inheritance never lands in the superclass/subclass lists.
        assert!(class.superclasses().is_empty());
        assert!(class.subclasses().is_empty());
    }

    #[test]
    fn duplicate_superclass_edges_collapse() {
        let (_, pkg) = model_with_package();
        let mut builder = ClassBuilder::from_row(&class_row(20, "Sub", "Class"), pkg).unwrap();

        builder.add_superclass(ElementId(1));
        builder.add_superclass(ElementId(1));
        assert_eq!(builder.superclasses, vec![ElementId(1)]);
    }

    #[test]
    fn enumeration_literals_build_with_the_class() {
        let (mut model, pkg) = model_with_package();
        let mut builder =
            ClassBuilder::from_row(&class_row(21, "Color", "Enumeration"), pkg).unwrap();
        let literal_row = RawRow::from([("id", "30"), ("guid", "{RED}"), ("name", "RED")]);
        builder
            .attributes
            .push(AttributeBuilder::from_row(&literal_row, true).unwrap());

        let key = builder.build(&mut model).unwrap();
        let class = model.class(key).unwrap();

        assert!(class.is_enumeration());
        assert_eq!(class.attributes().len(), 1);
        assert!(class.attributes()[0].is_literal());
    }
}
