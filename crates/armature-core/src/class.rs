//! The class entity: features, graph edges and coupling sets.

use std::collections::BTreeSet;

use crate::{
    attribute::Attribute,
    constraint::Constraint,
    diagram::Diagram,
    identifier::{ConnectorId, ElementId},
    identity::Identity,
    operation::Operation,
    skipped::SkippedItem,
};

/// Class payload beyond identity: positional data, the source-domain flags,
/// the self-reference flags derived while scanning connectors, and the
/// coupling sets computed by the link pass.
///
/// The self flags and coupling sets are passed in here exactly as the
/// builder derived them; the model never re-derives them from the graph.
#[derive(Debug, Clone, Default)]
pub struct ClassData {
    pub position: i64,
    pub is_enumeration: bool,
    pub is_abstract: bool,
    pub is_persistent: bool,
    pub is_leaf: bool,
    pub is_root_marker: bool,
    pub is_interface: bool,
    pub is_association_class: bool,
    pub self_inherited: bool,
    pub self_dependent: bool,
    /// Classes whose types this class's attributes and operations use.
    pub uses: BTreeSet<ElementId>,
    /// Classes that use this class in their attributes or operations.
    pub used_by: BTreeSet<ElementId>,
}

/// A fully resolved class.
///
/// Features (attributes, operations, constraints, diagrams) and connector
/// bucket entries are appended one call at a time during materialization,
/// always after the class itself exists in the arena.
#[derive(Debug, Clone)]
pub struct Class {
    identity: Identity,
    data: ClassData,
    superclasses: Vec<ElementId>,
    subclasses: Vec<ElementId>,
    attributes: Vec<Attribute>,
    operations: Vec<Operation>,
    constraints: Vec<Constraint>,
    diagrams: Vec<Diagram>,
    skipped: Vec<SkippedItem>,
    associations_as_source: Vec<ConnectorId>,
    associations_as_target: Vec<ConnectorId>,
    associations_as_source_and_target: Vec<ConnectorId>,
    dependencies_as_source: Vec<ConnectorId>,
    dependencies_as_target: Vec<ConnectorId>,
}

impl Class {
    pub fn new(identity: Identity, data: ClassData, superclasses: Vec<ElementId>) -> Self {
        Self {
            identity,
            data,
            superclasses,
            subclasses: Vec::new(),
            attributes: Vec::new(),
            operations: Vec::new(),
            constraints: Vec::new(),
            diagrams: Vec::new(),
            skipped: Vec::new(),
            associations_as_source: Vec::new(),
            associations_as_target: Vec::new(),
            associations_as_source_and_target: Vec::new(),
            dependencies_as_source: Vec::new(),
            dependencies_as_target: Vec::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn position(&self) -> i64 {
        self.data.position
    }

    pub fn is_enumeration(&self) -> bool {
        self.data.is_enumeration
    }

    pub fn is_abstract(&self) -> bool {
        self.data.is_abstract
    }

    pub fn is_persistent(&self) -> bool {
        self.data.is_persistent
    }

    pub fn is_leaf(&self) -> bool {
        self.data.is_leaf
    }

    pub fn is_root_marker(&self) -> bool {
        self.data.is_root_marker
    }

    pub fn is_interface(&self) -> bool {
        self.data.is_interface
    }

    pub fn is_association_class(&self) -> bool {
        self.data.is_association_class
    }

    pub fn self_inherited(&self) -> bool {
        self.data.self_inherited
    }

    pub fn self_dependent(&self) -> bool {
        self.data.self_dependent
    }

    pub fn superclasses(&self) -> &[ElementId] {
        &self.superclasses
    }

    pub fn subclasses(&self) -> &[ElementId] {
        &self.subclasses
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn diagrams(&self) -> &[Diagram] {
        &self.diagrams
    }

    pub fn skipped(&self) -> &[SkippedItem] {
        &self.skipped
    }

    pub fn associations_as_source(&self) -> &[ConnectorId] {
        &self.associations_as_source
    }

    pub fn associations_as_target(&self) -> &[ConnectorId] {
        &self.associations_as_target
    }

    pub fn associations_as_source_and_target(&self) -> &[ConnectorId] {
        &self.associations_as_source_and_target
    }

    pub fn dependencies_as_source(&self) -> &[ConnectorId] {
        &self.dependencies_as_source
    }

    pub fn dependencies_as_target(&self) -> &[ConnectorId] {
        &self.dependencies_as_target
    }

    /// Classes this class's features use.
    pub fn uses(&self) -> &BTreeSet<ElementId> {
        &self.data.uses
    }

    /// Classes whose features use this class.
    pub fn used_by(&self) -> &BTreeSet<ElementId> {
        &self.data.used_by
    }

    pub(crate) fn push_subclass(&mut self, id: ElementId) {
        self.subclasses.push(id);
    }

    pub(crate) fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub(crate) fn push_operation(&mut self, operation: Operation) -> usize {
        self.operations.push(operation);
        self.operations.len() - 1
    }

    pub(crate) fn operation_mut(&mut self, index: usize) -> Option<&mut Operation> {
        self.operations.get_mut(index)
    }

    pub(crate) fn attribute_mut(&mut self, index: usize) -> Option<&mut Attribute> {
        self.attributes.get_mut(index)
    }

    pub(crate) fn push_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub(crate) fn push_diagram(&mut self, diagram: Diagram) {
        self.diagrams.push(diagram);
    }

    pub(crate) fn push_skipped(&mut self, item: SkippedItem) {
        self.skipped.push(item);
    }

    pub(crate) fn push_association_as_source(&mut self, id: ConnectorId) {
        self.associations_as_source.push(id);
    }

    pub(crate) fn push_association_as_target(&mut self, id: ConnectorId) {
        self.associations_as_target.push(id);
    }

    pub(crate) fn push_association_as_source_and_target(&mut self, id: ConnectorId) {
        self.associations_as_source_and_target.push(id);
    }

    pub(crate) fn push_dependency_as_source(&mut self, id: ConnectorId) {
        self.dependencies_as_source.push(id);
    }

    pub(crate) fn push_dependency_as_target(&mut self, id: ConnectorId) {
        self.dependencies_as_target.push(id);
    }
}
