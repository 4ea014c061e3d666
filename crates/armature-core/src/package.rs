//! The package entity: a recursive tree of packages and classes.

use crate::{
    diagram::Diagram,
    identifier::{ConnectorId, ElementId},
    identity::Identity,
};

/// Where a package sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// The synthetic model root.
    Root,
    /// A direct child of the root.
    Top,
    /// Anything deeper.
    Nested,
}

/// Package payload beyond identity.
#[derive(Debug, Clone, Default)]
pub struct PackageData {
    pub position: i64,
    /// The element row backing this package, used to resolve connector
    /// endpoints that reference the package as an element.
    pub element_id: Option<ElementId>,
    pub self_dependent: bool,
}

/// A package in the resolved model.
///
/// Children are kept as ordered arena keys; classes and child packages are
/// registered by the arena as they materialize, container first.
#[derive(Debug, Clone)]
pub struct Package {
    identity: Identity,
    kind: PackageKind,
    depth: i32,
    data: PackageData,
    packages: Vec<ElementId>,
    classes: Vec<ElementId>,
    diagrams: Vec<Diagram>,
    dependencies_as_source: Vec<ConnectorId>,
    dependencies_as_target: Vec<ConnectorId>,
}

impl Package {
    pub fn new(identity: Identity, kind: PackageKind, depth: i32, data: PackageData) -> Self {
        Self {
            identity,
            kind,
            depth,
            data,
            packages: Vec::new(),
            classes: Vec::new(),
            diagrams: Vec::new(),
            dependencies_as_source: Vec::new(),
            dependencies_as_target: Vec::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn kind(&self) -> PackageKind {
        self.kind
    }

    /// Tree depth: the root is -1, top packages are 0, and each nesting
    /// level adds one.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn position(&self) -> i64 {
        self.data.position
    }

    pub fn element_id(&self) -> Option<ElementId> {
        self.data.element_id
    }

    pub fn self_dependent(&self) -> bool {
        self.data.self_dependent
    }

    /// Ordered child packages.
    pub fn packages(&self) -> &[ElementId] {
        &self.packages
    }

    /// Ordered classes directly inside this package.
    pub fn classes(&self) -> &[ElementId] {
        &self.classes
    }

    pub fn diagrams(&self) -> &[Diagram] {
        &self.diagrams
    }

    pub fn dependencies_as_source(&self) -> &[ConnectorId] {
        &self.dependencies_as_source
    }

    pub fn dependencies_as_target(&self) -> &[ConnectorId] {
        &self.dependencies_as_target
    }

    pub(crate) fn push_package(&mut self, id: ElementId) {
        self.packages.push(id);
    }

    pub(crate) fn push_class(&mut self, id: ElementId) {
        self.classes.push(id);
    }

    pub(crate) fn push_diagram(&mut self, diagram: Diagram) {
        self.diagrams.push(diagram);
    }

    pub(crate) fn push_dependency_as_source(&mut self, id: ConnectorId) {
        self.dependencies_as_source.push(id);
    }

    pub(crate) fn push_dependency_as_target(&mut self, id: ConnectorId) {
        self.dependencies_as_target.push(id);
    }
}
