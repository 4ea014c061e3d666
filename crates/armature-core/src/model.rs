//! The arena-backed resolved model and its append surface.
//!
//! `Model` owns every materialized entity in id-keyed, insertion-ordered
//! maps. Cross-entity relationships are arena keys, never references, so the
//! model is freely clonable and safe to hand to any consumer. Each
//! `append_*` call registers one entity with its container and fails if the
//! container does not exist yet; the materialize pass fixes the call order
//! so that it never does on a structurally sound build.

use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    attribute::{Attribute, AttributeData, AttributeKind},
    class::{Class, ClassData},
    connector::{Association, AssociationEnd, Dependency, DependencyEnds, Direction},
    constraint::Constraint,
    diagram::Diagram,
    identifier::{ConnectorId, ElementId},
    identity::Identity,
    operation::{ExceptionRef, Operation, OperationData, Parameter, ParameterData},
    package::{Package, PackageData, PackageKind},
    typeref::{ReturnType, TypeRef},
};

/// Errors raised by the model's append surface.
///
/// Every variant is an orchestration defect: the materialize pass appended
/// an entity before its container, referenced a class that never built, or
/// violated a structural invariant. The builder treats them all as fatal.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model root package already exists")]
    RootAlreadyExists,

    #[error("model root package does not exist yet")]
    RootMissing,

    #[error("package {0} is not in the model")]
    MissingPackage(ElementId),

    #[error("class {0} is not in the model")]
    MissingClass(ElementId),

    #[error("class {class} has no operation at index {index}")]
    MissingOperation { class: ElementId, index: usize },

    #[error("class {class} has no attribute at index {index}")]
    MissingAttribute { class: ElementId, index: usize },

    #[error("superclass {superclass} of class {class} is not built yet")]
    MissingSuperclass {
        class: ElementId,
        superclass: ElementId,
    },

    #[error("{kind} row has no id and cannot be keyed")]
    MissingEntityId { kind: &'static str },

    #[error("{kind} {id} is already in the model")]
    DuplicateKey { kind: &'static str, id: ElementId },

    #[error("connector {0} is already in the model")]
    DuplicateConnector(ConnectorId),

    #[error("literal attribute on non-enumeration class {0}")]
    LiteralOutsideEnumeration(ElementId),

    #[error("typed attribute on enumeration class {0}")]
    TypedLiteral(ElementId),
}

/// Addresses one operation inside a class, for parameter/exception appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationKey {
    pub class: ElementId,
    pub index: usize,
}

/// The container a constraint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOwner {
    Class(ElementId),
    Attribute { class: ElementId, index: usize },
}

/// The container a diagram belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramOwner {
    Package(ElementId),
    Class(ElementId),
}

/// The immutable resolved model.
#[derive(Debug, Clone, Default)]
pub struct Model {
    packages: IndexMap<ElementId, Package>,
    classes: IndexMap<ElementId, Class>,
    associations: IndexMap<ConnectorId, Association>,
    dependencies: IndexMap<ConnectorId, Dependency>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package with its parent.
    ///
    /// `parent == None` creates the synthetic root (exactly once, keyed
    /// [`ElementId::MODEL_ROOT`]); every other package must name an existing
    /// parent and carries its own row id. Kind and depth derive from the
    /// parent: children of the root are top packages at depth 0, everything
    /// deeper is nested at `parent.depth + 1`.
    pub fn append_package(
        &mut self,
        parent: Option<ElementId>,
        identity: Identity,
        data: PackageData,
    ) -> Result<ElementId, ModelError> {
        match parent {
            None => {
                if self.packages.contains_key(&ElementId::MODEL_ROOT) {
                    return Err(ModelError::RootAlreadyExists);
                }
                let package = Package::new(identity, PackageKind::Root, -1, data);
                self.packages.insert(ElementId::MODEL_ROOT, package);
                Ok(ElementId::MODEL_ROOT)
            }
            Some(parent_id) => {
                let key = identity
                    .id
                    .ok_or(ModelError::MissingEntityId { kind: "package" })?;
                if self.packages.contains_key(&key) {
                    return Err(ModelError::DuplicateKey {
                        kind: "package",
                        id: key,
                    });
                }
                let (kind, depth) = {
                    let parent = self
                        .packages
                        .get(&parent_id)
                        .ok_or(ModelError::MissingPackage(parent_id))?;
                    let kind = if parent_id == ElementId::MODEL_ROOT {
                        PackageKind::Top
                    } else {
                        PackageKind::Nested
                    };
                    (kind, parent.depth() + 1)
                };
                let package = Package::new(identity, kind, depth, data);
                self.packages.insert(key, package);
                self.packages
                    .get_mut(&parent_id)
                    .ok_or(ModelError::MissingPackage(parent_id))?
                    .push_package(key);
                Ok(key)
            }
        }
    }

    /// Register a class with its owning package.
    ///
    /// Every superclass key must already be present in the arena; the
    /// bottom-up materialization order guarantees this, and a violation
    /// means the inheritance walk is broken. The new class is also recorded
    /// in each superclass's subclass list.
    pub fn append_class(
        &mut self,
        owner: ElementId,
        identity: Identity,
        data: ClassData,
        superclasses: Vec<ElementId>,
    ) -> Result<ElementId, ModelError> {
        let key = identity
            .id
            .ok_or(ModelError::MissingEntityId { kind: "class" })?;
        if self.classes.contains_key(&key) {
            return Err(ModelError::DuplicateKey {
                kind: "class",
                id: key,
            });
        }
        if !self.packages.contains_key(&owner) {
            return Err(ModelError::MissingPackage(owner));
        }
        for superclass in &superclasses {
            if !self.classes.contains_key(superclass) {
                return Err(ModelError::MissingSuperclass {
                    class: key,
                    superclass: *superclass,
                });
            }
        }

        let class = Class::new(identity, data, superclasses.clone());
        self.classes.insert(key, class);
        for superclass in superclasses {
            if let Some(sup) = self.classes.get_mut(&superclass) {
                sup.push_subclass(key);
            }
        }
        self.packages
            .get_mut(&owner)
            .ok_or(ModelError::MissingPackage(owner))?
            .push_class(key);
        Ok(key)
    }

    /// Register an attribute with its already-built class.
    ///
    /// The literal/typed split must agree with the owner: enumerations take
    /// literals only, every other class takes typed attributes only.
    pub fn append_attribute(
        &mut self,
        class: ElementId,
        kind: AttributeKind,
        identity: Identity,
        data: AttributeData,
    ) -> Result<usize, ModelError> {
        let owner = self
            .classes
            .get_mut(&class)
            .ok_or(ModelError::MissingClass(class))?;
        match kind {
            AttributeKind::Literal if !owner.is_enumeration() => {
                return Err(ModelError::LiteralOutsideEnumeration(class));
            }
            AttributeKind::Typed(_) if owner.is_enumeration() => {
                return Err(ModelError::TypedLiteral(class));
            }
            _ => {}
        }
        owner.push_attribute(Attribute::new(identity, kind, data));
        Ok(owner.attributes().len() - 1)
    }

    /// Register an operation with its already-built class and return the key
    /// for subsequent parameter/exception appends.
    pub fn append_operation(
        &mut self,
        class: ElementId,
        return_type: ReturnType,
        identity: Identity,
        data: OperationData,
    ) -> Result<OperationKey, ModelError> {
        let owner = self
            .classes
            .get_mut(&class)
            .ok_or(ModelError::MissingClass(class))?;
        let index = owner.push_operation(Operation::new(identity, return_type, data));
        Ok(OperationKey { class, index })
    }

    /// Register a parameter with its operation, in declaration order.
    pub fn append_parameter(
        &mut self,
        operation: OperationKey,
        type_ref: TypeRef,
        identity: Identity,
        data: ParameterData,
    ) -> Result<(), ModelError> {
        let owner = self
            .classes
            .get_mut(&operation.class)
            .ok_or(ModelError::MissingClass(operation.class))?;
        owner
            .operation_mut(operation.index)
            .ok_or(ModelError::MissingOperation {
                class: operation.class,
                index: operation.index,
            })?
            .push_parameter(Parameter::new(identity, type_ref, data));
        Ok(())
    }

    /// Register a declared exception with its operation.
    pub fn append_exception(
        &mut self,
        operation: OperationKey,
        exception: ExceptionRef,
    ) -> Result<(), ModelError> {
        let owner = self
            .classes
            .get_mut(&operation.class)
            .ok_or(ModelError::MissingClass(operation.class))?;
        owner
            .operation_mut(operation.index)
            .ok_or(ModelError::MissingOperation {
                class: operation.class,
                index: operation.index,
            })?
            .push_exception(exception);
        Ok(())
    }

    /// Register an association and route it into the end classes' buckets.
    ///
    /// An association whose two ends land on the same class goes into that
    /// class's source-and-target bucket instead of the ordinary buckets.
    pub fn append_association(
        &mut self,
        id: ConnectorId,
        identity: Identity,
        direction: Direction,
        source: AssociationEnd,
        target: AssociationEnd,
    ) -> Result<(), ModelError> {
        if self.associations.contains_key(&id) {
            return Err(ModelError::DuplicateConnector(id));
        }
        let source_class = source.class();
        let target_class = target.class();
        if !self.classes.contains_key(&source_class) {
            return Err(ModelError::MissingClass(source_class));
        }
        if !self.classes.contains_key(&target_class) {
            return Err(ModelError::MissingClass(target_class));
        }

        self.associations
            .insert(id, Association::new(id, identity, direction, source, target));

        if source_class == target_class {
            if let Some(class) = self.classes.get_mut(&source_class) {
                class.push_association_as_source_and_target(id);
            }
        } else {
            if let Some(class) = self.classes.get_mut(&source_class) {
                class.push_association_as_source(id);
            }
            if let Some(class) = self.classes.get_mut(&target_class) {
                class.push_association_as_target(id);
            }
        }
        Ok(())
    }

    /// Register a dependency and route it into the endpoint buckets of its
    /// kind (class buckets or package buckets).
    pub fn append_dependency(
        &mut self,
        id: ConnectorId,
        identity: Identity,
        ends: DependencyEnds,
    ) -> Result<(), ModelError> {
        if self.dependencies.contains_key(&id) {
            return Err(ModelError::DuplicateConnector(id));
        }
        match ends {
            DependencyEnds::Classes { source, target } => {
                if !self.classes.contains_key(&source) {
                    return Err(ModelError::MissingClass(source));
                }
                if !self.classes.contains_key(&target) {
                    return Err(ModelError::MissingClass(target));
                }
                self.dependencies
                    .insert(id, Dependency::new(id, identity, ends));
                if let Some(class) = self.classes.get_mut(&source) {
                    class.push_dependency_as_source(id);
                }
                if let Some(class) = self.classes.get_mut(&target) {
                    class.push_dependency_as_target(id);
                }
            }
            DependencyEnds::Packages { source, target } => {
                if !self.packages.contains_key(&source) {
                    return Err(ModelError::MissingPackage(source));
                }
                if !self.packages.contains_key(&target) {
                    return Err(ModelError::MissingPackage(target));
                }
                self.dependencies
                    .insert(id, Dependency::new(id, identity, ends));
                if let Some(package) = self.packages.get_mut(&source) {
                    package.push_dependency_as_source(id);
                }
                if let Some(package) = self.packages.get_mut(&target) {
                    package.push_dependency_as_target(id);
                }
            }
        }
        Ok(())
    }

    /// Register a diagram with its container.
    pub fn append_diagram(&mut self, owner: DiagramOwner, diagram: Diagram) -> Result<(), ModelError> {
        match owner {
            DiagramOwner::Package(id) => self
                .packages
                .get_mut(&id)
                .ok_or(ModelError::MissingPackage(id))?
                .push_diagram(diagram),
            DiagramOwner::Class(id) => self
                .classes
                .get_mut(&id)
                .ok_or(ModelError::MissingClass(id))?
                .push_diagram(diagram),
        }
        Ok(())
    }

    /// Register a constraint with its class or attribute.
    pub fn append_constraint(
        &mut self,
        owner: ConstraintOwner,
        constraint: Constraint,
    ) -> Result<(), ModelError> {
        match owner {
            ConstraintOwner::Class(id) => self
                .classes
                .get_mut(&id)
                .ok_or(ModelError::MissingClass(id))?
                .push_constraint(constraint),
            ConstraintOwner::Attribute { class, index } => self
                .classes
                .get_mut(&class)
                .ok_or(ModelError::MissingClass(class))?
                .attribute_mut(index)
                .ok_or(ModelError::MissingAttribute { class, index })?
                .push_constraint(constraint),
        }
        Ok(())
    }

    /// Record a skipped item against the class that encountered it.
    pub fn append_skipped(
        &mut self,
        class: ElementId,
        item: crate::skipped::SkippedItem,
    ) -> Result<(), ModelError> {
        self.classes
            .get_mut(&class)
            .ok_or(ModelError::MissingClass(class))?
            .push_skipped(item);
        Ok(())
    }

    /// The synthetic root package.
    pub fn root(&self) -> Result<&Package, ModelError> {
        self.packages
            .get(&ElementId::MODEL_ROOT)
            .ok_or(ModelError::RootMissing)
    }

    pub fn package(&self, id: ElementId) -> Option<&Package> {
        self.packages.get(&id)
    }

    pub fn class(&self, id: ElementId) -> Option<&Class> {
        self.classes.get(&id)
    }

    pub fn association(&self, id: ConnectorId) -> Option<&Association> {
        self.associations.get(&id)
    }

    pub fn dependency(&self, id: ConnectorId) -> Option<&Dependency> {
        self.dependencies.get(&id)
    }

    pub fn packages(&self) -> impl Iterator<Item = (ElementId, &Package)> {
        self.packages.iter().map(|(id, p)| (*id, p))
    }

    pub fn classes(&self) -> impl Iterator<Item = (ElementId, &Class)> {
        self.classes.iter().map(|(id, c)| (*id, c))
    }

    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.associations.values()
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.values()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn association_count(&self) -> usize {
        self.associations.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }
}
