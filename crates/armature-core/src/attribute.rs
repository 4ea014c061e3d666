//! Class attributes and their tagged values.

use crate::{constraint::Constraint, identity::Identity, typeref::{Multiplicity, TypeRef}};

/// A name/value pair attached to an attribute row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedValue {
    pub name: String,
    pub value: String,
}

/// Whether an attribute is a typed member or an enumeration literal.
///
/// Exactly one of the two holds: a literal has no type at all (it *is* a
/// value of its owning enumeration), and a typed attribute always carries a
/// resolved reference or the attribute-type sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Literal,
    Typed(TypeRef),
}

/// Payload of an attribute beyond identity and type.
#[derive(Debug, Clone, Default)]
pub struct AttributeData {
    pub position: i64,
    pub is_const: bool,
    pub is_static: bool,
    pub multiplicity: Option<Multiplicity>,
    pub initial_value: Option<String>,
    /// The type name as the source spelled it, kept for display even when
    /// the reference resolved to a sentinel.
    pub type_name: Option<String>,
    pub tagged_values: Vec<TaggedValue>,
}

/// A class attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    identity: Identity,
    kind: AttributeKind,
    data: AttributeData,
    constraints: Vec<Constraint>,
}

impl Attribute {
    pub fn new(identity: Identity, kind: AttributeKind, data: AttributeData) -> Self {
        Self {
            identity,
            kind,
            data,
            constraints: Vec::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Whether this attribute is an enumeration literal.
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, AttributeKind::Literal)
    }

    /// The resolved type reference; `None` only for literals.
    pub fn type_ref(&self) -> Option<TypeRef> {
        match self.kind {
            AttributeKind::Literal => None,
            AttributeKind::Typed(t) => Some(t),
        }
    }

    pub fn position(&self) -> i64 {
        self.data.position
    }

    pub fn is_const(&self) -> bool {
        self.data.is_const
    }

    pub fn is_static(&self) -> bool {
        self.data.is_static
    }

    pub fn multiplicity(&self) -> Option<Multiplicity> {
        self.data.multiplicity
    }

    pub fn initial_value(&self) -> Option<&str> {
        self.data.initial_value.as_deref()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.data.type_name.as_deref()
    }

    pub fn tagged_values(&self) -> &[TaggedValue] {
        &self.data.tagged_values
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub(crate) fn push_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }
}
