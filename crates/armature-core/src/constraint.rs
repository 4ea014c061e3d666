//! Constraints attached to classes and attributes.

/// What a constraint applies to and the payload it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A class-level constraint: the attribute names it affects plus the
    /// free-text condition. The split happens at build time; the model only
    /// stores the result.
    Class {
        affected: Vec<String>,
        condition: String,
    },
    /// An attribute-level min/max constraint, kept as source text.
    AttrMinMax { text: String },
}

/// A named constraint owned by exactly one class or attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    name: String,
    kind: ConstraintKind,
}

impl Constraint {
    pub fn new(name: impl Into<String>, kind: ConstraintKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// The attribute names a class-level constraint affects; empty for
    /// attribute-level constraints.
    pub fn affected(&self) -> &[String] {
        match &self.kind {
            ConstraintKind::Class { affected, .. } => affected,
            ConstraintKind::AttrMinMax { .. } => &[],
        }
    }
}
