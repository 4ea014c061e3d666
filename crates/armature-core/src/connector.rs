//! Associations and dependencies between model entities.

use crate::{
    identifier::{ConnectorId, ElementId},
    identity::Identity,
    typeref::Multiplicity,
};

/// Direction of an association as declared in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Directed,
    BiDirectional,
    #[default]
    Unspecified,
}

impl Direction {
    pub fn from_source(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "source -> destination" | "directed" => Self::Directed,
            "bi-directional" | "bidirectional" => Self::BiDirectional,
            _ => Self::Unspecified,
        }
    }
}

/// Navigability of one association end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Navigability {
    Yes,
    No,
    #[default]
    Unspecified,
}

impl Navigability {
    /// Parse a navigability string, typically one of the deduced fields the
    /// repository extracts from encoded style text.
    pub fn from_source(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "navigable" | "yes" | "true" => Self::Yes,
            "non-navigable" | "no" | "false" => Self::No,
            _ => Self::Unspecified,
        }
    }
}

/// The structural kind of one association end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationEndKind {
    Association,
    Aggregation,
    Composition,
    Other,
}

impl AssociationEndKind {
    /// Parse the per-end aggregation marker from the connector row.
    pub fn from_source(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Self::Association,
            "shared" => Self::Aggregation,
            "composite" => Self::Composition,
            _ => Self::Other,
        }
    }
}

/// One resolved end of an association.
#[derive(Debug, Clone)]
pub struct AssociationEnd {
    class: ElementId,
    kind: AssociationEndKind,
    multiplicity: Multiplicity,
    navigability: Navigability,
}

impl AssociationEnd {
    /// Create a resolved end. A composition end whose multiplicity the
    /// source left blank defaults to `0..1`; any other blank multiplicity
    /// stays at the source's effective `1`.
    pub fn new(
        class: ElementId,
        kind: AssociationEndKind,
        multiplicity: Option<Multiplicity>,
        navigability: Navigability,
    ) -> Self {
        let multiplicity = multiplicity.unwrap_or(match kind {
            AssociationEndKind::Composition => Multiplicity::optional_one(),
            _ => Multiplicity::parse("1").unwrap_or(Multiplicity::optional_one()),
        });
        Self {
            class,
            kind,
            multiplicity,
            navigability,
        }
    }

    pub fn class(&self) -> ElementId {
        self.class
    }

    pub fn kind(&self) -> AssociationEndKind {
        self.kind
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    pub fn navigability(&self) -> Navigability {
        self.navigability
    }
}

/// An association between two classes, with both ends resolved.
#[derive(Debug, Clone)]
pub struct Association {
    id: ConnectorId,
    identity: Identity,
    direction: Direction,
    source: AssociationEnd,
    target: AssociationEnd,
}

impl Association {
    pub fn new(
        id: ConnectorId,
        identity: Identity,
        direction: Direction,
        source: AssociationEnd,
        target: AssociationEnd,
    ) -> Self {
        Self {
            id,
            identity,
            direction,
            source,
            target,
        }
    }

    pub fn id(&self) -> ConnectorId {
        self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn source(&self) -> &AssociationEnd {
        &self.source
    }

    pub fn target(&self) -> &AssociationEnd {
        &self.target
    }

    /// Whether both ends land on the same class.
    pub fn is_self_edge(&self) -> bool {
        self.source.class == self.target.class
    }
}

/// Resolved endpoints of a dependency.
///
/// The kind is decided by which source fields were populated; the two kinds
/// never mix endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyEnds {
    Classes { source: ElementId, target: ElementId },
    Packages { source: ElementId, target: ElementId },
}

impl DependencyEnds {
    pub fn source(&self) -> ElementId {
        match self {
            DependencyEnds::Classes { source, .. } | DependencyEnds::Packages { source, .. } => {
                *source
            }
        }
    }

    pub fn target(&self) -> ElementId {
        match self {
            DependencyEnds::Classes { target, .. } | DependencyEnds::Packages { target, .. } => {
                *target
            }
        }
    }
}

/// A dependency between two classes or two packages.
#[derive(Debug, Clone)]
pub struct Dependency {
    id: ConnectorId,
    identity: Identity,
    ends: DependencyEnds,
}

impl Dependency {
    pub fn new(id: ConnectorId, identity: Identity, ends: DependencyEnds) -> Self {
        Self { id, identity, ends }
    }

    pub fn id(&self) -> ConnectorId {
        self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn ends(&self) -> DependencyEnds {
        self.ends
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_source_strings() {
        assert_eq!(
            Direction::from_source("Source -> Destination"),
            Direction::Directed
        );
        assert_eq!(
            Direction::from_source("Bi-Directional"),
            Direction::BiDirectional
        );
        assert_eq!(Direction::from_source(""), Direction::Unspecified);
        assert_eq!(Direction::from_source("Unspecified"), Direction::Unspecified);
    }

    #[test]
    fn blank_composition_multiplicity_defaults_to_optional_one() {
        let end = AssociationEnd::new(
            ElementId(5),
            AssociationEndKind::Composition,
            None,
            Navigability::Unspecified,
        );
        assert_eq!(end.multiplicity(), Multiplicity::optional_one());
    }

    #[test]
    fn explicit_multiplicity_wins_over_default() {
        let end = AssociationEnd::new(
            ElementId(5),
            AssociationEndKind::Composition,
            Multiplicity::parse("1..*"),
            Navigability::Yes,
        );
        assert_eq!(end.multiplicity().to_string(), "1..*");
    }

    #[test]
    fn end_kind_parses_aggregation_markers() {
        assert_eq!(
            AssociationEndKind::from_source("none"),
            AssociationEndKind::Association
        );
        assert_eq!(
            AssociationEndKind::from_source("shared"),
            AssociationEndKind::Aggregation
        );
        assert_eq!(
            AssociationEndKind::from_source("composite"),
            AssociationEndKind::Composition
        );
        assert_eq!(
            AssociationEndKind::from_source("weird"),
            AssociationEndKind::Other
        );
    }
}
