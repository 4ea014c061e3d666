//! Association builders: the half-open edge state machine.
//!
//! A connector between two classes is discovered twice, once from each
//! endpoint's connector scan, and neither scan knows whether the other has
//! run yet. The builder models this explicitly: it is created half-open by
//! whichever side scans first, and the single idempotent `complete_*`
//! transition fills the other end when (and only when) its owner runs.

use armature_core::{
    connector::{AssociationEnd, AssociationEndKind, Direction, Navigability},
    identifier::{ConnectorId, ElementId},
    identity::Identity,
    model::Model,
    typeref::Multiplicity,
};

use crate::{
    builders::connector_identity,
    error::BuildError,
    row::{RawRow, fields},
};

/// Resolution state of a two-ended edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeState {
    /// Only the source end is resolved.
    HalfOpenSource,
    /// Only the target end is resolved.
    HalfOpenTarget,
    /// Both ends are resolved.
    Complete,
}

/// One end of an association being staged: static row data plus the
/// incrementally resolved end class.
#[derive(Debug, Clone)]
pub struct AssociationEndBuilder {
    pub(crate) class: Option<ElementId>,
    pub(crate) kind: AssociationEndKind,
    pub(crate) multiplicity: Option<Multiplicity>,
    pub(crate) navigability: Navigability,
}

impl AssociationEndBuilder {
    fn from_row(row: &RawRow, aggregation: &str, multiplicity: &str, navigability: &str) -> Self {
        Self {
            class: None,
            kind: AssociationEndKind::from_source(row.text(aggregation)),
            multiplicity: Multiplicity::parse(row.text(multiplicity)),
            navigability: Navigability::from_source(row.text(navigability)),
        }
    }

    /// Convert to the resolved domain end; the blank-composition
    /// multiplicity default applies here.
    fn to_end(&self, id: ConnectorId, which: &'static str) -> Result<AssociationEnd, BuildError> {
        let class = self
            .class
            .ok_or(BuildError::HalfOpenAssociation { id, end: which })?;
        Ok(AssociationEnd::new(
            class,
            self.kind,
            self.multiplicity,
            self.navigability,
        ))
    }
}

/// Stages one association between two classes.
#[derive(Debug, Clone)]
pub struct AssociationBuilder {
    pub(crate) id: ConnectorId,
    pub(crate) identity: Identity,
    pub(crate) direction: Direction,
    pub(crate) source: AssociationEndBuilder,
    pub(crate) target: AssociationEndBuilder,
    built: bool,
}

impl AssociationBuilder {
    pub fn from_row(id: ConnectorId, row: &RawRow) -> Result<Self, BuildError> {
        Ok(Self {
            id,
            identity: connector_identity(row)?,
            direction: Direction::from_source(row.text(fields::connector::DIRECTION)),
            source: AssociationEndBuilder::from_row(
                row,
                fields::connector::SOURCE_AGGREGATION,
                fields::connector::SOURCE_MULTIPLICITY,
                fields::connector::SOURCE_NAVIGABILITY,
            ),
            target: AssociationEndBuilder::from_row(
                row,
                fields::connector::TARGET_AGGREGATION,
                fields::connector::TARGET_MULTIPLICITY,
                fields::connector::TARGET_NAVIGABILITY,
            ),
            built: false,
        })
    }

    /// Resolve the source end. Idempotent: a second call with any class is
    /// a no-op, so the two endpoint scans can run in either order.
    pub fn complete_source(&mut self, class: ElementId) {
        if self.source.class.is_none() {
            self.source.class = Some(class);
        }
    }

    /// Resolve the target end; same idempotent contract as
    /// [`Self::complete_source`].
    pub fn complete_target(&mut self, class: ElementId) {
        if self.target.class.is_none() {
            self.target.class = Some(class);
        }
    }

    pub fn state(&self) -> EdgeState {
        match (self.source.class, self.target.class) {
            (Some(_), Some(_)) => EdgeState::Complete,
            (Some(_), None) => EdgeState::HalfOpenSource,
            (None, Some(_)) => EdgeState::HalfOpenTarget,
            (None, None) => {
                unreachable!("an association is created with at least one resolved end")
            }
        }
    }

    pub fn source_class(&self) -> Option<ElementId> {
        self.source.class
    }

    pub fn target_class(&self) -> Option<ElementId> {
        self.target.class
    }

    /// Materialize the association into the arena.
    pub fn build(&mut self, model: &mut Model) -> Result<(), BuildError> {
        if self.built {
            return Ok(());
        }
        let source = self.source.to_end(self.id, "source")?;
        let target = self.target.to_end(self.id, "target")?;
        model.append_association(self.id, self.identity.clone(), self.direction, source, target)?;
        self.built = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assoc_row() -> RawRow {
        RawRow::from([
            ("id", "100"),
            ("guid", "{ASSOC}"),
            ("name", "owns"),
            ("connector_type", "Association"),
            ("direction", "Source -> Destination"),
            ("source_id", "1"),
            ("target_id", "2"),
            ("target_aggregation", "composite"),
            ("source_multiplicity", "1"),
            ("deduced_target_navigability", "navigable"),
        ])
    }

    #[test]
    fn completion_is_incremental_and_idempotent() {
        let mut builder = AssociationBuilder::from_row(ConnectorId(100), &assoc_row()).unwrap();

        builder.complete_source(ElementId(1));
        assert_eq!(builder.state(), EdgeState::HalfOpenSource);

        // The same side completing again changes nothing.
        builder.complete_source(ElementId(99));
        assert_eq!(builder.source_class(), Some(ElementId(1)));

        builder.complete_target(ElementId(2));
        assert_eq!(builder.state(), EdgeState::Complete);
    }

    #[test]
    fn half_open_build_is_fatal() {
        let mut builder = AssociationBuilder::from_row(ConnectorId(100), &assoc_row()).unwrap();
        builder.complete_source(ElementId(1));

        let mut model = Model::new();
        let err = builder.build(&mut model);
        assert!(matches!(
            err,
            Err(BuildError::HalfOpenAssociation { end: "target", .. })
        ));
    }

    #[test]
    fn end_data_comes_from_the_row() {
        let builder = AssociationBuilder::from_row(ConnectorId(100), &assoc_row()).unwrap();

        assert_eq!(builder.direction, Direction::Directed);
        assert_eq!(builder.source.kind, AssociationEndKind::Association);
        assert_eq!(builder.target.kind, AssociationEndKind::Composition);
        assert_eq!(builder.source.multiplicity, Multiplicity::parse("1"));
        // Blank composition multiplicity: default applies at end
        // construction, not here.
        assert_eq!(builder.target.multiplicity, None);
        assert_eq!(builder.target.navigability, Navigability::Yes);
    }
}
