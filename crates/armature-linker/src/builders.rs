//! One transient, mutable builder per entity kind.
//!
//! A builder stages exactly one domain entity: pass 1 fills it with the
//! locally-known row data, pass 2 resolves its deferred references, pass 3
//! converts it exactly once into an arena entity. Every builder memoizes
//! its materialization, so a second `build` call returns the first result
//! without re-running side effects.
//!
//! - leaf builders: [`constraint`], [`parameter`], [`diagram`]
//! - mid builders: [`attribute`], [`operation`], [`association`],
//!   [`dependency`]
//! - aggregate builders: [`class`], [`package`]

pub mod association;
pub mod attribute;
pub mod class;
pub mod constraint;
pub mod dependency;
pub mod diagram;
pub mod operation;
pub mod package;
pub mod parameter;

use armature_core::{
    identifier::Guid,
    identity::{Identity, Notes, Visibility},
};
use indexmap::IndexSet;

use crate::{
    error::BuildError,
    repository::Table,
    row::{RawRow, fields},
};

/// Extract the common identity block from a first-class row.
///
/// Id and guid are structurally required; everything else degrades to its
/// default. The deduced fields merged in by the repository participate
/// here: a deduced alias backfills a blank alias, and a deduced stereotype
/// joins the declared stereotype set.
pub(crate) fn entity_identity(table: Table, row: &RawRow) -> Result<Identity, BuildError> {
    let id = row.element_id(fields::ID).ok_or(BuildError::MissingField {
        table,
        id: armature_core::identifier::ElementId(row.int(fields::ID).unwrap_or(0)),
        field: fields::ID,
    })?;
    let guid = row.trimmed(fields::GUID).ok_or(BuildError::MissingField {
        table,
        id,
        field: fields::GUID,
    })?;

    let mut identity = Identity::new(Some(id), Guid::new(guid), row.text(fields::NAME).trim());
    fill_optional_identity(&mut identity, row);
    Ok(identity)
}

/// Extract the identity block from a connector row.
///
/// Connectors are keyed by [`crate::row::RawRow::connector_id`] in their own
/// registry; their identity carries no element id.
pub(crate) fn connector_identity(row: &RawRow) -> Result<Identity, BuildError> {
    let guid = row.trimmed(fields::GUID).ok_or(BuildError::MissingField {
        table: Table::Connector,
        id: armature_core::identifier::ElementId(row.int(fields::ID).unwrap_or(0)),
        field: fields::GUID,
    })?;

    let mut identity = Identity::new(None, Guid::new(guid), row.text(fields::NAME).trim());
    fill_optional_identity(&mut identity, row);
    Ok(identity)
}

fn fill_optional_identity(identity: &mut Identity, row: &RawRow) {
    identity.alias = row
        .trimmed(fields::ALIAS)
        .or_else(|| row.trimmed(fields::DEDUCED_ALIAS))
        .map(str::to_string);

    let mut stereotypes: IndexSet<String> = row
        .text(fields::STEREOTYPE)
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(deduced) = row.trimmed(fields::DEDUCED_STEREOTYPE) {
        stereotypes.insert(deduced.to_string());
    }
    identity.stereotypes = stereotypes;

    identity.visibility = Visibility::from_source(row.text(fields::VISIBILITY));

    let raw = row.text(fields::NOTE).to_string();
    let markup = row
        .trimmed(fields::NOTE_MARKUP)
        .map(str::to_string)
        .unwrap_or_else(|| raw.clone());
    identity.notes = Notes::new(raw, markup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_requires_id_and_guid() {
        let row = RawRow::from([("id", "7"), ("name", "Account")]);
        let err = entity_identity(Table::Element, &row);
        assert!(matches!(err, Err(BuildError::MissingField { field: "guid", .. })));

        let row = RawRow::from([("guid", "{A}"), ("name", "Account")]);
        let err = entity_identity(Table::Element, &row);
        assert!(matches!(err, Err(BuildError::MissingField { field: "id", .. })));
    }

    #[test]
    fn deduced_fields_merge_into_identity() {
        let row = RawRow::from([
            ("id", "7"),
            ("guid", "{A}"),
            ("name", "Account"),
            ("stereotype", "entity, persisted"),
            ("deduced_stereotype", "table"),
            ("deduced_alias", "ACC"),
            ("visibility", "Private"),
            ("note", "raw text"),
        ]);
        let identity = entity_identity(Table::Element, &row).unwrap();

        assert_eq!(identity.name, "Account");
        assert_eq!(identity.alias.as_deref(), Some("ACC"));
        assert!(identity.has_stereotype("entity"));
        assert!(identity.has_stereotype("persisted"));
        assert!(identity.has_stereotype("table"));
        assert_eq!(identity.visibility, Visibility::Private);
        assert_eq!(identity.notes.raw, "raw text");
        assert_eq!(identity.notes.markup, "raw text");
    }

    #[test]
    fn declared_alias_wins_over_deduced() {
        let row = RawRow::from([
            ("id", "7"),
            ("guid", "{A}"),
            ("alias", "declared"),
            ("deduced_alias", "deduced"),
        ]);
        let identity = entity_identity(Table::Element, &row).unwrap();
        assert_eq!(identity.alias.as_deref(), Some("declared"));
    }
}
