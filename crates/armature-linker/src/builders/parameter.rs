//! Parameter builders.

use armature_core::{
    identifier::Guid,
    identity::Identity,
    operation::ParameterKind,
    typeref::{SentinelKind, TypeRef},
};

use crate::row::{RawRow, fields};

/// Suffix marking an array type name.
pub(crate) const ARRAY_SUFFIX: &str = "[]";

/// Stages one operation parameter.
///
/// Parameters are source-synthesized: the identity carries no element id,
/// and a parameter row without a guid gets a synthetic one derived from its
/// owner. An array parameter's classifier id is a known source defect, so
/// resolution goes by name after trimming the `[]` suffix; the raw id is
/// kept only for the simple case.
#[derive(Debug, Clone)]
pub struct ParameterBuilder {
    pub(crate) identity: Identity,
    pub(crate) position: i64,
    pub(crate) kind: ParameterKind,
    pub(crate) type_id: Option<armature_core::identifier::ElementId>,
    pub(crate) type_name: Option<String>,
    pub(crate) resolved: Option<TypeRef>,
}

impl ParameterBuilder {
    pub fn from_row(row: &RawRow, owner_guid: Guid, index: usize) -> Self {
        let guid = row
            .trimmed(fields::GUID)
            .map(Guid::new)
            .unwrap_or_else(|| Guid::synthetic(&format!("{owner_guid}/param{index}")));
        let mut identity = Identity::new(None, guid, row.text(fields::NAME).trim());
        identity.alias = row.trimmed(fields::ALIAS).map(str::to_string);

        let type_name = row
            .trimmed(fields::parameter::TYPE_NAME)
            .map(str::to_string);
        let kind = if type_name
            .as_deref()
            .is_some_and(|name| name.ends_with(ARRAY_SUFFIX))
        {
            ParameterKind::Array
        } else {
            ParameterKind::Simple
        };

        Self {
            identity,
            position: row.position().unwrap_or(0),
            kind,
            type_id: row.element_id(fields::parameter::TYPE_ID),
            type_name,
            resolved: None,
        }
    }

    /// The type name with any array suffix trimmed, for by-name resolution.
    pub fn base_type_name(&self) -> Option<&str> {
        self.type_name
            .as_deref()
            .map(|name| name.trim_end_matches(ARRAY_SUFFIX).trim())
            .filter(|name| !name.is_empty())
    }

    /// The resolved type, or the parameter-type sentinel if linking never
    /// found one.
    pub fn resolved_or_sentinel(&self) -> TypeRef {
        self.resolved
            .unwrap_or(TypeRef::Unknown(SentinelKind::ParameterType))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_suffix_sets_kind_and_base_name() {
        let row = RawRow::from([("name", "items"), ("type_name", "Foo[]"), ("type_id", "0")]);
        let builder = ParameterBuilder::from_row(&row, Guid::new("{OP}"), 0);

        assert_eq!(builder.kind, ParameterKind::Array);
        assert_eq!(builder.base_type_name(), Some("Foo"));
        assert_eq!(builder.type_id, None);
    }

    #[test]
    fn simple_parameter_keeps_classifier_id() {
        let row = RawRow::from([("name", "count"), ("type_name", "int"), ("type_id", "42")]);
        let builder = ParameterBuilder::from_row(&row, Guid::new("{OP}"), 0);

        assert_eq!(builder.kind, ParameterKind::Simple);
        assert_eq!(
            builder.type_id,
            Some(armature_core::identifier::ElementId(42))
        );
    }

    #[test]
    fn unresolved_parameter_falls_back_to_sentinel() {
        let row = RawRow::from([("name", "x")]);
        let builder = ParameterBuilder::from_row(&row, Guid::new("{OP}"), 3);

        assert_eq!(
            builder.resolved_or_sentinel(),
            TypeRef::Unknown(SentinelKind::ParameterType)
        );
        // Synthesized identity: no element id, synthetic guid.
        assert_eq!(builder.identity.id, None);
    }
}
