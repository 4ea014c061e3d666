//! Attribute builders.

use armature_core::{
    attribute::{AttributeData, AttributeKind, TaggedValue},
    identifier::ElementId,
    identity::Identity,
    model::{ConstraintOwner, Model},
    typeref::{Multiplicity, SentinelKind, TypeRef},
};

use crate::{
    builders::{constraint::ConstraintBuilder, entity_identity},
    error::BuildError,
    repository::Table,
    row::{RawRow, fields},
};

/// Stages one class attribute.
///
/// A literal attribute (owner is an enumeration) carries no type reference
/// at all; a typed attribute keeps its raw classifier id until the link
/// pass resolves it or substitutes the attribute-type sentinel.
#[derive(Debug, Clone)]
pub struct AttributeBuilder {
    pub(crate) identity: Identity,
    pub(crate) position: i64,
    pub(crate) is_const: bool,
    pub(crate) is_static: bool,
    pub(crate) multiplicity: Option<Multiplicity>,
    pub(crate) initial_value: Option<String>,
    pub(crate) literal: bool,
    pub(crate) type_id: Option<ElementId>,
    pub(crate) type_name: Option<String>,
    pub(crate) tagged_values: Vec<TaggedValue>,
    pub(crate) constraints: Vec<ConstraintBuilder>,
    pub(crate) resolved: Option<TypeRef>,
    built: bool,
}

impl AttributeBuilder {
    pub fn from_row(row: &RawRow, owner_is_enumeration: bool) -> Result<Self, BuildError> {
        Ok(Self {
            identity: entity_identity(Table::Attribute, row)?,
            position: row.position().unwrap_or(0),
            is_const: row.flag(fields::attribute::IS_CONST),
            is_static: row.flag(fields::attribute::IS_STATIC),
            multiplicity: Multiplicity::from_bounds(
                row.text(fields::attribute::LOWER_BOUND),
                row.text(fields::attribute::UPPER_BOUND),
            ),
            initial_value: row
                .trimmed(fields::attribute::INITIAL_VALUE)
                .map(str::to_string),
            literal: owner_is_enumeration,
            type_id: row.element_id(fields::attribute::TYPE_ID),
            type_name: row
                .trimmed(fields::attribute::TYPE_NAME)
                .map(str::to_string),
            tagged_values: Vec::new(),
            constraints: Vec::new(),
            resolved: None,
            built: false,
        })
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn position(&self) -> Option<i64> {
        Some(self.position)
    }

    /// The resolved type, or the attribute-type sentinel. Meaningless for
    /// literals, which never resolve anything.
    pub fn resolved_or_sentinel(&self) -> TypeRef {
        self.resolved
            .unwrap_or(TypeRef::Unknown(SentinelKind::AttributeType))
    }

    /// Materialize the attribute and its constraints into the class.
    pub fn build(&mut self, class: ElementId, model: &mut Model) -> Result<(), BuildError> {
        if self.built {
            return Ok(());
        }

        let kind = if self.literal {
            AttributeKind::Literal
        } else {
            AttributeKind::Typed(self.resolved_or_sentinel())
        };
        let index = model.append_attribute(
            class,
            kind,
            self.identity.clone(),
            AttributeData {
                position: self.position,
                is_const: self.is_const,
                is_static: self.is_static,
                multiplicity: self.multiplicity,
                initial_value: self.initial_value.clone(),
                type_name: self.type_name.clone(),
                tagged_values: self.tagged_values.clone(),
            },
        )?;
        for constraint in &self.constraints {
            model.append_constraint(
                ConstraintOwner::Attribute { class, index },
                constraint.to_constraint(),
            )?;
        }
        self.built = true;
        Ok(())
    }
}
