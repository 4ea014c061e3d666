//! Operation builders.

use armature_core::{
    identifier::ElementId,
    identity::Identity,
    model::Model,
    operation::{ExceptionRef, OperationData},
    typeref::{ReturnType, SentinelKind, TypeRef},
};

use crate::{
    builders::{entity_identity, parameter::{ARRAY_SUFFIX, ParameterBuilder}},
    error::BuildError,
    repository::Table,
    row::{RawRow, fields},
};

/// Return type name that means "no return type at all".
const VOID: &str = "void";

/// Stages one class operation with its ordered parameters.
#[derive(Debug, Clone)]
pub struct OperationBuilder {
    pub(crate) identity: Identity,
    pub(crate) position: i64,
    pub(crate) is_abstract: bool,
    pub(crate) is_static: bool,
    pub(crate) is_final: bool,
    pub(crate) return_type_id: Option<ElementId>,
    pub(crate) return_type_name: Option<String>,
    pub(crate) parameters: Vec<ParameterBuilder>,
    pub(crate) exception_names: Vec<String>,
    pub(crate) resolved_return: Option<ReturnType>,
    pub(crate) resolved_exceptions: Vec<ExceptionRef>,
    built: bool,
}

impl OperationBuilder {
    pub fn from_row(row: &RawRow) -> Result<Self, BuildError> {
        Ok(Self {
            identity: entity_identity(Table::Operation, row)?,
            position: row.position().unwrap_or(0),
            is_abstract: row.flag(fields::operation::IS_ABSTRACT),
            is_static: row.flag(fields::operation::IS_STATIC),
            is_final: row.flag(fields::operation::IS_FINAL),
            return_type_id: row.element_id(fields::operation::RETURN_TYPE_ID),
            return_type_name: row
                .trimmed(fields::operation::RETURN_TYPE_NAME)
                .map(str::to_string),
            parameters: Vec::new(),
            exception_names: Vec::new(),
            resolved_return: None,
            resolved_exceptions: Vec::new(),
            built: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn position(&self) -> Option<i64> {
        Some(self.position)
    }

    /// Whether the declared return type is `void`. A void return carries no
    /// reference and the link pass never attempts resolution for it.
    pub fn is_void(&self) -> bool {
        self.return_type_name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(VOID))
    }

    /// Whether the declared return type is an array.
    pub fn is_array_return(&self) -> bool {
        self.return_type_name
            .as_deref()
            .is_some_and(|name| name.ends_with(ARRAY_SUFFIX))
    }

    /// The return type name with any array suffix trimmed.
    pub fn base_return_type_name(&self) -> Option<&str> {
        self.return_type_name
            .as_deref()
            .map(|name| name.trim_end_matches(ARRAY_SUFFIX).trim())
            .filter(|name| !name.is_empty())
    }

    /// Parse an exception list from the `throws` tagged value: names
    /// separated by commas or semicolons.
    pub fn parse_throws(&mut self, tag_value: &str) {
        self.exception_names = tag_value
            .split([',', ';'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// The resolved return type; linking must have run for non-void
    /// operations, otherwise the return-type sentinel stands in.
    pub fn resolved_return(&self) -> ReturnType {
        if self.is_void() {
            return ReturnType::Void;
        }
        self.resolved_return.unwrap_or({
            let sentinel = TypeRef::Unknown(SentinelKind::ReturnType);
            if self.is_array_return() {
                ReturnType::Array(sentinel)
            } else {
                ReturnType::Simple(sentinel)
            }
        })
    }

    /// Every distinct resolved class this operation touches via parameters,
    /// return type and exceptions. Collected once so a type appearing in
    /// several roles registers coupling only once.
    pub fn distinct_resolved_types(&self) -> std::collections::BTreeSet<ElementId> {
        let mut types = std::collections::BTreeSet::new();
        for parameter in &self.parameters {
            if let Some(TypeRef::Known(id)) = parameter.resolved {
                types.insert(id);
            }
        }
        if let Some(TypeRef::Known(id)) = self.resolved_return().type_ref() {
            types.insert(id);
        }
        for exception in &self.resolved_exceptions {
            if let Some(id) = exception.class {
                types.insert(id);
            }
        }
        types
    }

    /// Materialize the operation, then its parameters and exceptions, into
    /// the class.
    pub fn build(&mut self, class: ElementId, model: &mut Model) -> Result<(), BuildError> {
        if self.built {
            return Ok(());
        }

        let key = model.append_operation(
            class,
            self.resolved_return(),
            self.identity.clone(),
            OperationData {
                position: self.position,
                is_abstract: self.is_abstract,
                is_static: self.is_static,
                is_final: self.is_final,
                return_type_name: self.return_type_name.clone(),
            },
        )?;
        for parameter in &self.parameters {
            model.append_parameter(
                key,
                parameter.resolved_or_sentinel(),
                parameter.identity.clone(),
                armature_core::operation::ParameterData {
                    position: parameter.position,
                    kind: parameter.kind,
                    type_name: parameter.type_name.clone(),
                },
            )?;
        }
        for exception in &self.resolved_exceptions {
            model.append_exception(key, exception.clone())?;
        }
        self.built = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op_row(return_id: &str, return_name: &str) -> RawRow {
        RawRow::from([
            ("id", "50"),
            ("guid", "{OP}"),
            ("name", "transfer"),
            ("return_type_id", return_id),
            ("return_type_name", return_name),
        ])
    }

    #[test]
    fn void_return_skips_resolution() {
        let builder = OperationBuilder::from_row(&op_row("0", "void")).unwrap();

        assert!(builder.is_void());
        assert_eq!(builder.resolved_return(), ReturnType::Void);
        assert!(builder.distinct_resolved_types().is_empty());
    }

    #[test]
    fn array_return_is_detected_and_trimmed() {
        let builder = OperationBuilder::from_row(&op_row("0", "Entry[]")).unwrap();

        assert!(!builder.is_void());
        assert!(builder.is_array_return());
        assert_eq!(builder.base_return_type_name(), Some("Entry"));
    }

    #[test]
    fn unresolved_return_falls_back_to_sentinel() {
        let builder = OperationBuilder::from_row(&op_row("0", "Mystery")).unwrap();
        assert_eq!(
            builder.resolved_return(),
            ReturnType::Simple(TypeRef::Unknown(SentinelKind::ReturnType))
        );
    }

    #[test]
    fn throws_tag_parses_name_list() {
        let mut builder = OperationBuilder::from_row(&op_row("0", "void")).unwrap();
        builder.parse_throws("NotFound, Overdrawn; Frozen");
        assert_eq!(builder.exception_names, ["NotFound", "Overdrawn", "Frozen"]);

        builder.parse_throws("");
        assert!(builder.exception_names.is_empty());
    }

    #[test]
    fn distinct_types_deduplicate_across_roles() {
        let mut builder = OperationBuilder::from_row(&op_row("7", "Money")).unwrap();
        builder.resolved_return = Some(ReturnType::Simple(TypeRef::Known(ElementId(7))));

        let param_row = RawRow::from([("name", "amount"), ("type_name", "Money"), ("type_id", "7")]);
        let mut parameter =
            ParameterBuilder::from_row(&param_row, builder.identity.guid, 0);
        parameter.resolved = Some(TypeRef::Known(ElementId(7)));
        builder.parameters.push(parameter);

        builder.resolved_exceptions.push(ExceptionRef {
            name: "Money".to_string(),
            class: Some(ElementId(7)),
        });

        // Return, parameter and exception all hit class 7: one entry.
        assert_eq!(builder.distinct_resolved_types().len(), 1);
    }
}
