//! Pass 2: resolve deferred references and validate consistency.
//!
//! Runs only after populate, when every container builder exists. Optional
//! type references that fail to resolve substitute their category sentinel
//! and are recorded in the report; structurally mandatory references
//! (association/dependency ends) that are still unresolved abort the build.

use std::collections::BTreeSet;

use log::{debug, warn};

use armature_core::{
    identifier::ElementId,
    operation::ExceptionRef,
    typeref::{ReturnType, SentinelKind, TypeRef},
};

use crate::{
    builders::association::EdgeState,
    context::BuildContext,
    error::BuildError,
    report::SentinelSubstitution,
};

/// Run the link pass.
pub fn link(ctx: &mut BuildContext) -> Result<(), BuildError> {
    resolve_attribute_types(ctx);
    resolve_operations(ctx);
    validate_dependencies(ctx)?;
    validate_associations(ctx)?;
    debug!("link pass complete");
    Ok(())
}

/// Resolve every non-literal attribute's raw type id against the class
/// registry and register coupling both ways on success.
fn resolve_attribute_types(ctx: &mut BuildContext) {
    let mut resolutions: Vec<(ElementId, usize, TypeRef)> = Vec::new();
    let mut substitutions: Vec<SentinelSubstitution> = Vec::new();

    for (class_id, class) in &ctx.classes {
        for (index, attribute) in class.attributes.iter().enumerate() {
            if attribute.is_literal() {
                continue;
            }
            match attribute.type_id.filter(|id| ctx.classes.contains_key(id)) {
                Some(type_id) => {
                    resolutions.push((*class_id, index, TypeRef::Known(type_id)));
                }
                None => {
                    warn!(
                        class = class.name(),
                        attribute = attribute.name(),
                        type_name = attribute.type_name.as_deref().unwrap_or("");
                        "attribute type did not resolve, substituting sentinel",
                    );
                    substitutions.push(SentinelSubstitution {
                        owner: class.name().to_string(),
                        member: attribute.name().to_string(),
                        category: "attribute type",
                        type_name: attribute.type_name.clone(),
                    });
                    resolutions.push((
                        *class_id,
                        index,
                        TypeRef::Unknown(SentinelKind::AttributeType),
                    ));
                }
            }
        }
    }

    let mut couplings: Vec<(ElementId, ElementId)> = Vec::new();
    for (class_id, index, type_ref) in resolutions {
        if let TypeRef::Known(type_id) = type_ref {
            couplings.push((class_id, type_id));
        }
        ctx.classes
            .get_mut(&class_id)
            .expect("resolution came from the registry")
            .attributes[index]
            .resolved = Some(type_ref);
    }
    ctx.report.sentinel_substitutions.extend(substitutions);
    apply_couplings(ctx, couplings);
}

/// The per-operation resolution computed read-only before being written
/// back to the builders.
struct OperationResolution {
    class: ElementId,
    index: usize,
    parameters: Vec<TypeRef>,
    return_type: Option<ReturnType>,
    exceptions: Vec<ExceptionRef>,
    distinct_types: BTreeSet<ElementId>,
    substitutions: Vec<SentinelSubstitution>,
}

/// Resolve parameters, return types and exception types for every
/// operation, then register coupling once per distinct resolved type.
fn resolve_operations(ctx: &mut BuildContext) {
    let mut resolutions: Vec<OperationResolution> = Vec::new();

    for (class_id, class) in &ctx.classes {
        for (index, operation) in class.operations.iter().enumerate() {
            let mut resolution = OperationResolution {
                class: *class_id,
                index,
                parameters: Vec::with_capacity(operation.parameters.len()),
                return_type: None,
                exceptions: Vec::new(),
                distinct_types: BTreeSet::new(),
                substitutions: Vec::new(),
            };

            for parameter in &operation.parameters {
                let resolved = match parameter.kind {
                    // An array parameter's classifier id is a source
                    // defect: resolve by the trimmed name instead.
                    armature_core::operation::ParameterKind::Array => parameter
                        .base_type_name()
                        .and_then(|name| ctx.class_by_name(name)),
                    armature_core::operation::ParameterKind::Simple => parameter
                        .type_id
                        .filter(|id| ctx.classes.contains_key(id)),
                };
                match resolved {
                    Some(id) => {
                        resolution.distinct_types.insert(id);
                        resolution.parameters.push(TypeRef::Known(id));
                    }
                    None => {
                        resolution.substitutions.push(SentinelSubstitution {
                            owner: class.name().to_string(),
                            member: format!(
                                "{}({})",
                                operation.name(),
                                parameter.identity.name
                            ),
                            category: "parameter type",
                            type_name: parameter.type_name.clone(),
                        });
                        resolution
                            .parameters
                            .push(TypeRef::Unknown(SentinelKind::ParameterType));
                    }
                }
            }

            // Return type resolution is skipped entirely for void.
            if !operation.is_void() {
                let base = operation
                    .return_type_id
                    .filter(|id| ctx.classes.contains_key(id))
                    .or_else(|| {
                        if operation.is_array_return() {
                            operation
                                .base_return_type_name()
                                .and_then(|name| ctx.class_by_name(name))
                        } else {
                            None
                        }
                    });
                let type_ref = match base {
                    Some(id) => {
                        resolution.distinct_types.insert(id);
                        TypeRef::Known(id)
                    }
                    None => {
                        resolution.substitutions.push(SentinelSubstitution {
                            owner: class.name().to_string(),
                            member: operation.name().to_string(),
                            category: "return type",
                            type_name: operation.return_type_name.clone(),
                        });
                        TypeRef::Unknown(SentinelKind::ReturnType)
                    }
                };
                resolution.return_type = Some(if operation.is_array_return() {
                    ReturnType::Array(type_ref)
                } else {
                    ReturnType::Simple(type_ref)
                });
            }

            // Exceptions resolve by name and may legitimately stay
            // unresolved; no sentinel, no failure.
            for name in &operation.exception_names {
                let class_ref = ctx.class_by_name(name);
                if let Some(id) = class_ref {
                    resolution.distinct_types.insert(id);
                }
                resolution.exceptions.push(ExceptionRef {
                    name: name.clone(),
                    class: class_ref,
                });
            }

            resolutions.push(resolution);
        }
    }

    let mut couplings: Vec<(ElementId, ElementId)> = Vec::new();
    for resolution in resolutions {
        for type_id in &resolution.distinct_types {
            couplings.push((resolution.class, *type_id));
        }
        ctx.report
            .sentinel_substitutions
            .extend(resolution.substitutions);

        let operation = &mut ctx
            .classes
            .get_mut(&resolution.class)
            .expect("resolution came from the registry")
            .operations[resolution.index];
        for (parameter, type_ref) in
            operation.parameters.iter_mut().zip(resolution.parameters)
        {
            parameter.resolved = Some(type_ref);
        }
        operation.resolved_return = resolution.return_type;
        operation.resolved_exceptions = resolution.exceptions;
    }
    apply_couplings(ctx, couplings);
}

/// Register uses/used-by coupling for each (owner, used-type) pair.
fn apply_couplings(ctx: &mut BuildContext, couplings: Vec<(ElementId, ElementId)>) {
    for (owner, used) in couplings {
        if let Some(class) = ctx.classes.get_mut(&owner) {
            class.uses.insert(used);
        }
        if let Some(class) = ctx.classes.get_mut(&used) {
            class.used_by.insert(owner);
        }
    }
}

/// Every dependency must have both ends resolved, and both of one kind.
fn validate_dependencies(ctx: &BuildContext) -> Result<(), BuildError> {
    for dependency in ctx.dependencies.values() {
        dependency.ends()?;
    }
    Ok(())
}

/// Every association must be complete, and the symmetric coupling sets
/// recorded during the connector scans must agree from both sides.
fn validate_associations(ctx: &BuildContext) -> Result<(), BuildError> {
    for association in ctx.associations.values() {
        match association.state() {
            EdgeState::Complete => {}
            EdgeState::HalfOpenSource => {
                return Err(BuildError::HalfOpenAssociation {
                    id: association.id,
                    end: "target",
                });
            }
            EdgeState::HalfOpenTarget => {
                return Err(BuildError::HalfOpenAssociation {
                    id: association.id,
                    end: "source",
                });
            }
        }

        let source = association
            .source_class()
            .expect("complete association has a source");
        let target = association
            .target_class()
            .expect("complete association has a target");
        if source == target {
            // Self edges live in the dedicated bucket; the scan recorded
            // the hit on the class itself.
            debug_assert!(
                ctx.classes
                    .get(&source)
                    .is_some_and(|class| class.self_association_hits > 0)
            );
            continue;
        }

        let symmetric = ctx
            .classes
            .get(&source)
            .is_some_and(|class| class.association_targets.contains(&target))
            && ctx
                .classes
                .get(&target)
                .is_some_and(|class| class.association_sources.contains(&source));
        if !symmetric {
            return Err(BuildError::AsymmetricAssociation {
                id: association.id,
                source_class: source,
                target,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use armature_core::identifier::ConnectorId;

    use crate::{
        builders::{
            association::AssociationBuilder,
            class::ClassBuilder,
            dependency::{DependencyBuilder, DependencyEndpoint},
        },
        row::RawRow,
    };

    fn class(ctx: &mut BuildContext, id: i64, name: &str) -> ElementId {
        let guid = format!("{{{name}}}");
        let id_text = id.to_string();
        let row = RawRow::from([
            ("id", id_text.as_str()),
            ("guid", guid.as_str()),
            ("name", name),
            ("object_type", "Class"),
        ]);
        let builder = ClassBuilder::from_row(&row, ElementId(1)).unwrap();
        let key = builder.id();
        ctx.register_class_name(name, key);
        ctx.classes.insert(key, builder);
        key
    }

    fn connector_row(id: i64) -> RawRow {
        let guid = format!("{{CONN-{id}}}");
        let id_text = id.to_string();
        RawRow::from([("id", id_text.as_str()), ("guid", guid.as_str())])
    }

    #[test]
    fn half_open_association_aborts_linking() {
        let mut ctx = BuildContext::new();
        class(&mut ctx, 20, "A");

        let mut association =
            AssociationBuilder::from_row(ConnectorId(1), &connector_row(1)).unwrap();
        association.complete_source(ElementId(20));
        ctx.associations.insert(ConnectorId(1), association);

        let err = link(&mut ctx);
        assert!(matches!(
            err,
            Err(BuildError::HalfOpenAssociation { end: "target", .. })
        ));
    }

    #[test]
    fn asymmetric_coupling_aborts_linking() {
        let mut ctx = BuildContext::new();
        let a = class(&mut ctx, 20, "A");
        let b = class(&mut ctx, 21, "B");

        let mut association =
            AssociationBuilder::from_row(ConnectorId(1), &connector_row(1)).unwrap();
        association.complete_source(a);
        association.complete_target(b);
        ctx.associations.insert(ConnectorId(1), association);
        // Only one side recorded the edge in its coupling set.
        ctx.classes.get_mut(&a).unwrap().association_targets.insert(b);

        let err = link(&mut ctx);
        assert!(matches!(err, Err(BuildError::AsymmetricAssociation { .. })));
    }

    #[test]
    fn half_open_dependency_aborts_linking() {
        let mut ctx = BuildContext::new();
        let a = class(&mut ctx, 20, "A");

        let mut dependency =
            DependencyBuilder::from_row(ConnectorId(2), &connector_row(2)).unwrap();
        dependency.complete_source(DependencyEndpoint::Class(a));
        ctx.dependencies.insert(ConnectorId(2), dependency);

        let err = link(&mut ctx);
        assert!(matches!(
            err,
            Err(BuildError::HalfOpenDependency { end: "target", .. })
        ));
    }

    #[test]
    fn attribute_resolution_registers_symmetric_coupling() {
        use crate::builders::attribute::AttributeBuilder;

        let mut ctx = BuildContext::new();
        let a = class(&mut ctx, 20, "A");
        let b = class(&mut ctx, 21, "B");

        let attr_row = RawRow::from([
            ("id", "30"),
            ("guid", "{ATTR}"),
            ("name", "other"),
            ("type_id", "21"),
        ]);
        ctx.classes
            .get_mut(&a)
            .unwrap()
            .attributes
            .push(AttributeBuilder::from_row(&attr_row, false).unwrap());

        link(&mut ctx).unwrap();

        assert!(ctx.classes[&a].uses.contains(&b));
        assert!(ctx.classes[&b].used_by.contains(&a));
        assert_eq!(
            ctx.classes[&a].attributes[0].resolved,
            Some(TypeRef::Known(b))
        );
        assert!(ctx.report.sentinel_substitutions.is_empty());
    }
}
