//! Pass 1: populate builders from raw rows.
//!
//! Everything a builder can know locally is filled here; every
//! cross-builder reference (attribute types, inheritance edges, the far
//! ends of connectors) stays unresolved for the link pass. The package
//! tree is walked recursively from the synthetic root; connectors are
//! scanned afterwards, once every class and package builder exists, so
//! endpoint classification can consult the registries.

use log::{debug, trace};

use armature_core::{
    attribute::TaggedValue,
    identifier::{ConnectorId, ElementId},
    skipped::SkippedItem,
};

use crate::{
    builders::{
        association::AssociationBuilder,
        attribute::AttributeBuilder,
        class::{CLASS_TYPES, ClassBuilder},
        constraint::ConstraintBuilder,
        dependency::{DependencyBuilder, DependencyEndpoint},
        diagram::DiagramBuilder,
        operation::OperationBuilder,
        package::PackageBuilder,
        parameter::ParameterBuilder,
    },
    context::{BuildContext, guid_owner},
    error::BuildError,
    ordering::repair_sibling_order,
    report::EntityKind,
    repository::{RawRepository, Table},
    row::{RawRow, fields},
};

/// Connector type strings this model stages first-class.
const GENERALIZATION: &str = "Generalization";
const ASSOCIATION: &str = "Association";
const AGGREGATION: &str = "Aggregation";
const DEPENDENCY: &str = "Dependency";

/// Run the populate pass.
pub fn populate(repo: &dyn RawRepository, ctx: &mut BuildContext) -> Result<(), BuildError> {
    debug!("creating synthetic model root");
    ctx.packages
        .insert(ElementId::MODEL_ROOT, PackageBuilder::root());

    populate_packages(repo, ctx, ElementId::MODEL_ROOT, ElementId::NO_OWNER)?;
    debug!(
        packages = ctx.packages.len(),
        classes = ctx.classes.len();
        "package tree populated",
    );

    scan_class_connectors(repo, ctx)?;
    scan_package_connectors(repo, ctx)?;
    debug!(
        associations = ctx.associations.len(),
        dependencies = ctx.dependencies.len();
        "connectors scanned",
    );
    Ok(())
}

/// Recursively stage the packages owned by `owner_query` under the
/// already-staged `parent_key`, in repaired sibling order.
fn populate_packages(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
    parent_key: ElementId,
    owner_query: ElementId,
) -> Result<(), BuildError> {
    let parent_name = ctx
        .packages
        .get(&parent_key)
        .map(|p| p.name().to_string())
        .unwrap_or_default();
    let rows = repo.children(Table::Package, owner_query);
    let label = format!("packages under '{parent_name}'");
    let (rows, collided) = repair_sibling_order(
        &label,
        rows,
        |row| row.position(),
        |row| row.text(fields::NAME).to_string(),
    );
    if collided {
        ctx.record_ordering_collision(label);
    }

    for row in rows {
        let builder = PackageBuilder::from_row(&row)?;
        let id = builder.id().expect("package identity carries an id");
        trace!(package = builder.name(), id = id.to_string(); "staging package");

        ctx.register_guid(
            builder.identity.guid,
            guid_owner(EntityKind::Package, Some(id), builder.name()),
        );
        if let Some(element) = builder.element_id {
            ctx.register_package_element(element, id);
        }
        ctx.packages.insert(id, builder);
        ctx.packages
            .get_mut(&parent_key)
            .expect("parent package is staged")
            .child_packages
            .push(id);

        populate_elements(repo, ctx, id)?;

        let pkg_label = format!("diagrams of package '{}'", package_name(ctx, id));
        let diagrams = populate_diagrams(repo, ctx, id, pkg_label)?;
        ctx.packages
            .get_mut(&id)
            .expect("package is staged")
            .diagrams = diagrams;

        populate_packages(repo, ctx, id, id)?;
    }
    Ok(())
}

fn package_name(ctx: &BuildContext, id: ElementId) -> String {
    ctx.packages
        .get(&id)
        .map(|p| p.name().to_string())
        .unwrap_or_default()
}

/// Stage the class-like elements of one package, in repaired order.
/// Non-class elements are tallied as skipped; package-backing elements are
/// already represented by their package row.
fn populate_elements(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
    package_id: ElementId,
) -> Result<(), BuildError> {
    let mut class_rows = Vec::new();
    for row in repo.children(Table::Element, package_id) {
        let object_type = row.text(fields::element::OBJECT_TYPE);
        if CLASS_TYPES
            .iter()
            .any(|t| t.eq_ignore_ascii_case(object_type))
        {
            class_rows.push(row);
        } else if object_type.eq_ignore_ascii_case("Package") {
            trace!(element = row.text(fields::NAME); "package-backing element");
        } else {
            debug!(
                element = row.text(fields::NAME),
                object_type = object_type;
                "element type not modeled, counting as skipped",
            );
            ctx.report.skipped_items += 1;
        }
    }

    let label = format!("classes in package '{}'", package_name(ctx, package_id));
    let (class_rows, collided) = repair_sibling_order(
        &label,
        class_rows,
        |row| row.position(),
        |row| row.text(fields::NAME).to_string(),
    );
    if collided {
        ctx.record_ordering_collision(label);
    }

    for row in class_rows {
        let builder = populate_class(repo, ctx, &row, package_id)?;
        let id = builder.id();
        ctx.classes.insert(id, builder);
        ctx.packages
            .get_mut(&package_id)
            .expect("owning package is staged")
            .classes
            .push(id);
    }
    Ok(())
}

/// Stage one class with its attributes, operations, constraints and
/// diagrams.
fn populate_class(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
    row: &RawRow,
    package_id: ElementId,
) -> Result<ClassBuilder, BuildError> {
    let mut builder = ClassBuilder::from_row(row, package_id)?;
    let class_id = builder.id();
    trace!(class = builder.name(), id = class_id.to_string(); "staging class");

    ctx.register_guid(
        builder.identity.guid,
        guid_owner(EntityKind::Class, Some(class_id), builder.name()),
    );
    ctx.register_class_name(&builder.identity.name, class_id);

    populate_attributes(repo, ctx, &mut builder, class_id)?;
    populate_operations(repo, ctx, &mut builder, class_id)?;

    for constraint_row in repo.children(Table::ClassConstraint, class_id) {
        builder
            .constraints
            .push(ConstraintBuilder::from_class_row(&constraint_row));
    }

    let label = format!("diagrams of class '{}'", builder.name());
    builder.diagrams = populate_diagrams(repo, ctx, class_id, label)?;
    Ok(builder)
}

fn populate_attributes(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
    builder: &mut ClassBuilder,
    class_id: ElementId,
) -> Result<(), BuildError> {
    let rows = repo.children(Table::Attribute, class_id);
    let label = format!("attributes of class '{}'", builder.name());
    let (rows, collided) = repair_sibling_order(
        &label,
        rows,
        |row| row.position(),
        |row| row.text(fields::NAME).to_string(),
    );
    if collided {
        ctx.record_ordering_collision(label);
    }

    for row in rows {
        let mut attribute = AttributeBuilder::from_row(&row, builder.is_enumeration)?;
        let attribute_id = attribute
            .identity
            .id
            .expect("attribute identity carries an id");
        ctx.register_guid(
            attribute.identity.guid,
            guid_owner(EntityKind::Attribute, Some(attribute_id), attribute.name()),
        );

        for tag_row in repo.children(Table::TaggedValue, attribute_id) {
            attribute.tagged_values.push(TaggedValue {
                name: tag_row.text(fields::NAME).trim().to_string(),
                value: tag_row.text(fields::tagged::VALUE).to_string(),
            });
        }
        for constraint_row in repo.children(Table::AttributeConstraint, attribute_id) {
            attribute
                .constraints
                .push(ConstraintBuilder::from_attribute_row(&constraint_row));
        }
        builder.attributes.push(attribute);
    }
    Ok(())
}

fn populate_operations(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
    builder: &mut ClassBuilder,
    class_id: ElementId,
) -> Result<(), BuildError> {
    let rows = repo.children(Table::Operation, class_id);
    let label = format!("operations of class '{}'", builder.name());
    let (rows, collided) = repair_sibling_order(
        &label,
        rows,
        |row| row.position(),
        |row| row.text(fields::NAME).to_string(),
    );
    if collided {
        ctx.record_ordering_collision(label);
    }

    for row in rows {
        let mut operation = OperationBuilder::from_row(&row)?;
        let operation_id = operation
            .identity
            .id
            .expect("operation identity carries an id");
        ctx.register_guid(
            operation.identity.guid,
            guid_owner(EntityKind::Operation, Some(operation_id), operation.name()),
        );

        let parameter_rows = repo.children(Table::Parameter, operation_id);
        let parameter_label = format!("parameters of operation '{}'", operation.name());
        let (parameter_rows, collided) = repair_sibling_order(
            &parameter_label,
            parameter_rows,
            |r| r.position(),
            |r| r.text(fields::NAME).to_string(),
        );
        if collided {
            ctx.record_ordering_collision(parameter_label);
        }
        for (index, parameter_row) in parameter_rows.iter().enumerate() {
            operation.parameters.push(ParameterBuilder::from_row(
                parameter_row,
                operation.identity.guid,
                index,
            ));
        }

        for tag_row in repo.children(Table::TaggedValue, operation_id) {
            if tag_row
                .text(fields::NAME)
                .trim()
                .eq_ignore_ascii_case(fields::tagged::THROWS_TAG)
            {
                operation.parse_throws(tag_row.text(fields::tagged::VALUE));
            }
        }
        builder.operations.push(operation);
    }
    Ok(())
}

/// Stage the diagrams of one container, in repaired order.
fn populate_diagrams(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
    owner_query: ElementId,
    label: String,
) -> Result<Vec<DiagramBuilder>, BuildError> {
    let rows = repo.children(Table::Diagram, owner_query);
    let (rows, collided) = repair_sibling_order(
        &label,
        rows,
        |row| row.position(),
        |row| row.text(fields::NAME).to_string(),
    );
    if collided {
        ctx.record_ordering_collision(label);
    }

    let mut diagrams = Vec::new();
    for row in rows {
        let diagram = DiagramBuilder::from_row(&row)?;
        ctx.register_guid(
            diagram.identity.guid,
            guid_owner(EntityKind::Diagram, diagram.identity.id, diagram.name()),
        );
        diagrams.push(diagram);
    }
    Ok(diagrams)
}

/// Scan every class's connectors.
///
/// Each class mutates only itself during its own scan: A's scan records
/// A's superclass edge to B, and B's scan later records B's subclass edge
/// back to A. Association and dependency builders complete incrementally
/// through their idempotent transitions, whichever side scans first.
fn scan_class_connectors(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
) -> Result<(), BuildError> {
    let class_ids: Vec<ElementId> = ctx.classes.keys().copied().collect();
    for class_id in class_ids {
        for row in repo.children(Table::Connector, class_id) {
            scan_class_connector(repo, ctx, class_id, &row)?;
        }
    }
    Ok(())
}

fn scan_class_connector(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
    class_id: ElementId,
    row: &RawRow,
) -> Result<(), BuildError> {
    let Some(connector_id) = row.connector_id(fields::ID) else {
        push_skipped(ctx, class_id, row, "connector without id");
        return Ok(());
    };
    let source = row.element_id(fields::connector::SOURCE_ID);
    let target = row.element_id(fields::connector::TARGET_ID);
    let (Some(source), Some(target)) = (source, target) else {
        push_skipped(ctx, class_id, row, "missing endpoint");
        return Ok(());
    };

    let connector_type = row.text(fields::connector::CONNECTOR_TYPE);
    if connector_type.eq_ignore_ascii_case(GENERALIZATION) {
        scan_generalization(repo, ctx, class_id, row, source, target)
    } else if connector_type.eq_ignore_ascii_case(ASSOCIATION)
        || connector_type.eq_ignore_ascii_case(AGGREGATION)
    {
        scan_association(repo, ctx, class_id, connector_id, row, source, target)
    } else if connector_type.eq_ignore_ascii_case(DEPENDENCY) {
        scan_dependency(ctx, class_id, connector_id, row, source, target)
    } else {
        let other = if source == class_id { target } else { source };
        let descriptor = describe_endpoint(repo, ctx, other);
        push_skipped(ctx, class_id, row, &descriptor);
        Ok(())
    }
}

/// A generalization runs subclass (source) to superclass (target).
fn scan_generalization(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
    class_id: ElementId,
    row: &RawRow,
    source: ElementId,
    target: ElementId,
) -> Result<(), BuildError> {
    if source == target {
        if source == class_id {
            ctx.classes
                .get_mut(&class_id)
                .expect("scanned class is staged")
                .self_inherited_hits += 1;
        }
        return Ok(());
    }

    if source == class_id {
        if ctx.classes.contains_key(&target) {
            ctx.classes
                .get_mut(&class_id)
                .expect("scanned class is staged")
                .add_superclass(target);
        } else {
            let descriptor = describe_endpoint(repo, ctx, target);
            push_skipped(ctx, class_id, row, &descriptor);
        }
    }
    if target == class_id {
        if ctx.classes.contains_key(&source) {
            ctx.classes
                .get_mut(&class_id)
                .expect("scanned class is staged")
                .add_subclass(source);
        } else {
            let descriptor = describe_endpoint(repo, ctx, source);
            push_skipped(ctx, class_id, row, &descriptor);
        }
    }
    Ok(())
}

fn scan_association(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
    class_id: ElementId,
    connector_id: ConnectorId,
    row: &RawRow,
    source: ElementId,
    target: ElementId,
) -> Result<(), BuildError> {
    if source == target {
        // Both endpoints are this class: the connector goes into the
        // dedicated self bucket, and the per-scan counter becomes the
        // class's flag.
        if source == class_id {
            ensure_association(ctx, connector_id, row)?;
            let association = ctx
                .associations
                .get_mut(&connector_id)
                .expect("association was just ensured");
            association.complete_source(class_id);
            association.complete_target(class_id);
            ctx.classes
                .get_mut(&class_id)
                .expect("scanned class is staged")
                .self_association_hits += 1;
        }
        return Ok(());
    }

    let other = if source == class_id { target } else { source };
    if !ctx.classes.contains_key(&other) {
        let descriptor = describe_endpoint(repo, ctx, other);
        push_skipped(ctx, class_id, row, &descriptor);
        return Ok(());
    }

    ensure_association(ctx, connector_id, row)?;
    let association = ctx
        .associations
        .get_mut(&connector_id)
        .expect("association was just ensured");
    if source == class_id {
        association.complete_source(class_id);
    }
    if target == class_id {
        association.complete_target(class_id);
    }

    let class = ctx
        .classes
        .get_mut(&class_id)
        .expect("scanned class is staged");
    if source == class_id {
        class.association_targets.insert(target);
    }
    if target == class_id {
        class.association_sources.insert(source);
    }
    Ok(())
}

fn scan_dependency(
    ctx: &mut BuildContext,
    class_id: ElementId,
    connector_id: ConnectorId,
    row: &RawRow,
    source: ElementId,
    target: ElementId,
) -> Result<(), BuildError> {
    if source == target {
        // Self-dependency is a flag on the class, never an edge.
        if source == class_id {
            ctx.classes
                .get_mut(&class_id)
                .expect("scanned class is staged")
                .self_dependent_hits += 1;
        }
        return Ok(());
    }

    ensure_dependency(ctx, connector_id, row)?;
    let dependency = ctx
        .dependencies
        .get_mut(&connector_id)
        .expect("dependency was just ensured");
    if source == class_id {
        dependency.complete_source(DependencyEndpoint::Class(class_id));
    }
    if target == class_id {
        dependency.complete_target(DependencyEndpoint::Class(class_id));
    }
    Ok(())
}

/// Scan package-level connectors via each package's backing element.
fn scan_package_connectors(
    repo: &dyn RawRepository,
    ctx: &mut BuildContext,
) -> Result<(), BuildError> {
    let packages: Vec<(ElementId, ElementId)> = ctx
        .packages
        .iter()
        .filter_map(|(id, builder)| builder.element_id.map(|element| (*id, element)))
        .collect();

    for (package_id, element_id) in packages {
        for row in repo.children(Table::Connector, element_id) {
            let Some(connector_id) = row.connector_id(fields::ID) else {
                continue;
            };
            if !row
                .text(fields::connector::CONNECTOR_TYPE)
                .eq_ignore_ascii_case(DEPENDENCY)
            {
                ctx.report.skipped_items += 1;
                continue;
            }
            let (Some(source), Some(target)) = (
                row.element_id(fields::connector::SOURCE_ID),
                row.element_id(fields::connector::TARGET_ID),
            ) else {
                ctx.report.skipped_items += 1;
                continue;
            };

            if source == target {
                if source == element_id {
                    ctx.packages
                        .get_mut(&package_id)
                        .expect("scanned package is staged")
                        .self_dependent_hits += 1;
                }
                continue;
            }

            ensure_dependency(ctx, connector_id, &row)?;
            let dependency = ctx
                .dependencies
                .get_mut(&connector_id)
                .expect("dependency was just ensured");
            if source == element_id {
                dependency.complete_source(DependencyEndpoint::Package(package_id));
            }
            if target == element_id {
                dependency.complete_target(DependencyEndpoint::Package(package_id));
            }
        }
    }
    Ok(())
}

/// Stage an association builder for this connector if no endpoint scan has
/// done so yet.
fn ensure_association(
    ctx: &mut BuildContext,
    id: ConnectorId,
    row: &RawRow,
) -> Result<(), BuildError> {
    if !ctx.associations.contains_key(&id) {
        let builder = AssociationBuilder::from_row(id, row)?;
        ctx.register_guid(
            builder.identity.guid,
            guid_owner(EntityKind::Association, None, &builder.identity.name),
        );
        ctx.associations.insert(id, builder);
    }
    Ok(())
}

/// Stage a dependency builder for this connector if no endpoint scan has
/// done so yet.
fn ensure_dependency(
    ctx: &mut BuildContext,
    id: ConnectorId,
    row: &RawRow,
) -> Result<(), BuildError> {
    if !ctx.dependencies.contains_key(&id) {
        let builder = DependencyBuilder::from_row(id, row)?;
        ctx.register_guid(
            builder.identity.guid,
            guid_owner(EntityKind::Dependency, None, &builder.identity.name),
        );
        ctx.dependencies.insert(id, builder);
    }
    Ok(())
}

/// Describe whatever sits at a connector endpoint, for skipped-item
/// records.
fn describe_endpoint(repo: &dyn RawRepository, ctx: &BuildContext, id: ElementId) -> String {
    if let Some(class) = ctx.classes.get(&id) {
        return format!("class '{}'", class.name());
    }
    if let Some(package_id) = ctx.package_for_element(id) {
        if let Some(package) = ctx.packages.get(&package_id) {
            return format!("package '{}'", package.name());
        }
    }
    match repo.lookup(Table::Element, id) {
        Some(row) => {
            let object_type = row.text(fields::element::OBJECT_TYPE);
            let object_type = if object_type.is_empty() {
                "element"
            } else {
                object_type
            };
            format!("{} '{}'", object_type, row.text(fields::NAME))
        }
        None => format!("element {id}"),
    }
}

/// Record an unmodeled connector against the class that saw it.
fn push_skipped(ctx: &mut BuildContext, class_id: ElementId, row: &RawRow, other_end: &str) {
    let kind = row.text(fields::connector::CONNECTOR_TYPE);
    let kind = if kind.is_empty() { "connector" } else { kind };
    trace!(
        class = class_id.to_string(),
        kind = kind,
        other_end = other_end;
        "skipping connector",
    );
    ctx.classes
        .get_mut(&class_id)
        .expect("scanned class is staged")
        .skipped
        .push(SkippedItem::connector(kind, other_end));
    ctx.report.skipped_items += 1;
}
