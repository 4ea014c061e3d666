//! Pass 3: emit the immutable model in a topologically safe order.
//!
//! Packages go first, top-down, so every container exists before its
//! contents. Classes follow bottom-up over the inheritance forest: roots
//! first, and a subclass only once its last superclass is in the arena, so
//! `append_class` always finds every superclass key. Features (attributes,
//! operations, constraints) wait until every class in every package exists,
//! so cross-package type references resolve; enumeration literals are the
//! one exception, emitted eagerly with their owning enumeration. Connectors
//! and diagrams close the pass.

use std::collections::HashMap;

use indexmap::IndexSet;
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};

use armature_core::{identifier::ElementId, model::DiagramOwner, model::Model};

use crate::{
    context::BuildContext,
    error::BuildError,
    export::{ExportPolicy, ImageExporter},
};

/// Run the materialize pass and return the finished model.
pub fn materialize(
    ctx: &mut BuildContext,
    exporter: &dyn ImageExporter,
    policy: ExportPolicy,
) -> Result<Model, BuildError> {
    let mut model = Model::new();

    materialize_packages(ctx, &mut model)?;
    materialize_classes(ctx, &mut model)?;
    materialize_features(ctx, &mut model)?;
    materialize_connectors(ctx, &mut model)?;
    materialize_diagrams(ctx, &mut model, exporter, policy)?;

    ctx.finish_report();
    debug!(
        packages = model.package_count(),
        classes = model.class_count(),
        associations = model.association_count(),
        dependencies = model.dependency_count();
        "materialize pass complete",
    );
    Ok(model)
}

/// Build the package tree top-down, container before contents.
fn materialize_packages(ctx: &mut BuildContext, model: &mut Model) -> Result<(), BuildError> {
    build_package_subtree(ctx, model, ElementId::MODEL_ROOT, None)
}

fn build_package_subtree(
    ctx: &mut BuildContext,
    model: &mut Model,
    key: ElementId,
    parent: Option<ElementId>,
) -> Result<(), BuildError> {
    let children = {
        let builder = ctx
            .packages
            .get_mut(&key)
            .expect("package tree only references staged packages");
        builder.build(parent, model)?;
        builder.child_packages.clone()
    };
    for child in children {
        build_package_subtree(ctx, model, child, Some(key))?;
    }
    Ok(())
}

/// Build every class bottom-up over the inheritance forest.
///
/// The forest is an explicit graph with superclass-to-subclass edges. The
/// walk starts from the roots (classes with no superclasses) and releases
/// a subclass once all of its superclasses are built; a class may be
/// reached through several superclasses but builds exactly once. Whatever
/// is left pending after the walk sits on a closed inheritance cycle with
/// no entry point, which is a fatal defect, never silently dropped.
fn materialize_classes(ctx: &mut BuildContext, model: &mut Model) -> Result<(), BuildError> {
    let mut graph: DiGraph<ElementId, ()> = DiGraph::new();
    let mut nodes: HashMap<ElementId, NodeIndex> = HashMap::new();
    for id in ctx.classes.keys() {
        nodes.insert(*id, graph.add_node(*id));
    }
    // Edges come from the superclass side's subclass lists; the release
    // counters come from each subclass's superclass list. The two are
    // symmetric when both endpoint scans saw the connector, and a snapshot
    // that only reported one side shows up as an unreleased pending class.
    for (id, builder) in &ctx.classes {
        for subclass in &builder.subclasses {
            graph.add_edge(nodes[id], nodes[subclass], ());
        }
    }

    let mut pending: IndexSet<ElementId> = ctx
        .classes
        .iter()
        .filter(|(_, builder)| !builder.is_inheritance_root())
        .map(|(id, _)| *id)
        .collect();
    let mut unbuilt_superclasses: HashMap<ElementId, usize> = ctx
        .classes
        .iter()
        .map(|(id, builder)| (*id, builder.superclasses.len()))
        .collect();

    let mut worklist: Vec<ElementId> = ctx
        .classes
        .iter()
        .filter(|(_, builder)| builder.is_inheritance_root())
        .map(|(id, _)| *id)
        .collect();
    debug!(
        roots = worklist.len(),
        non_roots = pending.len();
        "walking inheritance forest",
    );

    let mut cursor = 0;
    while cursor < worklist.len() {
        let id = worklist[cursor];
        cursor += 1;

        ctx.classes
            .get_mut(&id)
            .expect("worklist only holds staged classes")
            .build(model)?;
        pending.swap_remove(&id);

        for neighbor in graph.neighbors(nodes[&id]) {
            let subclass = graph[neighbor];
            let remaining = unbuilt_superclasses
                .get_mut(&subclass)
                .expect("every class has a superclass count");
            if *remaining > 0 {
                *remaining -= 1;
                if *remaining == 0 {
                    worklist.push(subclass);
                }
            }
        }
    }

    if !pending.is_empty() {
        let names = pending
            .iter()
            .filter_map(|id| ctx.classes.get(id).map(|c| c.name().to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(BuildError::UnreachableClasses { names });
    }
    Ok(())
}

/// Build attributes, operations and constraints for every class, now that
/// every class in every package is in the arena.
fn materialize_features(ctx: &mut BuildContext, model: &mut Model) -> Result<(), BuildError> {
    let class_ids: Vec<ElementId> = ctx.classes.keys().copied().collect();
    for id in class_ids {
        ctx.classes
            .get_mut(&id)
            .expect("feature pass only visits staged classes")
            .build_features(model)?;
    }
    Ok(())
}

/// Build every association and dependency.
fn materialize_connectors(ctx: &mut BuildContext, model: &mut Model) -> Result<(), BuildError> {
    for association in ctx.associations.values_mut() {
        association.build(model)?;
    }
    for dependency in ctx.dependencies.values_mut() {
        dependency.build(model)?;
    }
    Ok(())
}

/// Build every diagram, exporting images only where the container policy
/// allows.
fn materialize_diagrams(
    ctx: &mut BuildContext,
    model: &mut Model,
    exporter: &dyn ImageExporter,
    policy: ExportPolicy,
) -> Result<(), BuildError> {
    let mut total = 0;

    let package_ids: Vec<ElementId> = ctx.packages.keys().copied().collect();
    for id in package_ids {
        let BuildContext {
            packages, report, ..
        } = ctx;
        let builder = packages
            .get_mut(&id)
            .expect("diagram pass only visits staged packages");
        let owner = builder.built_key().expect("package is built before its diagrams");
        for diagram in &mut builder.diagrams {
            let exporter = policy.package_diagrams.then_some(exporter);
            diagram.build(DiagramOwner::Package(owner), exporter, model, report)?;
            total += 1;
        }
    }

    let class_ids: Vec<ElementId> = ctx.classes.keys().copied().collect();
    for id in class_ids {
        let BuildContext {
            classes, report, ..
        } = ctx;
        let builder = classes
            .get_mut(&id)
            .expect("diagram pass only visits staged classes");
        let owner = builder.built_key().expect("class is built before its diagrams");
        for diagram in &mut builder.diagrams {
            let exporter = policy.class_diagrams.then_some(exporter);
            diagram.build(DiagramOwner::Class(owner), exporter, model, report)?;
            total += 1;
        }
    }

    ctx.report.diagrams = total;
    Ok(())
}
