//! Armature: a two-phase model builder/linker for design-tool repository
//! snapshots.
//!
//! Armature turns a denormalized, id-keyed tabular snapshot of an external
//! design-tool repository into a fully resolved, immutable, graph-shaped
//! model: packages, classes, attributes, operations, parameters,
//! associations, dependencies, constraints and diagrams, with forward
//! references reconciled, unreliable sibling ordering repaired, structural
//! self-cycles tagged, duplicate identities tracked, and the inheritance
//! forest materialized bottom-up.
//!
//! ```text
//! Snapshot rows (RawRepository)
//!     ↓ populate
//! Builders
//!     ↓ link
//! Builders (references resolved)
//!     ↓ materialize
//! armature_core::Model + BuildReport
//! ```
//!
//! The whole pipeline is one synchronous batch pass: it either fully
//! succeeds or aborts with a [`BuildError`]. Recoverable defects are
//! logged and surfaced in the [`BuildReport`].

pub mod export;
pub mod snapshot;

use log::{debug, info};

pub use armature_core::{Model, ModelError};
pub use armature_linker::{
    BuildContext, BuildError, BuildReport, ExportPolicy, ImageExporter, NoImages, RawRepository,
    Table,
};
pub use export::DirectoryImages;
pub use snapshot::{Snapshot, SnapshotError};

/// Options for one batch build.
pub struct BuildOptions {
    /// Which containers' diagrams get images exported.
    pub policy: ExportPolicy,
    /// Where diagram images come from.
    pub exporter: Box<dyn ImageExporter>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            policy: ExportPolicy::default(),
            exporter: Box::new(NoImages),
        }
    }
}

/// Run the three-pass pipeline against a repository snapshot.
///
/// Returns the resolved model together with the build report. Recoverable
/// defects (ordering collisions, duplicate guids, sentinel substitutions,
/// image export failures) are in the report; structural defects abort with
/// a [`BuildError`] and no partial model is offered.
pub fn build_model(
    repo: &dyn RawRepository,
    options: &BuildOptions,
) -> Result<(Model, BuildReport), BuildError> {
    info!("Populating builders from repository snapshot");
    let mut ctx = BuildContext::new();
    armature_linker::populate::populate(repo, &mut ctx)?;
    debug!("Populate pass complete");

    info!("Linking deferred references");
    armature_linker::link::link(&mut ctx)?;
    debug!("Link pass complete");

    info!("Materializing resolved model");
    let model = armature_linker::materialize::materialize(
        &mut ctx,
        options.exporter.as_ref(),
        options.policy,
    )?;

    info!(
        packages = model.package_count(),
        classes = model.class_count(),
        associations = model.association_count(),
        dependencies = model.dependency_count();
        "Model build complete",
    );
    Ok((model, ctx.report))
}
