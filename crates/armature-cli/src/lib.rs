//! CLI logic for the Armature model builder.

mod args;
mod config;
pub mod error;

pub use args::Args;
pub use error::CliError;

use std::fs;

use log::info;

use armature::{BuildOptions, DirectoryImages, ExportPolicy, NoImages, Snapshot};

/// Run the Armature CLI application
///
/// Loads the snapshot, runs the three-pass build, prints a summary of the
/// resolved model and the recoverable defects, and optionally writes the
/// full report as JSON.
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(snapshot = args.snapshot; "Processing repository snapshot");

    let config = config::load_config(args.config.as_ref())?;

    let snapshot = Snapshot::from_path(&args.snapshot)?;
    info!(rows = snapshot.row_count(); "Snapshot loaded");

    let options = BuildOptions {
        policy: ExportPolicy {
            package_diagrams: config.export_package_diagrams,
            class_diagrams: config.export_class_diagrams,
        },
        exporter: match &config.image_dir {
            Some(dir) => Box::new(DirectoryImages::new(dir)),
            None => Box::new(NoImages),
        },
    };

    let (model, report) = armature::build_model(&snapshot, &options)?;

    println!(
        "model: {} packages, {} classes, {} associations, {} dependencies, {} diagrams",
        report.packages, report.classes, report.associations, report.dependencies, report.diagrams,
    );
    if report.skipped_items > 0 {
        println!("skipped: {} items kept for completeness", report.skipped_items);
    }
    for duplicate in &report.duplicate_guids {
        println!(
            "ambiguous guid {}: claimed by {}",
            duplicate.guid,
            duplicate
                .owners
                .iter()
                .map(|owner| owner.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        );
    }
    for group in &report.ordering_collisions {
        println!("ordering fell back to arrival order: {group}");
    }
    for substitution in &report.sentinel_substitutions {
        println!(
            "unresolved {} on {}.{} ({})",
            substitution.category,
            substitution.owner,
            substitution.member,
            substitution.type_name.as_deref().unwrap_or("unnamed"),
        );
    }
    for diagram in &report.image_export_failures {
        println!("image export failed for diagram '{diagram}'");
    }

    if let Some(path) = &args.report {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!(report = path.as_str(); "Report written");
    }

    // The model is fully resolved here; downstream consumers (document
    // generation, reporting) take it from this point.
    info!(root = model.root().map(|p| p.identity().name.clone()).unwrap_or_default();
        "Model resolved successfully");

    Ok(())
}
