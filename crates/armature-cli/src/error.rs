//! CLI error type with miette diagnostics.

use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use armature::{BuildError, SnapshotError};

/// Everything that can go wrong in a CLI run.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(armature::io))]
    Io(#[from] io::Error),

    #[error(transparent)]
    #[diagnostic(
        code(armature::snapshot),
        help("check that the snapshot file is JSON with one array per table")
    )]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    #[diagnostic(
        code(armature::build),
        help(
            "the snapshot is structurally inconsistent; fix it in the design tool and re-export"
        )
    )]
    Build(#[from] BuildError),

    #[error("failed to parse TOML configuration: {0}")]
    #[diagnostic(code(armature::config))]
    ConfigParse(String),

    #[error("missing configuration file: {0}")]
    #[diagnostic(code(armature::config))]
    MissingConfig(PathBuf),

    #[error("failed to serialize build report: {0}")]
    #[diagnostic(code(armature::report))]
    Report(#[from] serde_json::Error),
}
