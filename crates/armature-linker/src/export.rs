//! Diagram image export: the outward trait and the per-container policy.
//!
//! Image export is the only external call the materialize pass makes. It is
//! best-effort: an export failure is logged and the diagram is materialized
//! without an image, never aborting the build.

use std::path::PathBuf;

use armature_core::identifier::Guid;

/// Which containers' diagrams get their images exported.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportPolicy {
    pub package_diagrams: bool,
    pub class_diagrams: bool,
}

impl ExportPolicy {
    /// Export everything.
    pub fn all() -> Self {
        Self {
            package_diagrams: true,
            class_diagrams: true,
        }
    }
}

/// Resolves a diagram guid to an image file.
///
/// Implementations live outside the linker (the facade provides a
/// directory-based one); the linker only cares that failure is a value,
/// not a panic.
pub trait ImageExporter {
    fn export_image(&self, diagram: Guid) -> Result<PathBuf, ImageExportError>;
}

/// Why an image export produced nothing.
#[derive(Debug, thiserror::Error)]
pub enum ImageExportError {
    #[error("no image available for diagram {0}")]
    NotAvailable(Guid),

    #[error("image export failed: {0}")]
    Failed(#[from] std::io::Error),
}

/// The null exporter: every diagram stays imageless.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageExporter for NoImages {
    fn export_image(&self, diagram: Guid) -> Result<PathBuf, ImageExportError> {
        Err(ImageExportError::NotAvailable(diagram))
    }
}
