//! Image exporter implementations.
//!
//! The linker only knows the [`ImageExporter`] trait; this module provides
//! the concrete policies: [`NoImages`] (re-exported from the linker) and
//! [`DirectoryImages`], which resolves pre-rendered images from a
//! directory by diagram guid.

use std::path::{Path, PathBuf};

use log::debug;

use armature_core::identifier::Guid;
use armature_linker::export::{ImageExportError, ImageExporter};

/// Resolves diagram images from a directory of pre-rendered files.
///
/// A diagram guid `{ABC-123}` maps to `<dir>/ABC-123.png`; braces are
/// stripped because they are hostile to most filesystems. A missing file
/// is an export failure, which the materialize pass downgrades to an
/// imageless diagram.
#[derive(Debug, Clone)]
pub struct DirectoryImages {
    dir: PathBuf,
}

impl DirectoryImages {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn image_path(&self, diagram: Guid) -> PathBuf {
        let name: String = diagram
            .as_string()
            .chars()
            .filter(|c| !matches!(c, '{' | '}'))
            .collect();
        self.dir.join(format!("{name}.png"))
    }
}

impl ImageExporter for DirectoryImages {
    fn export_image(&self, diagram: Guid) -> Result<PathBuf, ImageExportError> {
        let path = self.image_path(diagram);
        if path.is_file() {
            debug!(path = path.display().to_string(); "resolved diagram image");
            Ok(path)
        } else {
            Err(ImageExportError::NotAvailable(diagram))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::tempdir;

    #[test]
    fn resolves_existing_image_by_guid() {
        let dir = tempdir().expect("temp dir");
        fs::write(dir.path().join("AAA-1.png"), b"png").expect("write image");

        let exporter = DirectoryImages::new(dir.path());
        let path = exporter.export_image(Guid::new("{AAA-1}")).unwrap();
        assert!(path.ends_with("AAA-1.png"));
    }

    #[test]
    fn missing_image_is_an_export_failure() {
        let dir = tempdir().expect("temp dir");
        let exporter = DirectoryImages::new(dir.path());

        let err = exporter.export_image(Guid::new("{NOPE}"));
        assert!(matches!(err, Err(ImageExportError::NotAvailable(_))));
    }
}
