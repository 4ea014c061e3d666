//! Diagram builders.

use log::warn;

use armature_core::{
    diagram::{Diagram, DiagramKind, Orientation},
    identity::Identity,
    model::{DiagramOwner, Model},
};

use crate::{
    builders::entity_identity,
    error::BuildError,
    export::ImageExporter,
    report::BuildReport,
    repository::Table,
    row::{RawRow, fields},
};

/// Stages one diagram.
#[derive(Debug, Clone)]
pub struct DiagramBuilder {
    pub(crate) identity: Identity,
    pub(crate) kind: DiagramKind,
    pub(crate) orientation: Orientation,
    pub(crate) position: i64,
    built: bool,
}

impl DiagramBuilder {
    pub fn from_row(row: &RawRow) -> Result<Self, BuildError> {
        let identity = entity_identity(Table::Diagram, row)?;

        let type_text = row.text(fields::diagram::DIAGRAM_TYPE);
        let kind = DiagramKind::from_source(type_text).unwrap_or_else(|| {
            warn!(
                diagram = identity.name,
                diagram_type = type_text;
                "unrecognized diagram type, keeping as Other",
            );
            DiagramKind::Other
        });

        Ok(Self {
            identity,
            kind,
            orientation: Orientation::from_source(row.text(fields::diagram::ORIENTATION)),
            position: row.position().unwrap_or(0),
            built: false,
        })
    }

    pub fn position(&self) -> Option<i64> {
        Some(self.position)
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Materialize the diagram into its container.
    ///
    /// The image is exported only when the container's policy passed an
    /// exporter in; export failure is logged, recorded in the report, and
    /// leaves the diagram imageless.
    pub fn build(
        &mut self,
        owner: DiagramOwner,
        exporter: Option<&dyn ImageExporter>,
        model: &mut Model,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        if self.built {
            return Ok(());
        }

        let image = exporter.and_then(|exporter| {
            match exporter.export_image(self.identity.guid) {
                Ok(path) => Some(path),
                Err(err) => {
                    warn!(
                        diagram = self.identity.name,
                        error = err.to_string();
                        "diagram image export failed, continuing without image",
                    );
                    report
                        .image_export_failures
                        .push(self.identity.name.clone());
                    None
                }
            }
        });

        model.append_diagram(
            owner,
            Diagram::new(
                self.identity.clone(),
                self.kind,
                self.orientation,
                self.position,
                image,
            ),
        )?;
        self.built = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_diagram_type_becomes_other() {
        let row = RawRow::from([
            ("id", "5"),
            ("guid", "{D}"),
            ("name", "Overview"),
            ("diagram_type", "Mindmap"),
        ]);
        let builder = DiagramBuilder::from_row(&row).unwrap();
        assert_eq!(builder.kind, DiagramKind::Other);
    }

    #[test]
    fn known_type_and_orientation_parse() {
        let row = RawRow::from([
            ("id", "5"),
            ("guid", "{D}"),
            ("name", "Domain"),
            ("diagram_type", "Class"),
            ("orientation", "Landscape"),
        ]);
        let builder = DiagramBuilder::from_row(&row).unwrap();
        assert_eq!(builder.kind, DiagramKind::Class);
        assert_eq!(builder.orientation, Orientation::Landscape);
    }
}
