//! Diagrams owned by packages and classes.

use std::path::PathBuf;

use crate::identity::Identity;

/// Diagram kind, parsed from the source type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    Class,
    Package,
    UseCase,
    Sequence,
    Activity,
    Component,
    Deployment,
    Statechart,
    /// A type string this model does not distinguish further.
    Other,
}

impl DiagramKind {
    /// Parse a source diagram type string.
    ///
    /// Returns `None` for unrecognized strings; the builder maps those to
    /// [`DiagramKind::Other`] with a warning so nothing is dropped silently.
    pub fn from_source(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "class" | "logical" => Some(Self::Class),
            "package" => Some(Self::Package),
            "use case" | "usecase" => Some(Self::UseCase),
            "sequence" => Some(Self::Sequence),
            "activity" => Some(Self::Activity),
            "component" => Some(Self::Component),
            "deployment" => Some(Self::Deployment),
            "statechart" | "statemachine" => Some(Self::Statechart),
            _ => None,
        }
    }
}

/// Page orientation of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn from_source(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("landscape") {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

/// A diagram owned by exactly one package or class.
///
/// `image` is only populated when the container's export policy allowed the
/// export and the export succeeded; a failed export is logged and leaves the
/// image empty.
#[derive(Debug, Clone)]
pub struct Diagram {
    identity: Identity,
    kind: DiagramKind,
    orientation: Orientation,
    position: i64,
    image: Option<PathBuf>,
}

impl Diagram {
    pub fn new(
        identity: Identity,
        kind: DiagramKind,
        orientation: Orientation,
        position: i64,
        image: Option<PathBuf>,
    ) -> Self {
        Self {
            identity,
            kind,
            orientation,
            position,
            image,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn image(&self) -> Option<&PathBuf> {
        self.image.as_ref()
    }
}
