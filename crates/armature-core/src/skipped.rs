//! Source items intentionally not modeled first-class.
//!
//! The builder keeps one record per skipped element or connector so the
//! build report can account for everything the snapshot contained.

/// An element or connector the builder saw but did not model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    kind: String,
    is_connector: bool,
    other_end: Option<String>,
}

impl SkippedItem {
    /// Record a skipped element of the given source kind.
    pub fn element(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            is_connector: false,
            other_end: None,
        }
    }

    /// Record a skipped connector together with a descriptor of whatever sat
    /// on the other end.
    pub fn connector(kind: impl Into<String>, other_end: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            is_connector: true,
            other_end: Some(other_end.into()),
        }
    }

    /// The source type string of the skipped item.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_connector(&self) -> bool {
        self.is_connector
    }

    /// Descriptor of the other end, for skipped connectors.
    pub fn other_end(&self) -> Option<&str> {
        self.other_end.as_deref()
    }
}
