//! The identity record shared by every entity kind.
//!
//! Every first-class row in the source repository carries the same identity
//! block: an optional integer id, a guid, a name, an optional alias, a set of
//! stereotypes, a visibility, and a free-form description in raw and markup
//! form. Builders extract this block once and pass it unchanged into the
//! materialized entity.

use indexmap::IndexSet;

use crate::identifier::{ElementId, Guid};

/// Entity visibility as declared in the source repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Package,
    #[default]
    Unspecified,
}

impl Visibility {
    /// Parse a source visibility string; anything unrecognized maps to
    /// [`Visibility::Unspecified`].
    pub fn from_source(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "public" => Self::Public,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "package" => Self::Package,
            _ => Self::Unspecified,
        }
    }
}

/// Free-form entity description in raw and markup variants.
///
/// The source stores notes as markup-laden text; the raw variant has had the
/// markup handled by the external note-cleanup collaborator before the rows
/// reach this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes {
    pub raw: String,
    pub markup: String,
}

impl Notes {
    pub fn new(raw: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            markup: markup.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.markup.is_empty()
    }
}

/// Common identity record.
///
/// `id` is `None` for source-synthesized entities (the model root package,
/// association ends, parameters); everything read from a first-class row has
/// one.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Option<ElementId>,
    pub guid: Guid,
    pub name: String,
    pub alias: Option<String>,
    pub stereotypes: IndexSet<String>,
    pub visibility: Visibility,
    pub notes: Notes,
}

impl Identity {
    /// Create an identity with just a key, name and guid; the remaining
    /// fields start at their defaults.
    pub fn new(id: Option<ElementId>, guid: Guid, name: impl Into<String>) -> Self {
        Self {
            id,
            guid,
            name: name.into(),
            alias: None,
            stereotypes: IndexSet::new(),
            visibility: Visibility::default(),
            notes: Notes::default(),
        }
    }

    /// Whether the given stereotype is present, ignoring ASCII case.
    pub fn has_stereotype(&self, stereotype: &str) -> bool {
        self.stereotypes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(stereotype))
    }

    /// The display name: alias if the source provided one, name otherwise.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}
