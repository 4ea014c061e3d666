//! Raw snapshot rows: string-keyed field maps with typed accessors.
//!
//! Every entity kind reads from the same concrete row shape; the per-kind
//! differences live entirely in which field names a builder asks for. The
//! [`fields`] module is the single place those names are spelled.

use indexmap::IndexMap;

use armature_core::identifier::{ConnectorId, ElementId};

/// Field names used by the builders, grouped by the table they belong to.
///
/// The deduced fields (`deduced_stereotype`, `deduced_alias`, the per-end
/// navigability) are derivations the repository merges into the row before
/// it reaches this crate; builders read them like any other field.
pub mod fields {
    /// Integer row id.
    pub const ID: &str = "id";
    /// Guid string, intended to be globally unique.
    pub const GUID: &str = "guid";
    pub const NAME: &str = "name";
    pub const ALIAS: &str = "alias";
    /// Alias the repository extracted from encoded style text.
    pub const DEDUCED_ALIAS: &str = "deduced_alias";
    /// Comma-separated stereotype list on the row itself.
    pub const STEREOTYPE: &str = "stereotype";
    /// Stereotype the repository deduced from its cross-reference table.
    pub const DEDUCED_STEREOTYPE: &str = "deduced_stereotype";
    pub const VISIBILITY: &str = "visibility";
    /// Raw description text.
    pub const NOTE: &str = "note";
    /// Markup variant of the description.
    pub const NOTE_MARKUP: &str = "note_markup";
    /// Declared position among siblings; unreliable, see `ordering`.
    pub const POSITION: &str = "position";
    /// Owning row id; what `children` queries group by.
    pub const OWNER_ID: &str = "owner_id";

    pub mod package {
        /// The element row backing this package for connector endpoints.
        pub const ELEMENT_ID: &str = "element_id";
    }

    pub mod element {
        /// Source element type: `Class`, `Enumeration`, `Interface`,
        /// `Package`, or anything else (skipped).
        pub const OBJECT_TYPE: &str = "object_type";
        pub const IS_ABSTRACT: &str = "is_abstract";
        pub const IS_PERSISTENT: &str = "is_persistent";
        pub const IS_LEAF: &str = "is_leaf";
        pub const IS_ROOT: &str = "is_root";
        pub const IS_ASSOCIATION_CLASS: &str = "is_association_class";
    }

    pub mod attribute {
        pub const IS_CONST: &str = "is_const";
        pub const IS_STATIC: &str = "is_static";
        pub const LOWER_BOUND: &str = "lower_bound";
        pub const UPPER_BOUND: &str = "upper_bound";
        pub const INITIAL_VALUE: &str = "initial_value";
        /// Classifier id of the attribute type; 0 or absent means unusable.
        pub const TYPE_ID: &str = "type_id";
        pub const TYPE_NAME: &str = "type_name";
    }

    pub mod operation {
        pub const IS_ABSTRACT: &str = "is_abstract";
        pub const IS_STATIC: &str = "is_static";
        pub const IS_FINAL: &str = "is_final";
        /// Classifier id of the return type; 0 or absent means unusable.
        pub const RETURN_TYPE_ID: &str = "return_type_id";
        pub const RETURN_TYPE_NAME: &str = "return_type_name";
    }

    pub mod parameter {
        pub const TYPE_ID: &str = "type_id";
        pub const TYPE_NAME: &str = "type_name";
    }

    pub mod connector {
        /// Source connector type: `Generalization`, `Association`,
        /// `Aggregation`, `Dependency`, or anything else (skipped).
        pub const CONNECTOR_TYPE: &str = "connector_type";
        pub const SOURCE_ID: &str = "source_id";
        pub const TARGET_ID: &str = "target_id";
        pub const DIRECTION: &str = "direction";
        /// Per-end aggregation markers: `none`, `shared`, `composite`.
        pub const SOURCE_AGGREGATION: &str = "source_aggregation";
        pub const TARGET_AGGREGATION: &str = "target_aggregation";
        pub const SOURCE_MULTIPLICITY: &str = "source_multiplicity";
        pub const TARGET_MULTIPLICITY: &str = "target_multiplicity";
        /// Deduced from encoded style text by the repository.
        pub const SOURCE_NAVIGABILITY: &str = "deduced_source_navigability";
        pub const TARGET_NAVIGABILITY: &str = "deduced_target_navigability";
    }

    pub mod diagram {
        pub const DIAGRAM_TYPE: &str = "diagram_type";
        pub const ORIENTATION: &str = "orientation";
    }

    pub mod constraint {
        pub const CONSTRAINT_TYPE: &str = "constraint_type";
        pub const TEXT: &str = "text";
    }

    pub mod tagged {
        pub const VALUE: &str = "value";
        /// Tag name carrying an operation's exception list.
        pub const THROWS_TAG: &str = "throws";
    }
}

/// One snapshot row: an insertion-ordered map of string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    values: IndexMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// The raw field value, if the field is present at all.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// The field value or the empty string.
    pub fn text(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// The trimmed field value, if present and non-empty.
    pub fn trimmed(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|s| !s.is_empty())
    }

    /// The field parsed as an integer.
    pub fn int(&self, field: &str) -> Option<i64> {
        self.trimmed(field)?.parse().ok()
    }

    /// The field as an element id. A value of 0, an absent field, or
    /// unparseable text all mean "no usable id" - the source uses 0 for
    /// references it never filled in.
    pub fn element_id(&self, field: &str) -> Option<ElementId> {
        match self.int(field) {
            Some(id) if id > 0 => Some(ElementId(id)),
            _ => None,
        }
    }

    /// The field as a connector id, with the same 0-means-absent rule.
    pub fn connector_id(&self, field: &str) -> Option<ConnectorId> {
        match self.int(field) {
            Some(id) if id > 0 => Some(ConnectorId(id)),
            _ => None,
        }
    }

    /// The field as a boolean flag. The source spells truth several ways.
    pub fn flag(&self, field: &str) -> bool {
        matches!(
            self.text(field).trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        )
    }

    /// The declared sibling position, if any.
    pub fn position(&self) -> Option<i64> {
        self.int(fields::POSITION)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for RawRow {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let row = RawRow::from([
            ("id", "42"),
            ("name", "  Account  "),
            ("is_abstract", "1"),
            ("position", "3"),
            ("type_id", "0"),
        ]);

        assert_eq!(row.int("id"), Some(42));
        assert_eq!(row.trimmed("name"), Some("Account"));
        assert_eq!(row.text("missing"), "");
        assert!(row.flag("is_abstract"));
        assert!(!row.flag("missing"));
        assert_eq!(row.position(), Some(3));
    }

    #[test]
    fn zero_ids_are_unusable() {
        let row = RawRow::from([("type_id", "0"), ("other", "7"), ("bad", "x")]);

        assert_eq!(row.element_id("type_id"), None);
        assert_eq!(row.element_id("other"), Some(ElementId(7)));
        assert_eq!(row.element_id("bad"), None);
        assert_eq!(row.element_id("missing"), None);
    }

    #[test]
    fn flag_spellings() {
        let row = RawRow::from([("a", "true"), ("b", "Yes"), ("c", "0"), ("d", "FALSE")]);
        assert!(row.flag("a"));
        assert!(row.flag("b"));
        assert!(!row.flag("c"));
        assert!(!row.flag("d"));
    }
}
