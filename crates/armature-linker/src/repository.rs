//! The raw-data contract the builder consumes.
//!
//! The actual repository access (SQL, API, files) lives outside this crate;
//! the builder only ever sees rows through this trait. Derived side-channel
//! fields (deduced stereotype, deduced alias/navigability) must already be
//! merged into the rows an implementation returns.

use armature_core::identifier::ElementId;

use crate::row::RawRow;

/// The snapshot tables the builder queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Table {
    /// Package tree rows, owned by their parent package (0 for top level).
    Package,
    /// Element rows (classes, enumerations, interfaces, package-backing
    /// elements, and everything skipped), owned by their package.
    Element,
    /// Attribute rows, owned by their class.
    Attribute,
    /// Operation rows, owned by their class.
    Operation,
    /// Parameter rows, owned by their operation.
    Parameter,
    /// Connector rows; a connector is a child of both of its endpoints.
    Connector,
    /// Class-level constraint rows, owned by their class.
    ClassConstraint,
    /// Attribute-level constraint rows, owned by their attribute.
    AttributeConstraint,
    /// Diagram rows, owned by their package or class.
    Diagram,
    /// Tagged-value rows, owned by their attribute or operation.
    TaggedValue,
}

impl Table {
    /// Every table, for adapters that index a whole snapshot.
    pub const ALL: [Table; 10] = [
        Table::Package,
        Table::Element,
        Table::Attribute,
        Table::Operation,
        Table::Parameter,
        Table::Connector,
        Table::ClassConstraint,
        Table::AttributeConstraint,
        Table::Diagram,
        Table::TaggedValue,
    ];

    /// The table a snapshot key names.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|table| table.key() == key)
    }

    /// Snapshot key of the table, as the adapter spells it.
    pub fn key(&self) -> &'static str {
        match self {
            Table::Package => "packages",
            Table::Element => "elements",
            Table::Attribute => "attributes",
            Table::Operation => "operations",
            Table::Parameter => "parameters",
            Table::Connector => "connectors",
            Table::ClassConstraint => "class_constraints",
            Table::AttributeConstraint => "attribute_constraints",
            Table::Diagram => "diagrams",
            Table::TaggedValue => "tagged_values",
        }
    }
}

/// Read access to a repository snapshot.
pub trait RawRepository {
    /// All rows of `table` owned by `owner`, in arrival order. Arrival
    /// order is not sorted; sibling ordering is repaired downstream.
    /// Returns an empty vector when the owner has no rows.
    ///
    /// For [`Table::Connector`] the owner is either endpoint: a connector
    /// row appears in the result for both its source and its target.
    fn children(&self, table: Table, owner: ElementId) -> Vec<RawRow>;

    /// The row of `table` with id `id`, used to classify connector
    /// endpoints before deciding what kind of edge a connector represents.
    fn lookup(&self, table: Table, id: ElementId) -> Option<RawRow>;
}
