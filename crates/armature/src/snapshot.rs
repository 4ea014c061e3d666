//! JSON snapshot adapter.
//!
//! A snapshot is one JSON object mapping table names to row arrays:
//!
//! ```json
//! {
//!   "packages": [{ "id": 10, "guid": "{P1}", "name": "domain", "owner_id": 0 }],
//!   "elements": [{ "id": 20, "guid": "{C1}", "name": "Account", "owner_id": 10,
//!                  "object_type": "Class" }],
//!   "connectors": [{ "id": 100, "guid": "{A1}", "connector_type": "Association",
//!                    "source_id": 20, "target_id": 21 }]
//! }
//! ```
//!
//! Scalar field values of any JSON type are read as strings; the typed
//! accessors on [`RawRow`] do the rest. This adapter is a thin I/O shim:
//! all semantics live in the linker.

use std::{collections::HashMap, fs, path::Path};

use log::debug;
use serde_json::Value;
use thiserror::Error;

use armature_core::identifier::ElementId;
use armature_linker::{
    RawRepository, Table,
    row::{RawRow, fields},
};

/// Why a snapshot could not be loaded.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot root must be an object of table arrays")]
    NotAnObject,
}

#[derive(Debug, Default)]
struct TableData {
    rows: Vec<RawRow>,
    by_owner: HashMap<ElementId, Vec<usize>>,
    by_id: HashMap<ElementId, usize>,
}

/// An in-memory repository snapshot loaded from JSON.
#[derive(Debug, Default)]
pub struct Snapshot {
    tables: HashMap<Table, TableData>,
}

impl Snapshot {
    /// Load a snapshot from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(root) = value else {
            return Err(SnapshotError::NotAnObject);
        };

        let mut snapshot = Self::default();
        for (key, rows) in root {
            let Some(table) = Table::from_key(&key) else {
                debug!(table = key; "ignoring unknown snapshot table");
                continue;
            };
            let Value::Array(rows) = rows else {
                debug!(table = key; "ignoring non-array snapshot table");
                continue;
            };
            for row in rows {
                if let Value::Object(row) = row {
                    snapshot.insert_row(table, convert_row(row));
                }
            }
        }
        Ok(snapshot)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn insert_row(&mut self, table: Table, row: RawRow) {
        let data = self.tables.entry(table).or_default();
        let index = data.rows.len();

        if let Some(id) = row.element_id(fields::ID) {
            data.by_id.entry(id).or_insert(index);
        }

        if table == Table::Connector {
            // A connector files under both of its endpoints; exactly once
            // when both endpoints are the same element.
            let source = row.int(fields::connector::SOURCE_ID).unwrap_or(0);
            let target = row.int(fields::connector::TARGET_ID).unwrap_or(0);
            data.by_owner
                .entry(ElementId(source))
                .or_default()
                .push(index);
            if target != source {
                data.by_owner
                    .entry(ElementId(target))
                    .or_default()
                    .push(index);
            }
        } else {
            let owner = ElementId(row.int(fields::OWNER_ID).unwrap_or(0));
            data.by_owner.entry(owner).or_default().push(index);
        }

        data.rows.push(row);
    }

    /// Total row count across every table.
    pub fn row_count(&self) -> usize {
        self.tables.values().map(|data| data.rows.len()).sum()
    }
}

impl RawRepository for Snapshot {
    fn children(&self, table: Table, owner: ElementId) -> Vec<RawRow> {
        let Some(data) = self.tables.get(&table) else {
            return Vec::new();
        };
        data.by_owner
            .get(&owner)
            .map(|indices| indices.iter().map(|&i| data.rows[i].clone()).collect())
            .unwrap_or_default()
    }

    fn lookup(&self, table: Table, id: ElementId) -> Option<RawRow> {
        let data = self.tables.get(&table)?;
        data.by_id.get(&id).map(|&i| data.rows[i].clone())
    }
}

/// Flatten one JSON row object into string fields. Scalars stringify;
/// nulls and nested structures are dropped.
fn convert_row(row: serde_json::Map<String, Value>) -> RawRow {
    let mut converted = RawRow::new();
    for (field, value) in row {
        match value {
            Value::String(text) => converted.set(field, text),
            Value::Number(number) => converted.set(field, number.to_string()),
            Value::Bool(flag) => converted.set(field, flag.to_string()),
            Value::Null => {}
            Value::Array(_) | Value::Object(_) => {
                debug!(field = field; "ignoring structured snapshot field");
            }
        }
    }
    converted
}
