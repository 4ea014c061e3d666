//! Constraint builders.
//!
//! Constraints carry no deferred references, so the builder's only real
//! work is splitting class-level constraint text into the affected
//! attribute names and the condition.

use armature_core::constraint::{Constraint, ConstraintKind};

use crate::row::{RawRow, fields};

/// Separator between the affected-attribute list and the condition in
/// class-level constraint text.
const AFFECTED_SEPARATOR: char = ':';

/// Stages one class- or attribute-level constraint.
#[derive(Debug, Clone)]
pub struct ConstraintBuilder {
    name: String,
    text: String,
    class_level: bool,
}

impl ConstraintBuilder {
    /// Stage a class-level constraint row.
    pub fn from_class_row(row: &RawRow) -> Self {
        Self {
            name: row.text(fields::NAME).trim().to_string(),
            text: row.text(fields::constraint::TEXT).to_string(),
            class_level: true,
        }
    }

    /// Stage an attribute-level (min/max) constraint row.
    pub fn from_attribute_row(row: &RawRow) -> Self {
        Self {
            name: row.text(fields::NAME).trim().to_string(),
            text: row.text(fields::constraint::TEXT).to_string(),
            class_level: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Convert into the domain constraint. Class-level text splits on the
    /// first `:` into a comma-separated affected-name list and the
    /// condition; text without a separator is all condition.
    pub fn to_constraint(&self) -> Constraint {
        let kind = if self.class_level {
            let (affected, condition) = match self.text.split_once(AFFECTED_SEPARATOR) {
                Some((names, condition)) => {
                    let affected = names
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                    (affected, condition.trim().to_string())
                }
                None => (Vec::new(), self.text.trim().to_string()),
            };
            ConstraintKind::Class {
                affected,
                condition,
            }
        } else {
            ConstraintKind::AttrMinMax {
                text: self.text.trim().to_string(),
            }
        };
        Constraint::new(self.name.clone(), kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_text_splits_into_names_and_condition() {
        let row = RawRow::from([
            ("name", "balance-check"),
            ("text", "balance, limit: balance <= limit"),
        ]);
        let constraint = ConstraintBuilder::from_class_row(&row).to_constraint();

        assert_eq!(constraint.name(), "balance-check");
        assert_eq!(constraint.affected(), ["balance", "limit"]);
        match constraint.kind() {
            ConstraintKind::Class { condition, .. } => {
                assert_eq!(condition, "balance <= limit");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn class_text_without_separator_is_all_condition() {
        let row = RawRow::from([("name", "c"), ("text", "must be positive")]);
        let constraint = ConstraintBuilder::from_class_row(&row).to_constraint();

        assert!(constraint.affected().is_empty());
        match constraint.kind() {
            ConstraintKind::Class { condition, .. } => {
                assert_eq!(condition, "must be positive");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn attribute_constraints_keep_source_text() {
        let row = RawRow::from([("name", "range"), ("text", "0..100")]);
        let constraint = ConstraintBuilder::from_attribute_row(&row).to_constraint();

        match constraint.kind() {
            ConstraintKind::AttrMinMax { text } => assert_eq!(text, "0..100"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
