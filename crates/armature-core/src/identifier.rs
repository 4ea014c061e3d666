//! Identifier types for model entities.
//!
//! Two kinds of identifiers appear in a repository snapshot: integer keys
//! ([`ElementId`] for packages/classes/features, [`ConnectorId`] for edges)
//! and globally-intended-unique guid strings. Guids are compared and used as
//! map keys throughout duplicate tracking, so they are stored interned as
//! [`Guid`] symbols.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::Serialize;
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner backing [`Guid`].
///
/// Append-only string storage; it carries no model state.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Integer key of a package, class, attribute, operation or diagram row.
///
/// Source-synthesized entities (association ends, parameters, the model
/// root) have no row id of their own; where such an entity still needs an
/// arena slot, [`ElementId::MODEL_ROOT`] is reserved for the synthetic root
/// package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub i64);

impl ElementId {
    /// Reserved arena key for the synthetic model-root package.
    pub const MODEL_ROOT: ElementId = ElementId(-1);

    /// Owner id under which top-level rows are filed in the repository.
    pub const NO_OWNER: ElementId = ElementId(0);
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer key of a connector row (association, dependency, generalization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConnectorId(pub i64);

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}", self.0)
    }
}

/// Interned guid string.
///
/// Guids are intended to be globally unique in the source repository but in
/// practice sometimes are not; interning makes equality checks and map keys
/// cheap for the duplicate-tracking registry.
///
/// # Examples
///
/// ```
/// use armature_core::identifier::Guid;
///
/// let a = Guid::new("{3F2504E0-4F89-11D3-9A0C-0305E82C3301}");
/// let b = Guid::new("{3F2504E0-4F89-11D3-9A0C-0305E82C3301}");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid(DefaultSymbol);

impl Guid {
    /// Intern a guid string.
    pub fn new(text: &str) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(text);
        Self(symbol)
    }

    /// Synthesize a guid for an entity the source never assigned one to.
    ///
    /// # Examples
    ///
    /// ```
    /// use armature_core::identifier::Guid;
    ///
    /// let root = Guid::synthetic("model-root");
    /// assert_eq!(root.to_string(), "{synthetic:model-root}");
    /// ```
    pub fn synthetic(tag: &str) -> Self {
        let name = format!("{{synthetic:{tag}}}");
        Self::new(&name)
    }

    /// Resolve the interned guid back to its string form.
    pub fn as_string(&self) -> String {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        interner
            .resolve(self.0)
            .expect("Symbol should exist in interner")
            .to_string()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for Guid {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl PartialEq<str> for Guid {
    fn eq(&self, other: &str) -> bool {
        self.as_string() == other
    }
}

impl Serialize for Guid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interned_guids_compare_by_content() {
        let a = Guid::new("{AAAA}");
        let b = Guid::new("{AAAA}");
        let c = Guid::new("{BBBB}");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, *"{AAAA}");
    }

    #[test]
    fn synthetic_guids_are_stable() {
        let a = Guid::synthetic("model-root");
        let b = Guid::synthetic("model-root");

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "{synthetic:model-root}");
    }

    #[test]
    fn guids_work_as_map_keys() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Guid::new("{AAAA}"), 1);
        map.insert(Guid::new("{BBBB}"), 2);

        assert_eq!(map.get(&Guid::new("{AAAA}")), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn element_id_display() {
        assert_eq!(ElementId(42).to_string(), "#42");
        assert_eq!(ConnectorId(7).to_string(), "~7");
    }
}
