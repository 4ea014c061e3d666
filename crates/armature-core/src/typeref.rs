//! Type references, sentinels and multiplicities.
//!
//! A type reference in the source is an id (and a display name) pointing at a
//! classifier row. The link pass resolves ids against the class registry;
//! optional references that fail to resolve substitute a per-category
//! sentinel instead of aborting the build.

use std::fmt;

/// The category a sentinel "unknown class" stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelKind {
    AttributeType,
    ReturnType,
    ParameterType,
    ExceptionType,
}

impl SentinelKind {
    /// Stable display name of the sentinel pseudo-class.
    pub fn display_name(&self) -> &'static str {
        match self {
            SentinelKind::AttributeType => "<unknown attribute type>",
            SentinelKind::ReturnType => "<unknown return type>",
            SentinelKind::ParameterType => "<unknown parameter type>",
            SentinelKind::ExceptionType => "<unknown exception type>",
        }
    }
}

/// A resolved type reference: a real class in the model, or the category
/// sentinel when the source reference could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef {
    Known(crate::identifier::ElementId),
    Unknown(SentinelKind),
}

impl TypeRef {
    pub fn known(&self) -> Option<crate::identifier::ElementId> {
        match self {
            TypeRef::Known(id) => Some(*id),
            TypeRef::Unknown(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, TypeRef::Known(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Known(id) => write!(f, "{id}"),
            TypeRef::Unknown(kind) => write!(f, "{}", kind.display_name()),
        }
    }
}

/// An operation's return type.
///
/// `Void` carries no reference at all; the link pass never attempts to
/// resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Simple(TypeRef),
    Array(TypeRef),
}

impl ReturnType {
    pub fn type_ref(&self) -> Option<TypeRef> {
        match self {
            ReturnType::Void => None,
            ReturnType::Simple(t) | ReturnType::Array(t) => Some(*t),
        }
    }
}

/// One bound of a multiplicity range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact(u64),
    Many,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Exact(n) => write!(f, "{n}"),
            Bound::Many => write!(f, "*"),
        }
    }
}

/// A lower/upper multiplicity range such as `1`, `0..1` or `1..*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplicity {
    pub lower: Bound,
    pub upper: Bound,
}

impl Multiplicity {
    /// The `0..1` range a blank composition end defaults to.
    pub fn optional_one() -> Self {
        Self {
            lower: Bound::Exact(0),
            upper: Bound::Exact(1),
        }
    }

    /// Parse a multiplicity text such as `1`, `*`, `0..1` or `1..*`.
    ///
    /// Returns `None` for blank or unrecognizable text; the caller decides
    /// whether a default applies.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let parse_bound = |s: &str| -> Option<Bound> {
            let s = s.trim();
            if s == "*" {
                Some(Bound::Many)
            } else {
                s.parse::<u64>().ok().map(Bound::Exact)
            }
        };

        match text.split_once("..") {
            Some((lo, hi)) => Some(Self {
                lower: parse_bound(lo)?,
                upper: parse_bound(hi)?,
            }),
            None => {
                let bound = parse_bound(text)?;
                Some(Self {
                    lower: bound,
                    upper: bound,
                })
            }
        }
    }

    /// Parse separate lower/upper bound fields, as attribute rows store them.
    pub fn from_bounds(lower: &str, upper: &str) -> Option<Self> {
        match (lower.trim(), upper.trim()) {
            ("", "") => None,
            (lo, hi) => {
                let lower = Self::parse(lo)?.lower;
                let upper = Self::parse(if hi.is_empty() { lo } else { hi })?.upper;
                Some(Self { lower, upper })
            }
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lower == self.upper {
            write!(f, "{}", self.lower)
        } else {
            write!(f, "{}..{}", self.lower, self.upper)
        }
    }
}
