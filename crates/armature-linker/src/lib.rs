//! Armature builder/linker: from raw snapshot rows to a resolved model.
//!
//! This crate implements the three-pass pipeline at the heart of Armature:
//!
//! ```text
//! Repository snapshot (string-keyed rows)
//!     ↓ populate
//! Builders (locally-known data, forward references unresolved)
//!     ↓ link
//! Builders (every deferred reference resolved, consistency validated)
//!     ↓ materialize
//! armature_core::Model (immutable, arena-backed)
//! ```
//!
//! - [`row`] / [`repository`] - the raw-data contract this crate consumes
//! - [`ordering`] - sibling-ordering repair shared by every container
//! - [`builders`] - one transient, mutable builder per entity kind
//! - [`context`] - the per-build registries and duplicate-guid tracking
//! - [`populate`], [`link`], [`materialize`] - the three passes
//! - [`report`] - everything the recoverable error tier records
//!
//! The passes are strictly sequential and single-threaded. Recoverable
//! defects (ordering collisions, duplicate guids, unresolvable optional
//! types, image export failures) are logged and reported; structural
//! defects (half-open edges, inheritance cycles) abort the build with a
//! [`error::BuildError`].

pub mod builders;
pub mod context;
pub mod error;
pub mod export;
pub mod link;
pub mod materialize;
pub mod ordering;
pub mod populate;
pub mod report;
pub mod repository;
pub mod row;

pub use context::BuildContext;
pub use error::BuildError;
pub use export::{ExportPolicy, ImageExporter, NoImages};
pub use report::BuildReport;
pub use repository::{RawRepository, Table};
pub use row::RawRow;
