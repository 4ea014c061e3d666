//! The per-build context: registries, name indexes, duplicate tracking.
//!
//! One `BuildContext` value is created per batch build and threaded by
//! mutable reference through the three passes. Nothing in here is
//! process-wide: dropping the context drops every builder and registry
//! with it.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::warn;

use armature_core::identifier::{ConnectorId, ElementId, Guid};

use crate::{
    builders::{
        association::AssociationBuilder, class::ClassBuilder, dependency::DependencyBuilder,
        package::PackageBuilder,
    },
    report::{BuildReport, DuplicateGuid, EntityKind, GuidOwner},
};

/// Registries and tracking state for one batch build.
#[derive(Default)]
pub struct BuildContext {
    /// Every package builder, keyed by package id (the synthetic root under
    /// [`ElementId::MODEL_ROOT`]).
    pub packages: IndexMap<ElementId, PackageBuilder>,
    /// Every class builder, keyed by element id.
    pub classes: IndexMap<ElementId, ClassBuilder>,
    /// Association builders, keyed by connector id; created half-open by
    /// whichever endpoint scans the connector first.
    pub associations: IndexMap<ConnectorId, AssociationBuilder>,
    /// Dependency builders, keyed by connector id; same half-open protocol.
    pub dependencies: IndexMap<ConnectorId, DependencyBuilder>,

    /// Class name index for the by-name fallback lookups (array parameter
    /// types, exception types). First registration wins.
    class_names: HashMap<String, ElementId>,
    /// Maps a package-backing element id to its package id, for connector
    /// endpoints that reference the package as an element.
    package_elements: HashMap<ElementId, ElementId>,

    /// First-seen guid registrations.
    guids: HashMap<Guid, GuidOwner>,
    /// Guids registered more than once: first-seen owner plus every
    /// latecomer, in registration order.
    duplicates: IndexMap<Guid, Vec<GuidOwner>>,

    /// Recoverable-defect accounting, returned beside the model.
    pub report: BuildReport,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a builder's guid. A second registration of the same guid
    /// moves the original and the newcomer into the duplicates table and
    /// warns; construction always proceeds.
    pub fn register_guid(&mut self, guid: Guid, owner: GuidOwner) {
        if let Some(first) = self.guids.get(&guid) {
            warn!(
                guid = guid.as_string(),
                first = first.name,
                duplicate = owner.name;
                "duplicate guid registration",
            );
            let entry = self
                .duplicates
                .entry(guid)
                .or_insert_with(|| vec![first.clone()]);
            entry.push(owner);
        } else {
            self.guids.insert(guid, owner);
        }
    }

    /// Index a class under its name for by-name fallback resolution.
    /// The first class to claim a name keeps it.
    pub fn register_class_name(&mut self, name: &str, id: ElementId) {
        self.class_names.entry(name.to_string()).or_insert(id);
    }

    pub fn class_by_name(&self, name: &str) -> Option<ElementId> {
        self.class_names.get(name).copied()
    }

    /// Record the element row that backs a package.
    pub fn register_package_element(&mut self, element: ElementId, package: ElementId) {
        self.package_elements.insert(element, package);
    }

    /// The package backed by the given element id, if any.
    pub fn package_for_element(&self, element: ElementId) -> Option<ElementId> {
        self.package_elements.get(&element).copied()
    }

    /// Record an ordering-repair fallback for the report.
    pub fn record_ordering_collision(&mut self, group: impl Into<String>) {
        self.report.ordering_collisions.push(group.into());
    }

    /// Move the duplicate-guid table into the report. Called once, after
    /// the passes are done.
    pub fn finish_report(&mut self) {
        self.report.duplicate_guids = self
            .duplicates
            .drain(..)
            .map(|(guid, owners)| DuplicateGuid { guid, owners })
            .collect();
        self.report.packages = self.packages.len();
        self.report.classes = self.classes.len();
        self.report.associations = self.associations.len();
        self.report.dependencies = self.dependencies.len();
    }
}

/// Convenience constructor for guid owners.
pub fn guid_owner(kind: EntityKind, id: Option<ElementId>, name: &str) -> GuidOwner {
    GuidOwner {
        kind,
        id,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_guids_are_tracked_not_resolved() {
        let mut ctx = BuildContext::new();
        let guid = Guid::new("{DUP}");

        ctx.register_guid(
            guid,
            guid_owner(EntityKind::Class, Some(ElementId(1)), "First"),
        );
        ctx.register_guid(
            guid,
            guid_owner(EntityKind::Class, Some(ElementId(2)), "Second"),
        );
        ctx.register_guid(
            guid,
            guid_owner(EntityKind::Attribute, Some(ElementId(3)), "Third"),
        );

        ctx.finish_report();
        assert_eq!(ctx.report.duplicate_guids.len(), 1);
        let dup = &ctx.report.duplicate_guids[0];
        assert_eq!(dup.guid, guid);
        // First-seen owner plus both latecomers, in registration order.
        assert_eq!(dup.owners.len(), 3);
        assert_eq!(dup.owners[0].name, "First");
        assert_eq!(dup.owners[1].name, "Second");
        assert_eq!(dup.owners[2].name, "Third");
    }

    #[test]
    fn unique_guids_stay_out_of_the_report() {
        let mut ctx = BuildContext::new();
        ctx.register_guid(
            Guid::new("{A}"),
            guid_owner(EntityKind::Package, Some(ElementId(1)), "A"),
        );
        ctx.register_guid(
            Guid::new("{B}"),
            guid_owner(EntityKind::Package, Some(ElementId(2)), "B"),
        );

        ctx.finish_report();
        assert!(ctx.report.duplicate_guids.is_empty());
    }

    #[test]
    fn first_class_keeps_its_name() {
        let mut ctx = BuildContext::new();
        ctx.register_class_name("Account", ElementId(1));
        ctx.register_class_name("Account", ElementId(2));

        assert_eq!(ctx.class_by_name("Account"), Some(ElementId(1)));
        assert_eq!(ctx.class_by_name("Missing"), None);
    }
}
