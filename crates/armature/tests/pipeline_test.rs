//! End-to-end tests: JSON snapshot in, resolved model and report out.

use std::fs;

use tempfile::tempdir;

use armature::{BuildOptions, DirectoryImages, ExportPolicy, Snapshot, build_model};
use armature_core::{
    identifier::{ConnectorId, ElementId},
    typeref::TypeRef,
};

const SNAPSHOT: &str = r#"{
    "packages": [
        { "id": 10, "guid": "{PKG-CORE}", "name": "core", "owner_id": 0,
          "position": 1, "element_id": 110 },
        { "id": 11, "guid": "{PKG-SHARED}", "name": "shared", "owner_id": 0,
          "position": 2, "element_id": 111 }
    ],
    "elements": [
        { "id": 20, "guid": "{CLS-ORDER}", "name": "Order", "owner_id": 10,
          "object_type": "Class", "position": 1 },
        { "id": 21, "guid": "{CLS-ITEM}", "name": "Item", "owner_id": 10,
          "object_type": "Class", "position": 2 },
        { "id": 22, "guid": "{CLS-ID}", "name": "Identifier", "owner_id": 11,
          "object_type": "Class", "position": 1 }
    ],
    "attributes": [
        { "id": 30, "guid": "{ATTR-KEY}", "name": "key", "owner_id": 20,
          "position": 1, "type_id": 22, "type_name": "Identifier" }
    ],
    "operations": [
        { "id": 50, "guid": "{OP-ITEMS}", "name": "items", "owner_id": 20,
          "position": 1, "return_type_id": 0, "return_type_name": "Item[]" }
    ],
    "connectors": [
        { "id": 100, "guid": "{ASSOC-LINES}", "name": "lines",
          "connector_type": "Association", "direction": "Source -> Destination",
          "source_id": 20, "target_id": 21,
          "target_aggregation": "composite" },
        { "id": 200, "guid": "{DEP-PKG}", "connector_type": "Dependency",
          "source_id": 110, "target_id": 111 }
    ],
    "diagrams": [
        { "id": 60, "guid": "{DIAG-CORE}", "name": "core overview",
          "owner_id": 10, "diagram_type": "Class" }
    ]
}"#;

#[test]
fn snapshot_builds_into_a_resolved_model() {
    let snapshot = Snapshot::from_json(SNAPSHOT).expect("fixture parses");
    let (model, report) =
        build_model(&snapshot, &BuildOptions::default()).expect("fixture builds");

    assert_eq!(model.package_count(), 3);
    assert_eq!(model.class_count(), 3);
    assert_eq!(model.association_count(), 1);
    assert_eq!(model.dependency_count(), 1);

    // Cross-package attribute reference resolved.
    let order = model.class(ElementId(20)).unwrap();
    assert_eq!(
        order.attributes()[0].type_ref(),
        Some(TypeRef::Known(ElementId(22)))
    );

    // Array return resolved by trimmed name.
    let items = &order.operations()[0];
    assert_eq!(
        items.return_type().type_ref(),
        Some(TypeRef::Known(ElementId(21)))
    );

    // Composition end present with both classes registered symmetrically.
    let lines = model.association(ConnectorId(100)).unwrap();
    assert_eq!(lines.source().class(), ElementId(20));
    assert_eq!(lines.target().class(), ElementId(21));

    assert!(report.is_clean());
    assert_eq!(report.diagrams, 1);
}

#[test]
fn images_export_when_the_policy_allows() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("DIAG-CORE.png"), b"png").expect("write image");

    let snapshot = Snapshot::from_json(SNAPSHOT).expect("fixture parses");
    let options = BuildOptions {
        policy: ExportPolicy {
            package_diagrams: true,
            class_diagrams: true,
        },
        exporter: Box::new(DirectoryImages::new(dir.path())),
    };
    let (model, report) = build_model(&snapshot, &options).expect("fixture builds");

    let core = model.package(ElementId(10)).unwrap();
    let image = core.diagrams()[0].image().expect("image resolved");
    assert!(image.ends_with("DIAG-CORE.png"));
    assert!(report.image_export_failures.is_empty());
}

#[test]
fn missing_images_degrade_to_imageless_diagrams() {
    let dir = tempdir().expect("temp dir");

    let snapshot = Snapshot::from_json(SNAPSHOT).expect("fixture parses");
    let options = BuildOptions {
        policy: ExportPolicy {
            package_diagrams: true,
            class_diagrams: true,
        },
        exporter: Box::new(DirectoryImages::new(dir.path())),
    };
    let (model, report) = build_model(&snapshot, &options).expect("export failure is recoverable");

    let core = model.package(ElementId(10)).unwrap();
    assert!(core.diagrams()[0].image().is_none());
    assert_eq!(report.image_export_failures, vec!["core overview".to_string()]);
}
