//! Tests for collection reconciliation.

use uuid::Uuid;

use super::{ReconcileError, RowPatch, plan};

#[test]
fn test_omitted_existing_row_is_deleted() {
    let keep = Uuid::new_v4();
    let drop = Uuid::new_v4();

    let result = plan(
        &[keep, drop],
        vec![RowPatch::Existing {
            id: keep,
            data: "kept",
        }],
    )
    .unwrap();

    assert_eq!(result.delete, vec![drop]);
    assert_eq!(result.update.len(), 1);
    assert!(result.insert.is_empty());
}

#[test]
fn test_new_rows_are_inserted() {
    let result = plan::<&str>(&[], vec![RowPatch::New { data: "a" }, RowPatch::New { data: "b" }])
        .unwrap();

    assert_eq!(result.insert, vec!["a", "b"]);
    assert!(result.update.is_empty());
    assert!(result.delete.is_empty());
}

#[test]
fn test_unknown_existing_id_rejected() {
    let ghost = Uuid::new_v4();
    let result = plan(&[], vec![RowPatch::Existing { id: ghost, data: () }]);

    assert_eq!(result.unwrap_err(), ReconcileError::UnknownRow(ghost));
}

#[test]
fn test_empty_payload_deletes_everything() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let result = plan::<()>(&[a, b], vec![]).unwrap();

    assert_eq!(result.delete, vec![a, b]);
}

#[test]
fn test_patch_deserializes_from_tagged_json() {
    let id = Uuid::new_v4();
    let json = format!(r#"{{"kind": "existing", "id": "{id}", "data": {{"name": "Eng"}}}}"#);
    let patch: RowPatch<serde_json::Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(patch.existing_id(), Some(id));

    let patch: RowPatch<serde_json::Value> =
        serde_json::from_str(r#"{"kind": "new", "data": {"name": "Ops"}}"#).unwrap();
    assert_eq!(patch.existing_id(), None);
}
