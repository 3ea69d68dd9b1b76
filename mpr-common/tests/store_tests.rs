//! Integration tests for the file-backed record store
//!
//! Tests cover:
//! - Empty-collection fallbacks for missing, invalid and non-array documents
//! - Hand-edited elements surviving status updates and appends
//! - Save/load fidelity with non-ASCII text written unescaped
//! - Status updates touching exactly one record
//! - Write lock preventing lost appends under concurrency
//! - Same-second upload name collisions (known limitation)

use chrono::NaiveDate;
use mpr_common::{
    DisappearanceLocation, Error, MissingPersonRecord, RecordStatus, RecordStore, UploadDir,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test helper: file-backed store inside a fresh temp dir
fn setup_store() -> (TempDir, PathBuf, RecordStore) {
    let tmp = TempDir::new().expect("Should create temp dir");
    let path = tmp.path().join("dados_desaparecidos.json");
    let store = RecordStore::file(&path);
    (tmp, path, store)
}

fn sample(name: &str, city: &str) -> MissingPersonRecord {
    MissingPersonRecord {
        full_name: Some(name.to_string()),
        birth_date: Some("1990-05-17".to_string()),
        contact_phone: Some("(81) 99999-0000".to_string()),
        sex: Some("Não Informado".to_string()),
        disappearance_date: Some("2025-01-02".to_string()),
        disappearance_location: DisappearanceLocation {
            city: Some(city.to_string()),
            state: Some("PE".to_string()),
            reference_point: Some("Praça do Derby".to_string()),
        },
        characteristics: Some("Cicatriz no braço esquerdo".to_string()),
        photo_url: Some("uploads/20250102101010_foto.jpg".to_string()),
        status: RecordStatus::Missing,
        ..Default::default()
    }
}

fn with_id(id: &str, record: MissingPersonRecord) -> Value {
    serde_json::to_value(MissingPersonRecord { id: id.to_string(), ..record }).unwrap()
}

// =============================================================================
// Load fallbacks
// =============================================================================

#[test]
fn test_load_nonexistent_document_is_empty() {
    let (_tmp, path, store) = setup_store();
    assert!(!path.exists());
    assert!(store.load().is_empty());
}

#[test]
fn test_load_invalid_json_is_empty() {
    let (_tmp, path, store) = setup_store();
    std::fs::write(&path, "not json").unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn test_load_non_array_top_level_is_empty() {
    let (_tmp, path, store) = setup_store();
    std::fs::write(&path, r#"{"a":1}"#).unwrap();
    assert!(store.load().is_empty());
}

// =============================================================================
// Save fidelity
// =============================================================================

#[test]
fn test_save_then_load_round_trips() {
    let (_tmp, _path, store) = setup_store();
    let records = vec![
        with_id("001", sample("José Conceição", "Olinda")),
        with_id("002", sample("Iara Guaraní", "São Paulo")),
    ];

    store.save(&records).unwrap();
    assert_eq!(store.load(), records);
}

#[test]
fn test_save_writes_non_ascii_unescaped_and_indented() {
    let (_tmp, path, store) = setup_store();
    store
        .save(&[with_id("001", sample("José Conceição", "Olinda"))])
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("José Conceição"));
    assert!(!text.contains("\\u00e9"));
    assert!(text.starts_with("[\n  {\n    \"id\": \"001\""));
}

#[test]
fn test_save_overwrites_previous_document() {
    let (_tmp, path, store) = setup_store();
    std::fs::write(&path, "garbage that is not json").unwrap();

    store.save(&[]).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
}

// =============================================================================
// Status updates
// =============================================================================

#[tokio::test]
async fn test_update_status_changes_only_target() {
    let (_tmp, _path, store) = setup_store();
    store.append(sample("Ana", "Recife")).await.unwrap();
    store.append(sample("Bruno", "Caruaru")).await.unwrap();
    store.append(sample("Carla", "Petrolina")).await.unwrap();
    let before = store.load();

    let updated = store.update_status("002", RecordStatus::Found).await.unwrap();
    assert_eq!(updated["nomeCompleto"], "Bruno");

    let after = store.load();
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1]["status"], "Encontrada");
    assert_eq!(after[2], before[2]);
}

// =============================================================================
// Hand-edited documents
// =============================================================================

const LOOSE_DOCUMENT: &str = r#"[
  {"id": "001", "nomeCompleto": "Ana", "telefoneContato": 81999990000, "localDesaparecimento": null},
  {"id": "002", "nomeCompleto": "Bia", "status": null},
  {"nomeCompleto": "Sem id", "observacao": "importado"}
]"#;

#[tokio::test]
async fn test_update_status_keeps_loosely_typed_elements() {
    let (_tmp, path, store) = setup_store();
    std::fs::write(&path, LOOSE_DOCUMENT).unwrap();
    let before = store.load();

    store.update_status("002", RecordStatus::Found).await.unwrap();

    let after = store.load();
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], json!({"id": "002", "nomeCompleto": "Bia", "status": "Encontrada"}));
    assert_eq!(after[2], before[2]);
}

#[tokio::test]
async fn test_append_counts_every_element() {
    let (_tmp, path, store) = setup_store();
    std::fs::write(&path, LOOSE_DOCUMENT).unwrap();

    let appended = store.append(sample("Davi", "Recife")).await.unwrap();
    assert_eq!(appended.id, "004");

    let after = store.load();
    assert_eq!(after.len(), 4);
    assert_eq!(after[0]["telefoneContato"], json!(81999990000u64));
    assert_eq!(after[0]["localDesaparecimento"], Value::Null);
    assert_eq!(after[3]["id"], "004");
}

#[tokio::test]
async fn test_update_status_absent_id_leaves_document() {
    let (_tmp, path, store) = setup_store();
    store.append(sample("Ana", "Recife")).await.unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let err = store.update_status("999", RecordStatus::Found).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[tokio::test]
async fn test_update_status_twice_is_idempotent() {
    let (_tmp, _path, store) = setup_store();
    store.append(sample("Ana", "Recife")).await.unwrap();

    store.update_status("001", RecordStatus::Found).await.unwrap();
    let once = store.load();
    store.update_status("001", RecordStatus::Found).await.unwrap();
    assert_eq!(store.load(), once);
}

#[test]
fn test_save_failure_is_storage_error() {
    let tmp = TempDir::new().unwrap();
    // Parent directory does not exist
    let store = RecordStore::file(tmp.path().join("nope").join("dados.json"));

    let err = store.save(&[]).unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}

// =============================================================================
// Concurrency seam
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_write_lock_keeps_every_concurrent_append() {
    let (_tmp, _path, store) = setup_store();
    let store = store.with_write_lock();

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.append(sample(&format!("Pessoa {i}"), "Natal")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let records = store.load();
    assert_eq!(records.len(), 20);
    let mut ids: Vec<_> = records.iter().map(|r| r["id"].to_string()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20, "ids must be unique when writes are serialized");
}

// =============================================================================
// Upload collisions
// =============================================================================

#[test]
fn test_same_second_same_name_uploads_overwrite() {
    let tmp = TempDir::new().unwrap();
    let dir = UploadDir::new(tmp.path().join("uploads"));
    dir.ensure_exists().unwrap();
    let now = NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();

    let first = dir.store_at(now, "foto.jpg", b"first").unwrap();
    let second = dir.store_at(now, "foto.jpg", b"second").unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(std::fs::read(&second.path).unwrap(), b"second");
    assert_eq!(std::fs::read_dir(dir.root()).unwrap().count(), 1);
}
