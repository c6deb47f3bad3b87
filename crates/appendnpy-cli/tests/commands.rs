#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Command behaviour against real files

use appendnpy_cli::commands::{check, concat, info};
use appendnpy_store::format::write_exact;
use appendnpy_store::{
    AppendableArray, ArrayView, DType, Header, StoreConfig, TypeKind, read_array,
};
use pretty_assertions::assert_eq;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn fast() -> StoreConfig {
    StoreConfig::new().with_sync_on_append(false)
}

fn write_rows(path: &Path, rows: &[i64]) {
    let mut store = AppendableArray::open_with_config(path, fast()).unwrap();
    let shape = vec![rows.len() as u64 / 2, 2];
    store.append(&ArrayView::new(shape, rows).unwrap()).unwrap();
    store.close().unwrap();
}

#[test]
fn test_info_reports_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.npy");
    write_rows(&path, &[1, 2, 3, 4]);

    let report = info(&path).unwrap();
    assert_eq!(report.shape, vec![2, 2]);
    assert_eq!(report.version, "1.0");
    assert_eq!(report.payload_offset % 64, 0);
    assert_eq!(report.declared_payload, 32);
    assert_eq!(report.physical_payload, 32);
    assert!(report.appendable);

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["shape"], serde_json::json!([2, 2]));
    assert_eq!(json["appendable"], serde_json::json!(true));
    assert!(report.to_string().contains("appendable:     yes"));
}

#[test]
fn test_check_flags_trailing_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.npy");
    write_rows(&path, &[1, 2]);
    assert!(check(&path).unwrap().consistent);

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0; 8]).unwrap();
    drop(file);

    let report = check(&path).unwrap();
    assert!(!report.consistent);
    assert_eq!(report.trailing_bytes, 8);
    assert_eq!(report.missing_bytes, 0);
}

#[test]
fn test_check_flags_truncation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.npy");
    write_rows(&path, &[1, 2, 3, 4]);
    let len = std::fs::metadata(&path).unwrap().len();
    OpenOptions::new()
        .write(true)
        .open(&path)
        .unwrap()
        .set_len(len - 8)
        .unwrap();

    let report = check(&path).unwrap();
    assert!(!report.consistent);
    assert_eq!(report.missing_bytes, 8);
    assert!(report.to_string().contains("truncated"));
}

#[test]
fn test_concat_appends_in_order() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.npy");
    let b = dir.path().join("b.npy");
    let out = dir.path().join("out.npy");
    write_rows(&a, &[1, 2, 3, 4]);

    // Inputs need not be appendable themselves
    let mut payload = Vec::new();
    for v in [5i64, 6] {
        payload.extend_from_slice(&v.to_ne_bytes());
    }
    let header = Header::new(DType::native(TypeKind::Int, 8), vec![1, 2]);
    write_exact(&mut File::create(&b).unwrap(), header, &payload).unwrap();

    let report = concat(&out, &[a.clone(), b], fast()).unwrap();
    assert_eq!(report.inputs, 2);
    assert_eq!(report.rows_appended, 3);
    assert_eq!(report.shape, vec![3, 2]);

    // Running again keeps appending to the same output
    concat(&out, &[a], fast()).unwrap();
    let array = read_array::<i64>(&out).unwrap();
    assert_eq!(array.shape(), &[5, 2]);
    assert_eq!(array.into_vec(), vec![1, 2, 3, 4, 5, 6, 1, 2, 3, 4]);
}

#[test]
fn test_concat_rejects_mismatched_rows() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.npy");
    let c = dir.path().join("c.npy");
    let out = dir.path().join("out.npy");
    write_rows(&a, &[1, 2]);

    let mut store = AppendableArray::open_with_config(&c, fast()).unwrap();
    store.append(&ArrayView::from_slice(&[7i64, 8, 9])).unwrap();
    store.close().unwrap();

    let err = concat(&out, &[a, c.clone()], fast()).unwrap_err();
    assert!(format!("{err:#}").contains("Shape mismatch"));
    assert!(err.to_string().contains(&c.display().to_string()));

    // The first input's rows are kept
    assert_eq!(read_array::<i64>(&out).unwrap().into_vec(), vec![1, 2]);
}
