//! Error path integration tests.
//!
//! These tests verify that invalid inputs end the run with a non-zero exit
//! status and a message naming the problem.

use std::fs;

use tempfile::TempDir;

use crate::helpers::{las_bytes, overlap, random_sequence, run_fgovl, stderr, write_db, write_las};

struct Inputs {
    dir: TempDir,
    db: String,
    las: String,
}

fn inputs(las: Vec<u8>) -> Inputs {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let seqs = vec![random_sequence(1000, 1), random_sequence(1000, 2)];
    let db = write_db(dir.path(), "reads", &seqs).display().to_string();
    let path = dir.path().join("reads.las");
    fs::write(&path, las).unwrap();
    Inputs { las: path.display().to_string(), dir, db }
}

fn valid_las() -> Vec<u8> {
    las_bytes(100, &[overlap(0, 1, false, (0, 500), (500, 1000))], 2)
}

fn falcon_error(inputs: &Inputs, extra: &[&str]) -> String {
    let mut args = vec!["falcon", "--db", inputs.db.as_str(), "--las", inputs.las.as_str()];
    args.extend_from_slice(extra);
    let result = run_fgovl(&args);
    assert!(!result.status.success(), "falcon unexpectedly succeeded");
    stderr(&result)
}

#[test]
fn test_missing_las_file() {
    let inputs = inputs(valid_las());
    let missing = inputs.dir.path().join("missing.las").display().to_string();
    let result = run_fgovl(["falcon", "--db", inputs.db.as_str(), "--las", missing.as_str()]);
    assert!(!result.status.success());
    assert!(stderr(&result).contains("File does not exist"), "{}", stderr(&result));
}

#[test]
fn test_missing_database() {
    let inputs = inputs(valid_las());
    let missing = inputs.dir.path().join("missing.db").display().to_string();
    let result = run_fgovl(["m4", "--db", missing.as_str(), "--las", inputs.las.as_str()]);
    assert!(!result.status.success());
    assert!(stderr(&result).contains("Database does not exist"), "{}", stderr(&result));
}

#[test]
fn test_zero_trace_spacing() {
    let inputs = inputs(las_bytes(0, &[], 0));
    let err = falcon_error(&inputs, &[]);
    assert!(err.contains("trace spacing is zero"), "{err}");
}

#[test]
fn test_truncated_las() {
    let mut bytes = valid_las();
    bytes[0] = 2;
    let inputs = inputs(bytes);
    let err = falcon_error(&inputs, &[]);
    assert!(err.contains("truncated"), "{err}");
}

#[test]
fn test_read_index_out_of_range() {
    let inputs = inputs(valid_las());
    let las = write_las(inputs.dir.path(), "bad.las", &[overlap(0, 7, false, (0, 500), (0, 500))]);
    let result =
        run_fgovl(["falcon", "--db", inputs.db.as_str(), "--las", las.to_str().unwrap()]);
    assert!(!result.status.success());
    assert!(stderr(&result).contains("Read index 7 is out of range"), "{}", stderr(&result));
}

#[test]
fn test_zero_max_hits() {
    let inputs = inputs(valid_las());
    let err = falcon_error(&inputs, &["--max-hits", "0"]);
    assert!(err.contains("max-hits"), "{err}");
}

#[test]
fn test_empty_range() {
    let inputs = inputs(valid_las());
    let err = falcon_error(&inputs, &["2-1"]);
    assert!(err.contains("Empty range"), "{err}");
}

#[test]
fn test_malformed_range() {
    let inputs = inputs(valid_las());
    let err = falcon_error(&inputs, &["1-x"]);
    assert!(err.contains("not an integer range") || err.contains("not a valid index"), "{err}");
}

#[test]
fn test_ranges_conflict_with_read_list() {
    let inputs = inputs(valid_las());
    let list = inputs.dir.path().join("reads.txt");
    fs::write(&list, "1").unwrap();
    let err = falcon_error(&inputs, &["--read-list", list.to_str().unwrap(), "1"]);
    assert!(err.contains("cannot be used with"), "{err}");
}
