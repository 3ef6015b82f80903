//! Integration tests for the m4 command.

use std::fs;

use tempfile::TempDir;

use crate::helpers::{overlap, random_sequence, run_fgovl, stderr, write_db, write_las};

fn run_m4(extra: &[&str]) -> String {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let seqs: Vec<String> = [3000, 2000, 1500, 4000]
        .iter()
        .zip(1u64..)
        .map(|(&len, seed)| random_sequence(len, seed))
        .collect();
    let db = write_db(dir.path(), "reads", &seqs);
    let mut with_diffs = overlap(2, 0, false, (0, 1000), (500, 1500));
    with_diffs.path.diffs = 100;
    let las = write_las(
        dir.path(),
        "reads.las",
        &[
            overlap(0, 1, false, (1000, 3000), (0, 2000)),
            overlap(0, 2, true, (0, 1500), (0, 1500)),
            overlap(1, 0, false, (0, 2000), (1000, 3000)),
            overlap(2, 3, false, (0, 1500), (2000, 3500)),
            with_diffs,
        ],
    );
    let output = dir.path().join("reads.m4");

    let mut args = vec![
        "m4".to_string(),
        "--db".to_string(),
        db.display().to_string(),
        "--las".to_string(),
        las.display().to_string(),
        "--output".to_string(),
        output.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| (*s).to_string()));
    let result = run_fgovl(&args);
    assert!(result.status.success(), "m4 failed: {}", stderr(&result));
    fs::read_to_string(&output).expect("Failed to read output")
}

const LINES: [&str; 5] = [
    "000000000 000000001 -2000 100.00 0 1000 3000 3000 0 0 2000 2000 contains",
    "000000000 000000002 -1500 100.00 0 0 1500 3000 1 0 1500 1500 contains",
    "000000001 000000000 -2000 100.00 0 0 2000 2000 0 1000 3000 3000 contained",
    "000000002 000000003 -1500 100.00 0 0 1500 1500 0 2000 3500 4000 contained",
    "000000002 000000000 -1000 90.00 0 0 1000 1500 0 500 1500 3000 overlap",
];

#[test]
fn test_m4_lists_every_overlap() {
    let out = run_m4(&[]);
    assert_eq!(out.lines().collect::<Vec<_>>(), LINES);
}

#[test]
fn test_m4_proper_overlaps_only() {
    let out = run_m4(&["--proper-overlaps-only"]);
    assert_eq!(out.lines().collect::<Vec<_>>(), LINES[..4]);
}

#[test]
fn test_m4_ranges() {
    let out = run_m4(&["1", "3"]);
    let expected: Vec<&str> = vec![LINES[0], LINES[1], LINES[3], LINES[4]];
    assert_eq!(out.lines().collect::<Vec<_>>(), expected);
}
