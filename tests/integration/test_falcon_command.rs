//! Integration tests for the falcon command.

use std::fs;
use std::path::{Path, PathBuf};

use fgovl_lib::las::OverlapRecord;
use tempfile::TempDir;

use crate::helpers::{overlap, random_sequence, revcomp, run_fgovl, stderr, write_db, write_las};

/// Four reads: 3000, 2000, 1500 and 4000 bases.
fn sequences() -> Vec<String> {
    [3000, 2000, 1500, 4000]
        .iter()
        .zip(1u64..)
        .map(|(&len, seed)| random_sequence(len, seed))
        .collect()
}

/// Overlaps of A-reads 0, 1 and 2, sorted by A-read.
fn records() -> Vec<OverlapRecord> {
    vec![
        overlap(0, 1, false, (1000, 3000), (0, 2000)),
        overlap(0, 2, true, (0, 1500), (0, 1500)),
        overlap(1, 0, false, (0, 2000), (1000, 3000)),
        // A-read 2 lies entirely within B-read 3.
        overlap(2, 3, false, (0, 1500), (2000, 3500)),
        overlap(2, 0, false, (0, 1000), (500, 1500)),
    ]
}

struct Fixture {
    dir: TempDir,
    db: PathBuf,
    las: PathBuf,
    seqs: Vec<String>,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let seqs = sequences();
        let db = write_db(dir.path(), "reads", &seqs);
        let las = write_las(dir.path(), "reads.las", &records());
        Self { dir, db, las, seqs }
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("consensus_input.txt")
    }

    /// Runs falcon writing to the fixture's output file and returns its content.
    fn run(&self, extra: &[&str]) -> String {
        let output = self.output();
        let mut args = vec![
            "falcon".to_string(),
            "--db".to_string(),
            self.db.display().to_string(),
            "--las".to_string(),
            self.las.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| (*s).to_string()));
        let result = run_fgovl(&args);
        assert!(result.status.success(), "falcon failed: {}", stderr(&result));
        read(&output)
    }

    /// The expected block of A-read 1.
    fn block_1(&self) -> String {
        format!("00000001 {}\n00000000 {}\n+ +\n", self.seqs[1], &self.seqs[0][1000..3000])
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read output")
}

#[test]
fn test_falcon_all_a_reads() {
    let fixture = Fixture::new();
    let seqs = &fixture.seqs;
    let expected = format!(
        "00000000 {}\n00000001 {}\n00000002 {}\n+ +\n{}00000002 {}\n00000003 {}\n00000000 {}\n+ +\n- -\n",
        seqs[0],
        seqs[1],
        revcomp(&seqs[2]),
        fixture.block_1(),
        seqs[2],
        &seqs[3][2000..3500],
        &seqs[0][500..1500],
    );
    assert_eq!(fixture.run(&[]), expected);
}

#[test]
fn test_falcon_max_hits_one() {
    let fixture = Fixture::new();
    let out = fixture.run(&["--max-hits", "1"]);
    let blocks: Vec<&str> = out.split("+ +\n").collect();
    assert_eq!(blocks.len(), 4, "{out}");
    assert_eq!(blocks[0], format!("00000000 {}\n00000001 {}\n", fixture.seqs[0], fixture.seqs[1]));
    assert_eq!(blocks[2].lines().count(), 2);
    assert_eq!(blocks[3], "- -\n");
}

#[test]
fn test_falcon_single_range() {
    let fixture = Fixture::new();
    assert_eq!(fixture.run(&["2"]), format!("{}- -\n", fixture.block_1()));
}

#[test]
fn test_falcon_open_ended_range() {
    let fixture = Fixture::new();
    let out = fixture.run(&["2-$"]);
    assert!(out.starts_with(&fixture.block_1()), "{out}");
    assert!(out.contains("00000002 "));
    assert!(!out.starts_with("00000000 "));
}

#[test]
fn test_falcon_range_without_overlaps_writes_only_terminator() {
    let fixture = Fixture::new();
    assert_eq!(fixture.run(&["$"]), "- -\n");
}

#[test]
fn test_falcon_read_list() {
    let fixture = Fixture::new();
    let list = fixture.dir.path().join("reads.txt");
    fs::write(&list, "2\n").unwrap();
    let out = fixture.run(&["--read-list", &list.display().to_string()]);
    assert_eq!(out, format!("{}- -\n", fixture.block_1()));
}

#[test]
fn test_falcon_skip_contained() {
    let fixture = Fixture::new();
    let out = fixture.run(&["--skip-contained"]);
    let expected_block = format!(
        "00000002 {}\n* *\n00000003 {}\n+ +\n- -\n",
        fixture.seqs[2],
        &fixture.seqs[3][2000..3500]
    );
    assert!(out.ends_with(&expected_block), "{out}");
    assert_eq!(out.matches("* *").count(), 1);
}

#[test]
fn test_falcon_is_idempotent() {
    let fixture = Fixture::new();
    let first = fixture.run(&["--group"]);
    let second = fixture.run(&["--group"]);
    assert_eq!(first, second);
}

#[test]
fn test_falcon_grouping_merges_chained_overlaps() {
    let dir = TempDir::new().unwrap();
    let seqs = sequences();
    let db = write_db(dir.path(), "reads", &seqs);
    // Two pieces of one alignment of B-read 3 against A-read 0, 100 bases apart.
    let las = write_las(
        dir.path(),
        "chained.las",
        &[
            overlap(0, 3, false, (0, 1000), (1000, 2000)),
            overlap(0, 3, false, (1100, 2000), (2100, 3000)),
        ],
    );
    let output = dir.path().join("out.txt");
    let args = [
        "falcon",
        "--db",
        db.to_str().unwrap(),
        "--las",
        las.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ];

    let result = run_fgovl(args.iter().chain(["--group"].iter()));
    assert!(result.status.success(), "{}", stderr(&result));
    assert_eq!(
        read(&output),
        format!("00000000 {}\n00000003 {}\n+ +\n- -\n", seqs[0], &seqs[3][1000..3000])
    );

    let result = run_fgovl(args);
    assert!(result.status.success(), "{}", stderr(&result));
    assert_eq!(read(&output).lines().filter(|l| l.starts_with("00000003 ")).count(), 2);
}

#[test]
fn test_falcon_writes_to_stdout() {
    let fixture = Fixture::new();
    let result = run_fgovl([
        "falcon",
        "--db",
        fixture.db.to_str().unwrap(),
        "--las",
        fixture.las.to_str().unwrap(),
        "2",
    ]);
    assert!(result.status.success(), "{}", stderr(&result));
    assert_eq!(String::from_utf8(result.stdout).unwrap(), format!("{}- -\n", fixture.block_1()));
}

#[test]
fn test_falcon_separate_b_database() {
    let dir = TempDir::new().unwrap();
    let a_seqs = vec![random_sequence(3000, 11)];
    let b_seqs = vec![random_sequence(500, 12), random_sequence(2500, 13)];
    let a_db = write_db(dir.path(), "a", &a_seqs);
    let b_db = write_db(dir.path(), "b", &b_seqs);
    let las = write_las(dir.path(), "a.b.las", &[overlap(0, 1, true, (500, 2500), (300, 2300))]);
    let output = dir.path().join("out.txt");

    let result = run_fgovl([
        "falcon",
        "-d",
        a_db.to_str().unwrap(),
        "-b",
        b_db.to_str().unwrap(),
        "-l",
        las.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);
    assert!(result.status.success(), "{}", stderr(&result));
    let slice = revcomp(&b_seqs[1])[300..2300].to_string();
    assert_eq!(read(&output), format!("00000000 {}\n00000001 {slice}\n+ +\n- -\n", a_seqs[0]));
}

#[test]
fn test_falcon_metrics_file() {
    let fixture = Fixture::new();
    let metrics = fixture.dir.path().join("metrics.txt");
    fixture.run(&["--metrics", &metrics.display().to_string()]);

    let content = read(&metrics);
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    let header: Vec<&str> = lines[0].split('\t').collect();
    let values: Vec<&str> = lines[1].split('\t').collect();
    let value_of = |name: &str| values[header.iter().position(|h| *h == name).unwrap()];
    assert_eq!(value_of("records_read"), "5");
    assert_eq!(value_of("a_reads"), "3");
    assert_eq!(value_of("hits_emitted"), "5");
}
