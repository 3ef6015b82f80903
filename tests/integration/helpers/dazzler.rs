//! Writers for the Dazzler files the commands read.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub use fgovl_dna::random_sequence;

use fgovl_dna::{ascii_to_codes, pack_bases};
use fgovl_lib::db::{DB_BEST, ReadInfo, index_header};
use fgovl_lib::las::{COMP_FLAG, OverlapFlags, OverlapPath, OverlapRecord};

/// Writes an untrimmed database `<dir>/<root>.db` holding `sequences` and
/// returns the stub path.
pub fn write_db(dir: &Path, root: &str, sequences: &[String]) -> PathBuf {
    let mut reads = Vec::with_capacity(sequences.len());
    let mut bps = Vec::new();
    for seq in sequences {
        reads.push(ReadInfo {
            rlen: i32::try_from(seq.len()).unwrap(),
            boff: bps.len() as i64,
            flags: DB_BEST,
            ..ReadInfo::default()
        });
        bps.extend(pack_bases(&ascii_to_codes(seq.as_bytes())));
    }

    let mut idx = index_header(&reads).to_vec();
    for read in &reads {
        idx.extend_from_slice(&read.to_bytes());
    }

    let stub = dir.join(format!("{root}.db"));
    fs::write(&stub, format!("files = 1\n{:9} reads reads\n", sequences.len())).unwrap();
    fs::write(dir.join(format!(".{root}.idx")), idx).unwrap();
    fs::write(dir.join(format!(".{root}.bps")), bps).unwrap();
    stub
}

/// Builds a trace-less overlap record.
pub fn overlap(aread: u32, bread: u32, comp: bool, a: (i32, i32), b: (i32, i32)) -> OverlapRecord {
    OverlapRecord {
        aread,
        bread,
        flags: OverlapFlags::new(if comp { COMP_FLAG } else { 0 }),
        path: OverlapPath { abpos: a.0, aepos: a.1, bbpos: b.0, bepos: b.1, diffs: 0, tlen: 0 },
    }
}

/// Encodes a LAS file holding `records`, each followed by `trace_len` zeroed
/// trace elements.
pub fn las_bytes(tspace: i32, records: &[OverlapRecord], trace_len: i32) -> Vec<u8> {
    let element_size = if tspace <= 125 { 1 } else { 2 };
    let mut bytes = (records.len() as i64).to_le_bytes().to_vec();
    bytes.extend_from_slice(&tspace.to_le_bytes());
    for record in records {
        let mut record = *record;
        record.path.tlen = trace_len;
        bytes.extend_from_slice(&record.to_bytes());
        bytes.extend(std::iter::repeat_n(0u8, trace_len as usize * element_size));
    }
    bytes
}

/// Writes a LAS file with a trace spacing of 100 and returns its path.
pub fn write_las(dir: &Path, name: &str, records: &[OverlapRecord]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, las_bytes(100, records, 4)).unwrap();
    path
}

/// Reverse complement of an ASCII sequence.
pub fn revcomp(seq: &str) -> String {
    String::from_utf8(fgovl_dna::reverse_complement(seq.as_bytes())).unwrap()
}
