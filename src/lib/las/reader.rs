//! Streaming decoder for `.las` overlap files.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use anyhow::{Context, Result};

use super::{LAS_HEADER_LEN, LAS_RECORD_LEN, LasHeader, OverlapFlags, OverlapPath, OverlapRecord};
use crate::errors::FgovlError;

/// Initial capacity of the reusable trace vector.
const INITIAL_TRACE_CAPACITY: usize = 1000;

/// One decoded record together with its trace points.
///
/// The trace borrows the reader's reusable buffer and is only valid until the
/// next call to [`LasReader::next_record`].
#[derive(Debug)]
pub struct LasRecord<'a> {
    /// The fixed-layout part of the record.
    pub overlap: OverlapRecord,
    /// Trace points, widened to 16 bits.
    pub trace: &'a [u16],
}

/// Reads overlap records one at a time from a `.las` stream.
pub struct LasReader<R> {
    inner: R,
    header: LasHeader,
    /// Records not yet read, per the header count.
    remaining: i64,
    /// Index of the next record (for error messages).
    next_index: i64,
    /// Reusable trace vector.
    trace: Vec<u16>,
    /// Reusable raw trace bytes.
    raw: Vec<u8>,
    /// Description of the source for error messages.
    source: String,
}

impl LasReader<BufReader<File>> {
    /// Opens a `.las` file and reads its header.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its header is malformed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open LAS file: {}", path.display()))?;
        Self::new(BufReader::new(file), path.display().to_string())
    }
}

impl<R: Read> LasReader<R> {
    /// Wraps a stream positioned at the start of a `.las` file and reads the header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is short, declares a negative record
    /// count, or has a trace spacing of zero.
    pub fn new(mut inner: R, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let mut novl_buf = [0u8; 8];
        let mut tspace_buf = [0u8; LAS_HEADER_LEN - 8];
        inner.read_exact(&mut novl_buf).and_then(|()| inner.read_exact(&mut tspace_buf)).map_err(
            |e| {
                let reason = if e.kind() == ErrorKind::UnexpectedEof {
                    "file is too short to hold a header".to_string()
                } else {
                    e.to_string()
                };
                format_error(&source, reason)
            },
        )?;

        let novl = i64::from_le_bytes(novl_buf);
        let tspace = i32::from_le_bytes(tspace_buf);

        if tspace == 0 {
            return Err(format_error(&source, "trace spacing is zero".to_string()).into());
        }
        if tspace < 0 {
            return Err(format_error(&source, format!("negative trace spacing {tspace}")).into());
        }
        if novl < 0 {
            return Err(format_error(&source, format!("negative record count {novl}")).into());
        }

        Ok(Self {
            inner,
            header: LasHeader { novl, tspace },
            remaining: novl,
            next_index: 0,
            trace: Vec::with_capacity(INITIAL_TRACE_CAPACITY),
            raw: Vec::with_capacity(INITIAL_TRACE_CAPACITY * 2),
            source,
        })
    }

    /// The file header.
    #[must_use]
    pub fn header(&self) -> LasHeader {
        self.header
    }

    /// Number of records not yet read.
    #[must_use]
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    /// Reads the next record, or `None` once the header's record count is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the record or its trace is truncated or malformed.
    pub fn next_record(&mut self) -> Result<Option<LasRecord<'_>>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let index = self.next_index;
        let mut buf = [0u8; LAS_RECORD_LEN];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| self.truncated(index, "record", &e))?;
        let overlap = decode_record(&buf).map_err(|reason| {
            format_error(&self.source, format!("record {index}: {reason}"))
        })?;

        self.read_trace(index, overlap.path.tlen)?;

        self.remaining -= 1;
        self.next_index += 1;
        Ok(Some(LasRecord { overlap, trace: &self.trace }))
    }

    /// Reads `tlen` trace elements into the reusable trace vector, growing it
    /// only when the trace is longer than its current capacity.
    fn read_trace(&mut self, index: i64, tlen: i32) -> Result<()> {
        let tlen = usize::try_from(tlen).map_err(|_| {
            format_error(&self.source, format!("record {index}: negative trace length {tlen}"))
        })?;

        if tlen > self.trace.capacity() {
            let target = tlen + tlen / 5 + 100;
            self.trace.reserve(target - self.trace.len());
        }

        let nbytes = tlen * self.header.trace_bytes();
        self.raw.resize(nbytes, 0);
        if let Err(e) = self.inner.read_exact(&mut self.raw) {
            return Err(self.truncated(index, "trace", &e).into());
        }

        self.trace.clear();
        if self.header.small_trace() {
            self.trace.extend(self.raw.iter().map(|&b| u16::from(b)));
        } else {
            self.trace
                .extend(self.raw.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]])));
        }
        Ok(())
    }

    fn truncated(&self, index: i64, what: &str, e: &std::io::Error) -> FgovlError {
        let reason = if e.kind() == ErrorKind::UnexpectedEof {
            format!("{what} {index} is truncated (header declares {} records)", self.header.novl)
        } else {
            format!("failed reading {what} {index}: {e}")
        };
        format_error(&self.source, reason)
    }
}

fn format_error(source: &str, reason: String) -> FgovlError {
    FgovlError::InvalidFileFormat { file_type: "LAS".to_string(), path: source.to_string(), reason }
}

/// Decodes the fixed 40-byte record layout.
fn decode_record(buf: &[u8; LAS_RECORD_LEN]) -> std::result::Result<OverlapRecord, String> {
    let word = |i: usize| -> [u8; 4] { [buf[i * 4], buf[i * 4 + 1], buf[i * 4 + 2], buf[i * 4 + 3]] };
    let int = |i: usize| i32::from_le_bytes(word(i));

    let path = OverlapPath {
        tlen: int(0),
        diffs: int(1),
        abpos: int(2),
        bbpos: int(3),
        aepos: int(4),
        bepos: int(5),
    };
    let flags = OverlapFlags::new(u32::from_le_bytes(word(6)));
    let aread = u32::try_from(int(7)).map_err(|_| format!("negative A-read index {}", int(7)))?;
    let bread = u32::try_from(int(8)).map_err(|_| format!("negative B-read index {}", int(8)))?;

    Ok(OverlapRecord { aread, bread, flags, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::las::COMP_FLAG;
    use std::io::Cursor;

    fn header_bytes(novl: i64, tspace: i32) -> Vec<u8> {
        let mut bytes = novl.to_le_bytes().to_vec();
        bytes.extend_from_slice(&tspace.to_le_bytes());
        bytes
    }

    fn record(aread: u32, bread: u32, tlen: i32) -> OverlapRecord {
        OverlapRecord {
            aread,
            bread,
            flags: OverlapFlags::new(COMP_FLAG),
            path: OverlapPath { abpos: 10, aepos: 110, bbpos: 20, bepos: 120, diffs: 3, tlen },
        }
    }

    #[test]
    fn test_reads_small_trace_records() {
        let mut bytes = header_bytes(2, 100);
        bytes.extend_from_slice(&record(0, 1, 4).to_bytes());
        bytes.extend_from_slice(&[1, 50, 2, 50]);
        bytes.extend_from_slice(&record(0, 2, 0).to_bytes());

        let mut reader = LasReader::new(Cursor::new(bytes), "test").unwrap();
        assert_eq!(reader.header(), LasHeader { novl: 2, tspace: 100 });

        let first = reader.next_record().unwrap().unwrap();
        assert_eq!(first.overlap, record(0, 1, 4));
        assert_eq!(first.trace, &[1, 50, 2, 50]);

        let second = reader.next_record().unwrap().unwrap();
        assert_eq!(second.overlap.bread, 2);
        assert!(second.trace.is_empty());

        assert!(reader.next_record().unwrap().is_none());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reads_wide_trace_records() {
        let mut bytes = header_bytes(1, 500);
        bytes.extend_from_slice(&record(3, 4, 2).to_bytes());
        bytes.extend_from_slice(&300u16.to_le_bytes());
        bytes.extend_from_slice(&7u16.to_le_bytes());

        let mut reader = LasReader::new(Cursor::new(bytes), "test").unwrap();
        let rec = reader.next_record().unwrap().unwrap();
        assert_eq!(rec.trace, &[300, 7]);
    }

    #[test]
    fn test_trace_buffer_grows_for_long_traces() {
        let tlen = 5000;
        let mut bytes = header_bytes(1, 100);
        bytes.extend_from_slice(&record(0, 1, tlen).to_bytes());
        bytes.extend(std::iter::repeat_n(9u8, tlen as usize));

        let mut reader = LasReader::new(Cursor::new(bytes), "test").unwrap();
        let rec = reader.next_record().unwrap().unwrap();
        assert_eq!(rec.trace.len(), 5000);
        assert!(rec.trace.iter().all(|&t| t == 9));
    }

    #[test]
    fn test_zero_trace_spacing_is_fatal() {
        let result = LasReader::new(Cursor::new(header_bytes(0, 0)), "zero.las");
        let msg = result.err().unwrap().to_string();
        assert!(msg.contains("trace spacing is zero"), "{msg}");
    }

    #[test]
    fn test_short_header_is_fatal() {
        let result = LasReader::new(Cursor::new(vec![1, 2, 3]), "short.las");
        let msg = result.err().unwrap().to_string();
        assert!(msg.contains("too short"), "{msg}");
    }

    #[test]
    fn test_truncated_record_is_fatal() {
        let mut bytes = header_bytes(2, 100);
        bytes.extend_from_slice(&record(0, 1, 0).to_bytes());

        let mut reader = LasReader::new(Cursor::new(bytes), "test").unwrap();
        assert!(reader.next_record().unwrap().is_some());
        let msg = reader.next_record().err().unwrap().to_string();
        assert!(msg.contains("record 1 is truncated"), "{msg}");
    }

    #[test]
    fn test_truncated_trace_is_fatal() {
        let mut bytes = header_bytes(1, 100);
        bytes.extend_from_slice(&record(0, 1, 10).to_bytes());
        bytes.extend_from_slice(&[1, 2, 3]);

        let mut reader = LasReader::new(Cursor::new(bytes), "test").unwrap();
        let msg = reader.next_record().err().unwrap().to_string();
        assert!(msg.contains("trace 0 is truncated"), "{msg}");
    }
}
