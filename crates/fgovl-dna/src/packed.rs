//! Decoding of 2-bit packed reads.
//!
//! Dazzler stores every read as a run of bytes holding four bases each, the
//! first base of a byte in its two highest bits. Each base is encoded as
//! A=0, C=1, G=2, T=3.
//!
//! # Example
//!
//! ```
//! use fgovl_dna::packed::unpack_bases;
//!
//! let mut out = Vec::new();
//! // 0b00_01_10_11 -> A C G T
//! assert!(unpack_bases(&[0b0001_1011], 3, &mut out));
//! assert_eq!(out, vec![0, 1, 2]);
//! ```

/// Number of bytes holding `len` packed bases.
#[inline]
#[must_use]
pub const fn packed_len(len: usize) -> usize {
    len.div_ceil(4)
}

/// Unpacks `len` bases from `packed` into numeric codes (0..=3), replacing the
/// contents of `out`.
///
/// The output buffer is cleared but keeps its capacity so callers can reuse it
/// across reads.
///
/// Returns `false`, leaving `out` untouched, if `packed` holds fewer than
/// [`packed_len`]`(len)` bytes.
#[inline]
#[must_use]
pub fn unpack_bases(packed: &[u8], len: usize, out: &mut Vec<u8>) -> bool {
    if packed.len() < packed_len(len) {
        return false;
    }

    out.clear();
    out.reserve(len);

    let full = len / 4;
    for &byte in &packed[..full] {
        out.push((byte >> 6) & 0b11);
        out.push((byte >> 4) & 0b11);
        out.push((byte >> 2) & 0b11);
        out.push(byte & 0b11);
    }

    let rest = len % 4;
    if rest > 0 {
        let byte = packed[full];
        for i in 0..rest {
            out.push((byte >> (6 - 2 * i)) & 0b11);
        }
    }

    true
}

/// Packs numeric codes (0..=3) four to a byte, the first base in the highest
/// bits. The final byte is zero-padded.
///
/// This is the inverse of [`unpack_bases`] and is mainly useful for writing
/// test fixtures.
#[must_use]
pub fn pack_bases(codes: &[u8]) -> Vec<u8> {
    codes
        .chunks(4)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &code)| byte | ((code & 0b11) << (6 - 2 * i)))
        })
        .collect()
}
