//! Complement and reverse-complement helpers.
//!
//! Reads come out of the sequence store as numeric codes (A=0, C=1, G=2,
//! T=3), so the complement of a code is simply `3 - code`. ASCII helpers are
//! provided for sequences that have already been converted.

use crate::{CODE_A, CODE_C, CODE_G, CODE_T, LOWER_BASES, UPPER_BASES};

/// Complements a single ASCII DNA base, normalizing to uppercase.
///
/// Returns the Watson-Crick complement: A<->T, C<->G. Any other byte is
/// returned unchanged.
#[inline]
#[must_use]
pub const fn complement_base(base: u8) -> u8 {
    match base {
        b'A' | b'a' => b'T',
        b'T' | b't' => b'A',
        b'C' | b'c' => b'G',
        b'G' | b'g' => b'C',
        _ => base,
    }
}

/// Converts an ASCII base to its numeric code.
///
/// Bases other than A, C, G and T (in either case) map to the code of A, as
/// they do when reads are loaded into a Dazzler database.
#[inline]
#[must_use]
pub const fn base_to_code(base: u8) -> u8 {
    match base {
        b'C' | b'c' => CODE_C,
        b'G' | b'g' => CODE_G,
        b'T' | b't' => CODE_T,
        _ => CODE_A,
    }
}

/// Converts an ASCII sequence to numeric base codes.
#[must_use]
pub fn ascii_to_codes(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(|&base| base_to_code(base)).collect()
}

/// Reverse complements an ASCII DNA sequence.
///
/// # Examples
///
/// ```
/// use fgovl_dna::reverse_complement;
///
/// assert_eq!(reverse_complement(b"AACG"), b"CGTT".to_vec());
/// assert_eq!(reverse_complement(b"acgt"), b"ACGT".to_vec());
/// ```
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&base| complement_base(base)).collect()
}

/// Reverse complements a sequence of numeric base codes in place.
#[inline]
pub fn reverse_complement_codes_in_place(codes: &mut [u8]) {
    codes.reverse();
    for code in codes.iter_mut() {
        *code = CODE_T - (*code & 0b11);
    }
}

/// Converts numeric base codes to uppercase ASCII in place.
#[inline]
pub fn codes_to_upper(codes: &mut [u8]) {
    for code in codes.iter_mut() {
        *code = UPPER_BASES[(*code & 0b11) as usize];
    }
}

/// Converts numeric base codes to lowercase ASCII in place.
#[inline]
pub fn codes_to_lower(codes: &mut [u8]) {
    for code in codes.iter_mut() {
        *code = LOWER_BASES[(*code & 0b11) as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_to_codes() {
        assert_eq!(ascii_to_codes(b"ACGTacgtN"), vec![0, 1, 2, 3, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_codes_follow_code_constants() {
        assert_eq!([b'A', b'c', b'G', b't'].map(base_to_code), [CODE_A, CODE_C, CODE_G, CODE_T]);

        let mut codes = vec![CODE_A, CODE_C, CODE_G];
        reverse_complement_codes_in_place(&mut codes);
        assert_eq!(codes, vec![CODE_C, CODE_G, CODE_T]);
    }

    #[test]
    fn test_complement_base() {
        assert_eq!(complement_base(b'A'), b'T');
        assert_eq!(complement_base(b'T'), b'A');
        assert_eq!(complement_base(b'C'), b'G');
        assert_eq!(complement_base(b'G'), b'C');
        assert_eq!(complement_base(b'a'), b'T');
        assert_eq!(complement_base(b'g'), b'C');

        for c in [b'N', b'n', b'-', b'*'] {
            assert_eq!(complement_base(c), c);
        }
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b""), b"".to_vec());
        assert_eq!(reverse_complement(b"A"), b"T".to_vec());
        assert_eq!(reverse_complement(b"GAATTC"), b"GAATTC".to_vec());
        assert_eq!(reverse_complement(b"AACCG"), b"CGGTT".to_vec());
    }

    #[test]
    fn test_reverse_complement_codes_in_place() {
        // A A C C G -> C G G T T
        let mut codes = vec![0, 0, 1, 1, 2];
        reverse_complement_codes_in_place(&mut codes);
        assert_eq!(codes, vec![1, 2, 2, 3, 3]);

        // Double operation returns the original
        reverse_complement_codes_in_place(&mut codes);
        assert_eq!(codes, vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn test_codes_to_ascii() {
        let mut upper = vec![0, 1, 2, 3];
        codes_to_upper(&mut upper);
        assert_eq!(upper, b"ACGT".to_vec());

        let mut lower = vec![3, 2, 1, 0];
        codes_to_lower(&mut lower);
        assert_eq!(lower, b"tgca".to_vec());
    }
}
