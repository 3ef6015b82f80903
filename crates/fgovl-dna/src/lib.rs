#![deny(unsafe_code)]

//! DNA sequence utilities and constants.
//!
//! This crate provides the base-level operations needed to read Dazzler
//! sequence stores:
//! - Unpacking of 2-bit packed reads (four bases per byte)
//! - Complement and reverse-complement of numeric and ASCII sequences
//! - Conversion between numeric base codes and ASCII in either case

pub mod dna;
pub mod packed;

#[cfg(any(test, feature = "test-utils"))]
pub mod testutil;

// Re-export submodule contents at crate root for convenience
pub use dna::{
    ascii_to_codes, base_to_code, codes_to_lower, codes_to_upper, complement_base, reverse_complement,
    reverse_complement_codes_in_place,
};
pub use packed::{pack_bases, packed_len, unpack_bases};

#[cfg(any(test, feature = "test-utils"))]
pub use testutil::random_sequence;

/// Numeric code for adenine in a packed read.
pub const CODE_A: u8 = 0;

/// Numeric code for cytosine in a packed read.
pub const CODE_C: u8 = 1;

/// Numeric code for guanine in a packed read.
pub const CODE_G: u8 = 2;

/// Numeric code for thymine in a packed read.
pub const CODE_T: u8 = 3;

/// Uppercase ASCII bases indexed by numeric code.
pub const UPPER_BASES: [u8; 4] = *b"ACGT";

/// Lowercase ASCII bases indexed by numeric code.
pub const LOWER_BASES: [u8; 4] = *b"acgt";
