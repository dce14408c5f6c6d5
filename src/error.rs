//! General error types
//!
//! Every stage of a codec pipeline validates its own input before doing any
//! work, and reports the first violation it finds as a [`CodecError`]. No
//! stage returns partial output alongside an error.
//!
//! The variants carry the offending value (and its position, where one is
//! meaningful) so that a caller of a concrete codec can tell what was wrong
//! with the input without re-parsing it.

use thiserror::Error;

/// Enumerated error type for every failure condition of the codec library.
///
/// Radix-conversion errors (`InvalidBase` through `ExcessPadding`) originate in
/// [`crate::radix`], string-shape errors (`InvalidPadding` through
/// `WrongInputType`) in the pipeline stages of [`crate::conv::stage`], and the
/// remaining errors in [`crate::bech32`] and [`crate::codecs`].
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// Base of an arbitrary-radix conversion was less than 2
    #[error("invalid base {base}: base cannot be less than 2")]
    InvalidBase { base: u32 },
    /// Bit-width of a power-of-two conversion fell outside of `(0, 32]`
    #[error("invalid bit-width {bits}: must be in (0, 32]")]
    InvalidBitWidth { bits: u32 },
    /// Input digit was not less than the base it was declared in
    #[error("digit {digit} at position {position} is out of range for base {base}")]
    InvalidDigit {
        digit: u32,
        base: u32,
        position: usize,
    },
    /// Checked arithmetic detected an intermediate value that does not fit
    #[error("radix conversion overflowed its carry")]
    Overflow,
    /// Carry register required by a bit-packing conversion is wider than 32 bits
    #[error("carry overflow converting {from}-bit to {to}-bit words ({carry_bits} carry bits)")]
    CarryOverflow { from: u32, to: u32, carry_bits: u32 },
    /// Leftover bits of an unpadded bit-packing conversion were not all zero
    #[error("non-zero padding: {bits:#x}")]
    NonZeroPadding { bits: u32 },
    /// Unpadded bit-packing conversion ended with a whole input word of leftover bits
    #[error("excess padding: {pos} leftover bits")]
    ExcessPadding { pos: u32 },
    /// Padding characters were misplaced or too numerous
    #[error("invalid padding: {0}")]
    InvalidPadding(&'static str),
    /// Character not present in the alphabet of the decoding stage
    #[error("unknown character {character:?} at position {position}")]
    UnknownCharacter { character: char, position: usize },
    /// Input had a shape the stage cannot accept
    #[error("wrong input: {0}")]
    WrongInputType(String),
    /// Encoded string would exceed, or exceeds, the caller-supplied length limit
    #[error("length {length} exceeds limit {limit}")]
    LengthExceeded { length: usize, limit: usize },
    /// Encoded string is shorter than the format's minimum
    #[error("length {length} is below the minimum of {minimum}")]
    TooShort { length: usize, minimum: usize },
    /// Trailing checksum words did not match the recomputed checksum
    #[error("invalid checksum in {string}: expected {expected:?}")]
    InvalidChecksum { string: String, expected: String },
    /// String contained both lower- and upper-case characters
    #[error("string must be lowercase or uppercase")]
    MixedCase,
    /// Separator between human-readable prefix and data was absent or leading
    #[error("letter \"1\" must be present between prefix and data only")]
    MissingSeparator,
    /// Human-readable prefix contained a character outside of printable ASCII
    #[error("invalid prefix {prefix:?}")]
    InvalidPrefix { prefix: String },
    /// Alphabet was too short or contained duplicate characters
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    /// Registry lookup by name failed
    #[error("invalid encoding type {name:?}, available types: {available}")]
    UnknownEncoding { name: String, available: String },
    /// Bytes handed to the `utf8` codec were not valid UTF-8
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;
