//! Character-level pipeline stages
//!
//! The four stages in this module sit between the numeric digits produced by
//! [`crate::radix`] and the final `String` handed to callers:
//!
//!   * [`Alphabet`] maps digits to characters and back
//!   * [`Padding`] appends (and strips) pad characters up to a byte boundary
//!   * [`Join`] concatenates characters into a string, and splits it back apart
//!   * [`Normalize`] rewrites a string before it is decoded
//!
//! Each stage checks its own input and fails on the first violation.

use crate::conv::Coder;
use crate::error::{CodecError, CodecResult};

/// Bijection between digits `0..len` and an ordered set of unique characters
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// Builds an alphabet whose base is the number of characters in `chars`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAlphabet` if `chars` has fewer than two characters or
    /// contains the same character twice.
    pub fn new(chars: &str) -> CodecResult<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.len() < 2 {
            return Err(CodecError::InvalidAlphabet(format!(
                "alphabet of {} characters cannot encode any base",
                chars.len()
            )));
        }
        for (ix, c) in chars.iter().enumerate() {
            if chars[..ix].contains(c) {
                return Err(CodecError::InvalidAlphabet(format!(
                    "duplicate character {c:?} at position {ix}"
                )));
            }
        }
        Ok(Self { chars })
    }

    /// Returns the base this alphabet encodes, i.e. its number of characters
    #[inline]
    #[must_use]
    pub fn base(&self) -> u32 {
        self.chars.len() as u32
    }

    /// Returns the character standing for `digit`, if there is one
    #[inline]
    #[must_use]
    pub fn char_of(&self, digit: u32) -> Option<char> {
        self.chars.get(digit as usize).copied()
    }

    /// Returns the digit that `c` stands for, if it belongs to the alphabet
    #[inline]
    #[must_use]
    pub fn digit_of(&self, c: char) -> Option<u32> {
        self.chars.iter().position(|&x| x == c).map(|ix| ix as u32)
    }
}

impl Coder for Alphabet {
    type Decoded = Vec<u32>;
    type Encoded = Vec<char>;

    fn encode(&self, input: Vec<u32>) -> CodecResult<Vec<char>> {
        input
            .into_iter()
            .enumerate()
            .map(|(position, digit)| {
                self.char_of(digit).ok_or(CodecError::InvalidDigit {
                    digit,
                    base: self.base(),
                    position,
                })
            })
            .collect()
    }

    fn decode(&self, input: Vec<char>) -> CodecResult<Vec<u32>> {
        input
            .into_iter()
            .enumerate()
            .map(|(position, character)| {
                self.digit_of(character)
                    .ok_or(CodecError::UnknownCharacter {
                        character,
                        position,
                    })
            })
            .collect()
    }
}

/// Concatenation of characters with an optional separator
///
/// With the default (empty) separator, decoding splits a string into its
/// individual characters. With a non-empty separator, every piece between
/// separators must be exactly one character.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Join {
    separator: String,
}

impl Join {
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Coder for Join {
    type Decoded = Vec<char>;
    type Encoded = String;

    fn encode(&self, input: Vec<char>) -> CodecResult<String> {
        if self.separator.is_empty() {
            return Ok(input.into_iter().collect());
        }
        let mut ret = String::with_capacity(input.len() * (1 + self.separator.len()));
        for (ix, c) in input.into_iter().enumerate() {
            if ix > 0 {
                ret.push_str(&self.separator);
            }
            ret.push(c);
        }
        Ok(ret)
    }

    fn decode(&self, input: String) -> CodecResult<Vec<char>> {
        if self.separator.is_empty() {
            return Ok(input.chars().collect());
        }
        if input.is_empty() {
            return Ok(Vec::new());
        }
        input
            .split(self.separator.as_str())
            .map(|piece| {
                let mut it = piece.chars();
                match (it.next(), it.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(CodecError::WrongInputType(format!(
                        "join.decode: expected single character between separators, found {piece:?}"
                    ))),
                }
            })
            .collect()
    }
}

/// Pads a character sequence so that it represents a whole number of bytes
///
/// Each character is taken to carry `bits` bits of data. Encoding appends the
/// pad character until `len * bits` is a multiple of 8. Decoding requires the
/// input to already be byte-aligned, and strips at most the one group of pad
/// characters that encoding could have produced.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Padding {
    bits: u32,
    pad: char,
}

impl Padding {
    pub const DEFAULT_PAD: char = '=';

    /// # Errors
    ///
    /// Returns `InvalidBitWidth` if `bits` is not in `(0, 32]`.
    pub fn new(bits: u32, pad: char) -> CodecResult<Self> {
        if bits == 0 || bits > 32 {
            return Err(CodecError::InvalidBitWidth { bits });
        }
        Ok(Self { bits, pad })
    }

    pub const fn bits(&self) -> u32 {
        self.bits
    }

    pub const fn pad(&self) -> char {
        self.pad
    }

    #[inline]
    fn is_aligned(&self, len: usize) -> bool {
        (len * self.bits as usize) % 8 == 0
    }
}

impl Coder for Padding {
    type Decoded = Vec<char>;
    type Encoded = Vec<char>;

    fn encode(&self, mut input: Vec<char>) -> CodecResult<Vec<char>> {
        while !self.is_aligned(input.len()) {
            input.push(self.pad);
        }
        Ok(input)
    }

    fn decode(&self, mut input: Vec<char>) -> CodecResult<Vec<char>> {
        let mut end = input.len();
        if !self.is_aligned(end) {
            return Err(CodecError::InvalidPadding(
                "string should have whole number of bytes",
            ));
        }
        while end > 0 && input[end - 1] == self.pad {
            if self.is_aligned(end - 1) {
                return Err(CodecError::InvalidPadding("string has too much padding"));
            }
            end -= 1;
        }
        input.truncate(end);
        Ok(input)
    }
}

/// Decode-side rewriting of a string before any further decoding
///
/// Used for case-folding and for mapping lookalike characters onto their
/// canonical forms. Encoding is the identity.
#[derive(Clone, Copy)]
pub struct Normalize {
    f: fn(String) -> CodecResult<String>,
}

impl Normalize {
    #[must_use]
    pub const fn new(f: fn(String) -> CodecResult<String>) -> Self {
        Self { f }
    }
}

impl std::fmt::Debug for Normalize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Normalize")
    }
}

impl Coder for Normalize {
    type Decoded = String;
    type Encoded = String;

    #[inline(always)]
    fn encode(&self, input: String) -> CodecResult<String> {
        Ok(input)
    }

    fn decode(&self, input: String) -> CodecResult<String> {
        (self.f)(input)
    }
}
