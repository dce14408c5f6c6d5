//! Composable codecs between raw bytes and textual digit representations
//!
//! # Overview
//!
//! This library provides the conversions that sit underneath most textual
//! encodings of binary data: hexadecimal, the RFC 4648 family (base16, base32,
//! base64 and their variants), base58 in its several alphabets, block-chunked
//! base58 as used for Monero addresses, and the checksummed bech32 and bech32m
//! formats.
//!
//! Rather than hand-writing each encoding, every codec is assembled from a
//! small set of reusable stages, each of which implements the [`Coder`]
//! trait:
//!
//!   * [`Radix`] and [`Radix2`] convert bytes into digits of another base,
//!     by long division or by regrouping bits respectively
//!   * [`Alphabet`] maps digits to characters
//!   * [`Padding`] pads character sequences to a whole number of bytes
//!   * [`Join`] turns character sequences into strings
//!   * [`Normalize`] rewrites a string before decoding
//!
//! The [`chain!`] macro composes such stages into a single pipeline whose
//! `encode` runs the stages in order and whose `decode` runs them in reverse.
//! The ready-made codecs in [`codecs`] are all built this way, and the
//! [`Encoding`] registry names each of them.
//!
//! # Example
//!
//! ```
//! use basalt::{bytes_to_string, string_to_bytes, Encoding};
//!
//! let text = bytes_to_string(Encoding::Base58, &[0, 0, 1]).unwrap();
//! assert_eq!(text, "112");
//! assert_eq!(string_to_bytes(Encoding::Base58, &text).unwrap(), vec![0, 0, 1]);
//! ```
//!
//! # Error handling
//!
//! Every stage validates its input before converting it and reports the first
//! violation as a [`CodecError`]. All conversions are pure functions of their
//! input and of immutable tables, so every codec in this crate can be used
//! from any number of threads at once.

pub mod bech32;
pub mod codecs;
pub mod conv;
pub mod error;
pub mod radix;
pub mod xmr;

pub use crate::bech32::{Bech32, Decoded, DecodedBytes, Variant, BECH32, BECH32M};
pub use crate::codecs::{bytes_to_string, string_to_bytes, Encoding};
pub use crate::conv::{
    stage::{Alphabet, Join, Normalize, Padding},
    Chain, Coder, Identity, StrCoder,
};
pub use crate::error::{CodecError, CodecResult};
pub use crate::radix::{convert_radix, convert_radix2, Radix, Radix2};
pub use crate::xmr::Base58Xmr;
