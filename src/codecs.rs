//! Concrete codecs and the by-name registry
//!
//! Every codec in this module is a fixed pipeline of stages, built once on
//! first use and shared for the lifetime of the process:
//!
//! | codec             | pipeline                                                    |
//! |-------------------|-------------------------------------------------------------|
//! | `base16`          | `radix2(4)`, upper-case alphabet, join                      |
//! | `hex`             | `radix2(4)`, lower-case alphabet, join, normalize           |
//! | `base32`          | `radix2(5)`, RFC 4648 alphabet, padding, join               |
//! | `base32hex`       | `radix2(5)`, extended-hex alphabet, padding, join           |
//! | `base32crockford` | `radix2(5)`, Crockford alphabet, join, normalize            |
//! | `base64`          | `radix2(6)`, standard alphabet, padding, join               |
//! | `base64url`       | `radix2(6)`, URL-safe alphabet, padding, join               |
//! | `base58`          | `radix(58)`, Bitcoin alphabet, join                         |
//! | `base58flickr`    | `radix(58)`, Flickr alphabet, join                          |
//! | `base58xrp`       | `radix(58)`, Ripple alphabet, join                          |
//! | `base58xmr`       | 8-byte blocks of `base58`, see [`crate::xmr`]               |
//! | `utf8`            | bytes interpreted as UTF-8 text                             |
//!
//! The [`Encoding`] enum names each of them, and [`bytes_to_string`] and
//! [`string_to_bytes`] dispatch on it.

use std::fmt::Display;
use std::str::FromStr;

use lazy_static::lazy_static;

use crate::conv::stage::{Alphabet, Join, Normalize, Padding};
use crate::conv::{Chain, Coder, StrCoder};
use crate::error::{CodecError, CodecResult};
use crate::radix::{Radix, Radix2};
use crate::xmr::Base58Xmr;

pub const BASE16_ALPHABET: &str = "0123456789ABCDEF";
pub const HEX_ALPHABET: &str = "0123456789abcdef";
pub const BASE32_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
pub const BASE32_HEX_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUV";
pub const BASE32_CROCKFORD_ALPHABET: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";
pub const BASE64_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
pub const BASE64_URL_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
pub const BASE58_FLICKR_ALPHABET: &str =
    "123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";
pub const BASE58_XRP_ALPHABET: &str = "rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz";

/// Power-of-two codec without padding characters
pub type PlainCodec = Chain<Radix2, Chain<Alphabet, Join>>;

/// Power-of-two codec that pads its output to a whole number of bytes
pub type PaddedCodec = Chain<Radix2, Chain<Alphabet, Chain<Padding, Join>>>;

/// Power-of-two codec that rewrites its input before decoding
pub type NormalizedCodec = Chain<Radix2, Chain<Alphabet, Chain<Join, Normalize>>>;

/// Arbitrary-base codec over a 58-character alphabet
pub type Base58Codec = Chain<Radix, Chain<Alphabet, Join>>;

/// Builds an unpadded power-of-two codec of `bits`-bit digits.
///
/// # Errors
///
/// Fails if `bits` is not a supported width, or `alphabet` is malformed.
pub fn plain(bits: u32, alphabet: &str) -> CodecResult<PlainCodec> {
    Ok(crate::chain!(
        Radix2::new(bits, false)?,
        Alphabet::new(alphabet)?,
        Join::default(),
    ))
}

/// Builds a power-of-two codec of `bits`-bit digits, padded with `pad`.
///
/// # Errors
///
/// Fails if `bits` is not a supported width, or `alphabet` is malformed.
pub fn padded(bits: u32, alphabet: &str, pad: char) -> CodecResult<PaddedCodec> {
    Ok(crate::chain!(
        Radix2::new(bits, false)?,
        Alphabet::new(alphabet)?,
        Padding::new(bits, pad)?,
        Join::default(),
    ))
}

/// Builds an unpadded power-of-two codec that applies `normalize` before decoding.
///
/// # Errors
///
/// Fails if `bits` is not a supported width, or `alphabet` is malformed.
pub fn normalized(
    bits: u32,
    alphabet: &str,
    normalize: fn(String) -> CodecResult<String>,
) -> CodecResult<NormalizedCodec> {
    Ok(crate::chain!(
        Radix2::new(bits, false)?,
        Alphabet::new(alphabet)?,
        Join::default(),
        Normalize::new(normalize),
    ))
}

/// Builds a base58 codec over the given alphabet.
///
/// # Errors
///
/// Fails if `alphabet` is malformed.
pub fn base58_with(alphabet: &str) -> CodecResult<Base58Codec> {
    Ok(crate::chain!(
        Radix::new(58)?,
        Alphabet::new(alphabet)?,
        Join::default(),
    ))
}

fn normalize_hex(s: String) -> CodecResult<String> {
    let len = s.chars().count();
    if len % 2 != 0 {
        return Err(CodecError::WrongInputType(format!(
            "hex.decode: expected string of even length, got length {len}"
        )));
    }
    Ok(s.to_ascii_lowercase())
}

fn normalize_crockford(s: String) -> CodecResult<String> {
    Ok(s.to_ascii_uppercase()
        .chars()
        .map(|c| match c {
            'O' => '0',
            'I' | 'L' => '1',
            c => c,
        })
        .collect())
}

/// Unwraps a built-in codec, whose parameters are constants known to be valid.
pub(crate) fn builtin<T>(name: &'static str, res: CodecResult<T>) -> T {
    match res {
        Ok(codec) => {
            tracing::trace!(codec = name, "initialized built-in codec");
            codec
        }
        Err(err) => unreachable!("built-in codec `{name}` should be well-formed: {err}"),
    }
}

lazy_static! {
    pub static ref BASE16: PlainCodec = builtin("base16", plain(4, BASE16_ALPHABET));
    pub static ref HEX: NormalizedCodec =
        builtin("hex", normalized(4, HEX_ALPHABET, normalize_hex));
    pub static ref BASE32: PaddedCodec = builtin("base32", padded(5, BASE32_ALPHABET, '='));
    pub static ref BASE32_HEX: PaddedCodec =
        builtin("base32hex", padded(5, BASE32_HEX_ALPHABET, '='));
    pub static ref BASE32_CROCKFORD: NormalizedCodec = builtin(
        "base32crockford",
        normalized(5, BASE32_CROCKFORD_ALPHABET, normalize_crockford)
    );
    pub static ref BASE64: PaddedCodec = builtin("base64", padded(6, BASE64_ALPHABET, '='));
    pub static ref BASE64_URL: PaddedCodec =
        builtin("base64url", padded(6, BASE64_URL_ALPHABET, '='));
    pub static ref BASE58: Base58Codec = builtin("base58", base58_with(BASE58_ALPHABET));
    pub static ref BASE58_FLICKR: Base58Codec =
        builtin("base58flickr", base58_with(BASE58_FLICKR_ALPHABET));
    pub static ref BASE58_XRP: Base58Codec =
        builtin("base58xrp", base58_with(BASE58_XRP_ALPHABET));
}

/// Codec between bytes and the UTF-8 text they contain
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Utf8;

pub static UTF8: Utf8 = Utf8;

impl Coder for Utf8 {
    type Decoded = Vec<u8>;
    type Encoded = String;

    fn encode(&self, input: Vec<u8>) -> CodecResult<String> {
        String::from_utf8(input).map_err(|err| CodecError::InvalidUtf8(err.utf8_error()))
    }

    fn decode(&self, input: String) -> CodecResult<Vec<u8>> {
        Ok(input.into_bytes())
    }
}

/// Name of a codec in the registry
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde_impls",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Encoding {
    Utf8,
    Hex,
    Base16,
    Base32,
    Base32Hex,
    Base32Crockford,
    Base64,
    Base64Url,
    Base58,
    Base58Flickr,
    Base58Xrp,
    Base58Xmr,
}

impl Encoding {
    pub const ALL: [Encoding; 12] = [
        Encoding::Utf8,
        Encoding::Hex,
        Encoding::Base16,
        Encoding::Base32,
        Encoding::Base32Hex,
        Encoding::Base32Crockford,
        Encoding::Base64,
        Encoding::Base64Url,
        Encoding::Base58,
        Encoding::Base58Flickr,
        Encoding::Base58Xrp,
        Encoding::Base58Xmr,
    ];

    /// Returns the registry name of this encoding
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf8",
            Encoding::Hex => "hex",
            Encoding::Base16 => "base16",
            Encoding::Base32 => "base32",
            Encoding::Base32Hex => "base32hex",
            Encoding::Base32Crockford => "base32crockford",
            Encoding::Base64 => "base64",
            Encoding::Base64Url => "base64url",
            Encoding::Base58 => "base58",
            Encoding::Base58Flickr => "base58flickr",
            Encoding::Base58Xrp => "base58xrp",
            Encoding::Base58Xmr => "base58xmr",
        }
    }

    /// Returns the shared codec instance for this encoding
    #[must_use]
    pub fn coder(self) -> &'static dyn StrCoder {
        match self {
            Encoding::Utf8 => &UTF8,
            Encoding::Hex => &*HEX,
            Encoding::Base16 => &*BASE16,
            Encoding::Base32 => &*BASE32,
            Encoding::Base32Hex => &*BASE32_HEX,
            Encoding::Base32Crockford => &*BASE32_CROCKFORD,
            Encoding::Base64 => &*BASE64,
            Encoding::Base64Url => &*BASE64_URL,
            Encoding::Base58 => &*BASE58,
            Encoding::Base58Flickr => &*BASE58_FLICKR,
            Encoding::Base58Xrp => &*BASE58_XRP,
            Encoding::Base58Xmr => &Base58Xmr,
        }
    }

    fn available() -> String {
        Self::ALL
            .iter()
            .map(|enc| enc.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::ALL.into_iter().find(|enc| enc.name() == s) {
            Some(enc) => Ok(enc),
            None => {
                tracing::debug!(name = s, "lookup of unregistered encoding");
                Err(CodecError::UnknownEncoding {
                    name: s.to_owned(),
                    available: Self::available(),
                })
            }
        }
    }
}

/// Encodes `bytes` into a string with the codec named by `encoding`.
pub fn bytes_to_string(encoding: Encoding, bytes: &[u8]) -> CodecResult<String> {
    tracing::trace!(%encoding, len = bytes.len(), "encoding bytes");
    encoding.coder().encode_bytes(bytes)
}

/// Decodes `text` into bytes with the codec named by `encoding`.
pub fn string_to_bytes(encoding: Encoding, text: &str) -> CodecResult<Vec<u8>> {
    tracing::trace!(%encoding, len = text.len(), "decoding string");
    encoding.coder().decode_str(text)
}
