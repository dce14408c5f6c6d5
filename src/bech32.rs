//! Checksummed `bech32` and `bech32m` strings
//!
//! A bech32 string consists of a human-readable prefix, the separator `1`,
//! a payload of 5-bit words, and a checksum of six further words. Words are
//! written in the 32-character alphabet [`BECH32_ALPHABET`]:
//!
//! ```text
//! bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4
//! \/|\____________________________/\____/
//! prefix       payload words       checksum
//! ```
//!
//! The checksum is the remainder of a BCH code over GF(32), computed over
//! the expanded prefix and the payload. The two variants only differ in the
//! constant the remainder is XOR-ed with at the end: `1` for [`BECH32`] and
//! `0x2bc830a3` for [`BECH32M`].
//!
//! Payloads of raw bytes are carried by regrouping them into 5-bit words with
//! [`Bech32::to_words`]. The reverse, [`Bech32::from_words`], never pads: any
//! leftover bits must be zero and narrower than a word, so that no extra data
//! can be smuggled into the tail of a payload.

use lazy_static::lazy_static;

use crate::codecs::builtin;
use crate::conv::stage::{Alphabet, Join};
use crate::conv::{Chain, Coder};
use crate::error::{CodecError, CodecResult};
use crate::radix::{convert_radix2, Radix2};

pub const BECH32_ALPHABET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Default upper bound on the length of an encoded string
pub const DEFAULT_LIMIT: usize = 90;

/// Number of checksum words at the end of every string
pub const CHECKSUM_LEN: usize = 6;

/// Shortest string that can hold a one-character prefix, separator and checksum
pub const MIN_LEN: usize = 8;

const SEPARATOR: char = '1';

const GENERATORS: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

lazy_static! {
    static ref WORD_ALPHABET: Chain<Alphabet, Join> = builtin(
        "bech32 alphabet",
        Alphabet::new(BECH32_ALPHABET).map(|abc| crate::chain!(abc, Join::default()))
    );
    static ref WORDS: Radix2 = builtin("bech32 words", Radix2::new(5, false));
}

/// Checksum variant, distinguished by the final XOR constant
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(
    feature = "serde_impls",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Variant {
    /// BIP-173
    Bech32,
    /// BIP-350
    Bech32m,
}

impl Variant {
    #[must_use]
    pub const fn constant(self) -> u32 {
        match self {
            Variant::Bech32 => 1,
            Variant::Bech32m => 0x2bc8_30a3,
        }
    }
}

/// Folds one 5-bit `value` into the running checksum `chk`.
#[inline]
#[must_use]
pub fn polymod_step(chk: u32, value: u32) -> u32 {
    let top = chk >> 25;
    let mut ret = (chk & 0x1ff_ffff) << 5;
    for (ix, gen) in GENERATORS.iter().enumerate() {
        if (top >> ix) & 1 == 1 {
            ret ^= gen;
        }
    }
    ret ^ value
}

/// Computes the six checksum words for `prefix` and `words`.
///
/// `prefix` is used as given; callers are responsible for lower-casing it.
///
/// # Errors
///
/// Returns `InvalidPrefix` if `prefix` contains a character outside of
/// printable ASCII (`33..=126`).
pub fn checksum(prefix: &str, words: &[u8], variant: Variant) -> CodecResult<Vec<u8>> {
    if !prefix.bytes().all(|c| (33..=126).contains(&c)) {
        return Err(CodecError::InvalidPrefix {
            prefix: prefix.to_owned(),
        });
    }
    let mut chk: u32 = 1;
    for c in prefix.bytes() {
        chk = polymod_step(chk, u32::from(c >> 5));
    }
    chk = polymod_step(chk, 0);
    for c in prefix.bytes() {
        chk = polymod_step(chk, u32::from(c & 0x1f));
    }
    for &w in words {
        chk = polymod_step(chk, u32::from(w));
    }
    for _ in 0..CHECKSUM_LEN {
        chk = polymod_step(chk, 0);
    }
    chk ^= variant.constant();
    narrow(convert_radix2(&[chk & 0x3fff_ffff], 30, 5, false)?)
}

fn narrow(words: Vec<u32>) -> CodecResult<Vec<u8>> {
    words
        .into_iter()
        .map(|w| u8::try_from(w).map_err(|_| CodecError::Overflow))
        .collect()
}

fn widen(words: &[u8]) -> Vec<u32> {
    words.iter().map(|&w| u32::from(w)).collect()
}

fn check_words(words: &[u8]) -> CodecResult<()> {
    match words.iter().position(|&w| w >= 32) {
        Some(position) => Err(CodecError::InvalidDigit {
            digit: u32::from(words[position]),
            base: 32,
            position,
        }),
        None => Ok(()),
    }
}

/// Prefix and payload words of a successfully decoded string
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct Decoded {
    pub prefix: String,
    pub words: Vec<u8>,
}

/// [`Decoded`], together with the bytes its payload words stand for
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedBytes {
    pub prefix: String,
    pub words: Vec<u8>,
    pub bytes: Vec<u8>,
}

/// Encoder and decoder for one checksum variant
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bech32 {
    variant: Variant,
}

pub static BECH32: Bech32 = Bech32::new(Variant::Bech32);
pub static BECH32M: Bech32 = Bech32::new(Variant::Bech32m);

impl Bech32 {
    #[must_use]
    pub const fn new(variant: Variant) -> Self {
        Self { variant }
    }

    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Encodes `words` under `prefix`, subject to [`DEFAULT_LIMIT`].
    pub fn encode(&self, prefix: &str, words: &[u8]) -> CodecResult<String> {
        self.encode_with_limit(prefix, words, Some(DEFAULT_LIMIT))
    }

    /// Encodes `words` under `prefix`, with an optional length limit.
    ///
    /// The prefix is lower-cased in the output.
    ///
    /// # Errors
    ///
    /// * `LengthExceeded` if the encoded length would exceed `limit`
    /// * `InvalidDigit` if a word is not less than 32
    /// * `InvalidPrefix` if the prefix is not printable ASCII
    pub fn encode_with_limit(
        &self,
        prefix: &str,
        words: &[u8],
        limit: Option<usize>,
    ) -> CodecResult<String> {
        let length = prefix.len() + 1 + words.len() + CHECKSUM_LEN;
        if let Some(limit) = limit {
            if length > limit {
                return Err(CodecError::LengthExceeded { length, limit });
            }
        }
        check_words(words)?;
        let prefix = prefix.to_ascii_lowercase();
        let sum = checksum(&prefix, words, self.variant)?;
        let data = WORD_ALPHABET.encode(widen(words))?;
        let sum = WORD_ALPHABET.encode(widen(&sum))?;
        Ok(format!("{prefix}{SEPARATOR}{data}{sum}"))
    }

    /// Decodes `text`, subject to [`DEFAULT_LIMIT`].
    pub fn decode(&self, text: &str) -> CodecResult<Decoded> {
        self.decode_with_limit(text, Some(DEFAULT_LIMIT))
    }

    /// Decodes `text` into its lower-cased prefix and its payload words.
    ///
    /// # Errors
    ///
    /// * `TooShort` if `text` is shorter than [`MIN_LEN`], or holds fewer than
    ///   six characters after the separator
    /// * `LengthExceeded` if `text` is longer than `limit`
    /// * `MixedCase` if `text` has both lower- and upper-case characters
    /// * `MissingSeparator` if there is no `1`, or the last `1` is the first character
    /// * `UnknownCharacter` if the data part has a character outside the alphabet
    /// * `InvalidPrefix` if the prefix is not printable ASCII
    /// * `InvalidChecksum` if the trailing six words do not match
    pub fn decode_with_limit(&self, text: &str, limit: Option<usize>) -> CodecResult<Decoded> {
        let length = text.len();
        if length < MIN_LEN {
            return Err(CodecError::TooShort {
                length,
                minimum: MIN_LEN,
            });
        }
        if let Some(limit) = limit {
            if length > limit {
                return Err(CodecError::LengthExceeded { length, limit });
            }
        }
        let lowered = text.to_ascii_lowercase();
        if text != lowered && text != text.to_ascii_uppercase() {
            return Err(CodecError::MixedCase);
        }
        let sep = match lowered.rfind(SEPARATOR) {
            None | Some(0) => return Err(CodecError::MissingSeparator),
            Some(ix) => ix,
        };
        let (prefix, data) = (&lowered[..sep], &lowered[sep + 1..]);
        if data.len() < CHECKSUM_LEN {
            return Err(CodecError::TooShort {
                length: data.len(),
                minimum: CHECKSUM_LEN,
            });
        }
        let mut words = narrow(WORD_ALPHABET.decode(data.to_owned())?)?;
        let given = words.split_off(words.len() - CHECKSUM_LEN);
        let expected = checksum(prefix, &words, self.variant)?;
        if given != expected {
            let expected = WORD_ALPHABET.encode(widen(&expected))?;
            tracing::debug!(
                variant = ?self.variant,
                %expected,
                "checksum mismatch"
            );
            return Err(CodecError::InvalidChecksum {
                string: lowered,
                expected,
            });
        }
        Ok(Decoded {
            prefix: prefix.to_owned(),
            words,
        })
    }

    /// Like [`Bech32::decode`], but discards the reason for a failure.
    ///
    /// Intended for advisory checks, such as guessing whether a string is an
    /// address at all; anything authoritative should use `decode`.
    pub fn decode_opt(&self, text: &str) -> Option<Decoded> {
        self.decode(text).ok()
    }

    /// Decodes `text` without a length limit, and converts its payload to bytes.
    pub fn decode_to_bytes(&self, text: &str) -> CodecResult<DecodedBytes> {
        let Decoded { prefix, words } = self.decode_with_limit(text, None)?;
        let bytes = self.from_words(&words)?;
        Ok(DecodedBytes {
            prefix,
            words,
            bytes,
        })
    }

    /// Regroups bytes into 5-bit words, zero-padding the last word.
    pub fn to_words(&self, bytes: &[u8]) -> CodecResult<Vec<u8>> {
        narrow(WORDS.encode(bytes.to_vec())?)
    }

    /// Regroups 5-bit words into bytes.
    ///
    /// # Errors
    ///
    /// Fails with `ExcessPadding` or `NonZeroPadding` unless the leftover bits
    /// are fewer than five and all zero, and with `InvalidDigit` if a word is
    /// not less than 32.
    pub fn from_words(&self, words: &[u8]) -> CodecResult<Vec<u8>> {
        WORDS.decode(widen(words))
    }

    /// Like [`Bech32::from_words`], but discards the reason for a failure.
    pub fn from_words_opt(&self, words: &[u8]) -> Option<Vec<u8>> {
        self.from_words(words).ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    const VALID_BECH32: [&str; 7] = [
        "A12UEL5L",
        "a12uel5l",
        "an83characterlonghumanreadablepartthatcontainsthenumber1andtheexcludedcharactersbio1tt5tgs",
        "abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw",
        "11qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqc8247j",
        "split1checkupstagehandshakeupstreamerranterredcaperred2y9e3w",
        "?1ezyfcl",
    ];

    const VALID_BECH32M: [&str; 5] = [
        "A1LQFN3A",
        "a1lqfn3a",
        "abcdef1l7aum6echk45nj3s0wdvt2fg8x9yrzpqzd3ryx",
        "split1checkupstagehandshakeupstreamerranterredcaperredlc445v",
        "?1v759aa",
    ];

    const SEGWIT_WORDS: [u8; 33] = [
        0, 14, 20, 15, 7, 13, 26, 0, 25, 18, 6, 11, 13, 8, 21, 4, 20, 3, 17, 2, 29, 3, 12, 29, 3,
        4, 15, 24, 20, 6, 14, 30, 22,
    ];

    #[test]
    fn valid_vectors() {
        for s in VALID_BECH32 {
            let decoded = BECH32.decode(s).unwrap_or_else(|e| panic!("{s}: {e}"));
            let reencoded = BECH32.encode(&decoded.prefix, &decoded.words).unwrap();
            assert_eq!(reencoded, s.to_ascii_lowercase());
            assert!(BECH32M.decode_opt(s).is_none(), "{s} accepted as bech32m");
        }
        for s in VALID_BECH32M {
            let decoded = BECH32M.decode(s).unwrap_or_else(|e| panic!("{s}: {e}"));
            let reencoded = BECH32M.encode(&decoded.prefix, &decoded.words).unwrap();
            assert_eq!(reencoded, s.to_ascii_lowercase());
            assert!(BECH32.decode_opt(s).is_none(), "{s} accepted as bech32");
        }
    }

    #[test]
    fn segwit_address() {
        let addr = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
        assert_eq!(BECH32.encode("bc", &SEGWIT_WORDS).unwrap(), addr);
        assert_eq!(BECH32.encode("BC", &SEGWIT_WORDS).unwrap(), addr);
        let decoded = BECH32.decode(addr).unwrap();
        assert_eq!(decoded.prefix, "bc");
        assert_eq!(decoded.words, SEGWIT_WORDS);
        let program = BECH32.from_words(&decoded.words[1..]).unwrap();
        assert_eq!(
            crate::codecs::bytes_to_string(crate::Encoding::Hex, &program).unwrap(),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
        assert_eq!(BECH32.to_words(&program).unwrap(), &SEGWIT_WORDS[1..]);
    }

    #[test]
    fn short_payload_roundtrip() {
        let words = [0, 14, 20, 15, 7, 13, 26, 0, 25, 18, 6, 11, 13, 8, 21];
        let encoded = BECH32.encode("bc", &words).unwrap();
        assert_eq!(encoded, "bc1qw508d6qejxtdg4rngdrn");
        let decoded = BECH32.decode(&encoded).unwrap();
        assert_eq!(decoded.prefix, "bc");
        assert_eq!(decoded.words, words);
    }

    #[test]
    fn decode_errors() {
        assert_eq!(
            BECH32.decode("a1qqqqq"),
            Err(CodecError::TooShort {
                length: 7,
                minimum: MIN_LEN
            })
        );
        assert_eq!(BECH32.decode("A12uEL5L"), Err(CodecError::MixedCase));
        assert_eq!(BECH32.decode("1qqqqqqqqq"), Err(CodecError::MissingSeparator));
        assert_eq!(BECH32.decode("pzry9x0s0muk"), Err(CodecError::MissingSeparator));
        assert_eq!(
            BECH32.decode("ab1qqqqq"),
            Err(CodecError::TooShort {
                length: 5,
                minimum: CHECKSUM_LEN
            })
        );
        assert_eq!(
            BECH32.decode(" 1nwldj5"),
            Err(CodecError::InvalidPrefix { prefix: " ".into() })
        );
        assert_eq!(
            BECH32.decode("x1b4n0q5v"),
            Err(CodecError::UnknownCharacter {
                character: 'b',
                position: 0
            })
        );
        match BECH32.decode("a12uel5m") {
            Err(CodecError::InvalidChecksum { string, expected }) => {
                assert_eq!(string, "a12uel5m");
                assert_eq!(expected, "2uel5l");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn length_limits() {
        let words = vec![0u8; 82];
        assert_eq!(BECH32.encode("a", &words).unwrap().len(), DEFAULT_LIMIT);
        let long = BECH32.encode_with_limit("ab", &words, None).unwrap();
        assert_eq!(long.len(), 91);
        assert_eq!(
            BECH32.decode(&long),
            Err(CodecError::LengthExceeded {
                length: 91,
                limit: DEFAULT_LIMIT
            })
        );
        assert_eq!(BECH32.decode_with_limit(&long, None).unwrap().words, words);
        assert_eq!(
            BECH32.encode_with_limit("ab", &words, Some(DEFAULT_LIMIT)),
            Err(CodecError::LengthExceeded {
                length: 91,
                limit: DEFAULT_LIMIT
            })
        );
        assert_eq!(BECH32.decode_to_bytes(&long).unwrap().bytes.len(), 51);
    }

    #[test]
    fn encode_errors() {
        assert_eq!(
            BECH32.encode("a b", &[]),
            Err(CodecError::InvalidPrefix {
                prefix: "a b".into()
            })
        );
        assert_eq!(
            BECH32.encode("a", &[1, 32]),
            Err(CodecError::InvalidDigit {
                digit: 32,
                base: 32,
                position: 1
            })
        );
    }

    #[test]
    fn bytes_roundtrip() {
        let words = BECH32M.to_words(b"hello").unwrap();
        let encoded = BECH32M.encode("test", &words).unwrap();
        let decoded = BECH32M.decode_to_bytes(&encoded).unwrap();
        assert_eq!(decoded.prefix, "test");
        assert_eq!(decoded.words, words);
        assert_eq!(decoded.bytes, b"hello");
    }

    #[test]
    fn from_words_rejects_padding() {
        assert_eq!(BECH32.from_words(&[0, 0]), Ok(vec![0]));
        assert!(matches!(
            BECH32.from_words(&[31, 31]),
            Err(CodecError::NonZeroPadding { .. })
        ));
        assert!(BECH32.from_words_opt(&[31, 31]).is_none());
        // five bits left over make up an entire word
        assert_eq!(
            BECH32.from_words(&[0; 9]),
            Err(CodecError::ExcessPadding { pos: 5 })
        );
        assert_eq!(BECH32.from_words_opt(&[31, 28]), Some(vec![255]));
    }

    proptest! {
        #[test]
        fn single_substitution_detected(
            prefix in "[a-z]{1,10}",
            words in proptest::collection::vec(0u8..32, 0..40),
            pick in any::<usize>(),
            shift in any::<usize>(),
            m in any::<bool>(),
        ) {
            let codec = if m { BECH32M } else { BECH32 };
            let encoded = codec.encode(&prefix, &words).unwrap();
            let mut chars: Vec<char> = encoded.chars().collect();
            let mut ix = pick % chars.len();
            if ix == prefix.len() {
                ix += 1;
            }
            let candidates: Vec<char> = BECH32_ALPHABET.chars().filter(|&c| c != chars[ix]).collect();
            chars[ix] = candidates[shift % candidates.len()];
            let corrupted: String = chars.into_iter().collect();
            prop_assert!(
                matches!(codec.decode(&corrupted), Err(CodecError::InvalidChecksum { .. })),
                "{} was accepted", corrupted
            );
        }

        #[test]
        fn case_insensitive_but_consistent(
            prefix in "[a-z]{1,10}",
            words in proptest::collection::vec(0u8..32, 1..40),
        ) {
            let encoded = BECH32.encode(&prefix, &words).unwrap();
            let upper = encoded.to_ascii_uppercase();
            prop_assert_eq!(BECH32.decode(&upper).unwrap().words, words.clone());
            let mut mixed: Vec<char> = upper.chars().collect();
            mixed[0] = mixed[0].to_ascii_lowercase();
            let mixed: String = mixed.into_iter().collect();
            prop_assert_eq!(BECH32.decode(&mixed), Err(CodecError::MixedCase));
        }

        #[test]
        fn words_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let words = BECH32.to_words(&bytes).unwrap();
            prop_assert!(words.iter().all(|&w| w < 32));
            prop_assert_eq!(BECH32.from_words(&words).unwrap(), bytes);
        }
    }
}
