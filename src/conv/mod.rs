//! Core of the transcoding API
//!
//! This module contains the definition of the [`Coder`] trait, the unit of
//! composition for every codec in this crate, along with the two structural
//! coders [`Identity`] and [`Chain`] and the [`chain!`] macro that folds an
//! ordered list of stages into a single `Coder`.
//!
//! A `Coder` is an invertible pair of functions between a *decoded* and an
//! *encoded* representation. For every valid `x`, implementations must
//! guarantee the round-trip law
//!
//! ```ignore
//! coder.decode(coder.encode(x)?)? == x
//! ```
//!
//! Both directions are pure: a `Coder` holds only immutable configuration
//! (alphabets, bit-widths, separators) fixed at construction, so the same
//! value can be shared freely between threads.
//!
//! The stages that operate on digit and character sequences live in the
//! sub-module [`stage`]; the numeric stages live in [`crate::radix`].
//!
//! A second, object-safe trait [`StrCoder`] sits on top of `Coder` for the
//! common case of codecs between raw bytes and `String`s, so that the
//! registry in [`crate::codecs`] can hand out `&'static dyn StrCoder`
//! without naming each pipeline's concrete type.

use std::marker::PhantomData;

use crate::error::CodecResult;

pub mod stage;

/// Invertible pair of conversions between `Self::Decoded` and `Self::Encoded`
///
/// Implementations must be total on valid input, and must report invalid input
/// as an error rather than panicking or returning a best-effort value.
///
/// `encode` and `decode` take their argument by value; stages are chained
/// together so that each intermediate buffer is handed off exactly once.
pub trait Coder {
    /// Representation on the 'raw' side of the conversion
    type Decoded;

    /// Representation on the 'textual' side of the conversion
    type Encoded;

    /// Converts a value from its decoded to its encoded representation.
    fn encode(&self, input: Self::Decoded) -> CodecResult<Self::Encoded>;

    /// Converts a value from its encoded back to its decoded representation.
    fn decode(&self, input: Self::Encoded) -> CodecResult<Self::Decoded>;
}

/// Coder that returns its input unchanged in both directions
///
/// This is the result of composing an empty list of stages.
pub struct Identity<T> {
    _phantom: PhantomData<fn(T) -> T>,
}

impl<T> Identity<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for Identity<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Identity")
    }
}

impl<T> Coder for Identity<T> {
    type Decoded = T;
    type Encoded = T;

    #[inline(always)]
    fn encode(&self, input: T) -> CodecResult<T> {
        Ok(input)
    }

    #[inline(always)]
    fn decode(&self, input: T) -> CodecResult<T> {
        Ok(input)
    }
}

/// Sequential composition of two coders
///
/// `encode` runs `first` and then `second`; `decode` runs `second` and then
/// `first`. The encoded type of `first` must be the decoded type of `second`,
/// which is checked at compile time, so the order of a pipeline cannot be
/// altered after it is constructed.
///
/// Longer pipelines are built as right-nested chains, most conveniently
/// through the [`chain!`] macro.
#[derive(Clone, Debug)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B>
where
    A: Coder,
    B: Coder<Decoded = A::Encoded>,
{
    #[must_use]
    pub const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }
}

impl<A, B> Coder for Chain<A, B>
where
    A: Coder,
    B: Coder<Decoded = A::Encoded>,
{
    type Decoded = A::Decoded;
    type Encoded = B::Encoded;

    #[inline]
    fn encode(&self, input: Self::Decoded) -> CodecResult<Self::Encoded> {
        self.second.encode(self.first.encode(input)?)
    }

    #[inline]
    fn decode(&self, input: Self::Encoded) -> CodecResult<Self::Decoded> {
        self.first.decode(self.second.decode(input)?)
    }
}

/// Composes an ordered list of stages into a single [`Coder`]
///
/// `chain!(a, b, c)` expands to `Chain::new(a, Chain::new(b, c))`, whose
/// `encode` applies `a`, `b`, `c` in that order and whose `decode` applies
/// them in reverse. `chain!()` yields [`Identity`].
///
/// ```
/// # use basalt::{chain, Coder, conv::stage::{Alphabet, Join}, radix::Radix2};
/// let base16 = chain!(
///     Radix2::new(4, false).unwrap(),
///     Alphabet::new("0123456789ABCDEF").unwrap(),
///     Join::default(),
/// );
/// assert_eq!(base16.encode(vec![0xde, 0xad]).unwrap(), "DEAD");
/// ```
#[macro_export]
macro_rules! chain {
    () => {
        $crate::conv::Identity::new()
    };
    ($stage:expr $(,)?) => {
        $stage
    };
    ($stage:expr, $($rest:expr),+ $(,)?) => {
        $crate::conv::Chain::new($stage, $crate::chain!($($rest),+))
    };
}

/// Object-safe facade over coders between raw bytes and strings
///
/// Every [`Coder`] whose decoded side is `Vec<u8>` and whose encoded side is
/// `String` implements this trait automatically.
pub trait StrCoder: Send + Sync {
    /// Encodes a byte-slice into its textual representation.
    fn encode_bytes(&self, bytes: &[u8]) -> CodecResult<String>;

    /// Decodes a textual representation back into raw bytes.
    fn decode_str(&self, text: &str) -> CodecResult<Vec<u8>>;
}

impl<C> StrCoder for C
where
    C: Coder<Decoded = Vec<u8>, Encoded = String> + Send + Sync,
{
    fn encode_bytes(&self, bytes: &[u8]) -> CodecResult<String> {
        self.encode(bytes.to_vec())
    }

    fn decode_str(&self, text: &str) -> CodecResult<Vec<u8>> {
        self.decode(text.to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::stage::{Alphabet, Join, Normalize};
    use super::*;
    use crate::error::CodecError;

    #[test]
    fn identity_roundtrip() {
        let id: Identity<Vec<u32>> = chain!();
        assert_eq!(id.encode(vec![1, 2, 3]), Ok(vec![1, 2, 3]));
        assert_eq!(id.decode(vec![]), Ok(vec![]));
    }

    #[test]
    fn chain_order() {
        fn upper(s: String) -> CodecResult<String> {
            Ok(s.to_ascii_uppercase())
        }
        let coder = chain!(
            Alphabet::new("abc").unwrap(),
            Join::new("-"),
            Normalize::new(upper),
        );
        assert_eq!(coder.encode(vec![2, 0, 1]), Ok(String::from("c-a-b")));
        // decode normalises first, so lower-case input is rejected after upper-casing
        assert_eq!(
            coder.decode(String::from("c-a-b")),
            Err(CodecError::UnknownCharacter {
                character: 'C',
                position: 0
            })
        );
    }

    #[test]
    fn chain_is_associative() {
        let left = Chain::new(
            Chain::new(Alphabet::new("01").unwrap(), Join::default()),
            Identity::<String>::new(),
        );
        let right = chain!(
            Alphabet::new("01").unwrap(),
            Join::default(),
            Identity::<String>::new(),
        );
        let digits = vec![1, 0, 1, 1];
        assert_eq!(
            left.encode(digits.clone()).unwrap(),
            right.encode(digits.clone()).unwrap()
        );
        assert_eq!(left.decode("1011".into()).unwrap(), digits);
        assert_eq!(right.decode("1011".into()).unwrap(), digits);
    }
}
