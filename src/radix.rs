//! Conversion of digit sequences between numeric bases
//!
//! # Arbitrary bases
//!
//! [`convert_radix`] treats its input as a single big-endian number in base
//! `from` and rewrites it in base `to` by repeated long division. The input is
//! divided by `to` in place, one remainder is emitted per pass, and passes
//! stop once the dividend is exactly zero. Every multiply-accumulate step uses
//! checked `u64` arithmetic, so no intermediate value can silently wrap.
//!
//! Leading zero digits carry meaning (most notably, leading `0x00` bytes in a
//! base58 payload), so each leading zero digit of the input is reproduced as a
//! leading zero digit of the output.
//!
//! # Power-of-two bases
//!
//! When both bases are powers of two, [`convert_radix2`] regroups bits instead
//! of dividing. Bits are shifted into a carry register, and an output word is
//! emitted every time at least `to` bits are buffered. The register must be
//! able to hold `from + to - gcd(from, to)` bits, which is checked against 32
//! before any data is touched.
//!
//! The coders [`Radix`] and [`Radix2`] wrap these functions as the first stage
//! of a pipeline, converting raw bytes (base 256) to digits and back.

use num_integer::Integer;

use crate::conv::Coder;
use crate::error::{CodecError, CodecResult};

/// Widest word, in bits, that [`convert_radix2`] accepts on either side
pub const MAX_BITS: u32 = 32;

/// Converts a big-endian digit sequence from base `from` to base `to`.
///
/// The output has no superfluous leading zeros, except that every leading
/// zero digit of `data` contributes exactly one leading zero digit to the
/// output. An all-zero input of length `n` therefore becomes `n` zero digits,
/// and an empty input stays empty.
///
/// # Errors
///
/// * `InvalidBase` if `from < 2` or `to < 2`
/// * `InvalidDigit` if any element of `data` is not less than `from`
/// * `Overflow` if an intermediate product or quotient does not fit
///
/// # Examples
///
/// ```
/// # use basalt::radix::convert_radix;
/// assert_eq!(convert_radix(&[0, 1, 0], 256, 10).unwrap(), vec![0, 2, 5, 6]);
/// ```
pub fn convert_radix(data: &[u32], from: u32, to: u32) -> CodecResult<Vec<u32>> {
    if from < 2 {
        return Err(CodecError::InvalidBase { base: from });
    }
    if to < 2 {
        return Err(CodecError::InvalidBase { base: to });
    }
    if let Some((position, &digit)) = data.iter().enumerate().find(|(_, &d)| d >= from) {
        return Err(CodecError::InvalidDigit {
            digit,
            base: from,
            position,
        });
    }

    let zeros = data.iter().take_while(|&&d| d == 0).count();
    if zeros == data.len() {
        return Ok(vec![0; zeros]);
    }

    let from_wide = u64::from(from);
    let to_wide = u64::from(to);

    let mut digits: Vec<u32> = data[zeros..].to_vec();
    let mut start: usize = 0;
    let mut ret: Vec<u32> = Vec::new();

    while start < digits.len() {
        let mut carry: u64 = 0;
        for digit in digits[start..].iter_mut() {
            let acc = from_wide
                .checked_mul(carry)
                .and_then(|hi| hi.checked_add(u64::from(*digit)))
                .ok_or(CodecError::Overflow)?;
            carry = acc % to_wide;
            *digit = u32::try_from(acc / to_wide).map_err(|_| CodecError::Overflow)?;
        }
        ret.push(u32::try_from(carry).map_err(|_| CodecError::Overflow)?);
        while start < digits.len() && digits[start] == 0 {
            start += 1;
        }
    }

    ret.resize(ret.len() + zeros, 0);
    ret.reverse();
    Ok(ret)
}

/// Number of bits the carry register needs when regrouping `from`-bit words
/// into `to`-bit words.
#[inline]
#[must_use]
pub fn radix2_carry(from: u32, to: u32) -> u32 {
    from + (to - from.gcd(&to))
}

fn check_radix2(from: u32, to: u32) -> CodecResult<()> {
    for bits in [from, to] {
        if bits == 0 || bits > MAX_BITS {
            return Err(CodecError::InvalidBitWidth { bits });
        }
    }
    let carry_bits = radix2_carry(from, to);
    if carry_bits > MAX_BITS {
        return Err(CodecError::CarryOverflow {
            from,
            to,
            carry_bits,
        });
    }
    Ok(())
}

/// Regroups a sequence of `from`-bit words into `to`-bit words.
///
/// If `padding` is set, any bits left over after the last full output word
/// are flushed as one final word, left-aligned and zero-filled. Otherwise the
/// leftover bits must be fewer than `from` and all zero; this is what makes an
/// unpadded decode reject trailing garbage.
///
/// # Errors
///
/// * `InvalidBitWidth` if `from` or `to` is outside `(0, 32]`
/// * `CarryOverflow` if the required carry register is wider than 32 bits
/// * `InvalidDigit` if any input word does not fit in `from` bits
/// * `ExcessPadding` / `NonZeroPadding` for invalid leftovers without `padding`
///
/// # Examples
///
/// ```
/// # use basalt::radix::convert_radix2;
/// let words = convert_radix2(&[255, 255], 8, 5, true).unwrap();
/// assert_eq!(words, vec![31, 31, 31, 16]);
/// assert_eq!(convert_radix2(&words, 5, 8, false).unwrap(), vec![255, 255]);
/// ```
pub fn convert_radix2(data: &[u32], from: u32, to: u32, padding: bool) -> CodecResult<Vec<u32>> {
    check_radix2(from, to)?;

    let mask: u64 = (1u64 << to) - 1;
    let limit: u64 = 1u64 << from;
    let mut carry: u64 = 0;
    let mut pos: u32 = 0;
    let mut ret: Vec<u32> = Vec::with_capacity((data.len() * from as usize).div_ceil(to as usize));

    for (position, &word) in data.iter().enumerate() {
        if u64::from(word) >= limit {
            return Err(CodecError::InvalidDigit {
                digit: word,
                base: 1u32.checked_shl(from).unwrap_or(0),
                position,
            });
        }
        if pos + from > MAX_BITS {
            return Err(CodecError::CarryOverflow {
                from,
                to,
                carry_bits: pos + from,
            });
        }
        carry = (carry << from) | u64::from(word);
        pos += from;
        while pos >= to {
            pos -= to;
            ret.push(((carry >> pos) & mask) as u32);
        }
        carry &= (1u64 << pos) - 1;
    }

    let rest = ((carry << (to - pos)) & mask) as u32;
    if padding {
        if pos > 0 {
            ret.push(rest);
        }
    } else {
        if pos >= from {
            return Err(CodecError::ExcessPadding { pos });
        }
        if rest != 0 {
            return Err(CodecError::NonZeroPadding { bits: rest });
        }
    }
    Ok(ret)
}

/// Byte coder into digits of an arbitrary base, via [`convert_radix`]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Radix {
    base: u32,
}

impl Radix {
    /// # Errors
    ///
    /// Returns `InvalidBase` if `base < 2`.
    pub fn new(base: u32) -> CodecResult<Self> {
        if base < 2 {
            return Err(CodecError::InvalidBase { base });
        }
        Ok(Self { base })
    }

    pub const fn base(&self) -> u32 {
        self.base
    }
}

fn bytes_of_digits(digits: Vec<u32>) -> CodecResult<Vec<u8>> {
    digits
        .into_iter()
        .map(|d| u8::try_from(d).map_err(|_| CodecError::Overflow))
        .collect()
}

fn digits_of_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes.iter().map(|&b| u32::from(b)).collect()
}

impl Coder for Radix {
    type Decoded = Vec<u8>;
    type Encoded = Vec<u32>;

    fn encode(&self, input: Vec<u8>) -> CodecResult<Vec<u32>> {
        convert_radix(&digits_of_bytes(&input), 256, self.base)
    }

    fn decode(&self, input: Vec<u32>) -> CodecResult<Vec<u8>> {
        bytes_of_digits(convert_radix(&input, self.base, 256)?)
    }
}

/// Byte coder into `bits`-bit words, via [`convert_radix2`]
///
/// By default, encoding pads the final word and decoding requires zero-valued
/// leftover bits. `rev_padding` swaps the two, for formats that pad on the
/// byte side instead.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Radix2 {
    bits: u32,
    rev_padding: bool,
}

impl Radix2 {
    /// # Errors
    ///
    /// Returns `InvalidBitWidth` if `bits` is outside `(0, 32]`, and
    /// `CarryOverflow` if converting between 8 and `bits` in either direction
    /// would need a carry register wider than 32 bits.
    ///
    /// ```
    /// # use basalt::{radix::Radix2, error::CodecError};
    /// assert!(matches!(Radix2::new(27, false), Err(CodecError::CarryOverflow { .. })));
    /// ```
    pub fn new(bits: u32, rev_padding: bool) -> CodecResult<Self> {
        check_radix2(8, bits)?;
        check_radix2(bits, 8)?;
        Ok(Self { bits, rev_padding })
    }

    pub const fn bits(&self) -> u32 {
        self.bits
    }
}

impl Coder for Radix2 {
    type Decoded = Vec<u8>;
    type Encoded = Vec<u32>;

    fn encode(&self, input: Vec<u8>) -> CodecResult<Vec<u32>> {
        convert_radix2(&digits_of_bytes(&input), 8, self.bits, !self.rev_padding)
    }

    fn decode(&self, input: Vec<u32>) -> CodecResult<Vec<u8>> {
        bytes_of_digits(convert_radix2(&input, self.bits, 8, self.rev_padding)?)
    }
}
