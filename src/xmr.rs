//! Block-chunked base58, as used for Monero addresses
//!
//! Plain base58 is quadratic in the input length and does not have a fixed
//! output width. This variant splits the input into 8-byte blocks, encodes
//! each block on its own, and left-pads each encoded block with the zero
//! character `1` to a width that depends only on the block's byte length.
//! A full block is always 11 characters wide; only the final block of an
//! input may be shorter.

use crate::codecs::BASE58;
use crate::conv::Coder;
use crate::error::{CodecError, CodecResult};

/// Number of bytes in a full block
pub const BLOCK_BYTES: usize = 8;

/// Encoded width of a block, indexed by its byte length
pub const BLOCK_LEN: [usize; BLOCK_BYTES + 1] = [0, 2, 3, 5, 6, 7, 9, 10, 11];

/// Encoded width of a full block
pub const FULL_BLOCK_LEN: usize = BLOCK_LEN[BLOCK_BYTES];

const PAD: char = '1';

/// Codec between bytes and block-chunked base58 text
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Base58Xmr;

impl Coder for Base58Xmr {
    type Decoded = Vec<u8>;
    type Encoded = String;

    fn encode(&self, input: Vec<u8>) -> CodecResult<String> {
        let mut ret = String::with_capacity(input.len().div_ceil(BLOCK_BYTES) * FULL_BLOCK_LEN);
        for block in input.chunks(BLOCK_BYTES) {
            let encoded = BASE58.encode(block.to_vec())?;
            // each block is a fixed-width number, so leading zero bytes are
            // absorbed into the left padding
            let digits = encoded.trim_start_matches(PAD);
            for _ in digits.len()..BLOCK_LEN[block.len()] {
                ret.push(PAD);
            }
            ret.push_str(digits);
        }
        Ok(ret)
    }

    fn decode(&self, input: String) -> CodecResult<Vec<u8>> {
        let chars: Vec<char> = input.chars().collect();
        let mut ret = Vec::with_capacity(chars.len().div_ceil(FULL_BLOCK_LEN) * BLOCK_BYTES);
        for group in chars.chunks(FULL_BLOCK_LEN) {
            let block_len = BLOCK_LEN
                .iter()
                .position(|&width| width == group.len())
                .ok_or(CodecError::InvalidPadding("base58xmr: wrong block length"))?;
            let block = BASE58.decode(group.iter().collect())?;
            let start = block.iter().position(|&b| b != 0).unwrap_or(block.len());
            let value = &block[start..];
            if value.len() > block_len {
                return Err(CodecError::InvalidPadding("base58xmr: wrong padding"));
            }
            ret.resize(ret.len() + block_len - value.len(), 0);
            ret.extend_from_slice(value);
        }
        Ok(ret)
    }
}
