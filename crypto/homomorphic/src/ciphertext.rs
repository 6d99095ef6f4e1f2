//! Ciphertext and modulus value types
//!
//! Both are arbitrary-precision integers. On the wire they travel as
//! little-endian two's-complement byte strings, the layout produced by the
//! encryption layer upstream.

use std::fmt;

use num_bigint_dig::BigInt;
use num_traits::{Signed, Zero};

use crate::{HomomorphicError, HomomorphicResult};

/// An encrypted value, interpreted modulo N²
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ciphertext {
    value: BigInt,
}

impl Ciphertext {
    /// Decode a raw ciphertext buffer
    pub fn from_bytes(bytes: &[u8]) -> HomomorphicResult<Self> {
        if bytes.is_empty() {
            return Err(HomomorphicError::EmptyCiphertext);
        }

        Ok(Self {
            value: BigInt::from_signed_bytes_le(bytes),
        })
    }

    /// Wrap an integer produced by arithmetic
    pub fn from_bigint(value: BigInt) -> Self {
        Self { value }
    }

    /// Get the underlying integer
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// Minimal encoding. Leading zero bytes of the input are not preserved.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.value.to_signed_bytes_le()
    }

    /// Length of the minimal encoding in bytes
    pub fn encoded_len(&self) -> usize {
        self.to_bytes().len()
    }

    /// Encode into exactly `width` bytes.
    ///
    /// The minimal encoding occupies the low-order end of the slot and the
    /// remaining high-order bytes are sign-filled (zero for every valid
    /// ciphertext). An encoding wider than the slot is rejected rather than
    /// truncated.
    pub fn to_bytes_padded(&self, width: usize) -> HomomorphicResult<Vec<u8>> {
        let mut bytes = self.to_bytes();
        if bytes.len() > width {
            tracing::warn!(
                required = bytes.len(),
                available = width,
                "ciphertext does not fit its output slot"
            );
            return Err(HomomorphicError::WidthOverflow {
                required: bytes.len(),
                available: width,
            });
        }

        let fill = if self.value.is_negative() { 0xFF } else { 0x00 };
        bytes.resize(width, fill);
        Ok(bytes)
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ciphertext")
            .field("bits", &self.value.bits())
            .finish()
    }
}

/// The Paillier N² a ciphertext lineage is reduced by
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Modulus {
    value: BigInt,
}

impl Modulus {
    /// Decode a modulus buffer. Zero and negative values are rejected.
    pub fn from_bytes(bytes: &[u8]) -> HomomorphicResult<Self> {
        Self::from_bigint(BigInt::from_signed_bytes_le(bytes))
    }

    /// Wrap an already computed N²
    pub fn from_bigint(value: BigInt) -> HomomorphicResult<Self> {
        if value.is_zero() || value.is_negative() {
            return Err(HomomorphicError::InvalidModulus(format!(
                "expected a positive integer, got {}",
                value
            )));
        }

        Ok(Self { value })
    }

    /// Get the underlying integer
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// Minimal encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        self.value.to_signed_bytes_le()
    }
}

impl fmt::Debug for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modulus")
            .field("bits", &self.value.bits())
            .finish()
    }
}
