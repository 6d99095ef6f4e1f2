//! Signed-Value Codec
//!
//! Paillier plaintexts live in the unsigned range [0, N). A signed value v is
//! split upstream into max(v, 0) and max(-v, 0), each half encrypted on its
//! own and the two equal-width ciphertext buffers concatenated:
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┐
//! │  E(max(v, 0))        │  E(max(-v, 0))       │
//! │  actual, width / 2   │  negative, width / 2 │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! Halves are summed independently; the decryptor recovers the signed total
//! as D(actual) - D(negative).

use crate::ciphertext::{Ciphertext, Modulus};
use crate::combinator::{combine, HomomorphicAdd};
use crate::{HomomorphicError, HomomorphicResult};

/// A signed value as an (actual, negative) ciphertext pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedPair {
    actual: Ciphertext,
    negative: Ciphertext,
}

impl SignedPair {
    /// Pair two ciphertexts
    pub fn new(actual: Ciphertext, negative: Ciphertext) -> Self {
        Self { actual, negative }
    }

    /// Split a raw buffer into its two halves
    pub fn split(raw: &[u8]) -> HomomorphicResult<Self> {
        if raw.is_empty() {
            return Err(HomomorphicError::EmptyCiphertext);
        }
        if raw.len() % 2 != 0 {
            return Err(HomomorphicError::OddLength(raw.len()));
        }

        let (actual, negative) = raw.split_at(raw.len() / 2);
        Ok(Self {
            actual: Ciphertext::from_bytes(actual)?,
            negative: Ciphertext::from_bytes(negative)?,
        })
    }

    /// Encrypted non-negative contribution
    pub fn actual(&self) -> &Ciphertext {
        &self.actual
    }

    /// Encrypted subtracted contribution
    pub fn negative(&self) -> &Ciphertext {
        &self.negative
    }

    /// Lay both halves out in a buffer of exactly `width` bytes
    pub fn join(&self, width: usize) -> HomomorphicResult<Vec<u8>> {
        if width % 2 != 0 {
            return Err(HomomorphicError::OddLength(width));
        }

        let half = width / 2;
        let mut out = self.actual.to_bytes_padded(half)?;
        out.extend_from_slice(&self.negative.to_bytes_padded(half)?);
        Ok(out)
    }
}

/// Combine two pairs half by half
pub fn combine_pair(a: &SignedPair, b: &SignedPair, modulus: &Modulus) -> SignedPair {
    SignedPair {
        actual: combine(&a.actual, &b.actual, modulus),
        negative: combine(&a.negative, &b.negative, modulus),
    }
}

impl HomomorphicAdd for SignedPair {
    fn homomorphic_add(&self, other: &Self, modulus: &Modulus) -> Self {
        combine_pair(self, other, modulus)
    }
}
