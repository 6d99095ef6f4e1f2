//! Ciphertext Combinator
//!
//! E(m1) · E(m2) mod N² = E(m1 + m2 mod N). The operation is associative and
//! commutative, so folding row by row and merging partial results pairwise
//! in any grouping yield the same ciphertext.

use num_integer::Integer;

use crate::ciphertext::{Ciphertext, Modulus};

/// Homomorphic addition under a shared modulus
pub trait HomomorphicAdd {
    /// Combine `self` with `other`, producing the encryption of the sum
    fn homomorphic_add(&self, other: &Self, modulus: &Modulus) -> Self;
}

/// Combine two ciphertexts produced under `modulus`.
///
/// The result always lies in `[0, modulus)`.
pub fn combine(a: &Ciphertext, b: &Ciphertext, modulus: &Modulus) -> Ciphertext {
    let product = a.value() * b.value();
    Ciphertext::from_bigint(product.mod_floor(modulus.value()))
}

impl HomomorphicAdd for Ciphertext {
    fn homomorphic_add(&self, other: &Self, modulus: &Modulus) -> Self {
        combine(self, other, modulus)
    }
}
