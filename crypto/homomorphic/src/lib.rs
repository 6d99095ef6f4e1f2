//! Paillier Ciphertext Composition
//!
//! Algebra for summing values that are encrypted under the Paillier
//! additive-homomorphic cryptosystem, without ever decrypting them.
//!
//! # Key Features:
//! - Multiplying two ciphertexts modulo N² adds their plaintexts modulo N
//! - Signed plaintexts carried as an (actual, negative) ciphertext pair
//! - Fixed-width byte layout for handing results back to a decryptor
//!
//! # Caller Contract:
//! Every ciphertext combined in one lineage must come from the same key, i.e.
//! the same N². Nothing in this crate can detect a mismatch; the resulting
//! ciphertext simply decrypts to garbage.

pub mod errors;
mod ciphertext;
mod combinator;
mod signed;

pub use ciphertext::{Ciphertext, Modulus};
pub use combinator::{combine, HomomorphicAdd};
pub use errors::HomomorphicError;
pub use signed::{combine_pair, SignedPair};

/// Result type for ciphertext operations
pub type HomomorphicResult<T> = Result<T, HomomorphicError>;
