//! Aggregate error types

use cipherfold_homomorphic::HomomorphicError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the accumulator and its wire codec
#[derive(Error, Debug)]
pub enum AggregateError {
    /// Terminate called before any value was folded in
    #[error("Empty aggregate: no ciphertext has been accumulated")]
    EmptyAggregate,

    /// Strict mode saw a modulus other than the cached one
    #[error("Modulus mismatch: input was produced under a different N²")]
    ModulusMismatch,

    /// Merge across accumulators with incompatible layouts
    #[error("Configuration mismatch: {0}")]
    ConfigMismatch(String),

    /// A previous mutation failed; the instance must be re-initialized
    #[error("Accumulator is poisoned by an earlier failure")]
    Poisoned,

    /// Serialized state is malformed
    #[error("Decode error: {0}")]
    Decode(String),

    /// State cannot be expressed in the wire format
    #[error("Encode error: {0}")]
    Encode(String),

    /// Ciphertext layer failure
    #[error(transparent)]
    Homomorphic(#[from] HomomorphicError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),
}
