//! Ciphertext error types

use thiserror::Error;

/// Errors that can occur while decoding or re-encoding ciphertexts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HomomorphicError {
    /// A zero-length buffer cannot hold a ciphertext
    #[error("Empty ciphertext buffer")]
    EmptyCiphertext,

    /// Sign-aware buffers must split into two equal halves
    #[error("Buffer of {0} bytes cannot be split into two equal halves")]
    OddLength(usize),

    /// The modulus must be a positive integer
    #[error("Invalid modulus: {0}")]
    InvalidModulus(String),

    /// Encoded integer does not fit the requested output slot
    #[error("Ciphertext needs {required} bytes but only {available} are available")]
    WidthOverflow {
        /// Bytes needed by the minimal encoding
        required: usize,
        /// Bytes allotted by the output layout
        available: usize,
    },
}
