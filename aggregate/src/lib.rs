//! Homomorphic SUM Aggregate
//!
//! An incremental accumulator that sums Paillier ciphertexts without
//! decrypting them, suitable for use as a user-defined aggregate inside a
//! query engine.
//!
//! # Key Features:
//! - Row-by-row accumulation and pairwise merge of partial results
//! - Plain (single ciphertext) and sign-aware (actual/negative pair) modes
//! - Minimal, input-preserving or fixed output width
//! - Binary state codec for shuffling partial aggregates between partitions
//! - Optional strict check that every input shares the cached N²
//!
//! # Example
//! ```
//! use cipherfold_aggregate::{AggregateConfig, SumAccumulator};
//!
//! let nsq = [0xF1, 0xFF, 0xFF, 0x7F];
//! let mut acc = SumAccumulator::new(AggregateConfig::plain()).unwrap();
//! acc.accumulate(&[6, 0], &nsq).unwrap();
//! acc.accumulate(&[7, 0], &nsq).unwrap();
//! assert_eq!(acc.terminate().unwrap(), vec![42]);
//! ```

pub mod config;
pub mod errors;
pub mod wire;
mod accumulator;
mod function;

pub use accumulator::SumAccumulator;
pub use config::{AggregateConfig, ConfigError, SignMode, WidthPolicy};
pub use errors::AggregateError;
pub use function::{merge_partials, AggregateFunction};

/// Result type for aggregate operations
pub type AggregateResult<T> = Result<T, AggregateError>;
