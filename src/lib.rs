//! cipherfold: encrypted SUM for query engines
//!
//! Root crate re-exporting the cipherfold components so a host engine can
//! depend on a single crate.
//!
//! ## Crate Organization
//!
//! - `cipherfold-homomorphic`: ciphertext types, the Paillier combination
//!   rule and the signed-value (actual/negative) codec
//! - `cipherfold-aggregate`: the accumulator state machine, its
//!   configuration and the binary state codec

pub mod logging;

pub use cipherfold_homomorphic as homomorphic;
pub use cipherfold_aggregate as aggregate;

/// cipherfold version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use cipherfold_aggregate::{
        AggregateConfig, AggregateError, AggregateFunction, AggregateResult, SignMode,
        SumAccumulator, WidthPolicy,
    };
    pub use cipherfold_homomorphic::{Ciphertext, HomomorphicAdd, Modulus, SignedPair};
}
