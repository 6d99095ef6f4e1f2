//! Host-facing aggregate lifecycle
//!
//! A query engine drives an aggregate through init, per-row accumulate,
//! merge of partial results from other partitions, and terminate. Partial
//! state crosses process boundaries through write_state / read_state.

use crate::accumulator::SumAccumulator;
use crate::{wire, AggregateResult};

/// Lifecycle every user-defined aggregate exposes to the engine
pub trait AggregateFunction {
    /// Reset to the empty state
    fn init(&mut self);

    /// Fold one encrypted row together with its N²
    fn accumulate(&mut self, value: &[u8], modulus: &[u8]) -> AggregateResult<()>;

    /// Fold another partition's partial result
    fn merge(&mut self, other: &Self) -> AggregateResult<()>;

    /// Produce the final ciphertext
    fn terminate(&self) -> AggregateResult<Vec<u8>>;

    /// Serialize partial state
    fn write_state(&self) -> AggregateResult<Vec<u8>>;

    /// Replace the current state with serialized partial state
    fn read_state(&mut self, data: &[u8]) -> AggregateResult<()>;
}

impl AggregateFunction for SumAccumulator {
    fn init(&mut self) {
        SumAccumulator::init(self)
    }

    fn accumulate(&mut self, value: &[u8], modulus: &[u8]) -> AggregateResult<()> {
        SumAccumulator::accumulate(self, value, modulus)
    }

    fn merge(&mut self, other: &Self) -> AggregateResult<()> {
        SumAccumulator::merge(self, other)
    }

    fn terminate(&self) -> AggregateResult<Vec<u8>> {
        SumAccumulator::terminate(self)
    }

    fn write_state(&self) -> AggregateResult<Vec<u8>> {
        wire::encode(self)
    }

    fn read_state(&mut self, data: &[u8]) -> AggregateResult<()> {
        let decoded = wire::decode(*self.config(), data)?;
        *self = decoded;
        Ok(())
    }
}

/// Merge every partial into `target`, left to right
pub fn merge_partials<'a, F, I>(target: &mut F, partials: I) -> AggregateResult<()>
where
    F: AggregateFunction + 'a,
    I: IntoIterator<Item = &'a F>,
{
    for partial in partials {
        target.merge(partial)?;
    }
    Ok(())
}
