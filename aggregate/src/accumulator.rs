//! Homomorphic Sum Accumulator
//!
//! State machine driven by the host engine:
//!
//! ```text
//!  init ──► Empty ──accumulate / merge(non-empty)──► Populated ◄─┐
//!                                                       │        │
//!                                                       └────────┘
//!                                          accumulate / merge / terminate
//! ```
//!
//! The first value folded in becomes the seed and fixes the cached modulus
//! and the original input width. Every later combination reduces by the
//! cached modulus.

use cipherfold_homomorphic::{
    Ciphertext, HomomorphicAdd, HomomorphicResult, Modulus, SignedPair,
};
use tracing::{debug, trace, warn};

use crate::config::{AggregateConfig, SignMode, WidthPolicy};
use crate::{AggregateError, AggregateResult};

/// Running product, shaped by the sign mode
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Running {
    Plain(Ciphertext),
    Signed(SignedPair),
}

impl Running {
    pub(crate) fn parse(mode: SignMode, raw: &[u8]) -> HomomorphicResult<Self> {
        match mode {
            SignMode::Plain => Ciphertext::from_bytes(raw).map(Running::Plain),
            SignMode::SignAware => SignedPair::split(raw).map(Running::Signed),
        }
    }

    fn add(&self, other: &Self, modulus: &Modulus) -> AggregateResult<Self> {
        match (self, other) {
            (Running::Plain(a), Running::Plain(b)) => {
                Ok(Running::Plain(a.homomorphic_add(b, modulus)))
            }
            (Running::Signed(a), Running::Signed(b)) => {
                Ok(Running::Signed(a.homomorphic_add(b, modulus)))
            }
            _ => Err(AggregateError::ConfigMismatch(
                "cannot combine plain and sign-aware values".into(),
            )),
        }
    }
}

/// Everything cached once the first value is seen
#[derive(Clone, Debug)]
pub(crate) struct Populated {
    pub(crate) running: Running,
    pub(crate) modulus: Modulus,
    pub(crate) original_length: usize,
}

/// Incremental, mergeable SUM over Paillier ciphertexts
#[derive(Clone, Debug)]
pub struct SumAccumulator {
    config: AggregateConfig,
    state: Option<Populated>,
    poisoned: bool,
}

impl SumAccumulator {
    /// Create an empty accumulator
    pub fn new(config: AggregateConfig) -> AggregateResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: None,
            poisoned: false,
        })
    }

    pub(crate) fn from_parts(config: AggregateConfig, state: Option<Populated>) -> Self {
        Self {
            config,
            state,
            poisoned: false,
        }
    }

    /// Fold every input into a fresh accumulator and terminate it
    pub fn fold_all<'a, I>(
        config: AggregateConfig,
        inputs: I,
        modulus: &[u8],
    ) -> AggregateResult<Vec<u8>>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut acc = Self::new(config)?;
        for raw in inputs {
            acc.accumulate(raw, modulus)?;
        }
        acc.terminate()
    }

    /// Reset to Empty. Also clears poisoning.
    pub fn init(&mut self) {
        self.state = None;
        self.poisoned = false;
    }

    /// Active configuration
    pub fn config(&self) -> &AggregateConfig {
        &self.config
    }

    /// True until a value has been folded in
    pub fn is_empty(&self) -> bool {
        self.state.is_none()
    }

    /// True once a mutation has failed
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Cached N², if populated
    pub fn modulus(&self) -> Option<&Modulus> {
        self.state.as_ref().map(|s| &s.modulus)
    }

    /// Byte width of the first accepted raw ciphertext, if populated.
    /// Decoded states only carry it under `WidthPolicy::PreserveInput`;
    /// otherwise this reports the width of the minimal encoding.
    pub fn original_length(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.original_length)
    }

    pub(crate) fn state(&self) -> AggregateResult<Option<&Populated>> {
        if self.poisoned {
            return Err(AggregateError::Poisoned);
        }
        Ok(self.state.as_ref())
    }

    /// Fold one raw ciphertext into the aggregate.
    ///
    /// `modulus` is only read for the first value; afterwards the cached one
    /// is used, unless strict mode is on, in which case a differing modulus is
    /// rejected.
    pub fn accumulate(&mut self, raw: &[u8], modulus: &[u8]) -> AggregateResult<()> {
        if self.poisoned {
            return Err(AggregateError::Poisoned);
        }

        let result = self.accumulate_inner(raw, modulus);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn accumulate_inner(&mut self, raw: &[u8], modulus: &[u8]) -> AggregateResult<()> {
        let value = Running::parse(self.config.sign_mode, raw)?;

        let Some(state) = self.state.as_mut() else {
            let modulus = Modulus::from_bytes(modulus)?;
            let prefix = modulus.to_bytes();
            debug!(
                width = raw.len(),
                modulus = %hex::encode(&prefix[..prefix.len().min(8)]),
                "seeding aggregate"
            );
            self.state = Some(Populated {
                running: value,
                modulus,
                original_length: raw.len(),
            });
            return Ok(());
        };

        if self.config.strict_modulus && Modulus::from_bytes(modulus)? != state.modulus {
            warn!("rejecting ciphertext produced under a different modulus");
            return Err(AggregateError::ModulusMismatch);
        }

        trace!(width = raw.len(), "accumulating ciphertext");
        state.running = state.running.add(&value, &state.modulus)?;
        Ok(())
    }

    /// Fold another accumulator's partial result into this one.
    ///
    /// `other` is only read; it stays usable afterwards.
    pub fn merge(&mut self, other: &Self) -> AggregateResult<()> {
        if self.poisoned {
            return Err(AggregateError::Poisoned);
        }

        let result = self.merge_inner(other);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn merge_inner(&mut self, other: &Self) -> AggregateResult<()> {
        if self.config.sign_mode != other.config.sign_mode
            || self.config.width != other.config.width
        {
            return Err(AggregateError::ConfigMismatch(format!(
                "{:?}/{:?} vs {:?}/{:?}",
                self.config.sign_mode, self.config.width, other.config.sign_mode, other.config.width
            )));
        }

        let Some(incoming) = other.state()? else {
            trace!("merging empty partial aggregate");
            return Ok(());
        };

        let Some(state) = self.state.as_mut() else {
            debug!("adopting partial aggregate");
            self.state = Some(incoming.clone());
            return Ok(());
        };

        if self.config.strict_modulus && incoming.modulus != state.modulus {
            warn!("rejecting partial aggregate produced under a different modulus");
            return Err(AggregateError::ModulusMismatch);
        }

        debug!("merging partial aggregate");
        state.running = state.running.add(&incoming.running, &state.modulus)?;
        Ok(())
    }

    /// Read out the combined ciphertext. Does not mutate the aggregate.
    pub fn terminate(&self) -> AggregateResult<Vec<u8>> {
        let state = self.state()?.ok_or(AggregateError::EmptyAggregate)?;

        let width = match self.config.width {
            WidthPolicy::Minimal => None,
            WidthPolicy::PreserveInput => Some(state.original_length),
            WidthPolicy::Fixed(n) => Some(n),
        };

        let bytes = match (&state.running, width) {
            (Running::Plain(ct), None) => ct.to_bytes(),
            (Running::Plain(ct), Some(width)) => ct.to_bytes_padded(width)?,
            (Running::Signed(pair), width) => {
                pair.join(width.unwrap_or(state.original_length))?
            }
        };
        Ok(bytes)
    }
}

/// Equality ignores the cached input width unless the width policy reads it.
impl PartialEq for SumAccumulator {
    fn eq(&self, other: &Self) -> bool {
        let tracks_width = self.config.width == WidthPolicy::PreserveInput;
        let same_state = match (&self.state, &other.state) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                a.running == b.running
                    && a.modulus == b.modulus
                    && (!tracks_width || a.original_length == b.original_length)
            }
            _ => false,
        };
        self.config == other.config && self.poisoned == other.poisoned && same_state
    }
}

impl Eq for SumAccumulator {}
