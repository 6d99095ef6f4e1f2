//! Binary state codec for shipping partial aggregates between partitions.
//!
//! Layout, all length prefixes little-endian i32:
//!
//! ```text
//! u8      is_empty            0x00 | 0x01
//! i32     actual_length       single running value in plain mode
//! bytes   actual
//! i32     negative_length     sign-aware only
//! bytes   negative            sign-aware only
//! i32     modulus_length
//! bytes   modulus
//! i32     original_length     width policy preserve_input only
//! ```
//!
//! Integer payloads are minimal little-endian two's-complement encodings.
//! An empty state writes zero for every integer field.

use cipherfold_homomorphic::{Ciphertext, Modulus, SignedPair};
use tracing::debug;

use crate::accumulator::{Populated, Running, SumAccumulator};
use crate::config::{AggregateConfig, SignMode, WidthPolicy};
use crate::{AggregateError, AggregateResult};

const ZERO: [u8; 1] = [0];

/// Serialize an accumulator's state
pub fn encode(acc: &SumAccumulator) -> AggregateResult<Vec<u8>> {
    let config = acc.config();
    let mut w = Writer::default();

    match acc.state()? {
        None => {
            w.put_bool(true);
            w.put_bytes(&ZERO)?;
            if config.sign_mode == SignMode::SignAware {
                w.put_bytes(&ZERO)?;
            }
            w.put_bytes(&ZERO)?;
            if config.width == WidthPolicy::PreserveInput {
                w.put_len(0)?;
            }
        }
        Some(state) => {
            w.put_bool(false);
            match &state.running {
                Running::Plain(ct) => w.put_bytes(&ct.to_bytes())?,
                Running::Signed(pair) => {
                    w.put_bytes(&pair.actual().to_bytes())?;
                    w.put_bytes(&pair.negative().to_bytes())?;
                }
            }
            w.put_bytes(&state.modulus.to_bytes())?;
            if config.width == WidthPolicy::PreserveInput {
                w.put_len(state.original_length)?;
            }
        }
    }

    debug!(bytes = w.buf.len(), "encoded aggregate state");
    Ok(w.buf)
}

/// Rebuild an accumulator from serialized state.
///
/// `config` must match the configuration the state was written with; the
/// layout is not self-describing.
pub fn decode(config: AggregateConfig, data: &[u8]) -> AggregateResult<SumAccumulator> {
    config.validate()?;
    let mut r = Reader::new(data);

    let is_empty = r.take_bool()?;
    let first = r.take_bytes()?;
    let second = match config.sign_mode {
        SignMode::SignAware => Some(r.take_bytes()?),
        SignMode::Plain => None,
    };
    let modulus = r.take_bytes()?;
    let original_length = match config.width {
        WidthPolicy::PreserveInput => Some(r.take_len()?),
        _ => None,
    };
    r.finish()?;

    if is_empty {
        debug!(bytes = data.len(), "decoded empty aggregate state");
        return Ok(SumAccumulator::from_parts(config, None));
    }

    let running = match second {
        None => Running::Plain(decode_ciphertext(first)?),
        Some(negative) => Running::Signed(SignedPair::new(
            decode_ciphertext(first)?,
            decode_ciphertext(negative)?,
        )),
    };
    let modulus = Modulus::from_bytes(modulus)
        .map_err(|e| AggregateError::Decode(e.to_string()))?;

    // Only preserve_input reads it back; other policies never consult it.
    let original_length = original_length.unwrap_or_else(|| minimal_width(&running));
    if original_length == 0 {
        return Err(AggregateError::Decode("original length must be positive".into()));
    }
    if config.sign_mode == SignMode::SignAware && original_length % 2 != 0 {
        return Err(AggregateError::Decode(format!(
            "sign-aware original length {} is not even",
            original_length
        )));
    }
    if !fits(&running, original_length) {
        return Err(AggregateError::Decode(format!(
            "running value does not fit original length {}",
            original_length
        )));
    }

    debug!(bytes = data.len(), "decoded aggregate state");
    Ok(SumAccumulator::from_parts(
        config,
        Some(Populated {
            running,
            modulus,
            original_length,
        }),
    ))
}

fn decode_ciphertext(bytes: &[u8]) -> AggregateResult<Ciphertext> {
    Ciphertext::from_bytes(bytes).map_err(|e| AggregateError::Decode(e.to_string()))
}

fn fits(running: &Running, original_length: usize) -> bool {
    match running {
        Running::Plain(ct) => ct.encoded_len() <= original_length,
        Running::Signed(pair) => {
            let half = original_length / 2;
            pair.actual().encoded_len() <= half && pair.negative().encoded_len() <= half
        }
    }
}

fn minimal_width(running: &Running) -> usize {
    match running {
        Running::Plain(ct) => ct.encoded_len(),
        Running::Signed(pair) => 2 * pair.actual().encoded_len().max(pair.negative().encoded_len()),
    }
}

#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn put_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    fn put_len(&mut self, len: usize) -> AggregateResult<()> {
        let len = i32::try_from(len)
            .map_err(|_| AggregateError::Encode(format!("length {} exceeds i32", len)))?;
        self.buf.extend_from_slice(&len.to_le_bytes());
        Ok(())
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> AggregateResult<()> {
        self.put_len(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> AggregateResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                AggregateError::Decode(format!(
                    "truncated input: need {} bytes at offset {}, have {}",
                    n,
                    self.pos,
                    self.data.len() - self.pos
                ))
            })?;
        let data = self.data;
        let out = &data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn take_bool(&mut self) -> AggregateResult<bool> {
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(AggregateError::Decode(format!("invalid bool byte {:#04x}", other))),
        }
    }

    fn take_len(&mut self) -> AggregateResult<usize> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        let len = i32::from_le_bytes(raw);
        usize::try_from(len)
            .map_err(|_| AggregateError::Decode(format!("negative length {}", len)))
    }

    fn take_bytes(&mut self) -> AggregateResult<&'a [u8]> {
        let len = self.take_len()?;
        self.take(len)
    }

    fn finish(self) -> AggregateResult<()> {
        if self.pos != self.data.len() {
            return Err(AggregateError::Decode(format!(
                "{} trailing bytes",
                self.data.len() - self.pos
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NSQ: [u8; 4] = [0xF1, 0xFF, 0xFF, 0x7F];

    fn populated(config: AggregateConfig, inputs: &[&[u8]]) -> SumAccumulator {
        let mut acc = SumAccumulator::new(config).unwrap();
        for raw in inputs {
            acc.accumulate(raw, &NSQ).unwrap();
        }
        acc
    }

    #[test]
    fn test_plain_layout() {
        let acc = populated(AggregateConfig::plain(), &[&[0x05, 0, 0, 0], &[0x03, 0, 0, 0]]);
        let bytes = encode(&acc).unwrap();

        let mut expected = vec![0x00];
        expected.extend_from_slice(&1i32.to_le_bytes());
        expected.push(15);
        expected.extend_from_slice(&4i32.to_le_bytes());
        expected.extend_from_slice(&NSQ);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_signed_layout_carries_original_length() {
        let acc = populated(AggregateConfig::signed(), &[&[2, 0, 0, 0, 3, 0, 0, 0]]);
        let bytes = encode(&acc).unwrap();

        let mut expected = vec![0x00];
        expected.extend_from_slice(&1i32.to_le_bytes());
        expected.push(2);
        expected.extend_from_slice(&1i32.to_le_bytes());
        expected.push(3);
        expected.extend_from_slice(&4i32.to_le_bytes());
        expected.extend_from_slice(&NSQ);
        expected.extend_from_slice(&8i32.to_le_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_roundtrip_preserves_behaviour() {
        let config = AggregateConfig::signed();
        let mut live = populated(config, &[&[2, 0, 0, 0, 3, 0, 0, 0], &[5, 0, 0, 0, 1, 0, 0, 0]]);
        let mut restored = decode(config, &encode(&live).unwrap()).unwrap();
        assert_eq!(restored, live);

        let next: &[u8] = &[7, 0, 0, 0, 11, 0, 0, 0];
        live.accumulate(next, &NSQ).unwrap();
        restored.accumulate(next, &NSQ).unwrap();
        assert_eq!(restored.terminate().unwrap(), live.terminate().unwrap());
        assert_eq!(restored.terminate().unwrap().len(), 8);
    }

    #[test]
    fn test_empty_roundtrip() {
        for config in [AggregateConfig::plain(), AggregateConfig::signed()] {
            let acc = SumAccumulator::new(config).unwrap();
            let restored = decode(config, &encode(&acc).unwrap()).unwrap();
            assert!(restored.is_empty());
            assert_eq!(restored, acc);
        }
    }

    #[test]
    fn test_truncated_input_rejected() {
        let acc = populated(AggregateConfig::plain(), &[&[9, 0]]);
        let bytes = encode(&acc).unwrap();
        for cut in 0..bytes.len() {
            assert!(
                matches!(decode(AggregateConfig::plain(), &bytes[..cut]), Err(AggregateError::Decode(_))),
                "prefix of {} bytes decoded",
                cut
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let acc = populated(AggregateConfig::plain(), &[&[9, 0]]);
        let mut bytes = encode(&acc).unwrap();
        bytes.push(0);
        assert!(matches!(
            decode(AggregateConfig::plain(), &bytes),
            Err(AggregateError::Decode(_))
        ));
    }

    #[test]
    fn test_negative_length_rejected() {
        let mut bytes = vec![0x00];
        bytes.extend_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            decode(AggregateConfig::plain(), &bytes),
            Err(AggregateError::Decode(_))
        ));
    }

    #[test]
    fn test_bad_bool_rejected() {
        let acc = populated(AggregateConfig::plain(), &[&[9, 0]]);
        let mut bytes = encode(&acc).unwrap();
        bytes[0] = 0x02;
        assert!(matches!(
            decode(AggregateConfig::plain(), &bytes),
            Err(AggregateError::Decode(_))
        ));
    }

    #[test]
    fn test_zero_modulus_rejected() {
        let mut bytes = vec![0x00];
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.push(4);
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.push(0);
        assert!(matches!(
            decode(AggregateConfig::plain(), &bytes),
            Err(AggregateError::Decode(_))
        ));
    }

    fn preserve_input_state(running: &[&[u8]], original_length: i32) -> Vec<u8> {
        let mut bytes = vec![0x00];
        for value in running {
            bytes.extend_from_slice(&(value.len() as i32).to_le_bytes());
            bytes.extend_from_slice(value);
        }
        bytes.extend_from_slice(&4i32.to_le_bytes());
        bytes.extend_from_slice(&NSQ);
        bytes.extend_from_slice(&original_length.to_le_bytes());
        bytes
    }

    #[test]
    fn test_original_length_must_hold_running_value() {
        let config = AggregateConfig {
            width: WidthPolicy::PreserveInput,
            ..AggregateConfig::plain()
        };

        let narrow = preserve_input_state(&[&[4, 3, 2, 1]], 1);
        assert!(matches!(decode(config, &narrow), Err(AggregateError::Decode(_))));

        let exact = preserve_input_state(&[&[4, 3, 2, 1]], 4);
        let acc = decode(config, &exact).unwrap();
        assert_eq!(acc.terminate().unwrap(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_signed_original_length_checked_per_half() {
        let config = AggregateConfig::signed();

        // 6 bytes total leaves 3 per half; the negative half needs 4
        let lopsided = preserve_input_state(&[&[1], &[4, 3, 2, 1]], 6);
        assert!(matches!(decode(config, &lopsided), Err(AggregateError::Decode(_))));

        let balanced = preserve_input_state(&[&[1], &[4, 3, 2, 1]], 8);
        let acc = decode(config, &balanced).unwrap();
        assert_eq!(acc.terminate().unwrap(), vec![1, 0, 0, 0, 4, 3, 2, 1]);
    }

    #[test]
    fn test_empty_flag_ignores_stale_payload() {
        // A reused instance may be re-initialized without clearing its fields
        let mut bytes = vec![0x01];
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&[0x2A, 0x01]);
        bytes.extend_from_slice(&4i32.to_le_bytes());
        bytes.extend_from_slice(&NSQ);

        let acc = decode(AggregateConfig::plain(), &bytes).unwrap();
        assert!(acc.is_empty());
        assert!(matches!(acc.terminate(), Err(AggregateError::EmptyAggregate)));
    }

    #[test]
    fn test_poisoned_state_not_encoded() {
        let mut acc = SumAccumulator::new(AggregateConfig::signed()).unwrap();
        assert!(acc.accumulate(&[1, 2, 3], &NSQ).is_err());
        assert!(matches!(encode(&acc), Err(AggregateError::Poisoned)));
    }
}
