//! Reference Paillier implementation used as a test fixture.
//!
//! g = n + 1, λ = (p - 1)(q - 1), μ = λ⁻¹ mod n. Ciphertexts are laid out as
//! fixed-width little-endian buffers with a spare high byte so they never read
//! back as negative.

#![allow(dead_code)]

use num_bigint_dig::{BigInt, BigUint, ModInverse, RandBigInt, RandPrime, Sign, ToBigUint};
use num_traits::{One, ToPrimitive};
use rand::rngs::StdRng;

pub struct PaillierKey {
    n: BigUint,
    nsq: BigUint,
    lambda: BigUint,
    mu: BigUint,
}

impl PaillierKey {
    pub fn generate(bits: usize, rng: &mut StdRng) -> Self {
        loop {
            let p = rng.gen_prime(bits / 2);
            let q = rng.gen_prime(bits / 2);
            if p == q {
                continue;
            }

            let n = &p * &q;
            let lambda = (&p - BigUint::one()) * (&q - BigUint::one());
            let Some(inv) = lambda.clone().mod_inverse(&n) else {
                continue;
            };
            let n_int = BigInt::from_biguint(Sign::Plus, n.clone());
            let Some(mu) = (((inv % &n_int) + &n_int) % &n_int).to_biguint() else {
                continue;
            };

            return Self {
                nsq: &n * &n,
                n,
                lambda,
                mu,
            };
        }
    }

    /// Width of one encoded ciphertext
    pub fn width(&self) -> usize {
        self.nsq.bits() / 8 + 1
    }

    /// N² as a two's-complement little-endian buffer
    pub fn nsq_bytes(&self) -> Vec<u8> {
        BigInt::from_biguint(Sign::Plus, self.nsq.clone()).to_signed_bytes_le()
    }

    fn encrypt_raw(&self, m: &BigUint, rng: &mut StdRng) -> Vec<u8> {
        let r = rng.gen_biguint_range(&BigUint::one(), &self.n);
        let gm = (BigUint::one() + m * &self.n) % &self.nsq;
        let c = (gm * r.modpow(&self.n, &self.nsq)) % &self.nsq;

        let mut bytes = c.to_bytes_le();
        bytes.resize(self.width(), 0);
        bytes
    }

    fn decrypt_raw(&self, bytes: &[u8]) -> BigUint {
        let c = BigUint::from_bytes_le(bytes);
        let u = c.modpow(&self.lambda, &self.nsq);
        let l = (u - BigUint::one()) / &self.n;
        (l * &self.mu) % &self.n
    }

    /// Single-ciphertext encryption; negatives wrap to n - |v|
    pub fn encrypt(&self, v: i64, rng: &mut StdRng) -> Vec<u8> {
        let m = if v < 0 {
            &self.n - BigUint::from(v.unsigned_abs())
        } else {
            BigUint::from(v as u64)
        };
        self.encrypt_raw(&m, rng)
    }

    /// Inverse of `encrypt`; residues above n / 2 read back as negative
    pub fn decrypt(&self, bytes: &[u8]) -> i128 {
        let m = self.decrypt_raw(bytes);
        let half = &self.n >> 1;
        if m > half {
            -(&self.n - m).to_i128().expect("fits i128")
        } else {
            m.to_i128().expect("fits i128")
        }
    }

    /// Dual-ciphertext encryption: E(max(v, 0)) || E(max(-v, 0))
    pub fn encrypt_signed(&self, v: i64, rng: &mut StdRng) -> Vec<u8> {
        let pos = BigUint::from(v.max(0) as u64);
        let neg = BigUint::from(v.min(0).unsigned_abs());
        let mut out = self.encrypt_raw(&pos, rng);
        out.extend_from_slice(&self.encrypt_raw(&neg, rng));
        out
    }

    /// D(actual) - D(negative)
    pub fn decrypt_signed(&self, bytes: &[u8]) -> i128 {
        assert_eq!(bytes.len() % 2, 0, "sign-aware buffer must have even length");
        let (actual, negative) = bytes.split_at(bytes.len() / 2);
        let pos = self.decrypt_raw(actual).to_i128().expect("fits i128");
        let neg = self.decrypt_raw(negative).to_i128().expect("fits i128");
        pos - neg
    }
}
