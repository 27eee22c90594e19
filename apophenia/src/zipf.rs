//! Seekable Zipf-distributed variates
//!
//! Produces integers `k` in `0..=max` with `P(k)` proportional to
//! `(v + k)^-q`, for `q > 1` and `v >= 1`.
//!
//! # Algorithm
//!
//! Rejection-inversion (Hörmann & Derflinger, "Rejection-Inversion to
//! Generate Variates from Monotone Discrete Distributions", 1996). With
//! `H(x) = (v + x)^(1-q) / (1-q)`:
//!
//! 1. `u` uniform over `[H(max + 1/2), H(1/2) - v^-q)`
//! 2. `x = H⁻¹(u)`, `k = floor(x + 1/2)`
//! 3. Accept if `k - x <= s` (squeeze) or `u >= H(k + 1/2) - (v + k)^-q`
//! 4. Otherwise retry with a fresh `u`
//!
//! The expected number of draws is about 1.1.
//!
//! # Seeking
//!
//! Draw `i` reads `(ZipfU, seed, retry, i)`, so the Nth variate depends only on
//! `N` and the construction parameters, not on what was generated before.

use std::sync::Arc;

use crate::error::GeneratorError;
use crate::sequence::{Sequence, SequenceClass, StreamOffset};

/// `2^53`: uniform doubles use the low 53 bits of a draw.
const UNIFORM_SCALE: f64 = (1u64 << 53) as f64;
const UNIFORM_MASK: u64 = (1 << 53) - 1;

/// Zipf variate generator with random access by index.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use apophenia::{AesSequence, Zipf};
///
/// let mut z = Zipf::new(1.5, 1.0, 100, 0, Arc::new(AesSequence::new(0))).unwrap();
/// let fifth = z.nth(5);
/// let sixth = z.next();
/// assert_eq!(z.nth(5), fifth);
/// assert_eq!(z.nth(6), sixth);
/// assert!(fifth <= 100);
/// ```
#[derive(Debug, Clone)]
pub struct Zipf<S: ?Sized> {
    src: Arc<S>,
    seed: u32,
    q: f64,
    v: f64,
    max: u64,
    one_minus_q: f64,
    one_over_one_minus_q: f64,
    /// `H(max + 1/2)`, lower end of the uniform range
    h_imax_one_half: f64,
    /// `H(x0) - H(max + 1/2)`, where `H(x0) = H(1/2) - v^-q`
    h_x0_minus_h_imax_one_half: f64,
    /// Squeeze: candidates with `k - x <= s` are accepted without the exact test
    s: f64,
    idx: u64,
}

impl<S: Sequence + ?Sized> Zipf<S> {
    /// Create a generator over `0..=max` with exponent `q` and offset `v`.
    ///
    /// `seed` selects one of several independent Zipf streams over the same
    /// sequence.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `q <= 1` or `v < 1` (or either is not finite),
    ///   or if `(v + max)^(1-q)` underflows so the distribution cannot be
    ///   sampled in `f64`
    /// - `InvalidSource` if `src` is not seeded
    pub fn new(q: f64, v: f64, max: u64, seed: u32, src: Arc<S>) -> Result<Self, GeneratorError> {
        if !(q.is_finite() && q > 1.0) {
            return Err(GeneratorError::InvalidParameter {
                name: "q",
                value: q,
                reason: "must be greater than 1",
            });
        }
        if !(v.is_finite() && v >= 1.0) {
            return Err(GeneratorError::InvalidParameter {
                name: "v",
                value: v,
                reason: "must be at least 1",
            });
        }
        if !src.is_seeded() {
            return Err(GeneratorError::InvalidSource);
        }

        let one_minus_q = 1.0 - q;
        let mut z = Self {
            src,
            seed,
            q,
            v,
            max,
            one_minus_q,
            one_over_one_minus_q: 1.0 / one_minus_q,
            h_imax_one_half: 0.0,
            h_x0_minus_h_imax_one_half: 0.0,
            s: 0.0,
            idx: 0,
        };

        let h_x0 = z.h(0.5) - (v.ln() * -q).exp();
        z.h_imax_one_half = z.h(max as f64 + 0.5);
        z.h_x0_minus_h_imax_one_half = h_x0 - z.h_imax_one_half;
        z.s = 1.0 - z.h_inv(z.h(1.5) - ((v + 1.0).ln() * -q).exp());

        // Large q with large v underflows H to zero, collapsing the uniform
        // range; every draw would then invert to infinity.
        let low = z.h_inv(z.h_imax_one_half);
        let high = z.h_inv(z.h_imax_one_half + z.h_x0_minus_h_imax_one_half);
        if !(z.h_x0_minus_h_imax_one_half < 0.0
            && z.h_imax_one_half.is_finite()
            && z.s.is_finite()
            && low.is_finite()
            && high.is_finite())
        {
            return Err(GeneratorError::InvalidParameter {
                name: "q",
                value: q,
                reason: "distribution is not representable for this v",
            });
        }

        tracing::debug!(q, v, max, seed, s = z.s, "built zipf generator");
        Ok(z)
    }

    /// The variate at `index`. Also moves the cursor: `next()` continues
    /// from `index + 1`.
    pub fn nth(&mut self, index: u64) -> u64 {
        self.idx = index;
        self.value_at(index)
    }

    /// The variate after the last one requested (`nth(1)` on a fresh
    /// generator).
    pub fn next(&mut self) -> u64 {
        self.nth(self.idx.wrapping_add(1))
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn v(&self) -> f64 {
        self.v
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    fn value_at(&self, index: u64) -> u64 {
        let mut offset = StreamOffset::new(SequenceClass::ZipfU, self.seed).with_id(index);
        loop {
            let bits = self.src.bits_at(offset.to_offset());
            let u = (bits.lo & UNIFORM_MASK) as f64 / UNIFORM_SCALE;
            let u = self.h_imax_one_half + u * self.h_x0_minus_h_imax_one_half;
            let x = self.h_inv(u);
            let k = (x + 0.5).floor();

            if k - x <= self.s {
                return k as u64;
            }
            if u >= self.h(k + 0.5) - (-(self.v + k).ln() * self.q).exp() {
                return k as u64;
            }

            if !offset.next_iteration() {
                tracing::warn!(index, "zipf draw exhausted its retry capacity");
                return k as u64;
            }
            tracing::trace!(index, iteration = offset.iteration, "zipf candidate rejected");
        }
    }

    fn h(&self, x: f64) -> f64 {
        (self.one_minus_q * (self.v + x).ln()).exp() * self.one_over_one_minus_q
    }

    fn h_inv(&self, x: f64) -> f64 {
        -self.v + (self.one_over_one_minus_q * (self.one_minus_q * x).ln()).exp()
    }
}
