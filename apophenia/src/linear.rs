//! Uniform draws in `[min, max)` by index
//!
//! The Nth value is the low word of the draw at `(Linear, seed, 0, N)` reduced
//! mod `max - min`, then shifted up by `min`. The modulo bias is at most
//! `(max - min) / 2^64`, negligible for the dataset sizes this is meant for.

use std::sync::Arc;

use crate::error::GeneratorError;
use crate::sequence::{Sequence, SequenceClass, StreamOffset};

/// Seekable uniform generator over `[min, max)`.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use apophenia::{AesSequence, Linear};
///
/// let mut l = Linear::new(1, 7, 0, Arc::new(AesSequence::new(9))).unwrap();
/// let roll = l.nth(3);
/// assert!((1..7).contains(&roll));
/// assert_eq!(l.nth(3), roll);
/// ```
#[derive(Debug, Clone)]
pub struct Linear<S: ?Sized> {
    src: Arc<S>,
    base: StreamOffset,
    min: i64,
    max: i64,
    /// `max - min`, computed in unsigned space so the full `i64` span fits
    range: u64,
    idx: u64,
}

impl<S: Sequence + ?Sized> Linear<S> {
    /// # Errors
    ///
    /// - `InvalidDomain` if `max <= min`, carrying the signed width `max - min`
    /// - `InvalidSource` if `src` is not seeded
    pub fn new(min: i64, max: i64, seed: u32, src: Arc<S>) -> Result<Self, GeneratorError> {
        if max <= min {
            return Err(GeneratorError::InvalidDomain {
                max: max.wrapping_sub(min),
            });
        }
        if !src.is_seeded() {
            return Err(GeneratorError::InvalidSource);
        }
        let range = (max as u64).wrapping_sub(min as u64);
        tracing::debug!(min, max, seed, "built linear generator");
        Ok(Self {
            src,
            base: StreamOffset::new(SequenceClass::Linear, seed),
            min,
            max,
            range,
            idx: 0,
        })
    }

    /// The value at `index`; `next()` continues from `index + 1`.
    pub fn nth(&mut self, index: u64) -> i64 {
        self.idx = index;
        let draw = self.src.bits_at(self.base.with_id(index).to_offset()).lo % self.range;
        self.min.wrapping_add(draw as i64)
    }

    /// The value after the last one requested (`nth(1)` on a fresh generator).
    pub fn next(&mut self) -> i64 {
        self.nth(self.idx.wrapping_add(1))
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{offset_for, AesSequence};

    fn seq(seed: i64) -> Arc<AesSequence> {
        Arc::new(AesSequence::new(seed))
    }

    #[test]
    fn test_rejects_empty_range() {
        let err = Linear::new(0, 0, 0, seq(0)).unwrap_err();
        assert_eq!(err, GeneratorError::InvalidDomain { max: 0 });

        let err = Linear::new(10, 4, 0, seq(0)).unwrap_err();
        assert_eq!(err, GeneratorError::InvalidDomain { max: -6 });
    }

    #[test]
    fn test_reads_linear_namespace() {
        let seq = seq(5);
        let mut l = Linear::new(0, 1000, 2, Arc::clone(&seq)).unwrap();
        let raw = seq.bits_at(offset_for(SequenceClass::Linear, 2, 0, 77)).lo;
        assert_eq!(l.nth(77), (raw % 1000) as i64);
    }

    #[test]
    fn test_min_shifts_draws() {
        let src = seq(5);
        let mut zero_based = Linear::new(0, 10, 1, Arc::clone(&src)).unwrap();
        let mut shifted = Linear::new(-5, 5, 1, src).unwrap();
        for i in 0..1000 {
            let v = shifted.nth(i);
            assert!((-5..5).contains(&v), "value {} at index {}", v, i);
            assert_eq!(v, zero_based.nth(i) - 5);
        }
    }

    #[test]
    fn test_full_signed_span() {
        let mut l = Linear::new(i64::MIN, i64::MAX, 0, seq(2)).unwrap();
        let negatives = (0..1000).filter(|&i| l.nth(i) < 0).count();
        assert!((400..600).contains(&negatives), "{} negatives", negatives);
    }

    #[test]
    fn test_roughly_uniform() {
        let mut l = Linear::new(100, 110, 0, seq(1)).unwrap();
        let mut counts = [0u32; 10];
        for i in 0..100_000 {
            counts[(l.nth(i) - 100) as usize] += 1;
        }
        for (value, &count) in counts.iter().enumerate() {
            assert!(
                (9_000..11_000).contains(&count),
                "value {} drawn {} times",
                value + 100,
                count
            );
        }
    }
}
