//! Weighted bits: bits set with probability `density / scale`
//!
//! `scale` is a power of two and `density` is in `[0, scale]`. Bits come in
//! batches of 128 so a caller walking consecutive offsets pays for one batch
//! per 128 bits.
//!
//! # Recursive halving
//!
//! Write `density / scale` in binary, `0.d1 d2 ... dn`. Starting from zero and
//! reading digits from the least significant end, each step draws 128 fresh
//! uniform bits `u` and sets `acc = acc | u` for a 1 digit, `acc = acc & u` for
//! a 0 digit. Each step maps a per-bit probability `p` to `(1 + p) / 2` or
//! `p / 2`, so after `n` steps the probability is exactly `density / scale`.
//!
//! # Offsets
//!
//! The batch address is the caller's offset with `lo >> 7`; the low 7 bits
//! pick a bit inside the batch. Each halving step reads the next iteration of
//! that address. Trailing zero digits of `density` are AND steps on an
//! all-zero accumulator, so they are skipped, but the iteration still starts
//! at the number of digits skipped: each draw stays at the iteration it would
//! have used without the shortcut.

use std::sync::Arc;

use crate::error::GeneratorError;
use crate::int128::Uint128;
use crate::sequence::{advance_iteration, Sequence};

/// Bits per batch, and the offset stride between batches.
pub const BATCH_BITS: u64 = 128;

const BIT_INDEX_MASK: u64 = BATCH_BITS - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Batch {
    /// Caller offset with the bit index cleared
    offset: Uint128,
    density: u64,
    scale: u64,
    value: Uint128,
}

/// Generator of weighted bits over a [`Sequence`].
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use apophenia::{offset_for, AesSequence, SequenceClass, Weighted};
///
/// let mut w = Weighted::new(Arc::new(AesSequence::new(0))).unwrap();
/// let start = offset_for(SequenceClass::Weighted, 0, 0, 0);
///
/// let ones: u64 = (0..128u64)
///     .map(|i| {
///         let mut at = start;
///         at.lo += i;
///         w.bit(at, 1, 1)
///     })
///     .sum();
/// assert_eq!(ones, 128);
/// ```
#[derive(Debug, Clone)]
pub struct Weighted<S: ?Sized> {
    src: Arc<S>,
    /// The last batch computed; doubles as the cursor for `next_bits`
    last: Option<Batch>,
}

impl<S: Sequence + ?Sized> Weighted<S> {
    /// # Errors
    ///
    /// `InvalidSource` if `src` is not seeded.
    pub fn new(src: Arc<S>) -> Result<Self, GeneratorError> {
        if !src.is_seeded() {
            return Err(GeneratorError::InvalidSource);
        }
        tracing::debug!("built weighted bit generator");
        Ok(Self { src, last: None })
    }

    /// The single bit at `offset`, set with probability `density / scale`.
    ///
    /// Consecutive calls within one 128-bit batch reuse the cached batch.
    pub fn bit(&mut self, offset: Uint128, density: u64, scale: u64) -> u64 {
        let index = (offset.lo & BIT_INDEX_MASK) as u32;
        let batch_offset = Uint128::new(offset.hi, offset.lo & !BIT_INDEX_MASK);

        if let Some(batch) = self.last {
            if batch.offset == batch_offset && batch.density == density && batch.scale == scale {
                return batch.value.bit(index);
            }
        }

        self.remember(batch_offset, density, scale).bit(index)
    }

    /// The 128-bit batch containing `offset`.
    ///
    /// Every offset in the same run of 128 (same value of `lo >> 7`) yields
    /// the same batch.
    pub fn bits(&self, offset: Uint128, density: u64, scale: u64) -> Uint128 {
        if density == scale {
            return Uint128::MAX;
        }
        if density == 0 {
            return Uint128::ZERO;
        }

        let mut address = Uint128::new(offset.hi, offset.lo >> 7);
        let lz = density.trailing_zeros();
        let mut density = density >> lz;
        let mut scale = scale >> lz;
        advance_iteration(&mut address, lz as u64);

        let mut out = Uint128::ZERO;
        while scale > 1 {
            let next = self.src.bits_at(address);
            if density & 1 != 0 {
                out |= next;
            } else {
                out &= next;
            }
            density >>= 1;
            scale >>= 1;
            advance_iteration(&mut address, 1);
        }
        out
    }

    /// The batch after the last one computed by [`bit`](Self::bit) or
    /// `next_bits`; the batch at offset zero if there is none yet.
    pub fn next_bits(&mut self, density: u64, scale: u64) -> Uint128 {
        let offset = match self.last {
            Some(batch) => batch.offset + Uint128::from_u64(BATCH_BITS),
            None => Uint128::ZERO,
        };
        self.remember(offset, density, scale)
    }

    fn remember(&mut self, offset: Uint128, density: u64, scale: u64) -> Uint128 {
        let value = self.bits(offset, density, scale);
        self.last = Some(Batch {
            offset,
            density,
            scale,
            value,
        });
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{offset_for, AesSequence, SequenceClass};

    fn weighted() -> Weighted<AesSequence> {
        Weighted::new(Arc::new(AesSequence::new(0))).unwrap()
    }

    #[test]
    fn test_saturation() {
        let w = weighted();
        let off = offset_for(SequenceClass::Weighted, 0, 0, 12345);
        assert_eq!(w.bits(off, 64, 64), Uint128::MAX);
        assert_eq!(w.bits(off, 0, 64), Uint128::ZERO);
    }

    #[test]
    fn test_half_density_is_one_draw() {
        let seq = Arc::new(AesSequence::new(3));
        let w = Weighted::new(Arc::clone(&seq)).unwrap();
        let off = Uint128::new(0, 128 * 5);
        // 1/2 is a single OR onto zero: exactly the raw draw at lo >> 7.
        assert_eq!(w.bits(off, 1, 2), seq.bits_at(Uint128::new(0, 5)));
    }

    #[test]
    fn test_trailing_zeros_skip_iterations() {
        let seq = Arc::new(AesSequence::new(0));
        let w = Weighted::new(Arc::clone(&seq)).unwrap();
        let off = offset_for(SequenceClass::Weighted, 1, 0, 0);

        // 2/8 = 0b010: the leading AND onto zero is skipped, so the result is
        // iteration 1 OR-ed in, then iteration 2 AND-ed in.
        let expected = seq.bits_at(offset_for(SequenceClass::Weighted, 1, 1, 0))
            & seq.bits_at(offset_for(SequenceClass::Weighted, 1, 2, 0));
        assert_eq!(w.bits(off, 2, 8), expected);
    }

    #[test]
    fn test_bit_agrees_with_bits() {
        let mut w = weighted();
        let base = offset_for(SequenceClass::Weighted, 0, 0, 256);
        let batch = w.bits(base, 3, 8);
        for i in 0..128u64 {
            let mut at = base;
            at.lo += i;
            assert_eq!(w.bit(at, 3, 8), batch.bit(i as u32));
        }
    }

    #[test]
    fn test_next_bits_walks_batches() {
        let mut w = weighted();
        assert_eq!(w.next_bits(5, 16), w.bits(Uint128::ZERO, 5, 16));
        assert_eq!(w.next_bits(5, 16), w.bits(Uint128::from_u64(128), 5, 16));

        // bit() moves the cursor to its batch
        let at = Uint128::from_u64(128 * 10 + 3);
        w.bit(at, 5, 16);
        assert_eq!(
            w.next_bits(5, 16),
            w.bits(Uint128::from_u64(128 * 11), 5, 16)
        );
    }
}
