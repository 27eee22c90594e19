//! Seekable keyed pseudorandom sequences
//!
//! A [`Sequence`] maps a 128-bit offset to 128 pseudo-random bits. The mapping
//! depends only on the key and the offset, never on call history, so the Nth
//! value of any derived stream can be computed without computing the first
//! N-1.
//!
//! CRITICAL: all generators in this crate read randomness through
//! [`Sequence::bits_at`] at offsets built by [`offset_for`]. Anything else
//! breaks reproducibility of previously generated data.

mod aes128;
mod offset;

pub use aes128::AesSequence;
pub use offset::{
    advance_iteration, offset_for, SequenceClass, StreamOffset, ITERATION_BITS, MAX_ITERATIONS,
};

use crate::int128::Uint128;

/// A deterministic, seekable source of pseudo-random bits.
///
/// Implementations must make [`bits_at`](Sequence::bits_at) a pure function of
/// the current seed and the offset. The stream cursor used by
/// [`next_uint64`](Sequence::next_uint64) is the only other state.
pub trait Sequence {
    /// Re-key the sequence and reset the stream cursor to the start of the
    /// [`SequenceClass::RandSource`] namespace.
    fn seed(&mut self, seed: i64);

    /// The 128 bits at `offset`.
    fn bits_at(&self, offset: Uint128) -> Uint128;

    /// Move the stream cursor to `offset`, returning the previous cursor.
    fn seek(&mut self, offset: Uint128) -> Uint128;

    /// Whether the sequence is keyed and able to serve [`bits_at`](Sequence::bits_at).
    ///
    /// Generators refuse to be built on an unseeded source.
    fn is_seeded(&self) -> bool {
        true
    }

    /// Low word of the bits at the cursor; advances the cursor by one.
    fn next_uint64(&mut self) -> u64 {
        let at = self.seek(Uint128::ZERO);
        let mut next = at;
        next.increment();
        self.seek(next);
        self.bits_at(at).lo
    }

    /// A value in `0..=i64::MAX`; advances the cursor by one.
    fn next_int63(&mut self) -> i64 {
        (self.next_uint64() >> 1) as i64
    }
}

impl<S: Sequence + ?Sized> Sequence for Box<S> {
    fn seed(&mut self, seed: i64) {
        (**self).seed(seed)
    }

    fn bits_at(&self, offset: Uint128) -> Uint128 {
        (**self).bits_at(offset)
    }

    fn seek(&mut self, offset: Uint128) -> Uint128 {
        (**self).seek(offset)
    }

    fn is_seeded(&self) -> bool {
        (**self).is_seeded()
    }

    fn next_uint64(&mut self) -> u64 {
        (**self).next_uint64()
    }
}
