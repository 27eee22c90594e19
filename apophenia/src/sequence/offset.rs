//! Offset namespace: partitioning one keyed PRF into independent sub-streams
//!
//! Every consumer of a [`Sequence`](super::Sequence) addresses it through a
//! 128-bit offset built here, so that different logical uses of the same key
//! never read the same block.
//!
//! # Layout
//!
//! ```text
//! hi:  [63..56] class | [55..24] seed | [23..0] iteration
//! lo:  [63..0]  id
//! ```
//!
//! The layout is a compatibility contract: datasets generated from a seed are
//! reproduced only if offsets are bit-identical. `iter` is OR-ed into `hi`
//! unmasked, so an iteration past 2^24 spills into the seed field; consumers
//! stay below [`MAX_ITERATIONS`].

use crate::int128::Uint128;
use serde::{Deserialize, Serialize};

/// Number of low bits of `hi` reserved for the iteration sub-counter.
pub const ITERATION_BITS: u32 = 24;

/// Iteration capacity per (class, seed, id): about 16.7M draws.
pub const MAX_ITERATIONS: u32 = 1 << ITERATION_BITS;

/// Logical sub-stream tag, stored in the top byte of an offset.
///
/// The discriminants are part of the offset layout and must never be
/// reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SequenceClass {
    /// Used when nothing more specific was chosen
    Default = 0,
    /// Per-round K values of a permutation
    PermutationK = 1,
    /// Per-slot swap decision bits of a permutation
    PermutationF = 2,
    /// Weighted-density bit batches
    Weighted = 3,
    /// Uniform `U % N` draws
    Linear = 4,
    /// Uniform draws feeding Zipf rejection-inversion
    ZipfU = 5,
    /// Stream cursor when a sequence is used as a plain random source
    RandSource = 6,
    /// Reserved for callers outside this crate
    User1 = 7,
    /// Reserved for callers outside this crate
    User2 = 8,
}

/// The offset for a given class, seed, iteration and id.
///
/// # Example
/// ```
/// use apophenia::{offset_for, SequenceClass, Uint128};
///
/// let offset = offset_for(SequenceClass::ZipfU, 1, 2, 3);
/// assert_eq!(offset, Uint128::new(0x0500_0000_0100_0002, 3));
/// ```
pub const fn offset_for(class: SequenceClass, seed: u32, iter: u32, id: u64) -> Uint128 {
    Uint128 {
        hi: ((class as u64) << 56) | ((seed as u64) << 24) | iter as u64,
        lo: id,
    }
}

/// Advance the iteration field of a raw offset by `by`.
///
/// This is a wrapping add on `hi`, for offsets handed in by callers rather
/// than built through [`StreamOffset`].
pub fn advance_iteration(offset: &mut Uint128, by: u64) {
    offset.hi = offset.hi.wrapping_add(by);
}

/// A structured offset: class and seed fixed, iteration and id variable.
///
/// Consumers that retry a draw (Zipf rejection) or recycle bits across
/// blocks (permutation F values) bump [`iteration`](Self::iteration) rather
/// than touching bits of `hi` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamOffset {
    pub class: SequenceClass,
    pub seed: u32,
    pub iteration: u32,
    pub id: u64,
}

impl StreamOffset {
    /// Start of the sub-stream for `(class, seed)`: iteration 0, id 0.
    pub const fn new(class: SequenceClass, seed: u32) -> Self {
        Self {
            class,
            seed,
            iteration: 0,
            id: 0,
        }
    }

    pub const fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub const fn with_iteration(mut self, iteration: u32) -> Self {
        self.iteration = iteration;
        self
    }

    /// Move to the next iteration, returning false once capacity is used up.
    pub fn next_iteration(&mut self) -> bool {
        if self.iteration + 1 >= MAX_ITERATIONS {
            return false;
        }
        self.iteration += 1;
        true
    }

    pub const fn to_offset(self) -> Uint128 {
        offset_for(self.class, self.seed, self.iteration, self.id)
    }
}

impl From<StreamOffset> for Uint128 {
    fn from(offset: StreamOffset) -> Self {
        offset.to_offset()
    }
}
