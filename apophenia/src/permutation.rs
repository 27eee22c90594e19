//! Table-free pseudorandom permutations
//!
//! Maps `[0, max)` onto itself bijectively without storing a lookup table,
//! so the permuted position of any index is available in `O(rounds)`.
//!
//! # Algorithm
//!
//! Swap network after Hoang, Morris & Rogaway (arXiv:1208.1176). Each round
//! `r` has a key `K[r]` in `[0, max)` and a round function `F[r]` mapping
//! slots to bits:
//!
//! 1. `x' = (K[r] + max - x) % max` is the partner of `x` this round
//! 2. `x^ = max(x, x')` picks the same representative for both partners
//! 3. If `F[r](x^)` is 1, `x` becomes `x'`
//!
//! Since both members of a pair consult the same decision bit, every round
//! is an involution and the composition is a bijection. About `6 log2(max)`
//! rounds are needed before the result stops looking like the identity.
//!
//! # Offsets
//!
//! - `K[r]`: `(PermutationK, seed, 0, r)`, low word mod `max`
//! - `F[r](x^)`: bit `r % 128` of `(PermutationF, seed, r / 128, x^)`
//!
//! One draw therefore covers 128 rounds for a given `x^`.

use std::sync::Arc;

use crate::error::GeneratorError;
use crate::int128::Uint128;
use crate::sequence::{Sequence, SequenceClass, StreamOffset};

/// Rounds covered by a single 128-bit F draw.
const ROUNDS_PER_DRAW: usize = 128;

/// A repeatable pseudorandom bijection on `[0, max)`.
///
/// The `seed` selects among shuffles over the same underlying sequence;
/// treat it as a secondary seed.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use apophenia::{AesSequence, Permutation};
///
/// let seq = Arc::new(AesSequence::new(0));
/// let mut perm = Permutation::new(10, 0, seq).unwrap();
///
/// let mut seen: Vec<i64> = (0..10).map(|_| perm.next()).collect();
/// seen.sort();
/// assert_eq!(seen, (0..10).collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone)]
pub struct Permutation<S: ?Sized> {
    src: Arc<S>,
    seed: u32,
    max: i64,
    counter: i64,
    /// Per-round swap keys, each in `[0, max)`
    k: Vec<u64>,
    /// Most recent F draw and the `(block, x^)` it was drawn for
    cached: Option<(usize, u64, Uint128)>,
}

impl<S: Sequence + ?Sized> Permutation<S> {
    /// Create a permutation of `[0, max)` selected by `seed`.
    ///
    /// # Errors
    ///
    /// - `InvalidDomain` if `max < 1`
    /// - `InvalidSource` if `src` is not seeded
    pub fn new(max: i64, seed: u32, src: Arc<S>) -> Result<Self, GeneratorError> {
        if max < 1 {
            return Err(GeneratorError::InvalidDomain { max });
        }
        if !src.is_seeded() {
            return Err(GeneratorError::InvalidSource);
        }

        let bit_length = 64 - (max as u64).leading_zeros() as usize;
        let rounds = 6 * bit_length;

        let base = StreamOffset::new(SequenceClass::PermutationK, seed);
        let k = (0..rounds as u64)
            .map(|r| src.bits_at(base.with_id(r).to_offset()).lo % max as u64)
            .collect();

        tracing::debug!(max, seed, rounds, "built permutation");

        Ok(Self {
            src,
            seed,
            max,
            counter: 0,
            k,
            cached: None,
        })
    }

    /// The value at the current position; advances the position.
    pub fn next(&mut self) -> i64 {
        let position = (self.counter as u64 % self.max as u64) as i64;
        self.counter = position + 1;
        if self.counter == self.max {
            self.counter = 0;
        }
        self.permute(position as u64) as i64
    }

    /// The value at position `n`.
    ///
    /// This also seeks: after `nth(n)`, `next()` yields `nth(n + 1)`.
    /// Positions wrap modulo `max`.
    pub fn nth(&mut self, n: i64) -> i64 {
        self.counter = n;
        self.next()
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn rounds(&self) -> usize {
        self.k.len()
    }

    fn permute(&mut self, mut x: u64) -> u64 {
        let max = self.max as u64;
        let f_base = StreamOffset::new(SequenceClass::PermutationF, self.seed);

        for (round, &k) in self.k.iter().enumerate() {
            let x_prime = (k + max - x) % max;
            let x_caret = x.max(x_prime);
            let block = round / ROUNDS_PER_DRAW;

            let hit = self
                .cached
                .filter(|&(b, c, _)| b == block && c == x_caret);
            let bits = match hit {
                Some((_, _, bits)) => bits,
                None => {
                    let offset = f_base
                        .with_iteration(block as u32)
                        .with_id(x_caret)
                        .to_offset();
                    let bits = self.src.bits_at(offset);
                    self.cached = Some((block, x_caret, bits));
                    bits
                }
            };

            if bits.bit((round % ROUNDS_PER_DRAW) as u32) != 0 {
                x = x_prime;
            }
        }
        x
    }
}
