//! Apophenia - seekable deterministic pseudo-randomness
//!
//! Given a seed and a 128-bit address, every generator here yields the same
//! output regardless of the order values are requested in. Synthetic datasets
//! and statistical samples can be reproduced, or regenerated piecewise,
//! without storing a random table.
//!
//! # Architecture
//!
//! - **int128**: 128-bit unsigned arithmetic (`Uint128`)
//! - **sequence**: AES-keyed PRF addressed by 128-bit offsets, and the offset
//!   namespace that keeps sub-streams apart
//! - **permutation**: table-free pseudorandom bijection on `[0, N)`
//! - **weighted**: bits set with probability `density / scale`
//! - **zipf**: Zipf variates by index (rejection-inversion)
//! - **linear**: uniform `min + U % (max - min)` variates by index
//! - **config**: serde parameter structs for building generators
//!
//! # Critical Invariants
//!
//! 1. `bits_at(offset)` is a pure function of (seed, offset)
//! 2. The offset layout is a compatibility contract (see [`offset_for`])
//! 3. Only constructors fail; everything else is total
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use apophenia::{AesSequence, Permutation, Zipf};
//!
//! let seq = Arc::new(AesSequence::new(42));
//! let mut ids = Permutation::new(1_000, 0, Arc::clone(&seq)).unwrap();
//! let mut sizes = Zipf::new(1.1, 1.0, 99, 0, seq).unwrap();
//!
//! let row = ids.nth(17);
//! let size = sizes.nth(row as u64);
//! assert!((0..1_000).contains(&row));
//! assert!(size <= 99);
//! ```
//!
//! # Concurrency
//!
//! Generators hold cursors and caches and take `&mut self`; give each worker
//! its own. The shared `Arc<S>` source is only read (`bits_at(&self)`), so one
//! `AesSequence` can back generators on many threads.

// Module declarations
pub mod config;
pub mod error;
pub mod int128;
pub mod linear;
pub mod permutation;
pub mod sequence;
pub mod weighted;
pub mod zipf;

// Re-exports for convenience
pub use error::GeneratorError;
pub use int128::{mask_of, Uint128};
pub use linear::Linear;
pub use permutation::Permutation;
pub use sequence::{
    advance_iteration, offset_for, AesSequence, Sequence, SequenceClass, StreamOffset,
    ITERATION_BITS, MAX_ITERATIONS,
};
pub use weighted::Weighted;
pub use zipf::Zipf;
