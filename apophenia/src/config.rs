//! Generator parameters
//!
//! Plain serde structs describing how to build each generator, so callers can
//! keep generator setup in their own configuration files. These describe
//! parameters only; generator state (cursors, caches) is never serialized.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use apophenia::config::{SequenceParams, ZipfParams};
//!
//! let seq = Arc::new(SequenceParams { seed: 7 }.build());
//! let params = ZipfParams { q: 1.5, v: 1.0, max: 1000, seed: 0 };
//! let mut zipf = params.build(seq).unwrap();
//! assert!(zipf.nth(0) <= 1000);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::linear::Linear;
use crate::permutation::Permutation;
use crate::sequence::{AesSequence, Sequence};
use crate::zipf::Zipf;

/// Seed for the underlying AES sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceParams {
    pub seed: i64,
}

impl SequenceParams {
    pub fn build(&self) -> AesSequence {
        AesSequence::new(self.seed)
    }
}

/// Parameters for a [`Permutation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermutationParams {
    /// Domain size; values are in `[0, max)`
    pub max: i64,
    /// Selects among shuffles over the same sequence
    #[serde(default)]
    pub seed: u32,
}

impl PermutationParams {
    pub fn build<S: Sequence + ?Sized>(
        &self,
        src: Arc<S>,
    ) -> Result<Permutation<S>, GeneratorError> {
        Permutation::new(self.max, self.seed, src)
    }
}

/// Parameters for a [`Zipf`] generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZipfParams {
    /// Exponent, must be greater than 1
    pub q: f64,
    /// Offset, must be at least 1
    #[serde(default = "default_v")]
    pub v: f64,
    /// Largest value produced (inclusive)
    pub max: u64,
    #[serde(default)]
    pub seed: u32,
}

fn default_v() -> f64 {
    1.0
}

impl ZipfParams {
    pub fn build<S: Sequence + ?Sized>(&self, src: Arc<S>) -> Result<Zipf<S>, GeneratorError> {
        Zipf::new(self.q, self.v, self.max, self.seed, src)
    }
}

/// Parameters for a [`Linear`] generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearParams {
    /// Smallest value produced; defaults to 0
    #[serde(default)]
    pub min: i64,
    /// Values are in `[min, max)`
    pub max: i64,
    #[serde(default)]
    pub seed: u32,
}

impl LinearParams {
    pub fn build<S: Sequence + ?Sized>(&self, src: Arc<S>) -> Result<Linear<S>, GeneratorError> {
        Linear::new(self.min, self.max, self.seed, src)
    }
}

