//! Hashes of empty subtrees, one per level.

use ark_bn254::Fr;
use ark_ff::Zero;

use crate::poseidon::FieldHash;

/// zeros[0] = H(0, 0), zeros[i] = H(zeros[i-1], zeros[i-1]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroTable(Vec<Fr>);

impl ZeroTable {
    pub fn build<H: FieldHash + ?Sized>(hasher: &H, depth: usize) -> Self {
        let mut zeros = Vec::with_capacity(depth);
        let mut current = Fr::zero();
        for _ in 0..depth {
            current = hasher.hash2(current, current);
            zeros.push(current);
        }
        Self(zeros)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Empty-subtree hash at `level`.
    pub fn level(&self, level: usize) -> Fr {
        self.0[level]
    }

    pub fn as_slice(&self) -> &[Fr] {
        &self.0
    }
}
