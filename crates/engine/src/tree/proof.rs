//! Merkle membership proof for one leaf of the commitment tree.

use ark_bn254::Fr;

use crate::poseidon::FieldHash;

/// Sibling path captured when a leaf was inserted.
///
/// `indices[i]` is 0 when the running node is the left child at level i and
/// 1 when it is the right child.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof {
    leaf: Fr,
    path: Vec<Fr>,
    indices: Vec<u8>,
    root: Fr,
}

impl MerkleProof {
    pub fn new(leaf: Fr, path: Vec<Fr>, indices: Vec<u8>, root: Fr) -> Self {
        assert_eq!(path.len(), indices.len(), "Path and indices must have same length");
        Self {
            leaf,
            path,
            indices,
            root,
        }
    }

    pub fn leaf(&self) -> Fr {
        self.leaf
    }

    pub fn path(&self) -> &[Fr] {
        &self.path
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn root(&self) -> Fr {
        self.root
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The leaf index encoded by the direction bits.
    pub fn leaf_index(&self) -> u64 {
        self.indices
            .iter()
            .enumerate()
            .fold(0u64, |acc, (level, bit)| acc | (u64::from(*bit) << level))
    }

    /// Walk the path from the leaf up.
    pub fn compute_root<H: FieldHash + ?Sized>(&self, hasher: &H) -> Fr {
        let mut current = self.leaf;

        for (sibling, &bit) in self.path.iter().zip(self.indices.iter()) {
            current = if bit == 1 {
                // Current is right child: H(sibling, current)
                hasher.hash2(*sibling, current)
            } else {
                // Current is left child: H(current, sibling)
                hasher.hash2(current, *sibling)
            };
        }

        current
    }

    pub fn verify<H: FieldHash + ?Sized>(&self, hasher: &H) -> bool {
        self.compute_root(hasher) == self.root
    }
}
