//! Leaf insertion and full replay of the append-only tree.
//!
//! The tree never stores interior nodes. Each level keeps only the most
//! recent left-hand subtree ("filled subtree"), which is exactly what the
//! next right-hand insertion at that level needs as its sibling.

use ark_bn254::Fr;

use super::proof::MerkleProof;
use super::zeros::ZeroTable;
use crate::commitment::{validate_order, CommitmentRecord};
use crate::error::{EngineError, Result};
use crate::poseidon::FieldHash;

/// Depth of the pool's tree. Changing it invalidates every issued proof.
pub const TREE_DEPTH: usize = 20;

/// Number of leaves a tree of `depth` can hold, saturating at `u64::MAX`
/// for depths of 64 and above.
pub fn capacity(depth: usize) -> u64 {
    u32::try_from(depth)
        .ok()
        .and_then(|shift| 1u64.checked_shl(shift))
        .unwrap_or(u64::MAX)
}

/// Most recent left sibling at every level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilledSubtrees(Vec<Fr>);

impl FilledSubtrees {
    /// Initial state of an empty tree.
    pub fn from_zeros(zeros: &ZeroTable) -> Self {
        Self(zeros.as_slice().to_vec())
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn level(&self, level: usize) -> Fr {
        self.0[level]
    }

    pub fn as_slice(&self) -> &[Fr] {
        &self.0
    }
}

fn check_capacity(leaf_index: u64, depth: usize) -> Result<()> {
    let capacity = capacity(depth);
    if leaf_index >= capacity {
        return Err(EngineError::TreeCapacityExceeded {
            leaf_index,
            capacity,
        });
    }
    Ok(())
}

/// Insert `leaf` at `leaf_index`, updating `filled`, and return the path and
/// root as they stand right after this insertion.
///
/// Left children record themselves as the filled subtree of their level and
/// pair with the empty-subtree hash; right children pair with the filled
/// subtree left there by an earlier insertion.
pub fn insert_leaf<H: FieldHash + ?Sized>(
    hasher: &H,
    leaf: Fr,
    leaf_index: u64,
    zeros: &ZeroTable,
    filled: &mut FilledSubtrees,
) -> Result<MerkleProof> {
    let depth = zeros.depth();
    debug_assert_eq!(depth, filled.depth(), "zero table and filled subtrees disagree on depth");
    check_capacity(leaf_index, depth)?;

    let mut current = leaf;
    let mut index = leaf_index;
    let mut path = Vec::with_capacity(depth);
    let mut indices = Vec::with_capacity(depth);

    for level in 0..depth {
        if index % 2 == 0 {
            let sibling = zeros.level(level);
            filled.0[level] = current;
            path.push(sibling);
            indices.push(0);
            current = hasher.hash2(current, sibling);
        } else {
            let sibling = filled.0[level];
            path.push(sibling);
            indices.push(1);
            current = hasher.hash2(sibling, current);
        }
        index /= 2;
    }

    Ok(MerkleProof::new(leaf, path, indices, current))
}

/// Read-only variant of [`insert_leaf`].
///
/// `filled` must be the state immediately before `leaf_index` was inserted.
/// The result is identical to what `insert_leaf` returns; `filled` is left
/// untouched.
pub fn path_for<H: FieldHash + ?Sized>(
    hasher: &H,
    leaf: Fr,
    leaf_index: u64,
    zeros: &ZeroTable,
    filled: &FilledSubtrees,
) -> Result<MerkleProof> {
    let mut scratch = filled.clone();
    insert_leaf(hasher, leaf, leaf_index, zeros, &mut scratch)
}

/// Replay `records` from leaf 0 and return the proof for `target`, using
/// the pool's [`TREE_DEPTH`].
pub fn reconstruct<H: FieldHash + ?Sized>(
    hasher: &H,
    records: &[CommitmentRecord],
    target: u64,
) -> Result<MerkleProof> {
    reconstruct_with_depth(hasher, records, target, TREE_DEPTH)
}

/// [`reconstruct`] for an arbitrary depth.
pub fn reconstruct_with_depth<H: FieldHash + ?Sized>(
    hasher: &H,
    records: &[CommitmentRecord],
    target: u64,
    depth: usize,
) -> Result<MerkleProof> {
    validate_order(records)?;

    let available = records.len() as u64;
    if target >= available {
        return Err(EngineError::LeafIndexOutOfRange {
            leaf_index: target,
            available,
        });
    }
    check_capacity(target, depth)?;

    let zeros = ZeroTable::build(hasher, depth);
    let mut filled = FilledSubtrees::from_zeros(&zeros);

    // Earlier leaves only matter for the filled subtrees they leave behind.
    let (before, rest) = records.split_at(target as usize);
    for record in before {
        insert_leaf(hasher, record.commitment, record.leaf_index, &zeros, &mut filled)?;
    }

    let record = &rest[0];
    insert_leaf(hasher, record.commitment, record.leaf_index, &zeros, &mut filled)
}
