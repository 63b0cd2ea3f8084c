//! Replay cache that survives across withdrawals.
//!
//! A full replay costs O(leaf_index × depth) hashes. The cache keeps every
//! known leaf plus a snapshot of the filled subtrees every
//! `checkpoint_interval` leaves, so a new batch from the indexer only
//! appends its unseen tail and a proof replays at most one interval.

use ark_bn254::Fr;
use tracing::debug;

use super::proof::MerkleProof;
use super::tree::{capacity, insert_leaf, path_for, FilledSubtrees, TREE_DEPTH};
use super::zeros::ZeroTable;
use crate::commitment::{validate_order, CommitmentRecord};
use crate::error::{EngineError, Result};
use crate::poseidon::FieldHash;

pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 1024;

#[derive(Clone, Debug)]
pub struct ReplayCache {
    zeros: ZeroTable,
    leaves: Vec<Fr>,
    /// `checkpoints[c]` is the state before leaf `c * interval` was inserted.
    checkpoints: Vec<FilledSubtrees>,
    head: FilledSubtrees,
    latest_root: Option<Fr>,
    interval: usize,
}

impl ReplayCache {
    pub fn new<H: FieldHash + ?Sized>(hasher: &H) -> Self {
        Self::with_params(hasher, TREE_DEPTH, DEFAULT_CHECKPOINT_INTERVAL)
    }

    /// An interval of 0 is treated as 1.
    pub fn with_params<H: FieldHash + ?Sized>(hasher: &H, depth: usize, interval: usize) -> Self {
        let zeros = ZeroTable::build(hasher, depth);
        let head = FilledSubtrees::from_zeros(&zeros);
        Self {
            zeros,
            leaves: Vec::new(),
            checkpoints: Vec::new(),
            head,
            latest_root: None,
            interval: interval.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.zeros.depth()
    }

    pub fn checkpoint_interval(&self) -> usize {
        self.interval
    }

    pub fn zeros(&self) -> &ZeroTable {
        &self.zeros
    }

    pub fn leaf(&self, leaf_index: u64) -> Option<Fr> {
        usize::try_from(leaf_index)
            .ok()
            .and_then(|i| self.leaves.get(i))
            .copied()
    }

    /// Root after the most recent leaf, `None` while empty.
    pub fn latest_root(&self) -> Option<Fr> {
        self.latest_root
    }

    /// Drop every cached leaf.
    pub fn reset(&mut self) {
        self.leaves.clear();
        self.checkpoints.clear();
        self.head = FilledSubtrees::from_zeros(&self.zeros);
        self.latest_root = None;
    }

    /// Bring the cache up to date with an indexer response starting at leaf 0.
    ///
    /// Records the cache already knows must match it exactly; the rest are
    /// appended. Returns the number of leaves appended.
    pub fn sync<H: FieldHash + ?Sized>(
        &mut self,
        hasher: &H,
        records: &[CommitmentRecord],
    ) -> Result<usize> {
        validate_order(records)?;

        let known = self.leaves.len();
        for (record, cached) in records.iter().zip(self.leaves.iter()) {
            if record.commitment != *cached {
                return Err(EngineError::CommitmentHistoryDiverged {
                    leaf_index: record.leaf_index,
                });
            }
        }

        let mut appended = 0;
        for record in records.iter().skip(known) {
            self.push(hasher, record.commitment)?;
            appended += 1;
        }

        if appended > 0 {
            debug!(appended, total = self.leaves.len(), "replay cache extended");
        }
        Ok(appended)
    }

    fn push<H: FieldHash + ?Sized>(&mut self, hasher: &H, leaf: Fr) -> Result<()> {
        let leaf_index = self.leaves.len() as u64;
        let capacity = capacity(self.depth());
        if leaf_index >= capacity {
            return Err(EngineError::TreeCapacityExceeded {
                leaf_index,
                capacity,
            });
        }

        if self.leaves.len() % self.interval == 0 {
            self.checkpoints.push(self.head.clone());
        }

        let proof = insert_leaf(hasher, leaf, leaf_index, &self.zeros, &mut self.head)?;
        self.leaves.push(leaf);
        self.latest_root = Some(proof.root());
        Ok(())
    }

    /// Proof for `leaf_index` as captured at its insertion, identical to a
    /// full [`reconstruct`](super::reconstruct).
    pub fn proof_for<H: FieldHash + ?Sized>(
        &self,
        hasher: &H,
        leaf_index: u64,
    ) -> Result<MerkleProof> {
        let position = usize::try_from(leaf_index)
            .ok()
            .filter(|p| *p < self.leaves.len())
            .ok_or(EngineError::LeafIndexOutOfRange {
                leaf_index,
                available: self.leaves.len() as u64,
            })?;

        let checkpoint = position / self.interval;
        let start = checkpoint * self.interval;
        let mut filled = self.checkpoints[checkpoint].clone();

        for (offset, leaf) in self.leaves[start..position].iter().enumerate() {
            insert_leaf(hasher, *leaf, (start + offset) as u64, &self.zeros, &mut filled)?;
        }

        path_for(hasher, self.leaves[position], leaf_index, &self.zeros, &filled)
    }
}
