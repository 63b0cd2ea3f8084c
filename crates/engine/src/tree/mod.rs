//! Append-only commitment tree, rebuilt from the indexer's ordered leaves.
//!
//! This module provides:
//! - The empty-subtree table shared by every replay
//! - Leaf insertion with filled-subtree bookkeeping
//! - Full replay (`reconstruct`) and the read-only `path_for`
//! - A checkpointed replay cache that appends only new leaves

mod cache;
mod proof;
#[allow(clippy::module_inception)]
mod tree;
mod zeros;


pub use cache::{ReplayCache, DEFAULT_CHECKPOINT_INTERVAL};
pub use proof::MerkleProof;
pub use tree::{
    capacity, insert_leaf, path_for, reconstruct, reconstruct_with_depth, FilledSubtrees,
    TREE_DEPTH,
};
pub use zeros::ZeroTable;
