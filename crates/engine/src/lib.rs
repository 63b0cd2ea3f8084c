//! Commitment tree and note codec for the Swirl privacy pool.
//!
//! This crate provides:
//! - Circom-compatible Poseidon over BN254 behind the `FieldHash` trait
//! - Deposit commitments and nullifier hashes
//! - The portable base64 note format
//! - Depth-20 tree reconstruction from the indexer's commitment list
//! - A checkpointed replay cache for long-lived callers

pub mod commitment;
pub mod error;
pub mod field;
pub mod note;
pub mod poseidon;
pub mod tree;

pub use commitment::{
    commitment, find_commitment, nullifier_hash, records_from_wire, validate_order,
    verify_commitment, CommitmentRecord, CommitmentRecordWire,
};
pub use error::{EngineError, ErrorClass, Result};
pub use note::SecretNote;
pub use poseidon::{FieldHash, PoseidonHasher};
pub use tree::{
    reconstruct, MerkleProof, ReplayCache, ZeroTable, DEFAULT_CHECKPOINT_INTERVAL, TREE_DEPTH,
};

use ark_bn254::Fr;

/// Scalar field of BN254, the field every hash and tree node lives in.
pub type Field = Fr;
