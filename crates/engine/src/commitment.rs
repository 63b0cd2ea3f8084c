//! Deposit commitments, nullifier hashes and the indexer's commitment list.

use ark_bn254::Fr;
use ark_ff::Zero;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::field::{from_bytes32_hex, to_bytes32, to_bytes32_hex};
use crate::note::SecretNote;
use crate::poseidon::FieldHash;

/// commitment = H(secret, nullifier)
pub fn commitment<H: FieldHash + ?Sized>(hasher: &H, secret: Fr, nullifier: Fr) -> Fr {
    hasher.hash2(secret, nullifier)
}

/// nullifier_hash = H(nullifier, 0). This is the only definition in use; the
/// circuit and the contract both expect it.
pub fn nullifier_hash<H: FieldHash + ?Sized>(hasher: &H, nullifier: Fr) -> Fr {
    hasher.hash2(nullifier, Fr::zero())
}

/// One accepted deposit, as replayed into the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitmentRecord {
    pub leaf_index: u64,
    pub commitment: Fr,
}

impl CommitmentRecord {
    pub fn new(leaf_index: u64, commitment: Fr) -> Self {
        Self {
            leaf_index,
            commitment,
        }
    }
}

/// Deposit event as the indexer serves it: `{ "leafIndex": 0, "commitment": "0x…" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentRecordWire {
    pub leaf_index: u64,
    pub commitment: String,
}

impl TryFrom<&CommitmentRecordWire> for CommitmentRecord {
    type Error = EngineError;

    fn try_from(wire: &CommitmentRecordWire) -> Result<Self> {
        Ok(Self {
            leaf_index: wire.leaf_index,
            commitment: from_bytes32_hex(&wire.commitment)?,
        })
    }
}

impl From<&CommitmentRecord> for CommitmentRecordWire {
    fn from(record: &CommitmentRecord) -> Self {
        Self {
            leaf_index: record.leaf_index,
            commitment: to_bytes32_hex(&record.commitment),
        }
    }
}

/// Parse a whole indexer response. Order is not checked here.
pub fn records_from_wire(wire: &[CommitmentRecordWire]) -> Result<Vec<CommitmentRecord>> {
    wire.iter().map(CommitmentRecord::try_from).collect()
}

/// Position i must hold leaf index i: ascending, gap-free, starting at 0.
pub fn validate_order(records: &[CommitmentRecord]) -> Result<()> {
    for (position, record) in records.iter().enumerate() {
        let expected = position as u64;
        if record.leaf_index != expected {
            return Err(EngineError::OutOfOrderCommitments {
                expected,
                found: record.leaf_index,
            });
        }
    }
    Ok(())
}

/// Check that the note's commitment sits at the note's leaf index.
///
/// `records` must already have passed [`validate_order`]; the lookup is by position.
pub fn verify_commitment<H: FieldHash + ?Sized>(
    hasher: &H,
    note: &SecretNote,
    records: &[CommitmentRecord],
) -> Result<()> {
    let record = usize::try_from(note.leaf_index)
        .ok()
        .and_then(|position| records.get(position))
        .ok_or(EngineError::LeafIndexOutOfRange {
            leaf_index: note.leaf_index,
            available: records.len() as u64,
        })?;

    let local = to_bytes32(&note.commitment(hasher));
    let observed = to_bytes32(&record.commitment);

    if local != observed {
        return Err(EngineError::CommitmentMismatch {
            leaf_index: note.leaf_index,
            expected: format!("0x{}", hex::encode(local)),
            found: format!("0x{}", hex::encode(observed)),
        });
    }

    Ok(())
}

/// Find the leaf holding `commitment` without touching any tree state.
#[cfg(feature = "parallel")]
pub fn find_commitment(records: &[CommitmentRecord], commitment: &Fr) -> Option<u64> {
    use rayon::prelude::*;

    records
        .par_iter()
        .find_first(|record| record.commitment == *commitment)
        .map(|record| record.leaf_index)
}

/// Find the leaf holding `commitment` without touching any tree state.
#[cfg(not(feature = "parallel"))]
pub fn find_commitment(records: &[CommitmentRecord], commitment: &Fr) -> Option<u64> {
    records
        .iter()
        .find(|record| record.commitment == *commitment)
        .map(|record| record.leaf_index)
}
