//! Withdrawal preparation: note in, proof inputs out.
//!
//! Steps, in order:
//! 1. Decode the note
//! 2. Check the indexer's list is gap-free
//! 3. Check the note's commitment sits at its leaf index
//! 4. Replay the tree up to that leaf
//! 5. Assemble the inputs

use tracing::{debug, info, info_span};

use swirl_engine::commitment::{validate_order, verify_commitment};
use swirl_engine::{reconstruct, CommitmentRecord, FieldHash, ReplayCache, SecretNote};

use crate::inputs::{assemble, ProofInputs};
use crate::prove::{ExternalProver, ProveError, WithdrawalPackage};

/// Full replay from leaf 0.
pub fn prepare_withdrawal<H: FieldHash + ?Sized>(
    hasher: &H,
    encoded_note: &str,
    records: &[CommitmentRecord],
) -> Result<ProofInputs, ProveError> {
    let note = SecretNote::decode(encoded_note)?;
    let span = info_span!("prepare_withdrawal", leaf_index = note.leaf_index);
    let _enter = span.enter();

    validate_order(records)?;
    verify_commitment(hasher, &note, records)?;
    debug!(known = records.len(), "commitment found at leaf");

    let proof = reconstruct(hasher, records, note.leaf_index)?;
    info!("withdrawal inputs ready");
    Ok(assemble(hasher, &note, &proof))
}

/// Same result as [`prepare_withdrawal`], replaying only what `cache` has
/// not seen yet.
pub fn prepare_withdrawal_cached<H: FieldHash + ?Sized>(
    hasher: &H,
    cache: &mut ReplayCache,
    encoded_note: &str,
    records: &[CommitmentRecord],
) -> Result<ProofInputs, ProveError> {
    let note = SecretNote::decode(encoded_note)?;
    let span = info_span!("prepare_withdrawal_cached", leaf_index = note.leaf_index);
    let _enter = span.enter();

    let appended = cache.sync(hasher, records)?;
    verify_commitment(hasher, &note, records)?;
    debug!(appended, cached = cache.len(), "commitment found at leaf");

    let proof = cache.proof_for(hasher, note.leaf_index)?;
    info!("withdrawal inputs ready");
    Ok(assemble(hasher, &note, &proof))
}

/// Prepare the inputs and hand them to `prover`.
pub fn prove_withdrawal<H, P>(
    hasher: &H,
    prover: &P,
    encoded_note: &str,
    records: &[CommitmentRecord],
) -> Result<WithdrawalPackage, ProveError>
where
    H: FieldHash + ?Sized,
    P: ExternalProver + ?Sized,
{
    let inputs = prepare_withdrawal(hasher, encoded_note, records)?;
    let generated = prover.prove(&inputs.circuit_inputs())?;
    info!(public_inputs = generated.public_inputs.len(), "withdrawal proof generated");

    Ok(WithdrawalPackage {
        proof: generated.proof,
        root_bytes32: inputs.root_bytes32,
        nullifier_hash_bytes32: inputs.nullifier_hash_bytes32,
    })
}
