//! Withdrawal proof inputs for the Swirl privacy pool.
//!
//! This crate provides utilities for:
//! - Generating deposit notes
//! - Turning an encoded note and the indexer's commitment list into prover inputs
//! - Rendering those inputs for a Noir prover and the on-chain `withdraw` call

pub mod deposit;
pub mod inputs;
pub mod prove;
pub mod withdraw;

#[cfg(test)]
mod tests;

pub use deposit::{new_deposit, DepositNote};
pub use inputs::{assemble, write_prover_toml, CircuitInputs, ProofInputs};
pub use prove::{ExternalProver, GeneratedProof, ProveError, WithdrawalPackage};
pub use withdraw::{prepare_withdrawal, prepare_withdrawal_cached, prove_withdrawal};

use swirl_engine::{records_from_wire, CommitmentRecord, CommitmentRecordWire};

/// Parse the indexer's JSON response (`[{ "leafIndex": 0, "commitment": "0x…" }, …]`).
pub fn parse_commitments(json: &str) -> Result<Vec<CommitmentRecord>, ProveError> {
    let wire: Vec<CommitmentRecordWire> =
        serde_json::from_str(json).map_err(|e| ProveError::Serialization(e.to_string()))?;
    Ok(records_from_wire(&wire)?)
}
