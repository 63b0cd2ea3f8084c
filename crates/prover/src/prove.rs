//! The seam to the external proving backend.
//!
//! Proving itself happens outside this workspace (a Noir circuit run by
//! `nargo`/`bb` or a browser backend). This module defines what goes in,
//! what comes out, and what the on-chain `withdraw` call needs from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use swirl_engine::EngineError;

use crate::inputs::CircuitInputs;

/// Errors during withdrawal preparation and proving
#[derive(Error, Debug)]
pub enum ProveError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Proof generation failed: {0}")]
    Prover(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProveError {
    /// The engine error behind this failure, if any.
    pub fn engine(&self) -> Option<&EngineError> {
        match self {
            ProveError::Engine(e) => Some(e),
            _ => None,
        }
    }
}

/// An opaque proof with its public inputs, as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProof {
    /// 0x-prefixed hex proof bytes
    pub proof: String,
    pub public_inputs: Vec<String>,
}

/// Anything that can turn circuit inputs into a proof.
///
/// Implementations may shell out to external provers or call a remote
/// proving service.
pub trait ExternalProver: Send + Sync {
    fn prove(&self, inputs: &CircuitInputs) -> Result<GeneratedProof, ProveError>;
}

/// Arguments of the on-chain `withdraw` call, minus the recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WithdrawalPackage {
    pub proof: String,
    pub root_bytes32: String,
    pub nullifier_hash_bytes32: String,
}
