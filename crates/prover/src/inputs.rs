//! Proof inputs: the only place field elements are rendered for the
//! prover and the contract.
//!
//! The circuit takes decimal strings. The contract takes bytes32. Both
//! renderings of every value are produced here from one `MerkleProof`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use swirl_engine::field::{to_bytes32_hex, to_decimal};
use swirl_engine::{FieldHash, MerkleProof, SecretNote};

use crate::prove::ProveError;

pub const PROVER_TOML: &str = "Prover.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofInputs {
    pub secret: String,
    pub secret_bytes32: String,
    pub nullifier: String,
    pub nullifier_bytes32: String,
    pub commitment: String,
    pub nullifier_hash: String,
    pub nullifier_hash_bytes32: String,
    pub merkle_path: Vec<String>,
    pub merkle_path_bytes32: Vec<String>,
    pub merkle_indices: Vec<u8>,
    pub root: String,
    pub root_bytes32: String,
    #[serde(rename = "leafIndex")]
    pub leaf_index: u64,
}

/// The private and public inputs of the withdraw circuit, nothing else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitInputs {
    pub secret: String,
    pub nullifier: String,
    pub nullifier_hash: String,
    pub root: String,
    pub merkle_path: Vec<String>,
    pub merkle_indices: Vec<u8>,
}

/// Combine a decoded note with the proof of its leaf.
///
/// `proof` must be the proof for `note.leaf_index`; callers get it from
/// `reconstruct` or the replay cache after verifying the commitment.
pub fn assemble<H: FieldHash + ?Sized>(
    hasher: &H,
    note: &SecretNote,
    proof: &MerkleProof,
) -> ProofInputs {
    debug_assert_eq!(
        proof.leaf(),
        note.commitment(hasher),
        "proof leaf is not the note's commitment"
    );
    debug_assert_eq!(
        proof.leaf_index(),
        note.leaf_index,
        "proof is for a different leaf index"
    );

    let nullifier_hash = note.nullifier_hash(hasher);
    let root = proof.root();

    ProofInputs {
        secret: to_decimal(&note.secret),
        secret_bytes32: to_bytes32_hex(&note.secret),
        nullifier: to_decimal(&note.nullifier),
        nullifier_bytes32: to_bytes32_hex(&note.nullifier),
        commitment: to_decimal(&proof.leaf()),
        nullifier_hash: to_decimal(&nullifier_hash),
        nullifier_hash_bytes32: to_bytes32_hex(&nullifier_hash),
        merkle_path: proof.path().iter().map(to_decimal).collect(),
        merkle_path_bytes32: proof.path().iter().map(to_bytes32_hex).collect(),
        merkle_indices: proof.indices().to_vec(),
        root: to_decimal(&root),
        root_bytes32: to_bytes32_hex(&root),
        leaf_index: note.leaf_index,
    }
}

impl ProofInputs {
    pub fn circuit_inputs(&self) -> CircuitInputs {
        CircuitInputs {
            secret: self.secret.clone(),
            nullifier: self.nullifier.clone(),
            nullifier_hash: self.nullifier_hash.clone(),
            root: self.root.clone(),
            merkle_path: self.merkle_path.clone(),
            merkle_indices: self.merkle_indices.clone(),
        }
    }
}

impl CircuitInputs {
    /// Render as a Noir `Prover.toml`.
    pub fn to_prover_toml(&self) -> Result<String, ProveError> {
        toml::to_string(self).map_err(|e| ProveError::Serialization(e.to_string()))
    }
}

/// Write `<dir>/Prover.toml`, creating `dir` if needed.
pub fn write_prover_toml(dir: &Path, inputs: &CircuitInputs) -> Result<PathBuf, ProveError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(PROVER_TOML);
    std::fs::write(&path, inputs.to_prover_toml()?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use swirl_engine::field::{from_bytes32_hex, from_decimal};
    use swirl_engine::{reconstruct, CommitmentRecord, PoseidonHasher, TREE_DEPTH};

    fn single_leaf_inputs() -> (PoseidonHasher, SecretNote, ProofInputs) {
        let hasher = PoseidonHasher::new().unwrap();
        let note = SecretNote::new(Fr::from(7u64), Fr::from(11u64), 0);
        let records = vec![CommitmentRecord::new(0, note.commitment(&hasher))];
        let proof = reconstruct(&hasher, &records, 0).unwrap();
        let inputs = assemble(&hasher, &note, &proof);
        (hasher, note, inputs)
    }

    #[test]
    fn test_assemble_renders_both_forms() {
        let (hasher, note, inputs) = single_leaf_inputs();

        assert_eq!(inputs.secret, "7");
        assert_eq!(inputs.nullifier, "11");
        assert_eq!(inputs.secret_bytes32, format!("0x{:0>64}", "7"));
        assert_eq!(inputs.nullifier_bytes32, format!("0x{:0>64}", "b"));
        assert_eq!(inputs.leaf_index, 0);
        assert_eq!(inputs.merkle_path.len(), TREE_DEPTH);
        assert_eq!(inputs.merkle_path_bytes32.len(), TREE_DEPTH);
        assert_eq!(inputs.merkle_indices, vec![0u8; TREE_DEPTH]);

        let nullifier_hash = note.nullifier_hash(&hasher);
        assert_eq!(inputs.nullifier_hash, to_decimal(&nullifier_hash));
        assert_eq!(inputs.nullifier_hash_bytes32, to_bytes32_hex(&nullifier_hash));
        assert_eq!(inputs.commitment, to_decimal(&note.commitment(&hasher)));

        for (decimal, bytes32) in inputs.merkle_path.iter().zip(&inputs.merkle_path_bytes32) {
            let from_hex = from_bytes32_hex(bytes32).unwrap();
            assert_eq!(from_decimal(decimal).unwrap(), from_hex);
        }
        assert_eq!(
            from_decimal(&inputs.root).unwrap(),
            from_bytes32_hex(&inputs.root_bytes32).unwrap()
        );
    }

    #[test]
    fn test_json_keys() {
        let (_, _, inputs) = single_leaf_inputs();
        let value = serde_json::to_value(&inputs).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "secret",
            "secret_bytes32",
            "nullifier",
            "nullifier_bytes32",
            "commitment",
            "nullifier_hash",
            "nullifier_hash_bytes32",
            "merkle_path",
            "merkle_path_bytes32",
            "merkle_indices",
            "root",
            "root_bytes32",
            "leafIndex",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object.len(), 13);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "proof leaf is not the note's commitment")]
    fn test_assemble_rejects_proof_for_other_commitment() {
        let hasher = PoseidonHasher::new().unwrap();
        let note = SecretNote::new(Fr::from(7u64), Fr::from(11u64), 0);
        let records = vec![CommitmentRecord::new(0, Fr::from(12345u64))];
        let proof = reconstruct(&hasher, &records, 0).unwrap();
        assemble(&hasher, &note, &proof);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "proof is for a different leaf index")]
    fn test_assemble_rejects_proof_for_other_leaf() {
        let hasher = PoseidonHasher::new().unwrap();
        let note = SecretNote::new(Fr::from(7u64), Fr::from(11u64), 1);
        let records = vec![CommitmentRecord::new(0, note.commitment(&hasher))];
        let proof = reconstruct(&hasher, &records, 0).unwrap();
        assemble(&hasher, &note, &proof);
    }

    #[test]
    fn test_circuit_inputs_projection() {
        let (_, _, inputs) = single_leaf_inputs();
        let circuit = inputs.circuit_inputs();
        assert_eq!(circuit.secret, inputs.secret);
        assert_eq!(circuit.root, inputs.root);
        assert_eq!(circuit.merkle_path, inputs.merkle_path);
        assert_eq!(circuit.merkle_indices, inputs.merkle_indices);

        let value = serde_json::to_value(&circuit).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_prover_toml() {
        let (_, _, inputs) = single_leaf_inputs();
        let rendered = inputs.circuit_inputs().to_prover_toml().unwrap();

        assert!(rendered.contains("secret = \"7\""));
        assert!(rendered.contains("nullifier = \"11\""));
        assert!(rendered.contains("merkle_indices = ["));

        let parsed: CircuitInputs = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, inputs.circuit_inputs());
    }

    #[test]
    fn test_write_prover_toml() {
        let (_, _, inputs) = single_leaf_inputs();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("withdraw");

        let path = write_prover_toml(&target, &inputs.circuit_inputs()).unwrap();
        assert_eq!(path, target.join(PROVER_TOML));

        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, inputs.circuit_inputs().to_prover_toml().unwrap());
    }
}
