use std::sync::atomic::{AtomicUsize, Ordering};

use ark_bn254::Fr;
use rand::rngs::StdRng;
use rand::SeedableRng;

use swirl_engine::field::to_bytes32_hex;
use swirl_engine::{
    CommitmentRecord, CommitmentRecordWire, EngineError, ErrorClass, PoseidonHasher,
    ReplayCache, SecretNote,
};

use crate::*;

/// Backend stand-in that records what it was asked to prove.
struct MockProver {
    calls: AtomicUsize,
    fail: bool,
}

impl MockProver {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }
}

impl ExternalProver for MockProver {
    fn prove(&self, inputs: &CircuitInputs) -> Result<GeneratedProof, ProveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProveError::Prover("backend unavailable".to_string()));
        }
        Ok(GeneratedProof {
            proof: "0xdeadbeef".to_string(),
            public_inputs: vec![inputs.root.clone(), inputs.nullifier_hash.clone()],
        })
    }
}

/// Pool with `count` deposits; returns the encoded note for `mine`.
fn pool(hasher: &PoseidonHasher, count: u64, mine: u64) -> (Vec<CommitmentRecord>, String) {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut records = Vec::new();
    let mut encoded = String::new();
    for i in 0..count {
        let deposit = new_deposit(hasher, &mut rng, i);
        if i == mine {
            encoded = deposit.encoded.clone();
        }
        records.push(CommitmentRecord::new(i, deposit.commitment));
    }
    (records, encoded)
}

fn engine_error(err: ProveError) -> EngineError {
    match err {
        ProveError::Engine(e) => e,
        other => panic!("expected engine error, got {other}"),
    }
}

#[cfg(test)]
mod withdraw_tests {
    use super::*;

    #[test]
    fn test_prepare_withdrawal() {
        let hasher = PoseidonHasher::new().unwrap();
        let (records, encoded) = pool(&hasher, 5, 3);

        let inputs = prepare_withdrawal(&hasher, &encoded, &records).unwrap();
        let note = SecretNote::decode(&encoded).unwrap();

        assert_eq!(inputs.leaf_index, 3);
        assert_eq!(inputs.merkle_indices[..3], [1, 1, 0]);
        assert_eq!(
            inputs.nullifier_hash_bytes32,
            to_bytes32_hex(&note.nullifier_hash(&hasher))
        );
    }

    #[test]
    fn test_cached_matches_full_replay() {
        let hasher = PoseidonHasher::new().unwrap();
        let (records, _) = pool(&hasher, 12, 0);
        let mut cache = ReplayCache::with_params(&hasher, swirl_engine::TREE_DEPTH, 4);

        let mut rng = StdRng::seed_from_u64(2024);
        for i in 0..12 {
            let encoded = new_deposit(&hasher, &mut rng, i).encoded;
            let full = prepare_withdrawal(&hasher, &encoded, &records).unwrap();
            let cached =
                prepare_withdrawal_cached(&hasher, &mut cache, &encoded, &records).unwrap();
            assert_eq!(full, cached);
        }
        assert_eq!(cache.len(), 12);
    }

    #[test]
    fn test_root_independent_of_later_deposits() {
        let hasher = PoseidonHasher::new().unwrap();
        let (records, encoded) = pool(&hasher, 8, 2);

        let early = prepare_withdrawal(&hasher, &encoded, &records[..3]).unwrap();
        let late = prepare_withdrawal(&hasher, &encoded, &records).unwrap();
        assert_eq!(early, late);
    }

    #[test]
    fn test_invalid_note() {
        let hasher = PoseidonHasher::new().unwrap();
        let (records, _) = pool(&hasher, 2, 0);

        let err = engine_error(prepare_withdrawal(&hasher, "not a note", &records).unwrap_err());
        assert_eq!(err.class(), ErrorClass::InvalidNote);
    }

    #[test]
    fn test_indexer_behind() {
        let hasher = PoseidonHasher::new().unwrap();
        let (records, encoded) = pool(&hasher, 5, 4);

        let err = engine_error(prepare_withdrawal(&hasher, &encoded, &records[..4]).unwrap_err());
        assert_eq!(
            err,
            EngineError::LeafIndexOutOfRange {
                leaf_index: 4,
                available: 4
            }
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn test_out_of_order_list() {
        let hasher = PoseidonHasher::new().unwrap();
        let (mut records, encoded) = pool(&hasher, 4, 1);
        records[2].leaf_index = 5;

        let err = engine_error(prepare_withdrawal(&hasher, &encoded, &records).unwrap_err());
        assert_eq!(
            err,
            EngineError::OutOfOrderCommitments {
                expected: 2,
                found: 5
            }
        );
        assert_eq!(err.class(), ErrorClass::DataSource);
    }

    #[test]
    fn test_note_for_other_leaf() {
        let hasher = PoseidonHasher::new().unwrap();
        let (records, _) = pool(&hasher, 3, 0);
        let stray = SecretNote::new(Fr::from(7u64), Fr::from(11u64), 1).encode();

        let err = engine_error(prepare_withdrawal(&hasher, &stray, &records).unwrap_err());
        assert!(matches!(err, EngineError::CommitmentMismatch { leaf_index: 1, .. }));
        assert!(!err.is_retryable());
    }
}

#[cfg(test)]
mod prove_tests {
    use super::*;

    #[test]
    fn test_prove_withdrawal_package() {
        let hasher = PoseidonHasher::new().unwrap();
        let (records, encoded) = pool(&hasher, 3, 1);
        let prover = MockProver::new();

        let package = prove_withdrawal(&hasher, &prover, &encoded, &records).unwrap();
        let inputs = prepare_withdrawal(&hasher, &encoded, &records).unwrap();

        assert_eq!(prover.calls.load(Ordering::SeqCst), 1);
        assert_eq!(package.proof, "0xdeadbeef");
        assert_eq!(package.root_bytes32, inputs.root_bytes32);
        assert_eq!(package.nullifier_hash_bytes32, inputs.nullifier_hash_bytes32);
    }

    #[test]
    fn test_prover_not_called_on_bad_input() {
        let hasher = PoseidonHasher::new().unwrap();
        let (records, encoded) = pool(&hasher, 3, 2);
        let prover = MockProver::new();

        assert!(prove_withdrawal(&hasher, &prover, &encoded, &records[..2]).is_err());
        assert_eq!(prover.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prover_failure_propagates() {
        let hasher = PoseidonHasher::new().unwrap();
        let (records, encoded) = pool(&hasher, 2, 0);
        let prover = MockProver::failing();

        let err = prove_withdrawal(&hasher, &prover, &encoded, &records).unwrap_err();
        assert!(matches!(err, ProveError::Prover(_)));
        assert!(err.engine().is_none());
    }

    #[test]
    fn test_parse_commitments() {
        let hasher = PoseidonHasher::new().unwrap();
        let (records, _) = pool(&hasher, 3, 0);
        let wire: Vec<CommitmentRecordWire> = records.iter().map(CommitmentRecordWire::from).collect();
        let json = serde_json::to_string(&wire).unwrap();

        assert_eq!(parse_commitments(&json).unwrap(), records);
        assert!(matches!(
            parse_commitments("{\"leafIndex\": 0}"),
            Err(ProveError::Serialization(_))
        ));
    }
}
