//! Fresh deposit notes.

use ark_bn254::Fr;
use rand::{CryptoRng, RngCore};
use tracing::info;

use swirl_engine::field::to_bytes32_hex;
use swirl_engine::{FieldHash, SecretNote};

/// Everything the deposit flow needs: the commitment for the contract and
/// the encoded note for the user to keep. No `Debug`: `encoded` carries the secret.
#[derive(Clone)]
pub struct DepositNote {
    pub note: SecretNote,
    pub commitment: Fr,
    pub commitment_bytes32: String,
    pub encoded: String,
}

/// Draw a random secret and nullifier for the deposit that will land at
/// `leaf_index`.
pub fn new_deposit<H, R>(hasher: &H, rng: &mut R, leaf_index: u64) -> DepositNote
where
    H: FieldHash + ?Sized,
    R: RngCore + CryptoRng,
{
    let note = SecretNote::random(rng, leaf_index);
    let commitment = note.commitment(hasher);
    let commitment_bytes32 = to_bytes32_hex(&commitment);

    info!(leaf_index, commitment = %commitment_bytes32, "generated deposit note");

    DepositNote {
        note,
        commitment,
        commitment_bytes32,
        encoded: note.encode(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use swirl_engine::PoseidonHasher;

    #[test]
    fn test_new_deposit_round_trips() {
        let hasher = PoseidonHasher::new().unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let deposit = new_deposit(&hasher, &mut rng, 9);
        let decoded = SecretNote::decode(&deposit.encoded).unwrap();

        assert_eq!(decoded, deposit.note);
        assert_eq!(decoded.leaf_index, 9);
        assert_eq!(decoded.commitment(&hasher), deposit.commitment);
        assert_eq!(deposit.commitment_bytes32.len(), 66);
    }

    #[test]
    fn test_new_deposit_is_random() {
        let hasher = PoseidonHasher::new().unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let first = new_deposit(&hasher, &mut rng, 0);
        let second = new_deposit(&hasher, &mut rng, 0);
        assert_ne!(first.note.secret, second.note.secret);
        assert_ne!(first.commitment, second.commitment);
    }
}
