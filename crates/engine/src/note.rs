//! The user's private deposit note and its portable text encoding.
//!
//! The encoded form is standard base64 over a JSON record whose three
//! values are decimal strings:
//!
//! ```text
//! {"secret":"…","nullifier":"…","leafIndex":"…"}
//! ```
//!
//! The user keeps this string; nothing else persists it.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::commitment;
use crate::error::{EngineError, Result};
use crate::field::{from_decimal, random_field, to_decimal};
use crate::poseidon::FieldHash;

/// Padded on encode; padding is optional on decode since pasted notes lose it.
const NOTE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Secret material for one deposit.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SecretNote {
    pub secret: Fr,
    pub nullifier: Fr,
    pub leaf_index: u64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodedNote {
    secret: String,
    nullifier: String,
    leaf_index: String,
}

impl SecretNote {
    pub fn new(secret: Fr, nullifier: Fr, leaf_index: u64) -> Self {
        Self {
            secret,
            nullifier,
            leaf_index,
        }
    }

    /// Fresh secret and nullifier, 248 bits of entropy each.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R, leaf_index: u64) -> Self {
        let secret = random_field(rng);
        let nullifier = random_field(rng);
        Self::new(secret, nullifier, leaf_index)
    }

    pub fn commitment<H: FieldHash + ?Sized>(&self, hasher: &H) -> Fr {
        commitment::commitment(hasher, self.secret, self.nullifier)
    }

    pub fn nullifier_hash<H: FieldHash + ?Sized>(&self, hasher: &H) -> Fr {
        commitment::nullifier_hash(hasher, self.nullifier)
    }

    /// Encode to the copy-pasteable form.
    pub fn encode(&self) -> String {
        let record = EncodedNote {
            secret: to_decimal(&self.secret),
            nullifier: to_decimal(&self.nullifier),
            leaf_index: self.leaf_index.to_string(),
        };
        let json = serde_json::to_string(&record).expect("string-only record always serializes");
        NOTE_BASE64.encode(json)
    }

    /// Decode a note produced by [`SecretNote::encode`]. Surrounding
    /// whitespace is ignored; anything else that is off is an error.
    pub fn decode(encoded: &str) -> Result<Self> {
        let trimmed = encoded.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidNote("empty input".to_string()));
        }

        let bytes = NOTE_BASE64
            .decode(trimmed)
            .map_err(|e| EngineError::InvalidNote(format!("not base64: {}", e)))?;

        let record: EncodedNote = serde_json::from_slice(&bytes)
            .map_err(|e| EngineError::InvalidNote(format!("malformed record: {}", e)))?;

        let secret = from_decimal(&record.secret)
            .map_err(|e| EngineError::InvalidNote(format!("secret: {}", e)))?;
        let nullifier = from_decimal(&record.nullifier)
            .map_err(|e| EngineError::InvalidNote(format!("nullifier: {}", e)))?;
        let leaf_index = parse_leaf_index(&record.leaf_index)?;

        Ok(Self::new(secret, nullifier, leaf_index))
    }
}

fn parse_leaf_index(input: &str) -> Result<u64> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::InvalidNote(format!(
            "leafIndex: not a decimal integer: {:?}",
            input
        )));
    }
    input
        .parse::<u64>()
        .map_err(|e| EngineError::InvalidNote(format!("leafIndex: {}", e)))
}

impl FromStr for SecretNote {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for SecretNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretNote")
            .field("secret", &"<redacted>")
            .field("nullifier", &"<redacted>")
            .field("leaf_index", &self.leaf_index)
            .finish()
    }
}
