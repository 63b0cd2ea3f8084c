//! Canonical encodings of BN254 scalar field elements.
//!
//! Two external forms exist: the 32-byte big-endian "bytes32" used by the
//! contract and the indexer, and the decimal string fed to the circuit.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use num_traits::Num;
use rand::{CryptoRng, RngCore};

use crate::error::{EngineError, Result};

/// Entropy per sampled element. 248 bits always sits below the BN254 modulus.
pub const RANDOM_FIELD_BYTES: usize = 31;

/// Big-endian 32-byte encoding.
pub fn to_bytes32(value: &Fr) -> [u8; 32] {
    let bytes = value.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// `0x`-prefixed, zero-padded, 64 hex digits.
pub fn to_bytes32_hex(value: &Fr) -> String {
    format!("0x{}", hex::encode(to_bytes32(value)))
}

/// Decimal representation without leading zeros.
pub fn to_decimal(value: &Fr) -> String {
    BigUint::from_bytes_be(&value.into_bigint().to_bytes_be()).to_string()
}

/// Interpret arbitrary big-endian bytes as an integer and reduce it into the field.
pub fn from_be_bytes_reduced(bytes: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(bytes)
}

/// Parse a bytes32 hex string (optional `0x`, up to 64 digits), reducing modulo the prime.
pub fn from_bytes32_hex(input: &str) -> Result<Fr> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if digits.is_empty() || digits.len() > 64 {
        return Err(EngineError::InvalidFieldElement(format!(
            "expected 1 to 64 hex digits, got {}",
            digits.len()
        )));
    }

    let padded = format!("{:0>64}", digits);
    let bytes = hex::decode(&padded)
        .map_err(|e| EngineError::InvalidFieldElement(format!("invalid hex: {}", e)))?;

    Ok(Fr::from_be_bytes_mod_order(&bytes))
}

/// Parse a canonical decimal string. Signs, whitespace and values at or
/// above the modulus are rejected rather than coerced.
pub fn from_decimal(input: &str) -> Result<Fr> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::InvalidFieldElement(format!(
            "not a decimal integer: {:?}",
            input
        )));
    }

    let value = BigUint::from_str_radix(input, 10)
        .map_err(|e| EngineError::InvalidFieldElement(e.to_string()))?;

    if value >= modulus() {
        return Err(EngineError::InvalidFieldElement(
            "value is not below the field modulus".to_string(),
        ));
    }

    Ok(Fr::from_be_bytes_mod_order(&value.to_bytes_be()))
}

/// Sample a uniformly random element from [0, 2^248).
pub fn random_field<R: RngCore + CryptoRng>(rng: &mut R) -> Fr {
    let mut bytes = [0u8; RANDOM_FIELD_BYTES];
    rng.fill_bytes(&mut bytes);
    Fr::from_be_bytes_mod_order(&bytes)
}

fn modulus() -> BigUint {
    BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be())
}
