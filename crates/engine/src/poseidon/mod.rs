//! Two-input Poseidon hash over BN254.
//!
//! The production hasher uses the circom parameter set so that every hash
//! matches circomlibjs `poseidon([a, b])`, the Noir circuit and the
//! on-chain tree.

mod native;


pub use native::{FieldHash, PoseidonHasher};

#[cfg(test)]
pub(crate) use native::StubHasher;
