//! Native (out-of-circuit) hash backends.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher as _};

use crate::error::{EngineError, Result};

/// A deterministic two-to-one compression function over the field.
///
/// Everything in the engine takes the hasher by reference, so tests can swap
/// in a cheap stub and callers decide how long the backend lives.
pub trait FieldHash: Send + Sync {
    fn hash2(&self, left: Fr, right: Fr) -> Fr;
}

impl<H: FieldHash + ?Sized> FieldHash for std::sync::Arc<H> {
    fn hash2(&self, left: Fr, right: Fr) -> Fr {
        (**self).hash2(left, right)
    }
}

/// Circom-compatible Poseidon with width 3 (two inputs).
///
/// `light-poseidon` keeps its sponge state inside the hasher and hashes
/// through `&mut self`; the mutex lets one handle serve many readers.
pub struct PoseidonHasher {
    inner: Mutex<Poseidon<Fr>>,
}

impl PoseidonHasher {
    /// Load the round constants and MDS matrix. Do this once and share the handle.
    pub fn new() -> Result<Self> {
        let inner = Poseidon::<Fr>::new_circom(2)
            .map_err(|e| EngineError::HashBackendInit(format!("{:?}", e)))?;
        Ok(Self {
            inner: Mutex::new(inner),
        })
    }
}

impl FieldHash for PoseidonHasher {
    fn hash2(&self, left: Fr, right: Fr) -> Fr {
        // The sponge is reset on every call, so a poisoned lock holds no stale state.
        let mut poseidon = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        poseidon
            .hash(&[left, right])
            .expect("width-3 parameters accept exactly two inputs")
    }
}

impl fmt::Debug for PoseidonHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseidonHasher")
            .field("params", &"circom-bn254-x5-3")
            .finish()
    }
}

/// Cheap affine stand-in for tree tests: H(l, r) = 3l + 5r + 1.
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct StubHasher;

#[cfg(test)]
impl FieldHash for StubHasher {
    fn hash2(&self, left: Fr, right: Fr) -> Fr {
        left * Fr::from(3u64) + right * Fr::from(5u64) + Fr::from(1u64)
    }
}
