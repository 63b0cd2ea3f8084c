//! HTTP request handlers for notes and withdrawal inputs.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use swirl_engine::field::{to_bytes32_hex, to_decimal};
use swirl_engine::{records_from_wire, CommitmentRecordWire, EngineError, ErrorClass, SecretNote};
use swirl_prover::{new_deposit, prepare_withdrawal_cached, ProofInputs, ProveError};

use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

/// Application error type that maps to HTTP status codes.
#[derive(Debug)]
pub struct AppError {
    class: ErrorClass,
    message: String,
}

impl AppError {
    fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.class {
            ErrorClass::InvalidNote => StatusCode::BAD_REQUEST,
            ErrorClass::NotReady => StatusCode::CONFLICT,
            ErrorClass::DataSource => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorClass::Backend => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::new(e.class(), e.to_string())
    }
}

impl From<ProveError> for AppError {
    fn from(e: ProveError) -> Self {
        match e {
            ProveError::Engine(engine) => engine.into(),
            other => AppError::new(ErrorClass::Backend, other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.message,
            kind: self.class.as_str(),
        };
        (status, Json(body)).into_response()
    }
}

// ============ Notes ============

#[derive(Deserialize)]
pub struct GenerateNoteRequest {
    pub leaf_index: u64,
}

#[derive(Serialize)]
pub struct GenerateNoteResponse {
    pub encoded: String,
    pub commitment: String,
    pub commitment_bytes32: String,
}

pub async fn generate_note(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateNoteRequest>,
) -> Json<GenerateNoteResponse> {
    let deposit = new_deposit(&*state.hasher, &mut rand::thread_rng(), req.leaf_index);

    Json(GenerateNoteResponse {
        encoded: deposit.encoded,
        commitment: to_decimal(&deposit.commitment),
        commitment_bytes32: deposit.commitment_bytes32,
    })
}

#[derive(Deserialize)]
pub struct DecodeNoteRequest {
    pub encoded: String,
}

/// Public facts about a note. The secret and nullifier never leave the server.
#[derive(Serialize)]
pub struct DecodeNoteResponse {
    pub leaf_index: u64,
    pub commitment: String,
    pub commitment_bytes32: String,
    pub nullifier_hash_bytes32: String,
}

pub async fn decode_note(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DecodeNoteRequest>,
) -> Result<Json<DecodeNoteResponse>, AppError> {
    let note = SecretNote::decode(&req.encoded)?;
    let commitment = note.commitment(&*state.hasher);

    Ok(Json(DecodeNoteResponse {
        leaf_index: note.leaf_index,
        commitment: to_decimal(&commitment),
        commitment_bytes32: to_bytes32_hex(&commitment),
        nullifier_hash_bytes32: to_bytes32_hex(&note.nullifier_hash(&*state.hasher)),
    }))
}

// ============ Withdrawal inputs ============

#[derive(Deserialize)]
pub struct WithdrawInputsRequest {
    pub encoded: String,
    pub commitments: Vec<CommitmentRecordWire>,
}

pub async fn withdraw_inputs(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WithdrawInputsRequest>,
) -> Result<Json<ProofInputs>, AppError> {
    // A bad commitment string is the indexer's fault, not the user's.
    let records = records_from_wire(&req.commitments)
        .map_err(|e| AppError::new(ErrorClass::DataSource, e.to_string()))?;

    let hasher = state.hasher.clone();
    let mut cache = state.cache.clone().write_owned().await;

    // Replay is CPU-bound; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || {
        match prepare_withdrawal_cached(&*hasher, &mut cache, &req.encoded, &records) {
            Err(ProveError::Engine(EngineError::CommitmentHistoryDiverged { leaf_index })) => {
                warn!(leaf_index, "commitment history diverged, rebuilding replay cache");
                cache.reset();
                prepare_withdrawal_cached(&*hasher, &mut cache, &req.encoded, &records)
            }
            other => other,
        }
    })
    .await
    .map_err(|e| {
        error!("replay task failed: {}", e);
        AppError::new(ErrorClass::Backend, "replay task failed")
    })?;

    let inputs = result?;
    info!(leaf_index = inputs.leaf_index, "served withdrawal inputs");
    Ok(Json(inputs))
}

// ============ Tree ============

#[derive(Serialize)]
pub struct ZerosResponse {
    pub depth: usize,
    pub zeros: Vec<String>,
}

pub async fn tree_zeros(State(state): State<Arc<AppState>>) -> Json<ZerosResponse> {
    let cache = state.cache.read().await;
    Json(ZerosResponse {
        depth: cache.depth(),
        zeros: cache.zeros().as_slice().iter().map(to_bytes32_hex).collect(),
    })
}
