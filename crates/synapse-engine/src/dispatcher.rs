//! Stateless request routing.
//!
//! Every failure on the way from raw request to result becomes an `ERROR`
//! response; nothing propagates to the caller as an `Err` or a panic.

use crate::error::EngineError;
use crate::handlers::{handle_analyze, handle_centrality, handle_communities, handle_layout};
use crate::protocol::{EngineRequest, EngineResponse, OperationType};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Runs one request and returns its response.
pub fn dispatch(request: EngineRequest) -> EngineResponse {
    let EngineRequest {
        operation_type,
        payload,
        correlation_id,
    } = request;
    let id = Some(correlation_id);

    let operation = match operation_type.parse::<OperationType>() {
        Ok(op) => op,
        Err(e) => {
            warn!("Rejected request {:?}: {}", id, e);
            return EngineResponse::error(id, e);
        }
    };

    debug!("Processing operation {} ({:?})", operation, id);

    let result_type = operation.result_type();
    let outcome = match operation {
        OperationType::CalculateLayout => parse_payload(payload)
            .and_then(handle_layout)
            .and_then(to_value),
        OperationType::AnalyzeNetwork => parse_payload(payload)
            .and_then(handle_analyze)
            .and_then(to_value),
        OperationType::FindCommunities => parse_payload(payload)
            .and_then(handle_communities)
            .and_then(to_value),
        OperationType::CalculateCentrality => parse_payload(payload)
            .and_then(handle_centrality)
            .and_then(to_value),
    };

    match outcome {
        Ok(value) => EngineResponse::success(id, result_type, value),
        Err(e) => {
            warn!("Operation {} failed ({:?}): {}", operation, id, e);
            EngineResponse::error(id, e)
        }
    }
}

/// Processes a raw JSON request and returns a response.
///
/// When the envelope cannot be decoded, the correlation id is recovered
/// from the raw JSON if it is present so the caller can still match the
/// error to its request.
pub fn process_message(text: &str) -> EngineResponse {
    let raw: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!("Unparseable request: {}", e);
            return EngineResponse::error(None, EngineError::InvalidPayload(e.to_string()));
        }
    };

    let recovered_id = raw.get("correlationId").and_then(|id| match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    match serde_json::from_value::<EngineRequest>(raw) {
        Ok(request) => dispatch(request),
        Err(e) => {
            warn!("Malformed request envelope ({:?}): {}", recovered_id, e);
            EngineResponse::error(recovered_id, EngineError::InvalidPayload(e.to_string()))
        }
    }
}

fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T, EngineError> {
    Ok(serde_json::from_value(payload)?)
}

fn to_value<T: serde::Serialize>(result: T) -> Result<Value, EngineError> {
    serde_json::to_value(result).map_err(|e| EngineError::Internal(e.to_string()))
}
