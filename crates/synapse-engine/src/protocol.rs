//! Wire types for the engine protocol.
//!
//! ```text
//! → {"operationType": "ANALYZE_NETWORK", "payload": {...}, "correlationId": "42"}
//! ← {"resultType": "NETWORK_ANALYSIS_RESULT", "payload": {...}, "correlationId": "42"}
//! ← {"resultType": "ERROR", "payload": {"error": "...", "kind": "InvalidPayload"}, "correlationId": "42"}
//! ```

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use synapse_core::{Edge, Node};
use synapse_graph::LayoutSettings;

/// Operations the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    CalculateLayout,
    AnalyzeNetwork,
    FindCommunities,
    CalculateCentrality,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CalculateLayout => "CALCULATE_LAYOUT",
            Self::AnalyzeNetwork => "ANALYZE_NETWORK",
            Self::FindCommunities => "FIND_COMMUNITIES",
            Self::CalculateCentrality => "CALCULATE_CENTRALITY",
        }
    }

    /// The result type a successful run of this operation produces.
    pub fn result_type(&self) -> ResultType {
        match self {
            Self::CalculateLayout => ResultType::LayoutResult,
            Self::AnalyzeNetwork => ResultType::NetworkAnalysisResult,
            Self::FindCommunities => ResultType::CommunitiesResult,
            Self::CalculateCentrality => ResultType::CentralityResult,
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CALCULATE_LAYOUT" => Ok(Self::CalculateLayout),
            "ANALYZE_NETWORK" => Ok(Self::AnalyzeNetwork),
            "FIND_COMMUNITIES" => Ok(Self::FindCommunities),
            "CALCULATE_CENTRALITY" => Ok(Self::CalculateCentrality),
            other => Err(EngineError::UnknownOperation(other.to_string())),
        }
    }
}

/// Response tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    LayoutResult,
    NetworkAnalysisResult,
    CommunitiesResult,
    CentralityResult,
    Error,
}

/// A request to the engine.
///
/// The operation type stays a string until dispatch so that an unknown
/// operation can still be answered with the caller's correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineRequest {
    pub operation_type: String,
    #[serde(default)]
    pub payload: Value,
    pub correlation_id: String,
}

impl EngineRequest {
    /// Creates a request for a known operation.
    pub fn new(
        operation: OperationType,
        payload: Value,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            operation_type: operation.as_str().to_string(),
            payload,
            correlation_id: correlation_id.into(),
        }
    }
}

/// A reply from the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineResponse {
    pub result_type: ResultType,
    pub payload: Value,
    /// `None` only when the request was too malformed to recover an id.
    pub correlation_id: Option<String>,
}

impl EngineResponse {
    /// Creates a success response.
    pub fn success(
        correlation_id: Option<String>,
        result_type: ResultType,
        result: impl Serialize,
    ) -> Self {
        match serde_json::to_value(result) {
            Ok(payload) => Self {
                result_type,
                payload,
                correlation_id,
            },
            Err(e) => Self::error(correlation_id, EngineError::Internal(e.to_string())),
        }
    }

    /// Creates an error response.
    pub fn error(correlation_id: Option<String>, error: EngineError) -> Self {
        Self {
            result_type: ResultType::Error,
            payload: json!({
                "error": error.to_string(),
                "kind": error.kind(),
            }),
            correlation_id,
        }
    }

    pub fn is_error(&self) -> bool {
        self.result_type == ResultType::Error
    }

    /// The error message, if this is an error response.
    pub fn error_message(&self) -> Option<&str> {
        if !self.is_error() {
            return None;
        }
        self.payload.get("error").and_then(Value::as_str)
    }
}

/// Payload for `CALCULATE_LAYOUT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPayload {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    pub settings: LayoutSettings,
}

/// Payload for the operations that only need the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Result of `CALCULATE_LAYOUT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub nodes: Vec<Node>,
}

/// Result of `CALCULATE_CENTRALITY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralityResult {
    pub nodes: Vec<Node>,
    pub centrality_by_node_id: BTreeMap<String, f64>,
}
