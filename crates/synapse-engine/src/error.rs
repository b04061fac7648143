use thiserror::Error;

/// Errors reported across the dispatch boundary.
///
/// These never escape as panics or `Err`s to the caller of the engine; the
/// dispatcher turns each into an `ERROR` response carrying the request's
/// correlation id.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The payload does not have the shape the operation needs.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The operation type is not one the engine knows.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// The engine failed while processing an otherwise valid request.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Short machine-readable tag sent alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "InvalidPayload",
            Self::UnknownOperation(_) => "UnknownOperation",
            Self::Internal(_) => "Internal",
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

impl From<synapse_graph::GraphError> for EngineError {
    fn from(err: synapse_graph::GraphError) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}
