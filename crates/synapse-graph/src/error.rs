use thiserror::Error;

/// Errors raised by graph computations.
///
/// Content problems (dangling links, self-links) are not errors; the
/// builder drops them. Only caller-supplied parameters can be rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Invalid layout settings: {0}")]
    InvalidSettings(String),
}
