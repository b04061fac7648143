//! Synapse Engine - Request/response façade over the graph computations
//!
//! This crate is the single entry point callers talk to. A request names
//! an operation, carries a JSON payload and a caller-chosen correlation id;
//! the response echoes that id so replies can be matched even when they
//! arrive out of order.
//!
//! The engine supports:
//! - A stateless dispatcher ([`dispatch`], [`process_message`])
//! - A background worker fed through channels ([`EngineWorker`])
//! - A client that correlates replies for concurrent callers ([`EngineClient`])
//!
//! No request ever shares mutable data with another: payloads are
//! deserialized into owned values per request.

mod client;
mod config;
mod dispatcher;
mod error;
mod handlers;
mod protocol;
mod worker;

pub use client::{ClientError, EngineClient};
pub use config::EngineConfig;
pub use dispatcher::{dispatch, process_message};
pub use error::EngineError;
pub use protocol::{
    CentralityResult, EngineRequest, EngineResponse, GraphPayload, LayoutPayload, LayoutResult,
    OperationType, ResultType,
};
pub use worker::{EngineWorker, WorkerChannels};
