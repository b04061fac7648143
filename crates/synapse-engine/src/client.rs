//! Correlating client for the engine worker.
//!
//! Many tasks can share one client. Each call registers a oneshot slot
//! under its correlation id before the request is sent, and a router task
//! delivers every response to the slot with the matching id.

use crate::config::EngineConfig;
use crate::protocol::{
    CentralityResult, EngineRequest, EngineResponse, GraphPayload, LayoutPayload, LayoutResult,
    OperationType,
};
use crate::worker::EngineWorker;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use synapse_core::{Edge, Node};
use synapse_graph::{Communities, LayoutSettings, NetworkAnalysis};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

type Slots = HashMap<String, oneshot::Sender<EngineResponse>>;
type Pending = Arc<Mutex<Slots>>;

fn lock(pending: &Pending) -> MutexGuard<'_, Slots> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes a registered slot unless a response was received for it.
///
/// Dropping a `send` future mid-flight, for example under
/// `tokio::time::timeout`, frees its correlation id.
struct SlotGuard<'a> {
    pending: &'a Pending,
    id: &'a str,
    armed: bool,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock(self.pending).remove(self.id);
        }
    }
}

/// Errors seen by client callers.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Correlation id already in flight: {0}")]
    DuplicateCorrelationId(String),

    #[error("Engine worker is no longer running")]
    WorkerClosed,

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client handle to a background engine worker.
pub struct EngineClient {
    requests: mpsc::Sender<EngineRequest>,
    pending: Pending,
    router: JoinHandle<()>,
}

impl EngineClient {
    /// Spawns a worker and a router for it on the current runtime.
    pub fn spawn(config: &EngineConfig) -> Self {
        let channels = EngineWorker::spawn(config);
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let router = tokio::spawn(route_responses(channels.responses, pending.clone()));

        Self {
            requests: channels.requests,
            pending,
            router,
        }
    }

    /// Sends a request and waits for the response with the same id.
    pub async fn send(&self, request: EngineRequest) -> Result<EngineResponse, ClientError> {
        let id = request.correlation_id.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        {
            let mut pending = lock(&self.pending);
            if pending.contains_key(&id) {
                return Err(ClientError::DuplicateCorrelationId(id));
            }
            pending.insert(id.clone(), reply_tx);
        }
        let mut slot = SlotGuard {
            pending: &self.pending,
            id: &id,
            armed: true,
        };

        if self.requests.send(request).await.is_err() {
            return Err(ClientError::WorkerClosed);
        }

        let reply = reply_rx.await;
        // The router already removed the slot; the id may belong to a new caller.
        slot.armed = false;
        reply.map_err(|_| ClientError::WorkerClosed)
    }

    /// Sends an operation with a fresh correlation id.
    pub async fn call(
        &self,
        operation: OperationType,
        payload: impl Serialize,
    ) -> Result<EngineResponse, ClientError> {
        let payload = serde_json::to_value(payload)?;
        let request = EngineRequest::new(operation, payload, Uuid::new_v4().to_string());
        self.send(request).await
    }

    /// Lays out a graph.
    pub async fn calculate_layout(
        &self,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        settings: LayoutSettings,
    ) -> Result<Vec<Node>, ClientError> {
        let payload = LayoutPayload {
            nodes,
            edges,
            settings,
        };
        let result: LayoutResult = self.typed(OperationType::CalculateLayout, payload).await?;
        Ok(result.nodes)
    }

    /// Computes network metrics.
    pub async fn analyze_network(
        &self,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Result<NetworkAnalysis, ClientError> {
        self.typed(OperationType::AnalyzeNetwork, GraphPayload { nodes, edges })
            .await
    }

    /// Detects communities.
    pub async fn find_communities(
        &self,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Result<Communities, ClientError> {
        self.typed(OperationType::FindCommunities, GraphPayload { nodes, edges })
            .await
    }

    /// Recomputes node centrality.
    pub async fn calculate_centrality(
        &self,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Result<CentralityResult, ClientError> {
        self.typed(OperationType::CalculateCentrality, GraphPayload { nodes, edges })
            .await
    }

    async fn typed<T: DeserializeOwned>(
        &self,
        operation: OperationType,
        payload: impl Serialize,
    ) -> Result<T, ClientError> {
        let response = self.call(operation, payload).await?;
        if let Some(message) = response.error_message() {
            return Err(ClientError::Engine(message.to_string()));
        }
        Ok(serde_json::from_value(response.payload)?)
    }

    /// Stops accepting requests and waits for outstanding responses to drain.
    pub async fn shutdown(self) {
        let Self {
            requests, router, ..
        } = self;
        drop(requests);
        if let Err(e) = router.await {
            warn!("Response router ended abnormally: {}", e);
        }
    }
}

async fn route_responses(mut responses: mpsc::Receiver<EngineResponse>, pending: Pending) {
    while let Some(response) = responses.recv().await {
        let Some(id) = response.correlation_id.clone() else {
            warn!("Dropping response without correlation id");
            continue;
        };

        let slot = lock(&pending).remove(&id);
        match slot {
            Some(slot) => {
                if slot.send(response).is_err() {
                    debug!("Caller for {} stopped waiting", id);
                }
            }
            None => warn!("No caller waiting for response {}", id),
        }
    }
}
