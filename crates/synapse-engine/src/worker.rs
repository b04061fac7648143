//! Background engine worker.
//!
//! The worker owns nothing but two channels. Requests come in through a
//! bounded mailbox, each one runs on the blocking pool, and its response
//! goes out as soon as it is ready. Responses can therefore overtake each
//! other; callers match them by correlation id.

use crate::config::EngineConfig;
use crate::dispatcher::dispatch;
use crate::error::EngineError;
use crate::protocol::{EngineRequest, EngineResponse};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Both ends of a running worker, as seen by its caller.
pub struct WorkerChannels {
    /// Send requests here. Dropping every sender stops the worker.
    pub requests: mpsc::Sender<EngineRequest>,
    /// Responses, in completion order.
    pub responses: mpsc::Receiver<EngineResponse>,
    /// The worker's main loop.
    pub task: JoinHandle<()>,
}

/// Spawns engine workers.
pub struct EngineWorker;

impl EngineWorker {
    /// Starts a worker on the current tokio runtime.
    pub fn spawn(config: &EngineConfig) -> WorkerChannels {
        let capacity = config.channel_capacity.max(1);
        let (request_tx, request_rx) = mpsc::channel(capacity);
        let (response_tx, response_rx) = mpsc::channel(capacity);
        let permits = Arc::new(Semaphore::new(config.max_in_flight.max(1)));

        let task = tokio::spawn(run_worker(request_rx, response_tx, permits));

        WorkerChannels {
            requests: request_tx,
            responses: response_rx,
            task,
        }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<EngineRequest>,
    tx: mpsc::Sender<EngineResponse>,
    permits: Arc<Semaphore>,
) {
    info!("Engine worker started");

    while let Some(request) = rx.recv().await {
        let permit = match permits.clone().acquire_owned().await {
            Ok(p) => p,
            Err(_) => break,
        };
        let tx = tx.clone();

        tokio::spawn(async move {
            let id = request.correlation_id.clone();
            debug!("Worker picked up request {}", id);

            let response = match tokio::task::spawn_blocking(move || dispatch(request)).await {
                Ok(response) => response,
                Err(e) => {
                    error!("Request {} aborted: {}", id, e);
                    EngineResponse::error(Some(id), EngineError::Internal(e.to_string()))
                }
            };
            drop(permit);

            if tx.send(response).await.is_err() {
                debug!("Response receiver dropped");
            }
        });
    }

    info!("Engine worker stopped");
}
