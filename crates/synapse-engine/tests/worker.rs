use serde_json::json;
use std::collections::HashMap;
use synapse_core::{Document, Edge, Node, NodeKind};
use synapse_engine::{
    ClientError, EngineClient, EngineConfig, EngineRequest, EngineWorker, OperationType,
    ResultType,
};
use synapse_graph::{GraphBuilder, LayoutSettings};

fn sample_graph() -> (Vec<Node>, Vec<Edge>) {
    let mut builder = GraphBuilder::new();
    builder.add_documents(vec![
        Document::new("a", "Alpha", NodeKind::Document)
            .with_tags(["math"])
            .with_content("[[Beta]] [[Gamma]]"),
        Document::new("b", "Beta", NodeKind::Document)
            .with_tags(["math"])
            .with_content("[[Gamma]]"),
        Document::new("c", "Gamma", NodeKind::Document).with_tags(["cs"]),
        Document::new("d", "Delta", NodeKind::Document),
    ]);
    let graph = builder.build();

    let nodes = graph
        .nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| node.with_position(i as f64 * 37.0, (i % 2) as f64 * 53.0))
        .collect();
    (nodes, graph.edges)
}

#[tokio::test]
async fn test_worker_answers_every_request_with_its_id() {
    let mut worker = EngineWorker::spawn(&EngineConfig::default());
    let (nodes, edges) = sample_graph();
    let graph = json!({ "nodes": nodes, "edges": edges });

    let requests = vec![
        EngineRequest::new(OperationType::AnalyzeNetwork, graph.clone(), "analyze"),
        EngineRequest::new(OperationType::FindCommunities, graph.clone(), "communities"),
        EngineRequest::new(OperationType::CalculateCentrality, graph.clone(), "centrality"),
        EngineRequest {
            operation_type: "SHUFFLE".to_string(),
            payload: json!({}),
            correlation_id: "unknown".to_string(),
        },
    ];
    for request in requests {
        worker.requests.send(request).await.unwrap();
    }
    drop(worker.requests);

    let mut by_id = HashMap::new();
    while let Some(response) = worker.responses.recv().await {
        by_id.insert(response.correlation_id.clone().unwrap(), response);
    }

    assert_eq!(by_id.len(), 4);
    assert_eq!(by_id["analyze"].result_type, ResultType::NetworkAnalysisResult);
    assert_eq!(by_id["communities"].result_type, ResultType::CommunitiesResult);
    assert_eq!(by_id["centrality"].result_type, ResultType::CentralityResult);
    assert_eq!(by_id["unknown"].result_type, ResultType::Error);
    assert_eq!(by_id["unknown"].payload["kind"], "UnknownOperation");

    worker.task.await.unwrap();
}

#[tokio::test]
async fn test_client_concurrent_calls() {
    let client = EngineClient::spawn(&EngineConfig::default());
    let (nodes, edges) = sample_graph();

    let (layout, metrics, communities) = tokio::join!(
        client.calculate_layout(nodes.clone(), edges.clone(), LayoutSettings::new(400.0, 300.0)),
        client.analyze_network(nodes.clone(), edges.clone()),
        client.find_communities(nodes.clone(), edges.clone()),
    );

    let layout = layout.unwrap();
    assert_eq!(layout.len(), 4);
    assert!(layout.iter().all(|n| n.position.is_some()));

    let metrics = metrics.unwrap();
    assert_eq!(metrics.node_count, 4);
    assert_eq!(metrics.edge_count, 3);
    assert_eq!(metrics.density, 0.5);
    assert_eq!(metrics.avg_clustering_coefficient, 1.0);

    let communities = communities.unwrap();
    assert_eq!(communities.groups.len(), 2);
    assert_eq!(communities.community_of("d"), Some(3));

    client.shutdown().await;
}

#[tokio::test]
async fn test_layout_through_client_is_deterministic() {
    let client = EngineClient::spawn(&EngineConfig::default());
    let (nodes, edges) = sample_graph();
    let settings = LayoutSettings::new(200.0, 200.0).with_iterations(50);

    let first = client
        .calculate_layout(nodes.clone(), edges.clone(), settings)
        .await
        .unwrap();
    let second = client.calculate_layout(nodes, edges, settings).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_client_surfaces_engine_errors() {
    let client = EngineClient::spawn(&EngineConfig::default());
    let (nodes, edges) = sample_graph();

    let result = client
        .calculate_layout(nodes, edges, LayoutSettings::new(100.0, 100.0).with_damping(0.0))
        .await;

    match result {
        Err(ClientError::Engine(message)) => assert!(message.contains("damping")),
        other => panic!("expected engine error, got {:?}", other.map(|n| n.len())),
    }
}

#[tokio::test]
async fn test_duplicate_correlation_id_rejected() {
    let client = EngineClient::spawn(&EngineConfig::default());
    let request = EngineRequest::new(
        OperationType::AnalyzeNetwork,
        json!({ "nodes": [], "edges": [] }),
        "same",
    );

    let (first, second) = tokio::join!(client.send(request.clone()), client.send(request));

    assert_eq!(first.unwrap().correlation_id.as_deref(), Some("same"));
    assert!(matches!(second, Err(ClientError::DuplicateCorrelationId(id)) if id == "same"));
}

#[tokio::test]
async fn test_cancelled_call_frees_correlation_id() {
    let client = EngineClient::spawn(&EngineConfig::default());
    let request = EngineRequest::new(
        OperationType::AnalyzeNetwork,
        json!({ "nodes": [], "edges": [] }),
        "retry",
    );

    {
        let call = client.send(request.clone());
        tokio::pin!(call);
        // Poll the call once, then drop it while it waits for its reply.
        tokio::select! {
            biased;
            _ = &mut call => {}
            _ = std::future::ready(()) => {}
        }
    }

    let response = client.send(request).await.unwrap();
    assert_eq!(response.correlation_id.as_deref(), Some("retry"));
    assert!(!response.is_error());
}
