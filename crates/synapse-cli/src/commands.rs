//! CLI command implementations.

use colored::Colorize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use synapse_core::{Document, Node, Position};
use synapse_engine::{
    process_message, EngineClient, EngineConfig, EngineRequest, EngineResponse, EngineWorker,
};
use synapse_graph::{GraphBuilder, KnowledgeGraph, LayoutSettings};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Loads the engine config, falling back to defaults without a file.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let config = EngineConfig::from_json(&text)?;
            debug!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Build a graph from a documents file.
pub fn build(input: &Path, output: Option<&Path>) -> Result<()> {
    let documents: Vec<Document> = serde_json::from_str(&fs::read_to_string(input)?)?;
    let graph = build_graph(documents);

    eprintln!(
        "{} Built graph with {} nodes and {} edges",
        "✓".green(),
        graph.node_count().to_string().cyan(),
        graph.edge_count().to_string().cyan()
    );
    eprintln!("  {}", kind_summary(&graph).dimmed());

    write_json(&serde_json::to_value(&graph)?, output)
}

/// Counts nodes and edges per kind, e.g. `nodes: 3 document, 1 container`.
fn kind_summary(graph: &KnowledgeGraph) -> String {
    fn tally(kinds: impl Iterator<Item = String>) -> String {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for kind in kinds {
            *counts.entry(kind).or_default() += 1;
        }
        counts
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect::<Vec<_>>()
            .join(", ")
    }

    format!(
        "nodes: {}; edges: {}",
        tally(graph.nodes.iter().map(|n| n.kind.to_string())),
        tally(graph.edges.iter().map(|e| e.kind.to_string()))
    )
}

/// Lay out a graph and write it back with positions.
pub async fn layout(
    config: &EngineConfig,
    input: &Path,
    settings: LayoutSettings,
    output: Option<&Path>,
) -> Result<()> {
    let mut graph = load_graph(input)?;
    seed_positions(&mut graph.nodes, settings.width, settings.height);

    let client = EngineClient::spawn(config);
    let nodes = client
        .calculate_layout(graph.nodes, graph.edges.clone(), settings)
        .await?;
    client.shutdown().await;

    let placed = KnowledgeGraph {
        nodes,
        edges: graph.edges,
    };
    eprintln!(
        "{} Laid out {} nodes in {} iterations",
        "✓".green(),
        placed.node_count(),
        settings.iterations
    );

    write_json(&serde_json::to_value(&placed)?, output)
}

/// Print network metrics.
pub async fn analyze(config: &EngineConfig, input: &Path, json: bool) -> Result<()> {
    let graph = load_graph(input)?;

    let client = EngineClient::spawn(config);
    let metrics = client.analyze_network(graph.nodes, graph.edges).await?;
    client.shutdown().await;

    if json {
        return write_json(&serde_json::to_value(&metrics)?, None);
    }

    println!("{}", "Network Analysis".cyan().bold());
    println!();
    println!("  {} {}", "Nodes:".dimmed(), metrics.node_count);
    println!("  {} {}", "Edges:".dimmed(), metrics.edge_count);
    println!("  {} {:.3}", "Density:".dimmed(), metrics.density);
    println!("  {} {:.2}", "Avg degree:".dimmed(), metrics.avg_degree);
    println!(
        "  {} {:.3}",
        "Avg clustering:".dimmed(),
        metrics.avg_clustering_coefficient
    );

    let mut busiest: Vec<_> = metrics.degree_by_node_id.iter().collect();
    busiest.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    if let Some((id, degree)) = busiest.first() {
        println!("  {} {} ({})", "Most connected:".dimmed(), id.cyan(), degree);
    }

    Ok(())
}

/// Print detected communities.
pub async fn communities(config: &EngineConfig, input: &Path, json: bool) -> Result<()> {
    let graph = load_graph(input)?;

    let client = EngineClient::spawn(config);
    let result = client.find_communities(graph.nodes, graph.edges).await?;
    client.shutdown().await;

    if json {
        return write_json(&serde_json::to_value(&result)?, None);
    }

    println!(
        "Found {} communities:\n",
        result.groups.len().to_string().cyan()
    );
    for group in &result.groups {
        println!(
            "  {} {}",
            format!("#{}", group.id).yellow(),
            format!("({} nodes)", group.size).dimmed()
        );
        println!("    {}", group.node_ids.join(", "));
    }

    Ok(())
}

/// Print the most central nodes.
pub async fn centrality(
    config: &EngineConfig,
    input: &Path,
    limit: usize,
    json: bool,
) -> Result<()> {
    let graph = load_graph(input)?;

    let client = EngineClient::spawn(config);
    let result = client.calculate_centrality(graph.nodes, graph.edges).await?;
    client.shutdown().await;

    if json {
        return write_json(&serde_json::to_value(&result)?, None);
    }

    let mut ranked: Vec<&Node> = result.nodes.iter().collect();
    ranked.sort_by(|a, b| {
        b.centrality
            .partial_cmp(&a.centrality)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for node in ranked.into_iter().take(limit) {
        println!(
            "  {:>6.3} {} {}",
            node.centrality,
            node.name.cyan(),
            format!("[{}]", node.cluster).dimmed()
        );
    }

    Ok(())
}

/// Run the engine as a stdio worker.
///
/// Each stdin line is one request; each stdout line is one response.
/// Responses are written as they complete, not in request order.
pub async fn worker(config: &EngineConfig) -> Result<()> {
    info!("Worker ready on stdio");
    serve(config, tokio::io::stdin(), tokio::io::stdout()).await?;
    info!("Worker input closed");
    Ok(())
}

/// Answers line-delimited requests from `input` on `output` until input
/// ends, then returns `output`.
///
/// A single writer task owns `output`. Engine responses and replies to
/// malformed envelopes both reach it over channels, so lines never
/// interleave.
async fn serve<R, W>(config: &EngineConfig, input: R, output: W) -> Result<W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let channels = EngineWorker::spawn(config);
    let requests = channels.requests;
    let mut responses = channels.responses;
    let (replies, mut rejected) = mpsc::channel::<EngineResponse>(config.channel_capacity.max(1));

    let writer = tokio::spawn(async move {
        let mut output = output;
        let (mut engine_open, mut replies_open) = (true, true);
        while engine_open || replies_open {
            tokio::select! {
                response = responses.recv(), if engine_open => match response {
                    Some(response) => write_line(&mut output, &response).await?,
                    None => engine_open = false,
                },
                reply = rejected.recv(), if replies_open => match reply {
                    Some(reply) => write_line(&mut output, &reply).await?,
                    None => replies_open = false,
                },
            }
        }
        Ok::<W, std::io::Error>(output)
    });

    let mut lines = BufReader::new(input).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let sent = match serde_json::from_str::<EngineRequest>(&line) {
            Ok(request) => requests.send(request).await.is_ok(),
            // The id is recovered from the raw line when possible.
            Err(_) => replies.send(process_message(&line)).await.is_ok(),
        };
        if !sent {
            break;
        }
    }

    drop(requests);
    drop(replies);
    Ok(writer.await??)
}

async fn write_line<W>(output: &mut W, response: &EngineResponse) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    output.write_all(&line).await?;
    output.flush().await
}

/// Reads either a built graph (`{nodes, edges}`) or a documents array.
pub fn load_graph(path: &Path) -> Result<KnowledgeGraph> {
    let value: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    if value.is_array() {
        let documents: Vec<Document> = serde_json::from_value(value)?;
        return Ok(build_graph(documents));
    }
    Ok(serde_json::from_value(value)?)
}

fn build_graph(documents: Vec<Document>) -> KnowledgeGraph {
    let mut builder = GraphBuilder::new();
    builder.add_documents(documents);
    builder.build()
}

/// Places nodes without a position evenly on a circle around the canvas center.
///
/// The solver never moves nodes that share a point, so everything needs a
/// distinct start.
pub fn seed_positions(nodes: &mut [Node], width: f64, height: f64) {
    let count = nodes.len().max(1) as f64;
    let radius = width.min(height) / 3.0;
    let (cx, cy) = (width / 2.0, height / 2.0);

    for (i, node) in nodes.iter_mut().enumerate() {
        if node.position.is_none() {
            let angle = std::f64::consts::TAU * i as f64 / count;
            node.position = Some(Position::new(
                cx + radius * angle.cos(),
                cy + radius * angle.sin(),
            ));
        }
    }
}

fn write_json(value: &Value, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, text)?;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DOCUMENTS: &str = r#"[
        {"id": "1", "name": "Sets", "tags": ["math"], "content": "see [[Logic]]"},
        {"id": "2", "name": "Logic", "tags": ["math", "cs"], "content": "back to [[Sets]]"},
        {"id": "3", "name": "Folder", "kind": "container"},
        {"id": "4", "name": "Loose", "content": "[[Missing]]", "parentId": "3"}
    ]"#;

    #[test]
    fn test_build_writes_graph() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("docs.json");
        let output = dir.path().join("graph.json");
        fs::write(&input, DOCUMENTS).unwrap();

        build(&input, Some(&output)).unwrap();

        let graph: KnowledgeGraph =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.edge_between("1", "2").unwrap().bidirectional);
        assert_eq!(
            kind_summary(&graph),
            "nodes: 1 container, 3 document; edges: 1 containment, 1 reference"
        );
    }

    #[test]
    fn test_load_graph_accepts_both_formats() {
        let dir = tempdir().unwrap();
        let docs_path = dir.path().join("docs.json");
        fs::write(&docs_path, DOCUMENTS).unwrap();

        let from_docs = load_graph(&docs_path).unwrap();

        let graph_path = dir.path().join("graph.json");
        fs::write(&graph_path, serde_json::to_string(&from_docs).unwrap()).unwrap();
        let from_graph = load_graph(&graph_path).unwrap();

        assert_eq!(from_docs, from_graph);
    }

    #[test]
    fn test_load_config_defaults_and_file() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"channel_capacity": 16}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.channel_capacity, 16);
        assert!(load_config(Some(&dir.path().join("absent.json"))).is_err());
    }

    #[test]
    fn test_seed_positions_keeps_existing() {
        let mut nodes = vec![
            Node::new("a", "a", Default::default(), vec![]).with_position(1.0, 1.0),
            Node::new("b", "b", Default::default(), vec![]),
            Node::new("c", "c", Default::default(), vec![]),
        ];

        seed_positions(&mut nodes, 300.0, 300.0);

        assert_eq!(nodes[0].position, Some(Position::new(1.0, 1.0)));
        let b = nodes[1].position.unwrap();
        let c = nodes[2].position.unwrap();
        assert!((b.distance(&Position::new(150.0, 150.0)) - 100.0).abs() < 1e-9);
        assert!(b.distance(&c) > 1.0);
    }

    #[tokio::test]
    async fn test_worker_writes_one_reply_per_line() {
        let mut input = String::new();
        for i in 0..20 {
            input.push_str(&format!(
                r#"{{"operationType":"ANALYZE_NETWORK","payload":{{"nodes":[{{"id":"a"}},{{"id":"b"}}],"edges":[{{"source":"a","target":"b"}}]}},"correlationId":"ok-{}"}}"#,
                i
            ));
            input.push('\n');
            input.push_str(&format!("{{\"correlationId\": \"bad-{}\", \"payload\": \n", i));
        }
        input.push_str("\n{not json\n");
        input.push_str(r#"{"operationType":"SHUFFLE","payload":{},"correlationId":"odd"}"#);
        input.push('\n');

        let output = serve(&EngineConfig::default(), input.as_bytes(), Vec::new())
            .await
            .unwrap();
        let text = String::from_utf8(output).unwrap();

        let mut ok = 0;
        let mut rejected = 0;
        let mut ids = Vec::new();
        for line in text.lines() {
            let response: Value = serde_json::from_str(line).unwrap();
            if response["resultType"] == "ERROR" {
                rejected += 1;
            } else {
                assert_eq!(response["payload"]["density"], 1.0);
                ok += 1;
            }
            ids.push(response["correlationId"].as_str().map(String::from));
        }

        assert_eq!(ok, 20);
        assert_eq!(rejected, 22);
        assert!(ids.contains(&Some("ok-7".to_string())));
        assert!(ids.contains(&Some("odd".to_string())));
        assert!(ids.contains(&None));
        assert!(text.ends_with('\n'));
    }
}
