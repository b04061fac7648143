//! Force-directed layout.
//!
//! A Fruchterman–Reingold style simulation. Every node repels every other
//! node with `k² / d` and every edge pulls its endpoints together with
//! `d² / k · 0.5`, where `k = sqrt(width · height / n)` is the ideal edge
//! length. Forces accumulate into a per-node vector that is decayed by
//! [`FORCE_DECAY`] after each step instead of being reset, and each step's
//! displacement is capped by a temperature that cools linearly from `k`
//! toward zero. Two connected nodes settle at `∛2 · k`.
//!
//! The solver has no randomness. Nodes without a position start at the
//! origin; callers that want a spread-out result must seed positions.

use crate::error::GraphError;
use crate::graph::GraphView;
use serde::{Deserialize, Serialize};
use synapse_core::{Edge, Node, Position};
use tracing::debug;

/// Iterations run when the caller does not say otherwise.
pub const DEFAULT_ITERATIONS: usize = 100;

/// Damping applied to the accumulated force when it is integrated.
pub const DEFAULT_DAMPING: f64 = 0.9;

/// Share of the force vector carried into the next iteration.
pub const FORCE_DECAY: f64 = 0.8;

/// Distances below this are treated as this.
const MIN_DISTANCE: f64 = 1.0;

/// Largest accepted `width * height`. Accumulated forces grow to a small
/// multiple of the area and must stay finite.
pub const MAX_CANVAS_AREA: f64 = 1e300;

/// Canvas size and simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_damping")]
    pub damping: f64,
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_damping() -> f64 {
    DEFAULT_DAMPING
}

impl LayoutSettings {
    /// Settings for a canvas with default iterations and damping.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            iterations: DEFAULT_ITERATIONS,
            damping: DEFAULT_DAMPING,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Checks the canvas is non-empty with a finite area and damping lies in
    /// (0, 1].
    pub fn validate(&self) -> Result<(), GraphError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(GraphError::InvalidSettings(format!(
                "width must be a positive number, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(GraphError::InvalidSettings(format!(
                "height must be a positive number, got {}",
                self.height
            )));
        }
        if self.width * self.height > MAX_CANVAS_AREA {
            return Err(GraphError::InvalidSettings(format!(
                "canvas area must not exceed {:e}, got {} x {}",
                MAX_CANVAS_AREA, self.width, self.height
            )));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(GraphError::InvalidSettings(format!(
                "damping must be in (0, 1], got {}",
                self.damping
            )));
        }
        Ok(())
    }
}

/// Per-node simulation state.
#[derive(Debug, Clone, Copy, Default)]
struct Body {
    position: Position,
    fx: f64,
    fy: f64,
}

/// The layout solver.
#[derive(Debug, Clone)]
pub struct ForceLayout {
    settings: LayoutSettings,
}

impl ForceLayout {
    /// Creates a solver after validating its settings.
    pub fn new(settings: LayoutSettings) -> Result<Self, GraphError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Ideal edge length for a graph with `node_count` nodes.
    pub fn ideal_length(&self, node_count: usize) -> f64 {
        (self.settings.width * self.settings.height / node_count.max(1) as f64).sqrt()
    }

    /// Runs the simulation and returns copies of `nodes` with positions set.
    ///
    /// The inputs are not touched; all simulation state lives in a private
    /// arena for the duration of the call.
    pub fn run(&self, nodes: &[Node], edges: &[Edge]) -> Vec<Node> {
        if nodes.is_empty() {
            return Vec::new();
        }

        let view = GraphView::new(nodes, edges);
        let springs: Vec<(usize, usize)> = view.endpoints().collect();
        let mut bodies: Vec<Body> = nodes
            .iter()
            .map(|node| Body {
                position: node.position.unwrap_or_default(),
                ..Body::default()
            })
            .collect();

        let k = self.ideal_length(nodes.len());
        let iterations = self.settings.iterations;
        debug!(
            "Running layout: {} nodes, {} edges, {} iterations, k = {:.3}",
            nodes.len(),
            springs.len(),
            iterations,
            k
        );

        for step in 0..iterations {
            let temperature = k * (1.0 - step as f64 / iterations as f64);
            self.step(&mut bodies, &springs, k, temperature);
        }

        nodes
            .iter()
            .zip(&bodies)
            .map(|(node, body)| {
                let mut placed = node.clone();
                placed.position = Some(body.position);
                placed
            })
            .collect()
    }

    fn step(&self, bodies: &mut [Body], springs: &[(usize, usize)], k: f64, temperature: f64) {
        let n = bodies.len();

        // Repulsion between every ordered pair
        for i in 0..n {
            let (mut fx, mut fy) = (0.0, 0.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = bodies[i].position.x - bodies[j].position.x;
                let dy = bodies[i].position.y - bodies[j].position.y;
                let distance = dx.hypot(dy).max(MIN_DISTANCE);
                let force = k * k / distance;
                fx += dx / distance * force;
                fy += dy / distance * force;
            }
            bodies[i].fx += fx;
            bodies[i].fy += fy;
        }

        // Attraction along edges
        for &(source, target) in springs {
            let dx = bodies[target].position.x - bodies[source].position.x;
            let dy = bodies[target].position.y - bodies[source].position.y;
            let distance = dx.hypot(dy).max(MIN_DISTANCE);
            let force = distance * distance / k * 0.5;
            let (fx, fy) = (dx / distance * force, dy / distance * force);

            bodies[source].fx += fx;
            bodies[source].fy += fy;
            bodies[target].fx -= fx;
            bodies[target].fy -= fy;
        }

        // Integration
        let damping = self.settings.damping;
        for body in bodies.iter_mut() {
            let mut sx = body.fx * damping;
            let mut sy = body.fy * damping;
            let length = sx.hypot(sy);
            if length > temperature && length > 0.0 {
                let scale = temperature / length;
                sx *= scale;
                sy *= scale;
            }
            body.position.x += sx;
            body.position.y += sy;
            body.fx *= FORCE_DECAY;
            body.fy *= FORCE_DECAY;
        }
    }
}
