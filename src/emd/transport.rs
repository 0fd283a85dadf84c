// File: transport.rs
// Created: 2026-10-16
// Description: Exact earth mover's distance between two discrete distributions
//
// The transport problem is solved as a min-cost flow on the bipartite graph
//   source -> supply parcels -> demand parcels -> sink
// with successive shortest augmenting paths. Dijkstra runs on reduced costs
// (Johnson potentials), which stay non-negative because every ground distance
// is non-negative.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{MetricError, Result};

/// Masses below this are treated as empty
pub const MASS_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone)]
struct Edge {
    to: usize,
    cap: f64,
    cost: f64,
}

#[derive(Debug, Clone, Copy)]
struct State {
    dist: f64,
    node: usize,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.dist.total_cmp(&other.dist) == Ordering::Equal
    }
}

impl Eq for State {}

impl Ord for State {
    // Reversed for a min-heap
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.total_cmp(&self.dist).then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct FlowGraph {
    edges: Vec<Edge>,
    adjacency: Vec<Vec<usize>>,
}

impl FlowGraph {
    fn new(n_nodes: usize) -> Self {
        Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); n_nodes],
        }
    }

    // Forward edge at an even index, its residual twin at index ^ 1
    fn add_edge(&mut self, from: usize, to: usize, cap: f64, cost: f64) {
        self.adjacency[from].push(self.edges.len());
        self.edges.push(Edge { to, cap, cost });
        self.adjacency[to].push(self.edges.len());
        self.edges.push(Edge { to: from, cap: 0.0, cost: -cost });
    }

    /// Shortest distances on reduced costs and the edge used to reach each node
    fn dijkstra(&self, source: usize, potential: &[f64]) -> (Vec<f64>, Vec<Option<usize>>) {
        let n = self.adjacency.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev_edge: Vec<Option<usize>> = vec![None; n];
        let mut heap = BinaryHeap::new();
        dist[source] = 0.0;
        heap.push(State { dist: 0.0, node: source });

        while let Some(State { dist: d, node }) = heap.pop() {
            if d > dist[node] {
                continue;
            }
            for &e in &self.adjacency[node] {
                let edge = &self.edges[e];
                if edge.cap <= MASS_EPSILON {
                    continue;
                }
                // Rounding can push a reduced cost slightly below zero
                let reduced = (edge.cost + potential[node] - potential[edge.to]).max(0.0);
                let next = d + reduced;
                if next < dist[edge.to] {
                    dist[edge.to] = next;
                    prev_edge[edge.to] = Some(e);
                    heap.push(State { dist: next, node: edge.to });
                }
            }
        }
        (dist, prev_edge)
    }
}

/// Earth mover's distance between `supply` and `demand`.
///
/// Both are non-negative weight vectors over the same parcels carrying the
/// same total mass; `cost(i, j)` is the ground distance from parcel `i` to
/// parcel `j`. Returns the minimal total cost of moving `supply` onto
/// `demand`.
pub fn emd<F>(supply: &[f64], demand: &[f64], cost: F) -> Result<f64>
where
    F: Fn(usize, usize) -> f64,
{
    let sources: Vec<usize> = (0..supply.len()).filter(|&i| supply[i] > MASS_EPSILON).collect();
    let sinks: Vec<usize> = (0..demand.len()).filter(|&j| demand[j] > MASS_EPSILON).collect();
    if sources.is_empty() || sinks.is_empty() {
        return Ok(0.0);
    }

    // A single point on either side leaves nothing to optimise
    if sources.len() == 1 {
        let i = sources[0];
        return Ok(sinks.iter().map(|&j| demand[j] * cost(i, j)).sum());
    }
    if sinks.len() == 1 {
        let j = sinks[0];
        return Ok(sources.iter().map(|&i| supply[i] * cost(i, j)).sum());
    }

    let n = sources.len();
    let m = sinks.len();
    let source = 0;
    let sink = n + m + 1;
    let mut graph = FlowGraph::new(n + m + 2);
    for (a, &i) in sources.iter().enumerate() {
        graph.add_edge(source, 1 + a, supply[i], 0.0);
    }
    for (b, &j) in sinks.iter().enumerate() {
        graph.add_edge(1 + n + b, sink, demand[j], 0.0);
    }
    for (a, &i) in sources.iter().enumerate() {
        for (b, &j) in sinks.iter().enumerate() {
            graph.add_edge(1 + a, 1 + n + b, f64::INFINITY, cost(i, j));
        }
    }

    let mut remaining: f64 = sources.iter().map(|&i| supply[i]).sum::<f64>()
        .min(sinks.iter().map(|&j| demand[j]).sum::<f64>());
    let mut potential = vec![0.0; n + m + 2];
    let mut total_cost = 0.0;
    let max_augmentations = 4 * (n + m + 2) * (n + m + 2);
    let mut augmentations = 0usize;

    while remaining > MASS_EPSILON {
        if augmentations >= max_augmentations {
            return Err(MetricError::TransportDidNotConverge(augmentations));
        }
        augmentations += 1;

        let (dist, prev_edge) = graph.dijkstra(source, &potential);
        if !dist[sink].is_finite() {
            break;
        }
        for (p, d) in potential.iter_mut().zip(dist.iter()) {
            if d.is_finite() {
                *p += d;
            }
        }

        let mut bottleneck = remaining;
        let mut node = sink;
        while let Some(e) = prev_edge[node] {
            bottleneck = bottleneck.min(graph.edges[e].cap);
            node = graph.edges[e ^ 1].to;
        }

        let mut node = sink;
        while let Some(e) = prev_edge[node] {
            graph.edges[e].cap -= bottleneck;
            graph.edges[e ^ 1].cap += bottleneck;
            total_cost += bottleneck * graph.edges[e].cost;
            node = graph.edges[e ^ 1].to;
        }
        remaining -= bottleneck;
    }
    Ok(total_cost)
}
