//! Dijkstra and Yen k-shortest paths.
//!
//! # Cost units
//!
//! Every cost is free-flow travel time in **seconds** (`f64`), the sum of
//! `length / speed` over the traversed edges.  Internal edges are invisible
//! to every search in this module.
//!
//! # Edge-anchored queries
//!
//! Candidate routes run from a source detector's edge to a sink detector's
//! edge.  [`YenRouter::between_edges`] therefore pins the first and last
//! edge and searches the node graph in between; both pinned edges count
//! toward the total.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use odr_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered list of `EdgeId`s and its total free-flow travel time.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub edges: Vec<EdgeId>,
    pub total_travel_secs: f64,
}

impl Route {
    /// Build a route over `edges`, summing their travel times.
    pub fn from_edges(network: &RoadNetwork, edges: Vec<EdgeId>) -> Self {
        let total_travel_secs = edges.iter().map(|&e| network.travel_secs(e)).sum();
        Route { edges, total_travel_secs }
    }

    /// Sum of edge lengths in metres.
    pub fn distance_m(&self, network: &RoadNetwork) -> f64 {
        self.edges.iter().map(|e| network.edge_length_m[e.index()]).sum()
    }
}

// ── YenRouter ─────────────────────────────────────────────────────────────────

/// Yen's k-shortest loopless paths.
///
/// Results are ordered by ascending total travel time.  Equal-cost paths
/// keep the order in which they were discovered.
#[derive(Debug, Clone, Copy)]
pub struct YenRouter {
    pub k: usize,
}

impl YenRouter {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Up to `k` node-to-node paths.  Empty when `to` is unreachable.
    pub fn k_shortest(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Vec<Route> {
        if self.k == 0 {
            return Vec::new();
        }
        let Some(first) = dijkstra(network, from, to, &Bans::new(network.node_count())) else {
            return Vec::new();
        };

        let mut accepted: Vec<Route> = vec![first];
        let mut candidates: Vec<Route> = Vec::new();

        while accepted.len() < self.k {
            let prev = &accepted[accepted.len() - 1];
            let prev_nodes = node_sequence(network, from, &prev.edges);

            for i in 0..prev.edges.len() {
                let spur_node = prev_nodes[i];
                let root = &prev.edges[..i];

                let mut bans = Bans::new(network.node_count());
                for path in &accepted {
                    if path.edges.len() > i && &path.edges[..i] == root {
                        bans.edges.insert(path.edges[i]);
                    }
                }
                for &n in &prev_nodes[..i] {
                    bans.nodes[n.index()] = true;
                }

                let Some(spur) = dijkstra(network, spur_node, to, &bans) else {
                    continue;
                };
                let mut edges = root.to_vec();
                edges.extend_from_slice(&spur.edges);

                let known = accepted.iter().chain(candidates.iter()).any(|p| p.edges == edges);
                if !known {
                    candidates.push(Route::from_edges(network, edges));
                }
            }

            // First minimum wins, so ties resolve in discovery order.
            let mut best: Option<usize> = None;
            for (i, c) in candidates.iter().enumerate() {
                match best {
                    Some(b) if c.total_travel_secs >= candidates[b].total_travel_secs => {}
                    _ => best = Some(i),
                }
            }
            match best {
                Some(b) => accepted.push(candidates.remove(b)),
                None => break,
            }
        }

        accepted
    }

    /// Up to `k` routes that start on `source` and end on `sink`.
    ///
    /// A route whose source and sink coincide is the single edge itself.
    pub fn between_edges(&self, network: &RoadNetwork, source: EdgeId, sink: EdgeId) -> Vec<Route> {
        if self.k == 0 {
            return Vec::new();
        }
        if source == sink {
            return vec![Route::from_edges(network, vec![source])];
        }
        let inner_from = network.edge_to[source.index()];
        let inner_to = network.edge_from[sink.index()];

        self.k_shortest(network, inner_from, inner_to)
            .into_iter()
            .map(|inner| {
                let mut edges = Vec::with_capacity(inner.edges.len() + 2);
                edges.push(source);
                edges.extend(inner.edges);
                edges.push(sink);
                Route::from_edges(network, edges)
            })
            .collect()
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Edges and nodes a search may not use.
struct Bans {
    edges: FxHashSet<EdgeId>,
    nodes: Vec<bool>,
}

impl Bans {
    fn new(node_count: usize) -> Self {
        Self { edges: FxHashSet::default(), nodes: vec![false; node_count] }
    }
}

/// Total-ordered `f64` for the heap.
#[derive(Copy, Clone, PartialEq, Debug)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra(network: &RoadNetwork, from: NodeId, to: NodeId, bans: &Bans) -> Option<Route> {
    if from == to {
        return Some(Route { edges: vec![], total_travel_secs: 0.0 });
    }
    if bans.nodes[from.index()] {
        return None;
    }

    let n = network.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    dist[from.index()] = 0.0;

    // Secondary key NodeId keeps tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(network, &prev_edge, from, to, cost));
        }
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            if network.is_internal(edge) || bans.edges.contains(&edge) {
                continue;
            }
            let neighbor = network.edge_to[edge.index()];
            if bans.nodes[neighbor.index()] {
                continue;
            }
            let new_cost = cost + network.travel_secs(edge);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    None
}

fn reconstruct(
    network: &RoadNetwork,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    total_secs: f64,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();
    Route { edges, total_travel_secs: total_secs }
}

/// `from` followed by the head node of every edge.
fn node_sequence(network: &RoadNetwork, from: NodeId, edges: &[EdgeId]) -> Vec<NodeId> {
    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));
    nodes
}
