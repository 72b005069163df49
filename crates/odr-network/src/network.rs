//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format in both directions.
//! Given a `NodeId n`, its outgoing edges are the contiguous EdgeIds
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! and its incoming edges are `in_edges[node_in_start[n] .. node_in_start[n+1]]`.
//! Edge arrays are sorted by source node and indexed by `EdgeId`.
//!
//! Nodes and edges carry the string names used by every input file; the
//! name→id maps are built once in [`RoadNetworkBuilder::build`].

use rustc_hash::FxHashMap;

use odr_core::{EdgeId, NodeId};

use crate::{NetworkError, NetworkResult};

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format with named nodes and edges.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    pub node_names: Vec<String>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Outgoing edges of node `n` are EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Row pointer into `in_edges`.  Length = `node_count + 1`.
    pub node_in_start: Vec<u32>,

    /// Edges grouped by destination node.
    pub in_edges: Vec<EdgeId>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_names: Vec<String>,
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    pub edge_length_m: Vec<f64>,
    /// Free-flow speed in metres per second.  Always positive.
    pub edge_speed_mps: Vec<f64>,
    /// Junction-internal edges.  Never routed over, never scored.
    pub edge_internal: Vec<bool>,

    node_index: FxHashMap<String, NodeId>,
    edge_index: FxHashMap<String, EdgeId>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_names.is_empty()
    }

    // ── Names ─────────────────────────────────────────────────────────────

    pub fn edge_by_name(&self, name: &str) -> Option<EdgeId> {
        self.edge_index.get(name).copied()
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    /// Like [`edge_by_name`](Self::edge_by_name) but reports the miss.
    pub fn require_edge(&self, name: &str) -> NetworkResult<EdgeId> {
        self.edge_by_name(name)
            .ok_or_else(|| NetworkError::UnknownEdge(name.to_owned()))
    }

    #[inline]
    pub fn edge_name(&self, edge: EdgeId) -> &str {
        &self.edge_names[edge.index()]
    }

    #[inline]
    pub fn node_name(&self, node: NodeId) -> &str {
        &self.node_names[node.index()]
    }

    // ── Edge attributes ───────────────────────────────────────────────────

    /// Free-flow traversal time of `edge` in seconds.
    #[inline]
    pub fn travel_secs(&self, edge: EdgeId) -> f64 {
        self.edge_length_m[edge.index()] / self.edge_speed_mps[edge.index()]
    }

    #[inline]
    pub fn is_internal(&self, edge: EdgeId) -> bool {
        self.edge_internal[edge.index()]
    }

    /// Every edge id, in id order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edge_count()).map(EdgeId::from_index)
    }

    /// Every non-internal edge id, in id order.
    pub fn regular_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges().filter(|&e| !self.is_internal(e))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(EdgeId::from_index)
    }

    /// Iterator over the `EdgeId`s of all incoming edges of `node`.
    #[inline]
    pub fn in_edges_of(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_in_start[node.index()] as usize;
        let end = self.node_in_start[node.index() + 1] as usize;
        self.in_edges[start..end].iter().copied()
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// `true` if `b` leads straight back to the start of `a`.
    #[inline]
    pub fn is_turnaround(&self, a: EdgeId, b: EdgeId) -> bool {
        self.edge_to[a.index()] == self.edge_from[b.index()]
            && self.edge_from[a.index()] == self.edge_to[b.index()]
    }

    /// Non-internal edges a vehicle can continue onto after `edge`.
    pub fn successors(&self, edge: EdgeId, keep_turnarounds: bool) -> Vec<EdgeId> {
        self.out_edges(self.edge_to[edge.index()])
            .filter(|&n| !self.is_internal(n))
            .filter(|&n| keep_turnarounds || !self.is_turnaround(edge, n))
            .collect()
    }

    /// Non-internal edges that feed into `edge`.
    pub fn predecessors(&self, edge: EdgeId, keep_turnarounds: bool) -> Vec<EdgeId> {
        self.in_edges_of(self.edge_from[edge.index()])
            .filter(|&p| !self.is_internal(p))
            .filter(|&p| keep_turnarounds || !self.is_turnaround(p, edge))
            .collect()
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Nodes are created on first mention by name.  `build()` stable-sorts edges
/// by source node, so edges leaving the same node keep insertion order.
///
/// # Example
///
/// ```
/// use odr_network::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_edge("ab", "A", "B", 1_200.0, 13.9, false).unwrap();
/// b.add_edge("ba", "B", "A", 1_200.0, 13.9, false).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2);
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes: Vec<String>,
    node_index: FxHashMap<String, NodeId>,
    raw_edges: Vec<RawEdge>,
    edge_names: FxHashMap<String, usize>,
}

struct RawEdge {
    name: String,
    from: NodeId,
    to: NodeId,
    length_m: f64,
    speed_mps: f64,
    internal: bool,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of node `name`, creating it if unseen.
    pub fn add_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.node_index.get(name) {
            return id;
        }
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(name.to_owned());
        self.node_index.insert(name.to_owned(), id);
        id
    }

    /// Add a **directed** edge `name` from node `from` to node `to`.
    ///
    /// Fails on a duplicate edge name, a negative or non-finite length, or a
    /// speed that is not strictly positive.
    pub fn add_edge(
        &mut self,
        name: &str,
        from: &str,
        to: &str,
        length_m: f64,
        speed_mps: f64,
        internal: bool,
    ) -> NetworkResult<()> {
        if self.edge_names.contains_key(name) {
            return Err(NetworkError::DuplicateEdge(name.to_owned()));
        }
        if !length_m.is_finite() || length_m < 0.0 {
            return Err(NetworkError::InvalidEdge {
                edge: name.to_owned(),
                reason: format!("length {length_m} must be finite and non-negative"),
            });
        }
        if !speed_mps.is_finite() || speed_mps <= 0.0 {
            return Err(NetworkError::InvalidEdge {
                edge: name.to_owned(),
                reason: format!("speed {speed_mps} must be positive"),
            });
        }
        let from = self.add_node(from);
        let to = self.add_node(to);
        self.edge_names.insert(name.to_owned(), self.raw_edges.len());
        self.raw_edges.push(RawEdge {
            name: name.to_owned(),
            from,
            to,
            length_m,
            speed_mps,
            internal,
        });
        Ok(())
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64> = raw.iter().map(|e| e.length_m).collect();
        let edge_speed_mps: Vec<f64> = raw.iter().map(|e| e.speed_mps).collect();
        let edge_internal: Vec<bool> = raw.iter().map(|e| e.internal).collect();
        let edge_names: Vec<String> = raw.into_iter().map(|e| e.name).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for from in &edge_from {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Reverse CSR: counting sort of edge ids by destination.
        let mut node_in_start = vec![0u32; node_count + 1];
        for to in &edge_to {
            node_in_start[to.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_in_start[i] += node_in_start[i - 1];
        }
        let mut fill = node_in_start.clone();
        let mut in_edges = vec![EdgeId::INVALID; edge_count];
        for (i, to) in edge_to.iter().enumerate() {
            let slot = &mut fill[to.index()];
            in_edges[*slot as usize] = EdgeId::from_index(i);
            *slot += 1;
        }

        let edge_index = edge_names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), EdgeId::from_index(i)))
            .collect();

        RoadNetwork {
            node_names: self.nodes,
            node_out_start,
            node_in_start,
            in_edges,
            edge_names,
            edge_from,
            edge_to,
            edge_length_m,
            edge_speed_mps,
            edge_internal,
            node_index: self.node_index,
            edge_index,
        }
    }
}
