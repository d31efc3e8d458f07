//! Neighbor graph of a parameter `c` under three Möbius-type maps.
//!
//! # Expansion
//!
//! Starting from the root `.` (value 0) and its child `+` (value `2/c`), every
//! frontier node `v` proposes three candidates:
//!
//! ```text
//! star       v / c         label "*"   word suffix '0'
//! plusminus  (v − 2) / c   label "pm"  word suffix '-'
//! minusplus  (v + 2) / c   label "mp"  word suffix '+'
//! ```
//!
//! A candidate whose value matches a known node (both coordinates rounded to
//! `match_decimals` places) becomes an edge to that node. Otherwise it is a
//! new node when `|h| ≤ R = 2/(1 − |c|)` (within `radius_tolerance`), and is
//! dropped when it lies outside. Frontier nodes that gain no edge at all are
//! pruned together with the edges pointing at them.
//!
//! # Invariants
//! - Node identity is the rounded value, not the word: different words may
//!   collapse onto one node, producing back-edges and cycles.
//! - A single final pass removes the nodes that still have no outgoing edge.
//!   Every surviving edge targets a live node.
//! - Connected attractors tend to close up into a cycle. Cantor-set
//!   parameters can leave a non-empty acyclic graph.
//! - Parameters with `|c| < 0.5`, `|c| ≈ 1` or `|c| > 1` have the empty graph.

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use num_complex::Complex64;

use crate::error::{DynamicsError, DynamicsResult};

// ─── Transforms ──────────────────────────────────────────────────────────────

/// One of the three maps generating the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transform {
    /// `v ↦ v / c`
    #[cfg_attr(feature = "serde", serde(rename = "*"))]
    Star,
    /// `v ↦ (v − 2) / c`
    #[cfg_attr(feature = "serde", serde(rename = "pm"))]
    PlusMinus,
    /// `v ↦ (v + 2) / c`
    #[cfg_attr(feature = "serde", serde(rename = "mp"))]
    MinusPlus,
}

impl Transform {
    /// Candidate order used during expansion.
    pub const ALL: [Transform; 3] = [Transform::Star, Transform::PlusMinus, Transform::MinusPlus];

    /// Edge label.
    pub fn label(self) -> &'static str {
        match self {
            Transform::Star => "*",
            Transform::PlusMinus => "pm",
            Transform::MinusPlus => "mp",
        }
    }

    /// Character appended to the parent word.
    pub fn suffix(self) -> char {
        match self {
            Transform::Star => '0',
            Transform::PlusMinus => '-',
            Transform::MinusPlus => '+',
        }
    }

    /// Apply the map at parameter `c`.
    pub fn apply(self, v: Complex64, c: Complex64) -> Complex64 {
        match self {
            Transform::Star => v / c,
            Transform::PlusMinus => (v - 2.0) / c,
            Transform::MinusPlus => (v + 2.0) / c,
        }
    }
}

impl core::fmt::Display for Transform {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Graph ───────────────────────────────────────────────────────────────────

/// Handle of a node inside one [`NeighborGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in [`NeighborGraph::nodes`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// A vertex: the word of maps that first reached it and its value.
#[derive(Clone, Debug, PartialEq)]
pub struct NeighborNode {
    /// `.` for the root; otherwise `+` followed by suffixes from `{0, -, +}`.
    pub word: String,
    /// Point in the parameter plane.
    pub value: Complex64,
}

/// A directed edge labeled by the map that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Parent node.
    pub source: NodeId,
    /// Child node (possibly `source` itself or an ancestor).
    pub target: NodeId,
    /// Map taking the source value to the target value.
    pub transform: Transform,
}

/// Directed multigraph with a node table and an edge table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborGraph {
    nodes: Vec<NeighborNode>,
    edges: Vec<Edge>,
}

impl NeighborGraph {
    /// The graph with no nodes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `true` if no node survived.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node table, in creation order.
    pub fn nodes(&self) -> &[NeighborNode] {
        &self.nodes
    }

    /// Edge table, in creation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node behind a handle.
    pub fn node(&self, id: NodeId) -> &NeighborNode {
        &self.nodes[id.0]
    }

    /// Outgoing edges of `id`.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// Sources of the edges pointing at `id`.
    pub fn parents(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().filter(move |e| e.target == id).map(|e| e.source)
    }

    /// The root `.`, if it survived.
    pub fn root(&self) -> Option<NodeId> {
        self.find_word(".")
    }

    /// Node with the given word.
    pub fn find_word(&self, word: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.word == word).map(NodeId)
    }

    /// `id` for the root, `h<word>` otherwise.
    pub fn vertex_label(&self, id: NodeId) -> String {
        let word = &self.nodes[id.0].word;
        if word == "." {
            "id".to_string()
        } else {
            format!("h{word}")
        }
    }

    /// `true` if some directed cycle exists (self-loops included).
    pub fn has_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for e in &self.edges {
            adjacency[e.source.0].push(e.target.0);
        }

        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        for start in 0..self.nodes.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            // Iterative DFS: (node, next child position)
            let mut stack = vec![(start, 0usize)];
            marks[start] = Mark::OnStack;
            while let Some((node, pos)) = stack.pop() {
                if let Some(&next) = adjacency[node].get(pos) {
                    stack.push((node, pos + 1));
                    match marks[next] {
                        Mark::OnStack => return true,
                        Mark::Unvisited => {
                            marks[next] = Mark::OnStack;
                            stack.push((next, 0));
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node] = Mark::Done;
                }
            }
        }
        false
    }

    /// Nested `{vertex: {child: map}}` view.
    ///
    /// When one parent reaches the same child through several maps the last
    /// map recorded wins.
    pub fn to_labeled_map(&self) -> BTreeMap<String, BTreeMap<String, Transform>> {
        let mut out: BTreeMap<String, BTreeMap<String, Transform>> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, _)| (self.vertex_label(NodeId(i)), BTreeMap::new()))
            .collect();
        for e in &self.edges {
            if let Some(row) = out.get_mut(&self.vertex_label(e.source)) {
                row.insert(self.vertex_label(e.target), e.transform);
            }
        }
        out
    }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Tuning for [`NeighborGraphBuilder`] and the parameter guard.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborGraphConfig {
    /// Decimal places kept on each coordinate before matching. Default: 13.
    pub match_decimals: u32,
    /// Slack on the critical radius. Default: 1e-13.
    pub radius_tolerance: f64,
    /// Parameters with a smaller modulus have the empty graph. Default: 0.5.
    pub min_modulus: f64,
    /// Parameters this close to the unit circle have the empty graph. Default: 1e-13.
    pub unit_tolerance: f64,
}

impl Default for NeighborGraphConfig {
    fn default() -> Self {
        Self {
            match_decimals: 13,
            radius_tolerance: 1e-13,
            min_modulus: 0.5,
            unit_tolerance: 1e-13,
        }
    }
}

impl NeighborGraphConfig {
    /// `true` when `c` lies in a range without neighbor structure.
    pub fn is_degenerate(&self, c: Complex64) -> bool {
        let modulus = c.norm();
        modulus < self.min_modulus || (modulus - 1.0).abs() < self.unit_tolerance || modulus > 1.0
    }
}

/// Rounded coordinates used as the identity of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ValueKey(u64, u64);

/// Mutable expansion state; slots are never reused so indices stay stable.
struct Expansion {
    words: Vec<String>,
    values: Vec<Complex64>,
    alive: Vec<bool>,
    edges: Vec<(usize, usize, Transform)>,
    index: HashMap<ValueKey, usize>,
}

impl Expansion {
    fn insert(&mut self, word: String, value: Complex64, key: ValueKey) -> usize {
        let id = self.words.len();
        self.words.push(word);
        self.values.push(value);
        self.alive.push(true);
        self.index.insert(key, id);
        id
    }

    fn remove_all(&mut self, doomed: &[usize], keys: impl Fn(Complex64) -> ValueKey) {
        for &node in doomed {
            self.alive[node] = false;
            let key = keys(self.values[node]);
            if self.index.get(&key) == Some(&node) {
                self.index.remove(&key);
            }
        }
        let alive = &self.alive;
        self.edges.retain(|&(_, target, _)| alive[target]);
    }
}

/// Breadth-first construction of the neighbor graph of one parameter.
#[derive(Clone, Debug)]
pub struct NeighborGraphBuilder {
    c: Complex64,
    config: NeighborGraphConfig,
    radius: f64,
    scale: f64,
}

impl NeighborGraphBuilder {
    /// Prepare a builder for parameter `c`.
    ///
    /// Does not apply the degenerate-parameter guard; see [`neighbor_graph`].
    pub fn new(c: Complex64, config: NeighborGraphConfig) -> Self {
        let radius = 2.0 / (1.0 - c.norm());
        let scale = 10f64.powi(config.match_decimals as i32);
        Self {
            c,
            config,
            radius,
            scale,
        }
    }

    /// Critical radius `2 / (1 − |c|)`.
    pub fn critical_radius(&self) -> f64 {
        self.radius
    }

    fn key(&self, v: Complex64) -> ValueKey {
        let round = |x: f64| {
            let r = (x * self.scale).round() / self.scale;
            // -0.0 and 0.0 must share a key
            if r == 0.0 {
                0.0f64.to_bits()
            } else {
                r.to_bits()
            }
        };
        ValueKey(round(v.re), round(v.im))
    }

    fn within_radius(&self, v: Complex64) -> bool {
        let modulus = v.norm();
        modulus <= self.radius || (modulus - self.radius).abs() <= self.config.radius_tolerance
    }

    /// Expand until the frontier empties or `max_depth` is reached.
    ///
    /// The seed `+` is always expanded, so depths 0 and 1 behave as 2.
    pub fn build(&self, max_depth: u32) -> NeighborGraph {
        let max_depth = max_depth.max(2);
        let mut state = Expansion {
            words: Vec::new(),
            values: Vec::new(),
            alive: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
        };
        let origin = Complex64::new(0.0, 0.0);
        let root = state.insert(".".to_string(), origin, self.key(origin));
        let seed_value = Transform::MinusPlus.apply(origin, self.c);
        let seed = state.insert("+".to_string(), seed_value, self.key(seed_value));
        state.edges.push((root, seed, Transform::MinusPlus));

        let mut frontier = vec![seed];
        let mut depth = 1;
        while !frontier.is_empty() && depth < max_depth {
            let mut next = Vec::new();
            let mut childless = Vec::new();

            for &node in &frontier {
                let value = state.values[node];
                let mut has_child = false;
                for transform in Transform::ALL {
                    let candidate = transform.apply(value, self.c);
                    let key = self.key(candidate);
                    if let Some(&existing) = state.index.get(&key) {
                        state.edges.push((node, existing, transform));
                        has_child = true;
                    } else if self.within_radius(candidate) {
                        let word = format!("{}{}", state.words[node], transform.suffix());
                        let child = state.insert(word, candidate, key);
                        state.edges.push((node, child, transform));
                        next.push(child);
                        has_child = true;
                    }
                }
                if !has_child {
                    childless.push(node);
                }
            }

            state.remove_all(&childless, |v| self.key(v));
            tracing::debug!(
                depth,
                frontier = frontier.len(),
                new_nodes = next.len(),
                pruned = childless.len(),
                "neighbor graph depth expanded"
            );
            frontier = next;
            depth += 1;
        }

        self.finish(state)
    }

    /// One pass over the nodes without children, then compact the tables.
    ///
    /// The pass is not repeated: a parent whose only children are removed
    /// here stays in the graph without outgoing edges.
    fn finish(&self, mut state: Expansion) -> NeighborGraph {
        let with_children: HashSet<usize> = state.edges.iter().map(|&(s, _, _)| s).collect();
        let doomed: Vec<usize> = (0..state.words.len())
            .filter(|&n| state.alive[n] && !with_children.contains(&n))
            .collect();
        if !doomed.is_empty() {
            tracing::debug!(removed = doomed.len(), "childless neighbors removed");
            state.remove_all(&doomed, |v| self.key(v));
        }

        let mut remap = vec![None; state.words.len()];
        let mut nodes = Vec::new();
        for (old, word) in state.words.into_iter().enumerate() {
            if state.alive[old] {
                remap[old] = Some(NodeId(nodes.len()));
                nodes.push(NeighborNode {
                    word,
                    value: state.values[old],
                });
            }
        }
        let edges = state
            .edges
            .into_iter()
            .filter_map(|(s, t, transform)| {
                Some(Edge {
                    source: remap[s]?,
                    target: remap[t]?,
                    transform,
                })
            })
            .collect();

        NeighborGraph { nodes, edges }
    }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Neighbor graph of `c` with the default configuration.
///
/// Returns the empty graph for degenerate parameters and an error for
/// non-finite ones.
pub fn neighbor_graph(c: Complex64, max_depth: u32) -> DynamicsResult<NeighborGraph> {
    neighbor_graph_with_config(c, max_depth, NeighborGraphConfig::default())
}

/// [`neighbor_graph`] with an explicit configuration.
pub fn neighbor_graph_with_config(
    c: Complex64,
    max_depth: u32,
    config: NeighborGraphConfig,
) -> DynamicsResult<NeighborGraph> {
    if !c.re.is_finite() || !c.im.is_finite() {
        return Err(DynamicsError::NonFiniteParameter { re: c.re, im: c.im });
    }
    if config.is_degenerate(c) {
        tracing::debug!(re = c.re, im = c.im, "parameter has no neighbor structure");
        return Ok(NeighborGraph::empty());
    }
    Ok(NeighborGraphBuilder::new(c, config).build(max_depth))
}

/// Parse `param` (e.g. `"0.5+0.1i"`) and `max_depth`, then build the graph.
pub fn neighbor_graph_from_str(param: &str, max_depth: &str) -> DynamicsResult<NeighborGraph> {
    let c: Complex64 = param
        .trim()
        .parse()
        .map_err(|_| DynamicsError::MalformedParameter {
            input: param.to_string(),
        })?;
    let depth: u32 = max_depth
        .trim()
        .parse()
        .map_err(|_| DynamicsError::MalformedDepth {
            input: max_depth.to_string(),
        })?;
    neighbor_graph(c, depth)
}
