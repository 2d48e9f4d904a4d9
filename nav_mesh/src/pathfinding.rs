// A* search over any graph with small, dense, copyable node handles.
//
// Implements standard A* using a `BinaryHeap` (min-heap via reversed
// ordering). Scores, came-from links, and the closed set live in `Vec`s
// indexed by `NodeHandle::index()`, so there is no hashing on the hot path.
// Ties on `f` pop in insertion order, via a monotonic sequence number.
//
// The heuristic and edge costs come from the `SearchGraph` implementation.
// For the nav mesh the heuristic is center-to-center distance, which can
// overestimate once avoidance penalties are in play. Closed nodes are
// therefore reopened when a cheaper route to them turns up.
//
// `PathSearch` keeps scratch buffers and a per-node adjacency-cost cache
// between calls. The cache is stamped with `SearchGraph::generation()` and
// dropped as soon as the graph reports a different generation, so a caller
// that changes topology or costs only has to bump that counter.
//
// See also: `graph.rs` for `AreaCosts`, the nav mesh's `SearchGraph`,
// `nav_file.rs` which owns a `PathSearch<AreaIndex>`.

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

/// A node handle the search can index its tables with.
pub trait NodeHandle: Copy + Eq + fmt::Debug {
    /// Dense index in `0..SearchGraph::node_count()`.
    fn index(self) -> usize;
}

/// The graph-side half of the search: costs, heuristic, and a change counter.
pub trait SearchGraph {
    type Node: NodeHandle;

    fn node_count(&self) -> usize;

    /// Changes whenever edges or edge costs change. Cached adjacency is
    /// discarded when this differs from the value seen on the previous search.
    fn generation(&self) -> u64;

    /// Estimated cost from `from` to `to`.
    fn least_cost_estimate(&self, from: Self::Node, to: Self::Node) -> f32;

    /// Append every `(neighbor, edge cost)` pair leaving `node` to `out`.
    fn adjacent_costs(&self, node: Self::Node, out: &mut Vec<(Self::Node, f32)>);
}

/// The result of a successful A* search.
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult<N> {
    /// Sequence of nodes from start to goal (inclusive).
    pub nodes: Vec<N>,
    /// Total traversal cost.
    pub total_cost: f32,
}

/// Entry in the A* open set (min-heap via reversed ordering).
struct OpenEntry<N> {
    node: N,
    g_score: f32,
    f_score: f32,
    sequence: u64,
}

impl<N> PartialEq for OpenEntry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score.total_cmp(&other.f_score) == Ordering::Equal
            && self.sequence == other.sequence
    }
}

impl<N> Eq for OpenEntry<N> {}

impl<N> PartialOrd for OpenEntry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for OpenEntry<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest f_score is "greatest", then the
        // earliest pushed.
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

type CachedEdges<N> = SmallVec<[(N, f32); 8]>;

/// Reusable A* state: scratch tables plus the adjacency-cost cache.
#[derive(Clone, Debug)]
pub struct PathSearch<N> {
    /// Generation the cache was filled under; `None` before the first search.
    generation: Option<u64>,
    adjacency: Vec<Option<CachedEdges<N>>>,
    g_score: Vec<f32>,
    came_from: Vec<Option<N>>,
    closed: Vec<bool>,
    scratch: Vec<(N, f32)>,
    last_expanded: usize,
}

impl<N: NodeHandle> Default for PathSearch<N> {
    fn default() -> Self {
        Self {
            generation: None,
            adjacency: Vec::new(),
            g_score: Vec::new(),
            came_from: Vec::new(),
            closed: Vec::new(),
            scratch: Vec::new(),
            last_expanded: 0,
        }
    }
}

impl<N: NodeHandle> PathSearch<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached adjacency list.
    pub fn reset(&mut self) {
        self.generation = None;
        self.adjacency.clear();
    }

    /// Generation the cache currently reflects.
    pub fn cached_generation(&self) -> Option<u64> {
        self.generation
    }

    /// Nodes expanded by the most recent search.
    pub fn last_expanded(&self) -> usize {
        self.last_expanded
    }

    fn sync_with<G: SearchGraph<Node = N>>(&mut self, graph: &G) {
        let n = graph.node_count();
        if self.generation != Some(graph.generation()) || self.adjacency.len() != n {
            tracing::trace!(
                old = ?self.generation,
                new = graph.generation(),
                "search cache reset"
            );
            self.adjacency.clear();
            self.adjacency.resize(n, None);
            self.generation = Some(graph.generation());
        }
        self.g_score.clear();
        self.g_score.resize(n, f32::INFINITY);
        self.came_from.clear();
        self.came_from.resize(n, None);
        self.closed.clear();
        self.closed.resize(n, false);
    }

    /// Find the cheapest path from `start` to `goal`.
    ///
    /// Returns `None` if the goal is unreachable, the graph is empty, or either
    /// endpoint is out of range. `start == goal` yields a single-node path of
    /// cost zero.
    pub fn solve<G: SearchGraph<Node = N>>(
        &mut self,
        graph: &G,
        start: N,
        goal: N,
    ) -> Option<PathResult<N>> {
        let n = graph.node_count();
        self.last_expanded = 0;
        if n == 0 || start.index() >= n || goal.index() >= n {
            return None;
        }
        if start == goal {
            return Some(PathResult {
                nodes: vec![start],
                total_cost: 0.0,
            });
        }

        self.sync_with(graph);
        self.g_score[start.index()] = 0.0;

        let mut sequence = 0u64;
        let mut open = BinaryHeap::new();
        open.push(OpenEntry {
            node: start,
            g_score: 0.0,
            f_score: graph.least_cost_estimate(start, goal),
            sequence,
        });

        while let Some(current) = open.pop() {
            let ci = current.node.index();

            // Superseded by a cheaper push of the same node.
            if current.g_score > self.g_score[ci] {
                continue;
            }

            if current.node == goal {
                tracing::trace!(expanded = self.last_expanded, "path found");
                return Some(self.reconstruct_path(start, goal));
            }

            if self.closed[ci] {
                continue;
            }
            self.closed[ci] = true;
            self.last_expanded += 1;

            if self.adjacency[ci].is_none() {
                self.scratch.clear();
                graph.adjacent_costs(current.node, &mut self.scratch);
                self.adjacency[ci] = Some(self.scratch.iter().copied().collect());
            }
            let Some(edges) = &self.adjacency[ci] else {
                continue;
            };

            let current_g = self.g_score[ci];
            for &(neighbor, cost) in edges {
                let ni = neighbor.index();
                let tentative_g = current_g + cost;

                if tentative_g < self.g_score[ni] {
                    self.g_score[ni] = tentative_g;
                    self.came_from[ni] = Some(current.node);
                    self.closed[ni] = false;
                    sequence += 1;
                    open.push(OpenEntry {
                        node: neighbor,
                        g_score: tentative_g,
                        f_score: tentative_g + graph.least_cost_estimate(neighbor, goal),
                        sequence,
                    });
                }
            }
        }

        tracing::trace!(expanded = self.last_expanded, "open set exhausted");
        None
    }

    /// Walk came-from links back from the goal.
    fn reconstruct_path(&self, start: N, goal: N) -> PathResult<N> {
        let mut nodes = Vec::new();
        let mut current = goal;

        loop {
            nodes.push(current);
            if current == start {
                break;
            }
            match self.came_from[current.index()] {
                Some(prev) => current = prev,
                None => break,
            }
        }

        nodes.reverse();

        PathResult {
            nodes,
            total_cost: self.g_score[goal.index()],
        }
    }
}

/// One-shot A* without keeping any state around.
pub fn astar<G: SearchGraph>(graph: &G, start: G::Node, goal: G::Node) -> Option<PathResult<G::Node>> {
    PathSearch::new().solve(graph, start, goal)
}
