// Area adjacency graph built from the raw connection ids of each area.
//
// Areas reference each other by authored `AreaId`, which is sparse. The graph
// resolves those ids once into dense `AreaIndex` values and stores them in a
// single flattened array: `neighbors` holds every area's resolved neighbor
// list back to back, and `spans[i]` is the `(offset, len)` of area `i`'s
// slice. Rebuilding from the areas is the only way the table changes, so it
// never drifts from `NavArea::connections`.
//
// Edge removal filters `NavArea::connections` in place and rebuilds. Every
// structural change bumps `generation`, which the search engine compares
// against before reusing cached adjacency costs.
//
// Connections to ids that don't exist are skipped with a warning rather than
// failing the build.
//
// See also: `area.rs` for `NavArea`, `pathfinding.rs` for the `SearchGraph`
// trait implemented here by `AreaCosts`, `nav_file.rs` which owns the graph.

use crate::area::NavArea;
use crate::pathfinding::SearchGraph;
use crate::types::{AreaId, AreaIndex};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::collections::hash_map::Entry;

/// Resolved adjacency of a loaded mesh.
#[derive(Clone, Debug, Default)]
pub struct AreaGraph {
    id_to_index: FxHashMap<AreaId, AreaIndex>,
    /// All resolved neighbor indices, area by area.
    neighbors: Vec<AreaIndex>,
    /// Per area index: `(offset, len)` into `neighbors`.
    spans: Vec<(u32, u32)>,
    generation: u64,
}

impl AreaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the id map and the adjacency table for `areas`.
    ///
    /// Duplicate ids keep their first occurrence in the map.
    pub fn build(areas: &[NavArea]) -> Self {
        let mut graph = Self::new();
        graph.id_to_index.reserve(areas.len());
        for (i, area) in areas.iter().enumerate() {
            match graph.id_to_index.entry(area.id) {
                Entry::Vacant(slot) => {
                    slot.insert(AreaIndex(i as u32));
                }
                Entry::Occupied(_) => {
                    tracing::warn!(area_id = %area.id, index = i, "duplicate area id; keeping first");
                }
            }
        }
        graph.rebuild(areas);
        graph
    }

    /// Re-derive the flattened table from each area's current connections.
    pub fn rebuild(&mut self, areas: &[NavArea]) {
        self.neighbors.clear();
        self.spans.clear();
        self.spans.reserve(areas.len());

        let mut dangling = 0usize;
        for area in areas {
            let offset = self.neighbors.len() as u32;
            for target in area.connection_ids() {
                match self.id_to_index.get(&target) {
                    Some(&index) => self.neighbors.push(index),
                    None => {
                        dangling += 1;
                        tracing::warn!(
                            from = %area.id,
                            to = %target,
                            "skipping connection to unknown area"
                        );
                    }
                }
            }
            let len = self.neighbors.len() as u32 - offset;
            self.spans.push((offset, len));
        }

        self.generation += 1;
        tracing::debug!(
            areas = areas.len(),
            edges = self.neighbors.len(),
            dangling,
            generation = self.generation,
            "adjacency rebuilt"
        );
    }

    /// Resolved neighbors of the area at `index`. Empty for an unknown index.
    pub fn neighbors(&self, index: AreaIndex) -> &[AreaIndex] {
        match self.spans.get(index.as_usize()) {
            Some(&(offset, len)) => {
                &self.neighbors[offset as usize..(offset + len) as usize]
            }
            None => &[],
        }
    }

    /// `(offset, len)` of an area's slice in the flattened neighbor array.
    pub fn span(&self, index: AreaIndex) -> Option<(u32, u32)> {
        self.spans.get(index.as_usize()).copied()
    }

    pub fn index_of(&self, id: AreaId) -> Option<AreaIndex> {
        self.id_to_index.get(&id).copied()
    }

    /// Number of areas the table was built for.
    pub fn node_count(&self) -> usize {
        self.spans.len()
    }

    /// Total number of resolved directed edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Bumped by every rebuild and by cost-model changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark the cost model as changed without touching topology.
    pub fn bump_generation(&mut self) {
        self.generation += 1;
    }

    /// Delete every connection whose target is in `targets`, then rebuild.
    /// The targets stay in the graph as sources.
    pub fn remove_incoming_edges_to(&mut self, areas: &mut [NavArea], targets: &BTreeSet<AreaId>) {
        for area in areas.iter_mut() {
            area.connections.retain(|c| !targets.contains(&c.id));
        }
        self.rebuild(areas);
    }

    /// Delete connections matching any of `pairs`, in either direction, then
    /// rebuild.
    pub fn remove_edges(&mut self, areas: &mut [NavArea], pairs: &BTreeSet<(AreaId, AreaId)>) {
        for area in areas.iter_mut() {
            let source = area.id;
            area.connections.retain(|c| {
                !pairs.contains(&(source, c.id)) && !pairs.contains(&(c.id, source))
            });
        }
        self.rebuild(areas);
    }
}

/// Every area that currently lists `target` among its raw connections.
pub fn sources_to(areas: &[NavArea], target: AreaId) -> BTreeSet<AreaId> {
    areas
        .iter()
        .filter(|area| area.connection_ids().any(|id| id == target))
        .map(|area| area.id)
        .collect()
}

/// Cost model the search runs on: center-to-center distances, inflated when
/// leaving an avoided area.
#[derive(Clone, Copy, Debug)]
pub struct AreaCosts<'a> {
    pub areas: &'a [NavArea],
    pub graph: &'a AreaGraph,
    pub avoid: &'a BTreeSet<AreaId>,
    pub avoidance_penalty_factor: f32,
}

impl AreaCosts<'_> {
    fn center(&self, index: AreaIndex) -> glam::Vec3 {
        self.areas[index.as_usize()].center
    }

    /// Flat surcharge on every edge leaving `index`: the factor times the
    /// longest hop to any of its neighbors, or zero if it isn't avoided.
    pub fn avoidance_penalty(&self, index: AreaIndex) -> f32 {
        let area = &self.areas[index.as_usize()];
        if !self.avoid.contains(&area.id) {
            return 0.0;
        }
        let mut longest = 0.0f32;
        for &neighbor in self.graph.neighbors(index) {
            let hop = (self.center(neighbor) - area.center).length();
            longest = hop.max(longest);
        }
        longest * self.avoidance_penalty_factor
    }
}

impl SearchGraph for AreaCosts<'_> {
    type Node = AreaIndex;

    fn node_count(&self) -> usize {
        self.areas.len().min(self.graph.node_count())
    }

    fn generation(&self) -> u64 {
        self.graph.generation()
    }

    fn least_cost_estimate(&self, from: AreaIndex, to: AreaIndex) -> f32 {
        (self.center(from) - self.center(to)).length()
    }

    fn adjacent_costs(&self, node: AreaIndex, out: &mut Vec<(AreaIndex, f32)>) {
        let penalty = self.avoidance_penalty(node);
        let center = self.center(node);
        for &neighbor in self.graph.neighbors(node) {
            let distance = (self.center(neighbor) - center).length();
            out.push((neighbor, penalty + distance));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::NavDirection;
    use crate::pathfinding::astar;
    use glam::Vec3;

    fn square(id: u32, x: f32, y: f32) -> NavArea {
        NavArea::new(
            AreaId(id),
            Vec3::new(x, y, 0.0),
            Vec3::new(x + 100.0, y + 100.0, 0.0),
        )
    }

    fn link(areas: &mut [NavArea], a: usize, b: usize) {
        let (ida, idb) = (areas[a].id, areas[b].id);
        areas[a] = areas[a].clone().with_connection(idb, NavDirection::East);
        areas[b] = areas[b].clone().with_connection(ida, NavDirection::West);
    }

    /// Row of `n` squares along x, ids 10, 20, 30, ... chained both ways.
    fn row(n: usize) -> Vec<NavArea> {
        let mut areas: Vec<_> = (0..n)
            .map(|i| square((i as u32 + 1) * 10, i as f32 * 100.0, 0.0))
            .collect();
        for i in 1..n {
            link(&mut areas, i - 1, i);
        }
        areas
    }

    #[test]
    fn build_resolves_ids_to_indices() {
        let areas = row(3);
        let graph = AreaGraph::build(&areas);
        assert_eq!(graph.index_of(AreaId(20)), Some(AreaIndex(1)));
        assert_eq!(graph.index_of(AreaId(99)), None);
        assert_eq!(graph.neighbors(AreaIndex(0)), &[AreaIndex(1)]);
        assert_eq!(graph.neighbors(AreaIndex(1)), &[AreaIndex(0), AreaIndex(2)]);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn spans_are_contiguous() {
        let areas = row(4);
        let graph = AreaGraph::build(&areas);
        let mut expected_offset = 0;
        for i in 0..areas.len() {
            let (offset, len) = graph.span(AreaIndex(i as u32)).unwrap();
            assert_eq!(offset, expected_offset);
            assert_eq!(len as usize, areas[i].connections.len());
            expected_offset += len;
        }
        assert_eq!(graph.span(AreaIndex(4)), None);
    }

    #[test]
    fn dangling_connection_is_skipped() {
        let mut areas = row(2);
        areas[0] = areas[0]
            .clone()
            .with_connection(AreaId(12345), NavDirection::North);
        let graph = AreaGraph::build(&areas);
        assert_eq!(graph.neighbors(AreaIndex(0)), &[AreaIndex(1)]);
        // The raw list still carries it.
        assert_eq!(areas[0].connections.len(), 2);
    }

    #[test]
    fn duplicate_id_keeps_first() {
        let mut areas = row(2);
        areas.push(square(10, 500.0, 0.0));
        let graph = AreaGraph::build(&areas);
        assert_eq!(graph.index_of(AreaId(10)), Some(AreaIndex(0)));
    }

    #[test]
    fn remove_incoming_edges_keeps_target_as_source() {
        let mut areas = row(3);
        let mut graph = AreaGraph::build(&areas);
        let before = graph.generation();

        graph.remove_incoming_edges_to(&mut areas, &BTreeSet::from([AreaId(20)]));

        assert!(graph.generation() > before);
        assert!(graph.neighbors(AreaIndex(0)).is_empty());
        assert_eq!(graph.neighbors(AreaIndex(2)), &[] as &[AreaIndex]);
        // Area 20 can still leave.
        assert_eq!(graph.neighbors(AreaIndex(1)), &[AreaIndex(0), AreaIndex(2)]);
    }

    #[test]
    fn remove_edges_matches_either_direction() {
        let mut areas = row(3);
        let mut graph = AreaGraph::build(&areas);

        // Listed as (20, 10): removes both 10->20 and 20->10.
        graph.remove_edges(&mut areas, &BTreeSet::from([(AreaId(20), AreaId(10))]));

        assert!(graph.neighbors(AreaIndex(0)).is_empty());
        assert_eq!(graph.neighbors(AreaIndex(1)), &[AreaIndex(2)]);
        assert_eq!(graph.neighbors(AreaIndex(2)), &[AreaIndex(1)]);
    }

    #[test]
    fn sources_to_lists_incoming() {
        let areas = row(3);
        assert_eq!(
            sources_to(&areas, AreaId(20)),
            BTreeSet::from([AreaId(10), AreaId(30)])
        );
        assert!(sources_to(&areas, AreaId(77)).is_empty());
    }

    #[test]
    fn costs_are_center_distances() {
        let areas = row(3);
        let graph = AreaGraph::build(&areas);
        let avoid = BTreeSet::new();
        let costs = AreaCosts {
            areas: &areas,
            graph: &graph,
            avoid: &avoid,
            avoidance_penalty_factor: 10.0,
        };
        let mut out = Vec::new();
        costs.adjacent_costs(AreaIndex(1), &mut out);
        assert_eq!(out, vec![(AreaIndex(0), 100.0), (AreaIndex(2), 100.0)]);
        assert_eq!(costs.least_cost_estimate(AreaIndex(0), AreaIndex(2)), 200.0);

        let path = astar(&costs, AreaIndex(0), AreaIndex(2)).unwrap();
        assert_eq!(path.nodes, vec![AreaIndex(0), AreaIndex(1), AreaIndex(2)]);
        assert_eq!(path.total_cost, 200.0);
    }

    #[test]
    fn avoided_area_pays_ten_times_longest_hop() {
        // Middle area has neighbors 100 away and, via an extra link, 200 away.
        let mut areas = row(3);
        areas.push(square(40, 300.0, 0.0));
        link(&mut areas, 1, 3);
        let graph = AreaGraph::build(&areas);
        let avoid = BTreeSet::from([AreaId(20)]);
        let costs = AreaCosts {
            areas: &areas,
            graph: &graph,
            avoid: &avoid,
            avoidance_penalty_factor: 10.0,
        };

        assert_eq!(costs.avoidance_penalty(AreaIndex(1)), 2000.0);
        assert_eq!(costs.avoidance_penalty(AreaIndex(0)), 0.0);

        let mut out = Vec::new();
        costs.adjacent_costs(AreaIndex(1), &mut out);
        assert_eq!(out[0], (AreaIndex(0), 2100.0));

        // Entering the avoided area is not penalized.
        out.clear();
        costs.adjacent_costs(AreaIndex(0), &mut out);
        assert_eq!(out, vec![(AreaIndex(1), 100.0)]);
    }
}
