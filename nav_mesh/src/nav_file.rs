// `NavMesh`: the loaded mesh and every public query over it.
//
// Loading reads the whole file into memory, validates the fixed header
// (magic, then version; only version 16 is accepted), reads the place-name
// table and the area records, and then builds the adjacency graph. Header
// layout, little-endian:
//
//   magic:u32  version:u32  sub_version:u32  source_bsp_size:u32
//   is_analyzed:u8  place_count:u16  place_count x { len:u16, bytes }
//   has_unnamed_areas:u8  area_count:u32  area_count x area record
//
// Bytes after the last area record are ignored.
//
// Path queries snap both endpoints to their nearest non-orphan area, run A*
// over area indices (`pathfinding.rs` with the `AreaCosts` model from
// `graph.rs`), and expand the resulting route into waypoints (`path.rs`).
// "No route" is `Ok(None)`; errors are reserved for failures such as a mesh
// with no eligible area to snap to.
//
// Mutators (edge removal, avoidance set, config) all advance the graph
// generation, which is what invalidates the search engine's adjacency cache.
// `reload` throws the current state away before reading the new file; if the
// read or parse fails the mesh is left empty and should not be used.
//
// See also: `locate.rs` for the nearest-area rules, `config.rs` for the
// tunables threaded through here.

use crate::area::NavArea;
use crate::buffer::NavReader;
use crate::config::NavConfig;
use crate::error::{NavError, NavResult};
use crate::graph::{self, AreaCosts, AreaGraph};
use crate::locate;
use crate::path;
use crate::pathfinding::{PathResult, PathSearch};
use crate::types::{AreaDistance, AreaId, AreaIndex, PathNode};
use glam::Vec3;
use std::collections::BTreeSet;
use std::path::Path;

/// First four bytes of every nav file.
pub const NAV_MAGIC: u32 = 0xFEED_FACE;

/// The only nav format version this crate reads.
pub const SUPPORTED_VERSION: u32 = 16;

/// Fixed fields from the start of the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct NavHeader {
    version: u32,
    sub_version: u32,
    source_bsp_size: u32,
    is_analyzed: bool,
    has_unnamed_areas: bool,
}

/// A loaded navigation mesh.
#[derive(Clone, Debug)]
pub struct NavMesh {
    header: NavHeader,
    places: Vec<String>,
    areas: Vec<NavArea>,
    graph: AreaGraph,
    avoid: BTreeSet<AreaId>,
    config: NavConfig,
    search: PathSearch<AreaIndex>,
}

impl NavMesh {
    // -----------------------------------------------------------------------
    // Construction and loading
    // -----------------------------------------------------------------------

    fn empty(config: NavConfig) -> Self {
        Self {
            header: NavHeader::default(),
            places: Vec::new(),
            areas: Vec::new(),
            graph: AreaGraph::new(),
            avoid: BTreeSet::new(),
            config,
            search: PathSearch::new(),
        }
    }

    /// Load a nav file from disk with the default config.
    pub fn open(path: impl AsRef<Path>) -> NavResult<Self> {
        Self::open_with_config(path, NavConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: NavConfig) -> NavResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| NavError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes_with_config(&bytes, config)
    }

    /// Parse an in-memory nav file with the default config.
    pub fn from_bytes(bytes: &[u8]) -> NavResult<Self> {
        Self::from_bytes_with_config(bytes, NavConfig::default())
    }

    pub fn from_bytes_with_config(bytes: &[u8], config: NavConfig) -> NavResult<Self> {
        let mut mesh = Self::empty(config);
        mesh.parse(bytes)?;
        Ok(mesh)
    }

    /// Build a mesh from already-decoded areas, bypassing the file format.
    /// Header fields are set as a freshly loaded version-16 file would have
    /// them.
    pub fn from_areas(places: Vec<String>, areas: Vec<NavArea>, config: NavConfig) -> NavResult<Self> {
        if areas.is_empty() {
            return Err(NavError::NoAreas);
        }
        let mut mesh = Self::empty(config);
        mesh.header.version = SUPPORTED_VERSION;
        mesh.places = places;
        mesh.areas = areas;
        mesh.graph = AreaGraph::build(&mesh.areas);
        Ok(mesh)
    }

    /// Replace this mesh with the contents of another file, keeping the
    /// config. On error the mesh is left empty.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> NavResult<()> {
        let config = self.config.clone();
        *self = Self::empty(config.clone());
        *self = Self::open_with_config(path, config)?;
        Ok(())
    }

    fn parse(&mut self, bytes: &[u8]) -> NavResult<()> {
        let mut reader = NavReader::new(bytes);

        let magic = reader.read_u32()?;
        if magic != NAV_MAGIC {
            return Err(NavError::BadMagic {
                expected: NAV_MAGIC,
                found: magic,
            });
        }
        let version = reader.read_u32()?;
        if version != SUPPORTED_VERSION {
            return Err(NavError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSION,
            });
        }

        let sub_version = reader.read_u32()?;
        let source_bsp_size = reader.read_u32()?;
        let is_analyzed = reader.read_u8()? != 0;

        let place_count = reader.read_u16()?;
        let mut places = Vec::with_capacity(place_count as usize);
        for _ in 0..place_count {
            let len = reader.read_u16()?;
            let raw = reader.read_bytes(len as usize)?;
            places.push(String::from_utf8_lossy(raw).into_owned());
        }

        let has_unnamed_areas = reader.read_u8()? != 0;
        let area_count = reader.read_u32()?;
        if area_count == 0 {
            return Err(NavError::NoAreas);
        }

        // The count is untrusted; let truncation stop a bogus one.
        let mut areas = Vec::new();
        for _ in 0..area_count {
            areas.push(NavArea::read(&mut reader)?);
        }

        self.header = NavHeader {
            version,
            sub_version,
            source_bsp_size,
            is_analyzed,
            has_unnamed_areas,
        };
        self.places = places;
        self.areas = areas;
        self.graph = AreaGraph::build(&self.areas);

        tracing::debug!(
            version,
            sub_version,
            places = self.places.len(),
            areas = self.areas.len(),
            edges = self.graph.edge_count(),
            trailing = reader.remaining(),
            "nav mesh loaded"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Header and raw data
    // -----------------------------------------------------------------------

    pub fn version(&self) -> u32 {
        self.header.version
    }

    pub fn sub_version(&self) -> u32 {
        self.header.sub_version
    }

    /// Size of the compiled map the mesh was generated from.
    pub fn source_bsp_size(&self) -> u32 {
        self.header.source_bsp_size
    }

    pub fn is_analyzed(&self) -> bool {
        self.header.is_analyzed
    }

    pub fn has_unnamed_areas(&self) -> bool {
        self.header.has_unnamed_areas
    }

    pub fn areas(&self) -> &[NavArea] {
        &self.areas
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn area_at(&self, index: AreaIndex) -> Option<&NavArea> {
        self.areas.get(index.as_usize())
    }

    pub fn index_of(&self, id: AreaId) -> Option<AreaIndex> {
        self.graph.index_of(id)
    }

    /// Resolved neighbors of the area at `index`.
    pub fn neighbors(&self, index: AreaIndex) -> &[AreaIndex] {
        self.graph.neighbors(index)
    }

    /// Every area that currently lists `id` among its connections.
    pub fn sources_to(&self, id: AreaId) -> BTreeSet<AreaId> {
        graph::sources_to(&self.areas, id)
    }

    // -----------------------------------------------------------------------
    // Places
    // -----------------------------------------------------------------------

    /// Entry `index` of the place table, cut at the first NUL.
    pub fn place_name(&self, index: u16) -> NavResult<&str> {
        let name = self
            .places
            .get(index as usize)
            .ok_or(NavError::PlaceNotFound(index))?;
        Ok(name.split('\0').next().unwrap_or_default())
    }

    /// Name of the place an area belongs to, or `None` for an unnamed area.
    ///
    /// Area place ids are 1-based; 0 means "no place".
    pub fn area_place_name(&self, id: AreaId) -> NavResult<Option<&str>> {
        match self.area_by_id(id)?.place() {
            Some(place) => self.place_name(place - 1).map(Some),
            None => Ok(None),
        }
    }

    // -----------------------------------------------------------------------
    // Area lookup
    // -----------------------------------------------------------------------

    pub fn area_by_id(&self, id: AreaId) -> NavResult<&NavArea> {
        self.index_of(id)
            .and_then(|index| self.area_at(index))
            .ok_or(NavError::AreaNotFound(id))
    }

    /// First area whose box contains `point` in 3D.
    pub fn area_containing(&self, point: Vec3) -> NavResult<&NavArea> {
        locate::area_containing(&self.areas, point)
            .map(|index| &self.areas[index.as_usize()])
            .ok_or(NavError::NoAreaAtPosition(point))
    }

    fn eligible(&self, index: Option<AreaIndex>) -> NavResult<&NavArea> {
        index
            .map(|index| &self.areas[index.as_usize()])
            .ok_or(NavError::NoEligibleArea)
    }

    /// Nearest non-orphan area, by box distance weighted with the configured
    /// z scaling.
    pub fn nearest_area(&self, point: Vec3) -> NavResult<&NavArea> {
        self.eligible(self.nearest_index(point))
    }

    fn nearest_index(&self, point: Vec3) -> Option<AreaIndex> {
        locate::nearest_area(&self.areas, point, self.config.default_z_scaling)
    }

    /// Nearest area, preferring those within `z_below_limit` below and
    /// `z_above_limit` above the point. See `locate::nearest_area_z_limited`.
    pub fn nearest_area_z_limited(
        &self,
        point: Vec3,
        z_below_limit: f32,
        z_above_limit: f32,
    ) -> NavResult<&NavArea> {
        self.eligible(locate::nearest_area_z_limited(
            &self.areas,
            point,
            z_below_limit,
            z_above_limit,
            self.config.default_z_scaling,
        ))
    }

    /// Nearest area with raw place id `place`, by horizontal distance.
    pub fn nearest_area_in_place(&self, point: Vec3, place: u16) -> NavResult<&NavArea> {
        self.eligible(locate::nearest_area_in_place(&self.areas, point, place))
    }

    /// Distance from `point` to every non-orphan area, nearest first.
    pub fn distances_to_point(&self, point: Vec3) -> Vec<AreaDistance> {
        locate::distances_to_point(&self.areas, point, self.config.default_z_scaling)
    }

    // -----------------------------------------------------------------------
    // Paths
    // -----------------------------------------------------------------------

    fn solve(&mut self, start: AreaIndex, goal: AreaIndex) -> Option<PathResult<AreaIndex>> {
        let costs = AreaCosts {
            areas: &self.areas,
            graph: &self.graph,
            avoid: &self.avoid,
            avoidance_penalty_factor: self.config.avoidance_penalty_factor,
        };
        self.search.solve(&costs, start, goal)
    }

    /// Snap both endpoints and search. A single-element route means both
    /// points snapped to the same area.
    fn route(&mut self, from: Vec3, to: Vec3) -> NavResult<Option<Vec<AreaIndex>>> {
        let start = self.nearest_index(from).ok_or(NavError::NoEligibleArea)?;
        let goal = self.nearest_index(to).ok_or(NavError::NoEligibleArea)?;
        if start == goal {
            return Ok(Some(vec![start]));
        }
        Ok(self.solve(start, goal).map(|result| result.nodes))
    }

    /// Waypoints from `from` to `to`: area centers with seam points between
    /// them, ending at `to`. Both points in the same area yields just `[to]`.
    pub fn find_path(&mut self, from: Vec3, to: Vec3) -> NavResult<Option<Vec<Vec3>>> {
        let Some(route) = self.route(from, to)? else {
            return Ok(None);
        };
        if route.len() == 1 {
            return Ok(Some(vec![to]));
        }
        Ok(Some(path::simple_path(&self.areas, &route, to)))
    }

    /// Like `find_path`, with every waypoint tagged by area or seam.
    pub fn find_path_detailed(&mut self, from: Vec3, to: Vec3) -> NavResult<Option<Vec<PathNode>>> {
        let Some(route) = self.route(from, to)? else {
            return Ok(None);
        };
        if let [only] = route[..] {
            return Ok(Some(vec![PathNode::area(self.areas[only.as_usize()].id, to)]));
        }
        Ok(Some(path::detailed_path(&self.areas, &route, to)))
    }

    /// Search cost between two areas under the current costs, or `None` if
    /// the second is unreachable from the first.
    pub fn path_cost(&mut self, from_area: AreaId, to_area: AreaId) -> NavResult<Option<f32>> {
        let start = self.index_of(from_area).ok_or(NavError::AreaNotFound(from_area))?;
        let goal = self.index_of(to_area).ok_or(NavError::AreaNotFound(to_area))?;
        Ok(self.solve(start, goal).map(|result| result.total_cost))
    }

    /// Nodes expanded by the most recent search.
    pub fn last_search_expanded(&self) -> usize {
        self.search.last_expanded()
    }

    pub fn path_length(nodes: &[PathNode]) -> f32 {
        path::path_length(nodes)
    }

    /// Length of `nodes` plus a final leg to `origin`.
    pub fn path_length_from_origin(origin: Vec3, nodes: &[PathNode]) -> f32 {
        path::path_length_from_origin(origin, nodes)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Drop every connection leading into one of `targets`.
    pub fn remove_incoming_edges_to(&mut self, targets: &BTreeSet<AreaId>) {
        self.graph.remove_incoming_edges_to(&mut self.areas, targets);
    }

    /// Drop connections between each pair, in both directions.
    pub fn remove_edges(&mut self, pairs: &BTreeSet<(AreaId, AreaId)>) {
        self.graph.remove_edges(&mut self.areas, pairs);
    }

    /// Areas whose outgoing edges cost extra. Replaces the previous set.
    pub fn set_avoidance_set(&mut self, avoid: BTreeSet<AreaId>) {
        tracing::debug!(areas = avoid.len(), "avoidance set changed");
        self.avoid = avoid;
        self.graph.bump_generation();
    }

    pub fn avoidance_set(&self) -> &BTreeSet<AreaId> {
        &self.avoid
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: NavConfig) {
        self.config = config;
        self.graph.bump_generation();
    }

    /// Advances on every change to topology or costs.
    pub fn generation(&self) -> u64 {
        self.graph.generation()
    }
}
