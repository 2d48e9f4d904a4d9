// nav_mesh: area-graph navigation over Source-engine `.nav` meshes.
//
// This crate loads the binary description of a level's walkable surface (a
// set of axis-aligned rectangular "areas" wired into a graph) and answers
// shortest-path queries between arbitrary 3D points. Consumers are bots that
// need a walkable route and its length.
//
// Module overview:
// - `nav_file.rs`:   `NavMesh`: loading, header validation, and every public
//                    query. The only type most callers touch.
// - `buffer.rs`:     Little-endian cursor over the raw file bytes; reports
//                    truncation instead of panicking.
// - `area.rs`:       `NavArea`: decoding of one area record plus box geometry
//                    (center, corners, containment).
// - `graph.rs`:      `AreaGraph`: id -> index map, flattened adjacency arrays,
//                    edge removal, and the generation counter.
// - `locate.rs`:     Point-location and nearest-area queries over the areas.
// - `pathfinding.rs`: A* over any `SearchGraph`, with a generation-stamped
//                    adjacency cache.
// - `path.rs`:       Turning an area-index sequence into waypoints (simple and
//                    detailed) plus path-length helpers.
// - `config.rs`:     `NavConfig`: serde-loadable tunables.
// - `types.rs`:      `AreaId`, `AreaIndex`, `PathNode`, `AreaDistance`.
// - `error.rs`:      `NavError` and its coarse `NavErrorKind`.
//
// **Threading.** Nothing in here locks. Loading, edge removal, and avoidance
// changes take `&mut NavMesh`; so does path search, because the engine reuses
// its scratch buffers and cache. Callers sharing a mesh across threads must
// serialize access themselves.

pub mod area;
pub mod buffer;
pub mod config;
pub mod error;
pub mod graph;
pub mod locate;
pub mod nav_file;
pub mod path;
pub mod pathfinding;
pub mod types;

pub use area::NavArea;
pub use config::NavConfig;
pub use error::{NavError, NavErrorKind, NavResult};
pub use glam::Vec3;
pub use nav_file::NavMesh;
pub use types::{AreaDistance, AreaId, AreaIndex, PathNode, PathNodeKind};
