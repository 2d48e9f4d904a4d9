// Core types shared across the crate.
//
// Defines the two area handles (`AreaId`, the stable id authored into the
// file, and `AreaIndex`, the position in the loaded area list), plus the
// path-output types `PathNode` and `AreaDistance`. Positions are `glam::Vec3`
// in world units, z up.
//
// Keep the two handles apart: ids are sparse and authored, indices are dense
// and only valid for the mesh generation that produced them.

use crate::pathfinding::NodeHandle;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Area handles
// ---------------------------------------------------------------------------

/// Stable area identifier as stored in the nav file. Not dense, not ordered
/// by position in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId(pub u32);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense index into `NavMesh::areas()`. This is the node handle the search
/// engine runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaIndex(pub u32);

impl AreaIndex {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl NodeHandle for AreaIndex {
    fn index(self) -> usize {
        self.0 as usize
    }
}

// ---------------------------------------------------------------------------
// Path output
// ---------------------------------------------------------------------------

/// What a detailed-path waypoint stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathNodeKind {
    /// A point inside one area: its center, or the requested destination.
    Area { id: AreaId },
    /// The crossing point on the seam between two consecutive areas.
    Boundary { from: AreaId, to: AreaId },
}

/// One waypoint of a detailed path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub kind: PathNodeKind,
    pub pos: Vec3,
}

impl PathNode {
    pub fn area(id: AreaId, pos: Vec3) -> Self {
        Self {
            kind: PathNodeKind::Area { id },
            pos,
        }
    }

    pub fn boundary(from: AreaId, to: AreaId, pos: Vec3) -> Self {
        Self {
            kind: PathNodeKind::Boundary { from, to },
            pos,
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self.kind, PathNodeKind::Boundary { .. })
    }
}

/// An area and its distance to some query point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaDistance {
    pub area_id: AreaId,
    pub distance: f32,
}
