// A single nav area: decoding of its record and its box geometry.
//
// An area is an axis-aligned rectangle of walkable floor. The file stores two
// opposing corners: `nw_corner` holds the x/y minima and `se_corner` the x/y
// maxima, while z can run either way (sloped areas), which is why
// `min_corner`/`max_corner` take a component-wise min/max.
//
// Record layout (version 16, little-endian), in read order:
//   id, attribute flags, nw corner, se corner, ne z, sw z,
//   4 x connection lists (north, east, south, west),
//   hiding spots, encounter paths, place, 2 x ladder lists (up, down),
//   earliest occupy times, light intensities, visible areas,
//   inherit-visibility id, approach spots (opaque, skipped).
//
// Only `connections` changes after load: edge removal in `graph.rs` filters
// it in place.
//
// See also: `nav_file.rs` which reads the header and calls `NavArea::read`
// once per area, `graph.rs` which resolves `connections` into indices.

use crate::buffer::NavReader;
use crate::error::NavResult;
use crate::types::AreaId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Size of one opaque approach-spot record at the tail of an area.
const APPROACH_SPOT_SIZE: usize = 14;

/// Which side of the area a connection leaves from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavDirection {
    North,
    East,
    South,
    West,
}

impl NavDirection {
    /// File order of the per-direction connection lists.
    pub const ALL: [NavDirection; 4] = [
        NavDirection::North,
        NavDirection::East,
        NavDirection::South,
        NavDirection::West,
    ];
}

/// A raw, unresolved link to another area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavConnection {
    pub id: AreaId,
    pub direction: NavDirection,
}

/// A spot where a player can hide, authored per area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HidingSpot {
    pub id: u32,
    pub position: Vec3,
    pub flags: u8,
}

/// A spot along an encounter path, as a parametric distance in 0..=255.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSpot {
    pub area_id: AreaId,
    pub t: u8,
}

/// Precomputed line-of-sight route through this area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterPath {
    pub from_area_id: AreaId,
    pub from_direction: u8,
    pub to_area_id: AreaId,
    pub to_direction: u8,
    pub spots: Vec<EncounterSpot>,
}

/// Potentially visible area entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleArea {
    pub id: AreaId,
    pub attributes: u8,
}

/// One walkable rectangle of the mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavArea {
    pub id: AreaId,
    pub attribute_flags: u32,
    pub nw_corner: Vec3,
    pub se_corner: Vec3,
    /// Derived: midpoint of the two stored corners.
    pub center: Vec3,
    pub ne_z: f32,
    pub sw_z: f32,
    /// Outgoing links, north list first. May shrink through edge removal.
    pub connections: SmallVec<[NavConnection; 4]>,
    pub hiding_spots: Vec<HidingSpot>,
    pub encounter_paths: Vec<EncounterPath>,
    /// Raw place id; 0 means the area belongs to no place.
    pub place: u16,
    /// Ladder ids, `[up, down]`.
    pub ladders: [Vec<u32>; 2],
    pub earliest_occupy_time: [f32; 2],
    pub light_intensity: [f32; 4],
    pub visible_areas: Vec<VisibleArea>,
    pub inherit_visibility_from: AreaId,
}

impl NavArea {
    /// Build a bare area from its corners, with no connections. Everything
    /// not geometric is zeroed.
    pub fn new(id: AreaId, nw_corner: Vec3, se_corner: Vec3) -> Self {
        Self {
            id,
            attribute_flags: 0,
            nw_corner,
            se_corner,
            center: (nw_corner + se_corner) / 2.0,
            ne_z: nw_corner.z,
            sw_z: se_corner.z,
            connections: SmallVec::new(),
            hiding_spots: Vec::new(),
            encounter_paths: Vec::new(),
            place: 0,
            ladders: [Vec::new(), Vec::new()],
            earliest_occupy_time: [0.0; 2],
            light_intensity: [0.0; 4],
            visible_areas: Vec::new(),
            inherit_visibility_from: AreaId(0),
        }
    }

    /// Builder-style: append a connection to `id` on the given side.
    pub fn with_connection(mut self, id: AreaId, direction: NavDirection) -> Self {
        self.connections.push(NavConnection { id, direction });
        self
    }

    /// Builder-style: set the raw place id.
    pub fn with_place(mut self, place: u16) -> Self {
        self.place = place;
        self
    }

    /// Decode one area record at the reader's cursor.
    pub fn read(reader: &mut NavReader<'_>) -> NavResult<Self> {
        let id = AreaId(reader.read_u32()?);
        let attribute_flags = reader.read_u32()?;
        let nw_corner = reader.read_vec3()?;
        let se_corner = reader.read_vec3()?;
        let ne_z = reader.read_f32()?;
        let sw_z = reader.read_f32()?;

        let mut connections = SmallVec::new();
        for direction in NavDirection::ALL {
            let count = reader.read_u32()?;
            for _ in 0..count {
                let id = AreaId(reader.read_u32()?);
                connections.push(NavConnection { id, direction });
            }
        }

        let hiding_spot_count = reader.read_u8()?;
        let mut hiding_spots = Vec::with_capacity(hiding_spot_count as usize);
        for _ in 0..hiding_spot_count {
            hiding_spots.push(HidingSpot {
                id: reader.read_u32()?,
                position: reader.read_vec3()?,
                flags: reader.read_u8()?,
            });
        }

        // Counts come straight from the file; don't pre-allocate on them.
        let encounter_path_count = reader.read_u32()?;
        let mut encounter_paths = Vec::new();
        for _ in 0..encounter_path_count {
            let from_area_id = AreaId(reader.read_u32()?);
            let from_direction = reader.read_u8()?;
            let to_area_id = AreaId(reader.read_u32()?);
            let to_direction = reader.read_u8()?;
            let spot_count = reader.read_u8()?;
            let mut spots = Vec::with_capacity(spot_count as usize);
            for _ in 0..spot_count {
                spots.push(EncounterSpot {
                    area_id: AreaId(reader.read_u32()?),
                    t: reader.read_u8()?,
                });
            }
            encounter_paths.push(EncounterPath {
                from_area_id,
                from_direction,
                to_area_id,
                to_direction,
                spots,
            });
        }

        let place = reader.read_u16()?;

        let mut ladders = [Vec::new(), Vec::new()];
        for ladder_list in &mut ladders {
            let count = reader.read_u32()?;
            for _ in 0..count {
                ladder_list.push(reader.read_u32()?);
            }
        }

        let earliest_occupy_time = [reader.read_f32()?, reader.read_f32()?];
        let light_intensity = [
            reader.read_f32()?,
            reader.read_f32()?,
            reader.read_f32()?,
            reader.read_f32()?,
        ];

        let visible_count = reader.read_u32()?;
        let mut visible_areas = Vec::new();
        for _ in 0..visible_count {
            visible_areas.push(VisibleArea {
                id: AreaId(reader.read_u32()?),
                attributes: reader.read_u8()?,
            });
        }

        let inherit_visibility_from = AreaId(reader.read_u32()?);

        let approach_spot_count = reader.read_u8()?;
        reader.skip(approach_spot_count as usize * APPROACH_SPOT_SIZE)?;

        Ok(Self {
            id,
            attribute_flags,
            nw_corner,
            se_corner,
            center: (nw_corner + se_corner) / 2.0,
            ne_z,
            sw_z,
            connections,
            hiding_spots,
            encounter_paths,
            place,
            ladders,
            earliest_occupy_time,
            light_intensity,
            visible_areas,
            inherit_visibility_from,
        })
    }

    /// Raw place id, or `None` for an unnamed area.
    pub fn place(&self) -> Option<u16> {
        (self.place != 0).then_some(self.place)
    }

    pub fn min_corner(&self) -> Vec3 {
        self.nw_corner.min(self.se_corner)
    }

    pub fn max_corner(&self) -> Vec3 {
        self.nw_corner.max(self.se_corner)
    }

    /// True if the area has no outgoing connections left. Such areas are
    /// treated as broken and skipped by nearest-area queries.
    pub fn is_orphan(&self) -> bool {
        self.connections.is_empty()
    }

    /// Inclusive containment on x and y only.
    pub fn contains_2d(&self, point: Vec3) -> bool {
        point.x >= self.nw_corner.x
            && point.x <= self.se_corner.x
            && point.y >= self.nw_corner.y
            && point.y <= self.se_corner.y
    }

    /// Inclusive containment on all three axes.
    pub fn contains_3d(&self, point: Vec3) -> bool {
        self.contains_2d(point)
            && point.z >= self.min_corner().z
            && point.z <= self.max_corner().z
    }

    /// Raw ids this area links to, in stored order.
    pub fn connection_ids(&self) -> impl Iterator<Item = AreaId> + '_ {
        self.connections.iter().map(|c| c.id)
    }
}
