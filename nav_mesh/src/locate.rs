// Point-location and nearest-area queries.
//
// All queries are linear scans in stored area order, so "first" is always
// well defined: containment returns the first box that holds the point, and
// nearest-distance ties go to the earlier area.
//
// Nearest-area queries skip orphans (areas with no connections left). Such
// areas come from broken authoring or from edge removal, and snapping a bot
// onto one would strand it. `area_containing` does not skip them; it answers
// the purely geometric question.
//
// Box distance is the Euclidean distance from the point to the nearest point
// of the area's box, zero inside. The z term can be weighted separately to
// bias selection against areas stacked above or below the point.

use crate::area::NavArea;
use crate::types::{AreaDistance, AreaIndex};
use glam::Vec3;

fn axis_gap(value: f32, min: f32, max: f32) -> f32 {
    (min - value).max((value - max).max(0.0))
}

/// Distance from `point` to the area's box, with the z gap multiplied by
/// `z_scaling`.
pub fn point_to_area_distance(point: Vec3, area: &NavArea, z_scaling: f32) -> f32 {
    let min = area.min_corner();
    let max = area.max_corner();
    let dx = axis_gap(point.x, min.x, max.x);
    let dy = axis_gap(point.y, min.y, max.y);
    let dz = axis_gap(point.z, min.z, max.z) * z_scaling;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// `point_to_area_distance`, short-circuiting to zero on 3D containment.
pub fn point_to_area_distance_within(point: Vec3, area: &NavArea, z_scaling: f32) -> f32 {
    if area.contains_3d(point) {
        0.0
    } else {
        point_to_area_distance(point, area, z_scaling)
    }
}

/// Horizontal distance from `point` to the area's box, ignoring z.
pub fn point_to_area_distance_2d(point: Vec3, area: &NavArea) -> f32 {
    let min = area.min_corner();
    let max = area.max_corner();
    let dx = axis_gap(point.x, min.x, max.x);
    let dy = axis_gap(point.y, min.y, max.y);
    (dx * dx + dy * dy).sqrt()
}

/// The point of the area's box closest to `point`.
pub fn nearest_point_in_area(point: Vec3, area: &NavArea) -> Vec3 {
    point.clamp(area.min_corner(), area.max_corner())
}

/// First area, in stored order, whose box contains `point` on all three axes.
pub fn area_containing(areas: &[NavArea], point: Vec3) -> Option<AreaIndex> {
    areas
        .iter()
        .position(|area| area.contains_3d(point))
        .map(|i| AreaIndex(i as u32))
}

/// Running minimum that keeps the first of equal candidates.
#[derive(Clone, Copy, Debug)]
struct Nearest {
    best: Option<(AreaIndex, f32)>,
}

impl Nearest {
    fn new() -> Self {
        Self { best: None }
    }

    fn offer(&mut self, index: AreaIndex, distance: f32) {
        match self.best {
            Some((_, best)) if distance >= best => {}
            _ => self.best = Some((index, distance)),
        }
    }

    fn index(self) -> Option<AreaIndex> {
        self.best.map(|(index, _)| index)
    }
}

fn eligible(areas: &[NavArea]) -> impl Iterator<Item = (AreaIndex, &NavArea)> {
    areas
        .iter()
        .enumerate()
        .filter(|(_, area)| !area.is_orphan())
        .map(|(i, area)| (AreaIndex(i as u32), area))
}

/// Area nearest to `point` by box distance. An area containing the point in
/// 3D wins immediately. `None` when every area is an orphan.
pub fn nearest_area(areas: &[NavArea], point: Vec3, z_scaling: f32) -> Option<AreaIndex> {
    let mut nearest = Nearest::new();
    for (index, area) in eligible(areas) {
        if area.contains_3d(point) {
            return Some(index);
        }
        nearest.offer(index, point_to_area_distance(point, area, z_scaling));
    }
    nearest.index()
}

/// Nearest area preferring ones within a vertical window.
///
/// Areas whose box lies no more than `z_above_limit` above and `z_below_limit`
/// below the point compete on horizontal distance; if none do, the nearest
/// by full 3D distance is returned. 3D containment still wins outright.
pub fn nearest_area_z_limited(
    areas: &[NavArea],
    point: Vec3,
    z_below_limit: f32,
    z_above_limit: f32,
    z_scaling: f32,
) -> Option<AreaIndex> {
    let mut nearest_2d = Nearest::new();
    let mut nearest_3d = Nearest::new();
    for (index, area) in eligible(areas) {
        if area.contains_3d(point) {
            return Some(index);
        }
        let above = area.min_corner().z - point.z;
        let below = point.z - area.max_corner().z;
        if above <= z_above_limit && below <= z_below_limit {
            nearest_2d.offer(index, point_to_area_distance_2d(point, area));
        }
        nearest_3d.offer(index, point_to_area_distance(point, area, z_scaling));
    }
    nearest_2d.index().or(nearest_3d.index())
}

/// Nearest area by horizontal distance among areas with raw place id `place`.
pub fn nearest_area_in_place(areas: &[NavArea], point: Vec3, place: u16) -> Option<AreaIndex> {
    let mut nearest = Nearest::new();
    for (index, area) in eligible(areas).filter(|(_, area)| area.place == place) {
        if area.contains_3d(point) {
            return Some(index);
        }
        nearest.offer(index, point_to_area_distance_2d(point, area));
    }
    nearest.index()
}

/// Box distance from `point` to every non-orphan area, nearest first. Equal
/// distances keep stored order.
pub fn distances_to_point(areas: &[NavArea], point: Vec3, z_scaling: f32) -> Vec<AreaDistance> {
    let mut result: Vec<AreaDistance> = eligible(areas)
        .map(|(_, area)| AreaDistance {
            area_id: area.id,
            distance: point_to_area_distance(point, area, z_scaling),
        })
        .collect();
    result.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    result
}
