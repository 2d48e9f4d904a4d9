// Turning an area route into waypoints.
//
// The search returns a sequence of area indices. Bots need points, so each
// route is expanded into area centers with a crossing point inserted on the
// seam between every consecutive pair of areas, followed by the requested
// destination.
//
// Two flavors exist and they deliberately do not share seam logic:
// - `simple_path` finds the seam by exact edge equality, places the crossing
//   at `(min of maxes + min of mins) / 2` on the cross axis, and takes the
//   average height of the two centers.
// - `detailed_path` accepts near-adjacent boxes (`max <= min`, which lets
//   slightly overlapping areas from angled geometry through), uses the true
//   overlap `(min of maxes + max of mins) / 2`, and keeps the earlier area's
//   center height so a drop doesn't produce an unreachable mid-air point.
// Bots were tuned against both outputs; keep them distinct.
//
// Corner naming follows the file: `nw_corner` holds the x/y minima,
// `se_corner` the x/y maxima.

use crate::area::NavArea;
use crate::types::{AreaIndex, PathNode};
use glam::Vec3;

/// Crossing point between `prev` and `next` for the simple path.
pub fn simple_seam_point(prev: &NavArea, next: &NavArea) -> Vec3 {
    let prev_below_x = next.nw_corner.x == prev.se_corner.x;
    let next_below_x = next.se_corner.x == prev.nw_corner.x;
    let prev_below_y = next.nw_corner.y == prev.se_corner.y;

    let mut seam = Vec3::ZERO;
    if prev_below_x || next_below_x {
        seam.x = if prev_below_x {
            next.nw_corner.x
        } else {
            prev.nw_corner.x
        };
        let hi = next.se_corner.y.min(prev.se_corner.y);
        let lo = next.nw_corner.y.min(prev.nw_corner.y);
        seam.y = (hi + lo) / 2.0;
    } else {
        seam.y = if prev_below_y {
            next.nw_corner.y
        } else {
            prev.nw_corner.y
        };
        let hi = next.se_corner.x.min(prev.se_corner.x);
        let lo = next.nw_corner.x.min(prev.nw_corner.x);
        seam.x = (hi + lo) / 2.0;
    }
    seam.z = (next.center.z + prev.center.z) / 2.0;
    seam
}

/// Crossing point between `prev` and `next` for the detailed path.
pub fn detailed_seam_point(prev: &NavArea, next: &NavArea) -> Vec3 {
    let prev_below_x = prev.max_corner().x <= next.min_corner().x;
    let next_below_x = next.max_corner().x <= prev.min_corner().x;
    let prev_below_y = prev.max_corner().y <= next.min_corner().y;
    let next_below_y = next.max_corner().y <= prev.min_corner().y;

    if !(prev_below_x || next_below_x || prev_below_y || next_below_y) {
        // Overhangs on angled geometry produce these; the midpoint below is
        // still usable.
        tracing::trace!(from = %prev.id, to = %next.id, "path crosses overlapping areas");
    }

    let mut seam = Vec3::ZERO;
    if prev_below_x || next_below_x {
        seam.x = if prev_below_x {
            next.nw_corner.x
        } else {
            prev.nw_corner.x
        };
        let hi = next.se_corner.y.min(prev.se_corner.y);
        let lo = next.nw_corner.y.max(prev.nw_corner.y);
        seam.y = (hi + lo) / 2.0;
    } else {
        seam.y = if prev_below_y {
            next.nw_corner.y
        } else {
            prev.nw_corner.y
        };
        let hi = next.se_corner.x.min(prev.se_corner.x);
        let lo = next.nw_corner.x.max(prev.nw_corner.x);
        seam.x = (hi + lo) / 2.0;
    }
    seam.z = prev.center.z;
    seam
}

/// Centers of the route's areas with seam points between them, then
/// `destination`.
pub fn simple_path(areas: &[NavArea], route: &[AreaIndex], destination: Vec3) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(route.len() * 2 + 1);
    for (i, &index) in route.iter().enumerate() {
        let area = &areas[index.as_usize()];
        if i != 0 {
            let prev = &areas[route[i - 1].as_usize()];
            points.push(simple_seam_point(prev, area));
        }
        points.push(area.center);
    }
    points.push(destination);
    points
}

/// Like `simple_path`, but every point is tagged with the area (or pair of
/// areas) it belongs to. The destination is tagged with the last area of the
/// route.
pub fn detailed_path(areas: &[NavArea], route: &[AreaIndex], destination: Vec3) -> Vec<PathNode> {
    let mut nodes = Vec::with_capacity(route.len() * 2 + 1);
    for (i, &index) in route.iter().enumerate() {
        let area = &areas[index.as_usize()];
        if i != 0 {
            let prev = &areas[route[i - 1].as_usize()];
            nodes.push(PathNode::boundary(
                prev.id,
                area.id,
                detailed_seam_point(prev, area),
            ));
        }
        nodes.push(PathNode::area(area.id, area.center));
    }
    if let Some(&last) = route.last() {
        nodes.push(PathNode::area(areas[last.as_usize()].id, destination));
    }
    nodes
}

/// Sum of straight-line distances between consecutive points.
pub fn polyline_length(points: impl IntoIterator<Item = Vec3>) -> f32 {
    let mut points = points.into_iter();
    let Some(mut prev) = points.next() else {
        return 0.0;
    };
    let mut total = 0.0;
    for point in points {
        total += (point - prev).length();
        prev = point;
    }
    total
}

/// Length of a detailed path.
pub fn path_length(nodes: &[PathNode]) -> f32 {
    polyline_length(nodes.iter().map(|n| n.pos))
}

/// Length of a detailed path extended by one more leg to `origin`.
pub fn path_length_from_origin(origin: Vec3, nodes: &[PathNode]) -> f32 {
    polyline_length(nodes.iter().map(|n| n.pos).chain(std::iter::once(origin)))
}
