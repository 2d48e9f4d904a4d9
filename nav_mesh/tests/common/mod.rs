// Shared helpers for the integration tests: a little-endian nav file encoder
// and generators for simple meshes.
//
// The encoder writes exactly the version-16 layout `NavMesh` reads, so tests
// can exercise the real `open` path on synthetic files.

#![allow(dead_code)]

use nav_mesh::area::{NavConnection, NavDirection};
use nav_mesh::nav_file::{NAV_MAGIC, SUPPORTED_VERSION};
use nav_mesh::{AreaId, NavArea, Vec3};
use std::path::PathBuf;
use tempfile::TempDir;

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_f32(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_vec3(out: &mut Vec<u8>, v: Vec3) {
    for c in v.to_array() {
        put_f32(out, c);
    }
}

/// Encode one area record. Encounter paths and visible areas are written
/// empty; every area gets one approach spot so the skip path is exercised.
pub fn encode_area(out: &mut Vec<u8>, area: &NavArea) {
    put_u32(out, area.id.0);
    put_u32(out, area.attribute_flags);
    put_vec3(out, area.nw_corner);
    put_vec3(out, area.se_corner);
    put_f32(out, area.ne_z);
    put_f32(out, area.sw_z);
    for direction in NavDirection::ALL {
        let ids: Vec<u32> = area
            .connections
            .iter()
            .filter(|c| c.direction == direction)
            .map(|c| c.id.0)
            .collect();
        put_u32(out, ids.len() as u32);
        for id in ids {
            put_u32(out, id);
        }
    }
    out.push(area.hiding_spots.len() as u8);
    for spot in &area.hiding_spots {
        put_u32(out, spot.id);
        put_vec3(out, spot.position);
        out.push(spot.flags);
    }
    put_u32(out, 0);
    out.extend_from_slice(&area.place.to_le_bytes());
    for ladder_list in &area.ladders {
        put_u32(out, ladder_list.len() as u32);
        for &id in ladder_list {
            put_u32(out, id);
        }
    }
    for t in area.earliest_occupy_time {
        put_f32(out, t);
    }
    for l in area.light_intensity {
        put_f32(out, l);
    }
    put_u32(out, 0);
    put_u32(out, area.inherit_visibility_from.0);
    out.push(1);
    out.extend_from_slice(&[0xAB; 14]);
}

/// Encode a full nav file.
pub fn encode_mesh(places: &[&str], areas: &[NavArea]) -> Vec<u8> {
    let mut out = Vec::new();
    put_u32(&mut out, NAV_MAGIC);
    put_u32(&mut out, SUPPORTED_VERSION);
    put_u32(&mut out, 1);
    put_u32(&mut out, 4096);
    out.push(1);
    out.extend_from_slice(&(places.len() as u16).to_le_bytes());
    for place in places {
        let mut bytes = place.as_bytes().to_vec();
        bytes.push(0);
        out.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
        out.extend_from_slice(&bytes);
    }
    out.push(1);
    put_u32(&mut out, areas.len() as u32);
    for area in areas {
        encode_area(&mut out, area);
    }
    out
}

/// Write `bytes` to `name` inside a fresh temp dir. Keep the dir alive for
/// as long as the file is needed.
pub fn write_temp(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}

/// Id of the grid cell at `(col, row)`. Deliberately sparse.
pub fn grid_id(cols: u32, col: u32, row: u32) -> AreaId {
    AreaId((row * cols + col) * 3 + 7)
}

/// `cols` x `rows` grid of flat `size` x `size` squares at z = 0, each
/// linked to its four-neighbors.
pub fn grid(cols: u32, rows: u32, size: f32) -> Vec<NavArea> {
    let mut areas = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let min = Vec3::new(col as f32 * size, row as f32 * size, 0.0);
            let mut area = NavArea::new(grid_id(cols, col, row), min, min + Vec3::new(size, size, 0.0));
            let mut link = |c: u32, r: u32, direction| {
                area.connections.push(NavConnection {
                    id: grid_id(cols, c, r),
                    direction,
                });
            };
            if row > 0 {
                link(col, row - 1, NavDirection::North);
            }
            if col + 1 < cols {
                link(col + 1, row, NavDirection::East);
            }
            if row + 1 < rows {
                link(col, row + 1, NavDirection::South);
            }
            if col > 0 {
                link(col - 1, row, NavDirection::West);
            }
            areas.push(area);
        }
    }
    areas
}
