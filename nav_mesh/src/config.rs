// Data-driven tunables for path search and area selection.
//
// `NavConfig` is plain serde data, loadable from JSON. The defaults reproduce
// the long-standing constants bots were tuned against, so a mesh built with
// `NavConfig::default()` plans exactly as before.
//
// Changing the config on a live mesh (`NavMesh::set_config`) bumps the mesh
// generation, since it changes edge costs.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable parameters of a `NavMesh`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Multiplier on the avoidance penalty. Leaving an avoided area costs an
    /// extra `avoidance_penalty_factor * (longest center-to-center hop to any
    /// of its neighbors)` on top of the plain distance.
    pub avoidance_penalty_factor: f32,
    /// Weight on the vertical term of point-to-box distance when a caller does
    /// not pass one. Values above 1 penalize vertical separation.
    pub default_z_scaling: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            avoidance_penalty_factor: 10.0,
            default_z_scaling: 1.0,
        }
    }
}

impl NavConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text).map_err(std::io::Error::other)
    }
}
