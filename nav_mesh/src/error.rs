// Error types for loading and querying a nav mesh.
//
// Hard failures only. A path that does not exist between two disconnected
// regions is a normal outcome and is returned as `None`, never as an error.

use crate::types::AreaId;
use glam::Vec3;
use std::path::PathBuf;

/// Result type for nav mesh operations.
pub type NavResult<T> = Result<T, NavError>;

/// Errors raised while loading or querying a nav mesh.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// The nav file could not be read from disk.
    #[error("failed to read nav file {}: {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file does not start with the nav magic number.
    #[error("nav magic mismatch: expected {expected:#010x}, found {found:#010x}")]
    BadMagic { expected: u32, found: u32 },

    /// The file declares a format version other than the supported one.
    #[error("unsupported nav version {found} (only version {supported} is supported)")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The header declares zero areas.
    #[error("nav mesh contains no areas")]
    NoAreas,

    /// A read ran past the end of the buffer.
    #[error("nav data truncated: needed {needed} bytes at offset {offset}, only {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// No area with this id exists in the loaded mesh.
    #[error("no area with id {0}")]
    AreaNotFound(AreaId),

    /// Place index is outside the place table.
    #[error("no place at index {0}")]
    PlaceNotFound(u16),

    /// No area contains the given point.
    #[error("no area contains point {0}")]
    NoAreaAtPosition(Vec3),

    /// Every candidate area was filtered out (orphans, wrong place, empty mesh).
    #[error("no eligible area for nearest-area query")]
    NoEligibleArea,
}

/// Coarse classification of a [`NavError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavErrorKind {
    /// The file could not be read at all.
    Io,
    /// Bad magic, unsupported version, or an empty mesh.
    Format,
    /// The byte stream ended mid-record.
    Truncated,
    /// A lookup failed against a loaded mesh.
    NotFound,
}

impl NavError {
    pub fn kind(&self) -> NavErrorKind {
        match self {
            NavError::Io { .. } => NavErrorKind::Io,
            NavError::BadMagic { .. } | NavError::UnsupportedVersion { .. } | NavError::NoAreas => {
                NavErrorKind::Format
            }
            NavError::Truncated { .. } => NavErrorKind::Truncated,
            NavError::AreaNotFound(_)
            | NavError::PlaceNotFound(_)
            | NavError::NoAreaAtPosition(_)
            | NavError::NoEligibleArea => NavErrorKind::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(NavError::NoAreas.kind(), NavErrorKind::Format);
        assert_eq!(
            NavError::BadMagic {
                expected: 1,
                found: 2
            }
            .kind(),
            NavErrorKind::Format
        );
        assert_eq!(
            NavError::Truncated {
                offset: 0,
                needed: 4,
                available: 1
            }
            .kind(),
            NavErrorKind::Truncated
        );
        assert_eq!(
            NavError::AreaNotFound(AreaId(7)).kind(),
            NavErrorKind::NotFound
        );
    }

    #[test]
    fn messages_mention_the_offending_value() {
        let msg = NavError::UnsupportedVersion {
            found: 9,
            supported: 16,
        }
        .to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains("16"));
        assert!(NavError::AreaNotFound(AreaId(42)).to_string().contains("42"));
    }
}
