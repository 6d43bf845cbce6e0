//! Versioned JSON snapshots of a match.
//!
//! A snapshot captures the entire [`MatchState`] so a match can be
//! persisted and resumed. The envelope carries a format version;
//! loading a snapshot written by an incompatible build is refused
//! rather than silently misread.

use serde::{Deserialize, Serialize};

use crate::match_state::MatchState;

/// Bumped whenever the serialized shape of [`MatchState`] changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub version: u32,
    pub state: MatchState,
}

#[derive(Debug)]
pub enum SnapshotError {
    /// The snapshot was written by an incompatible format version.
    VersionMismatch { found: u32, expected: u32 },
    Json(serde_json::Error),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::VersionMismatch { found, expected } => {
                write!(f, "snapshot version {found} is not supported (expected {expected})")
            }
            SnapshotError::Json(err) => write!(f, "snapshot JSON error: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Json(err)
    }
}

/// Serializes the match, wrapped in a versioned envelope.
pub fn to_json(state: &MatchState) -> Result<String, SnapshotError> {
    let snapshot = MatchSnapshot {
        version: SNAPSHOT_VERSION,
        state: state.clone(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Restores a match from a snapshot produced by [`to_json`].
pub fn from_json(json: &str) -> Result<MatchState, SnapshotError> {
    let snapshot: MatchSnapshot = serde_json::from_str(json)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(snapshot.state)
}
