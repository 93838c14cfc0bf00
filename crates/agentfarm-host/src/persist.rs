//! Loading and saving the farm state document.
//!
//! The state lives in a single JSON file. Saves go through a sibling temp
//! file and a rename so a crash mid-write never leaves a truncated
//! document behind. Loading never fails: a missing file means a new farm,
//! and a corrupt one is moved aside and replaced by a new farm.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use agentfarm_core::{FarmConfig, default_farm_state};
use agentfarm_types::FarmState;
use chrono::{DateTime, Utc};

/// Failure writing the state document.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// A filesystem operation failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// File being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The state could not be serialized.
    #[error("failed to encode farm state: {source}")]
    Encode {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },
}

/// Load the saved farm at `path`, or generate a fresh one.
pub fn load_or_default(path: &Path, config: &FarmConfig, now: DateTime<Utc>) -> FarmState {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<FarmState>(&raw) {
            Ok(state) => {
                tracing::info!(
                    path = %path.display(),
                    version = state.version,
                    pawns = state.pawns.len(),
                    "farm state loaded"
                );
                return state;
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "farm state is corrupt, starting a new farm"
                );
                quarantine(path);
            }
        },
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no saved farm, starting a new one");
        }
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                %error,
                "farm state unreadable, starting a new farm"
            );
        }
    }
    default_farm_state(config, now)
}

/// Write `state` to `path` atomically.
pub fn save_state(path: &Path, state: &FarmState) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(state)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PersistError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp = sibling(path, "tmp");
    std::fs::write(&temp, json).map_err(|source| PersistError::Io {
        path: temp.clone(),
        source,
    })?;
    std::fs::rename(&temp, path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "farm state saved");
    Ok(())
}

/// Move a corrupt document out of the way so the next save cannot
/// overwrite it.
fn quarantine(path: &Path) {
    let backup = sibling(path, "corrupt");
    match std::fs::rename(path, &backup) {
        Ok(()) => {
            tracing::warn!(backup = %backup.display(), "corrupt farm state kept for inspection");
        }
        Err(error) => tracing::warn!(%error, "could not move corrupt farm state aside"),
    }
}

/// `path` with `.suffix` appended to the file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
