//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Backup rotation (tmp → save, old save → backup)
//! - Falls back to the backup when the main file is unreadable

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Envelope format version written by this build
pub const CURRENT_VERSION: u32 = 1;

/// Versioned wrapper around a saved payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            version: CURRENT_VERSION,
            payload,
        }
    }
}

/// Encode a payload into an envelope
pub fn encode<T: Serialize>(payload: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(&Envelope::new(payload))?)
}

/// Decode an envelope, rejecting versions newer than this build
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(json)?;
    if envelope.version > CURRENT_VERSION {
        return Err(GameError::UnsupportedVersion(envelope.version));
    }
    Ok(envelope.payload)
}

fn sibling(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(extension);
    path.with_file_name(name)
}

/// Path of the backup kept next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    sibling(path, "bak")
}

/// Write atomically: temp file first, previous save rotated to the backup
pub fn save<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    let json = encode(payload)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let tmp = sibling(path, "tmp");
    fs::write(&tmp, json)?;
    if path.exists() {
        fs::rename(path, backup_path(path))?;
    }
    fs::rename(&tmp, path)?;
    log::debug!("Saved {}", path.display());
    Ok(())
}

/// Load a payload, trying the backup if the main file is damaged
///
/// Returns `Ok(None)` when neither file exists.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let backup = backup_path(path);
    if !path.exists() && !backup.exists() {
        return Ok(None);
    }

    let main = fs::read_to_string(path)
        .map_err(GameError::from)
        .and_then(|json| decode::<T>(&json));
    match main {
        Ok(payload) => Ok(Some(payload)),
        Err(e) if backup.exists() => {
            log::warn!("{} unreadable ({}), trying backup", path.display(), e);
            decode(&fs::read_to_string(&backup)?).map(Some)
        }
        Err(e) => Err(e),
    }
}
