//! File-backed state persistence.
//!
//! Layout next to every saved document:
//! ```text
//! scene.json          - pretty-printed StateDocument
//! scene.json.sha256   - hex sha256 of scene.json
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use displayblock_kernel::Viewport;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::state::{State, StateDocument};

/// Saves and loads state documents with an integrity sidecar.
pub struct StateStore;

impl StateStore {
    /// Path of the checksum file kept next to `path`.
    pub fn sidecar_path(path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(".sha256");
        PathBuf::from(name)
    }

    /// Write the document as pretty JSON plus its sha256 sidecar.
    pub fn save(path: impl AsRef<Path>, doc: &StateDocument) -> Result<(), StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(doc)?;
        let hash = sha256_hex(&bytes);
        std::fs::write(path, &bytes)?;
        std::fs::write(Self::sidecar_path(path), &hash)?;
        debug!(path = %path.display(), sha256 = %hash, "state saved");
        Ok(())
    }

    /// Read a document, verifying it against the sidecar when one exists.
    pub fn load(path: impl AsRef<Path>) -> Result<StateDocument, StoreError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;

        let sidecar = Self::sidecar_path(path);
        if sidecar.exists() {
            let expected = std::fs::read_to_string(&sidecar)?.trim().to_owned();
            let actual = sha256_hex(&bytes);
            if actual != expected {
                return Err(StoreError::IntegrityMismatch { expected, actual });
            }
        } else {
            warn!(path = %path.display(), "no checksum sidecar, loading unverified");
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save_viewport(path: impl AsRef<Path>, viewport: &Viewport) -> Result<(), StoreError> {
        Self::save(path, &State::export(viewport))
    }

    pub fn load_viewport(path: impl AsRef<Path>) -> Result<Viewport, StoreError> {
        Ok(State::import(&Self::load(path)?))
    }
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
