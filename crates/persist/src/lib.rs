//! Persistence: viewport state as a JSON document, and a file store for it.
//!
//! # Invariants
//! - Import clears the target viewport before rebuilding it.
//! - Export followed by import reproduces every item's id, type, slot
//!   position, rotation, dimensions, data and content.
//! - Stored files are verifiable against their sha256 sidecar.

mod error;
mod state;
mod store;

pub use error::{StateError, StoreError};
pub use state::{
    ConnectionRecord, Dimensions, ItemRecord, SceneState, State, StateDocument, ViewportState,
};
pub use store::StateStore;

pub fn crate_info() -> &'static str {
    "displayblock-persist v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("persist"));
    }
}
