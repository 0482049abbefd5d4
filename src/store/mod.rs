//! Persistence boundary for the board.
//!
//! A [`Store`] owns a [`KeyValueStore`] backend and reads/writes the whole
//! [`Snapshot`] as one JSON document under a single key.

pub mod kv;
pub mod sqlite;

pub use kv::*;
pub use sqlite::*;

use crate::models::Snapshot;
use thiserror::Error;

/// Storage key holding the board snapshot
pub const BOARD_KEY: &str = "marchMadnessBoard";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("malformed board snapshot: {0}")]
    MalformedSnapshot(#[source] serde_json::Error),
    #[error("failed to write board snapshot: {0}")]
    WriteFailed(String),
}

/// Snapshot persistence over a key-value backend
pub struct Store<S: KeyValueStore> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> Store<S> {
    pub fn new(backend: S) -> Self {
        Self { backend, key: BOARD_KEY.to_string() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Read the snapshot. `Ok(None)` means the board was never initialized.
    pub fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let raw = self
            .backend
            .get_item(&self.key)
            .map_err(|e| StoreError::StorageUnavailable(format!("{:#}", e)))?;

        match raw {
            None => Ok(None),
            Some(json) => Snapshot::from_json(&json)
                .map(Some)
                .map_err(StoreError::MalformedSnapshot),
        }
    }

    /// Overwrite the stored snapshot with the full pair
    pub fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = snapshot
            .to_json()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        self.backend
            .set_item(&self.key, &json)
            .map_err(|e| StoreError::WriteFailed(format!("{:#}", e)))
    }

    /// Remove the stored snapshot so the next load sees an uninitialized board
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.backend
            .remove_item(&self.key)
            .map_err(|e| StoreError::WriteFailed(format!("{:#}", e)))
    }
}
