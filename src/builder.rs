//! Grid builder for flexible construction.
//!
//! This module provides a builder pattern for creating exploration grids
//! with custom configuration and persistence locations.

use crate::config::GridConfig;
use crate::error::Result;
use crate::grid::ExplorationGrid;
use crate::persistence::{BlobStore, FileBlobStore, MemoryBlobStore};
use std::path::PathBuf;

/// Builder for [`ExplorationGrid`] with custom persistence paths and
/// settings.
#[derive(Debug)]
pub struct GridBuilder {
    store_dir: Option<PathBuf>,
    config: GridConfig,
    in_memory: bool,
}

impl GridBuilder {
    /// Create a new builder with default in-memory configuration.
    pub fn new() -> Self {
        Self {
            store_dir: None,
            config: GridConfig::default(),
            in_memory: true,
        }
    }

    /// Persist under `dir`. The directory is created if needed and any
    /// existing snapshot there is loaded on build.
    pub fn store_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.store_dir = Some(dir.into());
        self.in_memory = false;
        self
    }

    /// Configure for in-memory storage with no persistence.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self.store_dir = None;
        self
    }

    /// Set the grid configuration (cell size, reveal radius, etc.).
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the grid. Opens the blob store if configured and loads any
    /// persisted explored set.
    pub fn build(self) -> Result<ExplorationGrid> {
        let store: Box<dyn BlobStore> = match (self.in_memory, self.store_dir) {
            (false, Some(dir)) => Box::new(FileBlobStore::open(dir)?),
            _ => Box::new(MemoryBlobStore::new()),
        };
        ExplorationGrid::with_store(self.config, store)
    }
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}
