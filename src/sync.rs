//! Thread-safe wrapper for concurrent grid access.
//!
//! This module provides [`SyncGrid`], a thread-safe wrapper around
//! [`ExplorationGrid`] that uses `Arc<RwLock<ExplorationGrid>>` internally.
//! The lock guards the explored set, the chunk index, and the throttle
//! anchor as one unit, so partial updates are never observable.
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! fogmap = { version = "0.1", features = ["sync"] }
//! ```

use crate::cell::CellCoord;
use crate::config::{DisplayOptions, GridConfig};
use crate::error::Result;
use crate::grid::{DisplaySet, ExplorationGrid, GridStats};
use geo::{Point, Rect};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Thread-safe wrapper around [`ExplorationGrid`].
///
/// Clone to share between threads. Display queries and point lookups take
/// the read lock; `reveal` and `reset` take the write lock.
#[derive(Clone)]
pub struct SyncGrid {
    inner: Arc<RwLock<ExplorationGrid>>,
}

impl SyncGrid {
    /// Creates a new in-memory grid with default configuration.
    pub fn memory() -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(ExplorationGrid::memory()?)),
        })
    }

    /// Creates a new in-memory grid with custom configuration.
    pub fn memory_with_config(config: GridConfig) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(ExplorationGrid::memory_with_config(config)?)),
        })
    }

    /// Opens a grid persisted under `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(ExplorationGrid::open(dir)?)),
        })
    }

    /// Opens a grid persisted under `dir` with custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(dir: P, config: GridConfig) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(ExplorationGrid::open_with_config(dir, config)?)),
        })
    }

    /// See [`ExplorationGrid::reveal`].
    pub fn reveal(&self, location: &Point) -> usize {
        self.inner.write().reveal(location)
    }

    /// See [`ExplorationGrid::reveal_with_min_move`].
    pub fn reveal_with_min_move(&self, location: &Point, min_move_meters: f64) -> usize {
        self.inner.write().reveal_with_min_move(location, min_move_meters)
    }

    /// See [`ExplorationGrid::reset`].
    pub fn reset(&self) {
        self.inner.write().reset()
    }

    /// See [`ExplorationGrid::display_cells`].
    pub fn display_cells(
        &self,
        visible_rect: &Rect,
        meters_per_screen_point: f64,
        options: Option<&DisplayOptions>,
    ) -> DisplaySet {
        self.inner
            .read()
            .display_cells(visible_rect, meters_per_screen_point, options)
    }

    /// See [`ExplorationGrid::is_explored`].
    pub fn is_explored(&self, point: &Point) -> bool {
        self.inner.read().is_explored(point)
    }

    /// See [`ExplorationGrid::coordinate_for`].
    pub fn coordinate_for(&self, cell: CellCoord, level: u32) -> Point {
        self.inner.read().coordinate_for(cell, level)
    }

    /// See [`ExplorationGrid::hole_radius_meters`].
    pub fn hole_radius_meters(&self, level: u32) -> f64 {
        self.inner.read().hole_radius_meters(level)
    }

    /// See [`ExplorationGrid::level_for_scale`].
    pub fn level_for_scale(&self, meters_per_screen_point: f64, target_cell_pixels: f64) -> u32 {
        self.inner
            .read()
            .level_for_scale(meters_per_screen_point, target_cell_pixels)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// See [`ExplorationGrid::stats`].
    pub fn stats(&self) -> GridStats {
        self.inner.read().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_sync_grid_shared_across_threads() {
        let grid = SyncGrid::memory().unwrap();

        let writer = grid.clone();
        let handle = thread::spawn(move || {
            writer.reveal(&Point::new(5.0, 52.0));
        });
        handle.join().unwrap();

        assert!(grid.is_explored(&Point::new(5.0, 52.0)));
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_sync_grid_concurrent_readers() {
        let grid = SyncGrid::memory().unwrap();
        grid.reveal(&Point::new(5.0, 52.0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reader = grid.clone();
                thread::spawn(move || reader.is_explored(&Point::new(5.0, 52.0)))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn test_sync_grid_reset() {
        let grid = SyncGrid::memory().unwrap();
        grid.reveal(&Point::new(5.0, 52.0));
        grid.reset();
        assert!(grid.is_empty());
    }
}
