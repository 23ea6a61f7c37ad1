//! The exploration grid store.
//!
//! Tracks which fine cells of the projected world grid a user has visited,
//! keeps a chunk index so display queries touch only the viewport's share of
//! the explored set, and persists the whole set to a blob store after every
//! mutating reveal.

use crate::cell::{CellCoord, ChunkCoord, PackedCell};
use crate::config::{DisplayOptions, GridConfig};
use crate::error::{FogmapError, Result};
use crate::persistence::{self, BlobStore};
use crate::projection;
use geo::{Point, Rect};
use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
#[cfg(not(feature = "sync"))]
use std::marker::PhantomData;
use std::path::Path;

/// Blob key under which the explored set is persisted.
pub const SNAPSHOT_KEY: &str = "explored_cells";

/// Highest aggregation level served by display queries.
pub const MAX_LOD_LEVEL: u32 = 12;

/// Sizing factor for the visual reveal hole at aggregated levels.
const HOLE_RADIUS_FACTOR: f64 = 0.55;

/// Result of a display query: the chosen aggregation level and the distinct
/// cells to render at that level.
///
/// At level 0 the cells are fine cells; at level `L` each cell covers a
/// `2^L x 2^L` block of fine cells and appears exactly once no matter how
/// many explored fine cells collapsed into it.
#[derive(Debug, Clone)]
pub struct DisplaySet {
    pub level: u32,
    pub cells: Vec<CellCoord>,
}

/// Counters describing the grid's state and activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridStats {
    /// Number of explored fine cells.
    pub explored_cells: usize,
    /// Number of non-empty chunks in the index.
    pub chunk_count: usize,
    /// Reveal calls accepted past the movement throttle.
    pub reveal_ops: u64,
    /// Reveal calls dropped by the movement throttle.
    pub throttled_reveals: u64,
    /// Successful snapshot writes.
    pub persist_writes: u64,
}

/// Fog-of-war exploration store (single-threaded by design).
///
/// Owns the canonical explored set, a chunk index derived from it, and the
/// movement-throttle anchor. State is loaded from the blob store at
/// construction and rewritten after every reveal that adds cells.
///
/// # Thread Safety
///
/// **`ExplorationGrid` is NOT thread-safe by default.** All operations are
/// expected to run on one logical thread, and the type cannot be sent or
/// shared across threads. For multi-threaded access, enable the `sync`
/// feature and use [`crate::SyncGrid`], which guards the whole store (set,
/// chunk index, and throttle anchor as one unit) behind a read-write lock.
///
/// # Examples
///
/// ```rust
/// use fogmap::{ExplorationGrid, Point};
///
/// let mut grid = ExplorationGrid::memory()?;
/// let revealed = grid.reveal(&Point::new(5.0, 52.0));
/// assert!(revealed > 0);
/// assert!(grid.is_explored(&Point::new(5.0, 52.0)));
/// assert!(!grid.is_explored(&Point::new(6.0, 53.0)));
/// # Ok::<(), fogmap::FogmapError>(())
/// ```
pub struct ExplorationGrid {
    config: GridConfig,
    chunk_shift: u32,
    /// Canonical set of explored fine cells.
    explored: FxHashSet<PackedCell>,
    /// Spatial index: chunk -> member cells. Derived from `explored` and
    /// rebuilt from it on load.
    chunks: FxHashMap<ChunkCoord, FxHashSet<PackedCell>>,
    /// Anchor for the movement throttle: the last accepted reveal location.
    last_reveal: Option<Point>,
    store: Box<dyn BlobStore>,
    stats: GridStats,
    #[cfg(not(feature = "sync"))]
    _not_send_sync: PhantomData<*const ()>,
}

impl ExplorationGrid {
    /// Create an in-memory grid with default configuration (no persistence
    /// across processes).
    pub fn memory() -> Result<Self> {
        crate::GridBuilder::new().build()
    }

    /// Create an in-memory grid with custom configuration.
    pub fn memory_with_config(config: GridConfig) -> Result<Self> {
        crate::GridBuilder::new().config(config).build()
    }

    /// Open a grid persisted under `dir`, loading any previous explored set.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        crate::GridBuilder::new().store_dir(dir.as_ref()).build()
    }

    /// Open a grid persisted under `dir` with custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(dir: P, config: GridConfig) -> Result<Self> {
        crate::GridBuilder::new()
            .store_dir(dir.as_ref())
            .config(config)
            .build()
    }

    /// Construct over an explicit blob store, loading persisted state.
    ///
    /// A missing or unreadable snapshot yields an empty grid; exploration
    /// history is a nice-to-have, and refusing to start over it would be
    /// worse than losing it.
    pub(crate) fn with_store(config: GridConfig, store: Box<dyn BlobStore>) -> Result<Self> {
        config.validate().map_err(FogmapError::InvalidConfig)?;
        let chunk_shift = config.chunk_shift();

        let explored = match store.load(SNAPSHOT_KEY) {
            Ok(Some(bytes)) => match persistence::decode_snapshot(&bytes) {
                Ok(cells) => {
                    info!("loaded {} explored cells", cells.len());
                    cells
                }
                Err(err) => {
                    warn!("discarding unreadable exploration snapshot: {err}");
                    Default::default()
                }
            },
            Ok(None) => Default::default(),
            Err(err) => {
                warn!("failed to read exploration snapshot: {err}");
                Default::default()
            }
        };

        let mut chunks: FxHashMap<ChunkCoord, FxHashSet<PackedCell>> = Default::default();
        for &key in &explored {
            chunks
                .entry(key.unpack().chunk(chunk_shift))
                .or_default()
                .insert(key);
        }

        Ok(Self {
            config,
            chunk_shift,
            explored,
            chunks,
            last_reveal: None,
            store,
            stats: GridStats::default(),
            #[cfg(not(feature = "sync"))]
            _not_send_sync: PhantomData,
        })
    }

    /// The configuration this grid was constructed with.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of explored fine cells.
    pub fn len(&self) -> usize {
        self.explored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explored.is_empty()
    }

    /// Number of non-empty chunks in the index.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Current counters.
    pub fn stats(&self) -> GridStats {
        let mut stats = self.stats.clone();
        stats.explored_cells = self.explored.len();
        stats.chunk_count = self.chunks.len();
        stats
    }

    /// Mark the area around a GPS fix as explored, using the configured
    /// minimum-movement threshold.
    ///
    /// Returns the number of newly explored cells. Zero means the fix was
    /// throttled or the area was already fully explored; in either case no
    /// snapshot write happens.
    pub fn reveal(&mut self, location: &Point) -> usize {
        self.reveal_with_min_move(location, self.config.min_move_meters)
    }

    /// Like [`reveal`](Self::reveal) with an explicit movement threshold in
    /// meters.
    ///
    /// A fix closer than `min_move_meters` to the previously accepted fix is
    /// dropped, so a stationary device does not rewrite the snapshot on
    /// every fix.
    pub fn reveal_with_min_move(&mut self, location: &Point, min_move_meters: f64) -> usize {
        if let Some(prev) = self.last_reveal
            && projection::distance_meters(&prev, location) < min_move_meters
        {
            self.stats.throttled_reveals += 1;
            return 0;
        }
        self.last_reveal = Some(*location);
        self.stats.reveal_ops += 1;

        let base = self.config.base_cell_meters;
        let center = projection::cell_containing(location, base);
        let radius_cells = (self.config.reveal_radius_meters / base).ceil() as i32;

        // Square footprint: no per-cell distance check against the reveal
        // radius, so corner cells past it are included.
        let mut added = 0usize;
        for dy in -radius_cells..=radius_cells {
            for dx in -radius_cells..=radius_cells {
                let cell =
                    CellCoord::new(center.x.wrapping_add(dx), center.y.wrapping_add(dy));
                let key = cell.packed();
                if self.explored.insert(key) {
                    self.chunks
                        .entry(cell.chunk(self.chunk_shift))
                        .or_default()
                        .insert(key);
                    added += 1;
                }
            }
        }

        if added > 0 {
            debug!("revealed {added} cells around ({}, {})", location.x(), location.y());
            self.persist();
        }
        added
    }

    /// Clear all exploration state and delete the persisted snapshot.
    /// Idempotent.
    pub fn reset(&mut self) {
        self.explored.clear();
        self.chunks.clear();
        self.last_reveal = None;
        if let Err(err) = self.store.delete(SNAPSHOT_KEY) {
            warn!("failed to delete exploration snapshot: {err}");
        }
    }

    /// Whether the fine cell containing `point` has been explored.
    pub fn is_explored(&self, point: &Point) -> bool {
        let cell = projection::cell_containing(point, self.config.base_cell_meters);
        self.explored.contains(&cell.packed())
    }

    /// The aggregation level for a camera scale, given the desired on-screen
    /// cell size.
    ///
    /// Non-decreasing in `meters_per_screen_point` and clamped to
    /// `[0, MAX_LOD_LEVEL]`: as the camera zooms out, fewer, larger cells
    /// are served so the rendered primitive count stays roughly constant.
    pub fn level_for_scale(&self, meters_per_screen_point: f64, target_cell_pixels: f64) -> u32 {
        let target_meters = meters_per_screen_point.max(1.0) * target_cell_pixels;
        let ratio = (target_meters / self.config.base_cell_meters).max(1.0);
        (ratio.log2().round() as i64).clamp(0, MAX_LOD_LEVEL as i64) as u32
    }

    /// The explored cells to render for a viewport.
    ///
    /// `visible_rect` is the viewport in projected meters and
    /// `meters_per_screen_point` the current camera scale. The rectangle is
    /// expanded by [`DisplayOptions::extra_meters`] per side before
    /// querying, and only chunks overlapping the expanded bounds are
    /// visited, so cost tracks the viewport rather than the total explored
    /// area.
    ///
    /// Every explored fine cell inside the expanded bounds is represented by
    /// exactly one returned cell: itself at level 0, or its level-`L`
    /// ancestor once aggregation kicks in.
    pub fn display_cells(
        &self,
        visible_rect: &Rect,
        meters_per_screen_point: f64,
        options: Option<&DisplayOptions>,
    ) -> DisplaySet {
        let default_options = DisplayOptions::default();
        let options = options.unwrap_or(&default_options);

        let level = self.level_for_scale(meters_per_screen_point, options.target_cell_pixels);
        let base = self.config.base_cell_meters;
        let pad = options.extra_meters;
        let min = CellCoord::new(
            ((visible_rect.min().x - pad) / base).floor() as i32,
            ((visible_rect.min().y - pad) / base).floor() as i32,
        );
        let max = CellCoord::new(
            ((visible_rect.max().x + pad) / base).floor() as i32,
            ((visible_rect.max().y + pad) / base).floor() as i32,
        );

        let mut cells = Vec::new();
        if level == 0 {
            self.for_each_cell_in_bounds(min, max, |cell| cells.push(cell));
        } else {
            let mut parents: FxHashSet<PackedCell> = Default::default();
            self.for_each_cell_in_bounds(min, max, |cell| {
                parents.insert(cell.parent(level).packed());
            });
            cells.extend(parents.into_iter().map(PackedCell::unpack));
        }

        DisplaySet { level, cells }
    }

    /// Geographic coordinate of the center of a displayed cell at `level`.
    ///
    /// Inverse of the aggregation in [`display_cells`](Self::display_cells);
    /// levels above [`MAX_LOD_LEVEL`] are clamped.
    pub fn coordinate_for(&self, cell: CellCoord, level: u32) -> Point {
        let level = level.min(MAX_LOD_LEVEL);
        let size = self.config.base_cell_meters * (1u64 << level) as f64;
        projection::cell_center(cell, size)
    }

    /// Radius in meters of the visual reveal hole at an aggregation level,
    /// so rendering stays proportional across zoom levels.
    pub fn hole_radius_meters(&self, level: u32) -> f64 {
        let level = level.min(MAX_LOD_LEVEL);
        let cell_meters = self.config.base_cell_meters * (1u64 << level) as f64;
        self.config
            .reveal_radius_meters
            .max(cell_meters * HOLE_RADIUS_FACTOR)
    }

    /// Visit every explored cell with coordinates inside `[min, max]`,
    /// touching only chunks that overlap those bounds. When the viewport
    /// spans more chunk slots than exist, walk the index instead.
    fn for_each_cell_in_bounds(
        &self,
        min: CellCoord,
        max: CellCoord,
        mut visit: impl FnMut(CellCoord),
    ) {
        if min.x > max.x || min.y > max.y {
            return;
        }
        let min_chunk = min.chunk(self.chunk_shift);
        let max_chunk = max.chunk(self.chunk_shift);

        let in_bounds =
            |c: CellCoord| c.x >= min.x && c.x <= max.x && c.y >= min.y && c.y <= max.y;
        let mut scan = |members: &FxHashSet<PackedCell>| {
            for &key in members {
                let cell = key.unpack();
                if in_bounds(cell) {
                    visit(cell);
                }
            }
        };

        let span_x = max_chunk.x as i64 - min_chunk.x as i64 + 1;
        let span_y = max_chunk.y as i64 - min_chunk.y as i64 + 1;
        if span_x.saturating_mul(span_y) <= self.chunks.len() as i64 {
            for cy in min_chunk.y..=max_chunk.y {
                for cx in min_chunk.x..=max_chunk.x {
                    if let Some(members) = self.chunks.get(&ChunkCoord::new(cx, cy)) {
                        scan(members);
                    }
                }
            }
        } else {
            for (coord, members) in &self.chunks {
                if coord.x >= min_chunk.x
                    && coord.x <= max_chunk.x
                    && coord.y >= min_chunk.y
                    && coord.y <= max_chunk.y
                {
                    scan(members);
                }
            }
        }
    }

    /// Rewrite the snapshot. Failures are logged and swallowed: the
    /// in-memory set stays authoritative for this process, and the next
    /// successful write catches up.
    fn persist(&mut self) {
        let encoded = persistence::encode_snapshot(&self.explored);
        match encoded.and_then(|bytes| self.store.save(SNAPSHOT_KEY, &bytes)) {
            Ok(()) => {
                self.stats.persist_writes += 1;
            }
            Err(err) => {
                warn!("failed to persist explored set: {err}");
            }
        }
    }
}
