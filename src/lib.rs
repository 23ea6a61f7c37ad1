//! Embedded fog-of-war exploration store with chunked spatial indexing,
//! LOD-aggregated display queries, and snapshot persistence.
//!
//! ```rust
//! use fogmap::{ExplorationGrid, Point};
//!
//! let mut grid = ExplorationGrid::memory()?;
//! grid.reveal(&Point::new(5.0, 52.0));
//!
//! assert!(grid.is_explored(&Point::new(5.0, 52.0)));
//! # Ok::<(), fogmap::FogmapError>(())
//! ```

pub mod builder;
pub mod cell;
pub mod codec;
pub mod config;
pub mod error;
pub mod grid;
pub mod persistence;
pub mod projection;
pub mod track;

#[cfg(feature = "sync")]
pub mod sync;

pub use builder::GridBuilder;
pub use error::{FogmapError, Result};
pub use grid::{DisplaySet, ExplorationGrid, GridStats, MAX_LOD_LEVEL, SNAPSHOT_KEY};

#[cfg(feature = "sync")]
pub use sync::SyncGrid;

pub use geo::{Point, Rect};

pub use cell::{CellCoord, ChunkCoord, PackedCell};

pub use config::{DisplayOptions, GridConfig};

pub use persistence::{BlobStore, FileBlobStore, MemoryBlobStore};

pub use track::{TrackPoint, decode_track, encode_track};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ExplorationGrid, FogmapError, GridBuilder, Result};

    pub use geo::{Point, Rect};

    pub use crate::{CellCoord, DisplayOptions, DisplaySet, GridConfig};

    pub use crate::{BlobStore, FileBlobStore, MemoryBlobStore};

    #[cfg(feature = "sync")]
    pub use crate::SyncGrid;
}
