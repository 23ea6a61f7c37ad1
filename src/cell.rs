//! Cell coordinates and packed cell keys.
//!
//! A fine cell is addressed by a pair of signed 32-bit coordinates on the
//! projected grid. For set and map storage the pair is packed losslessly
//! into one 64-bit key. Chunks group cells into fixed-size squares and are
//! derived from cell coordinates by an arithmetic shift.

use serde::{Deserialize, Serialize};

const COORD_BITS: u64 = 32;
const COORD_MASK: u64 = (1 << COORD_BITS) - 1;

/// Coordinates of one fine cell on the exploration grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The packed 64-bit key for this cell.
    #[inline]
    pub fn packed(self) -> PackedCell {
        PackedCell::pack(self.x, self.y)
    }

    /// The ancestor of this cell `level` aggregation levels up.
    ///
    /// Arithmetic shift, so negative coordinates round toward negative
    /// infinity and neighboring cells share ancestors consistently across
    /// the origin.
    #[inline]
    pub fn parent(self, level: u32) -> Self {
        debug_assert!(level < 32);
        Self {
            x: self.x >> level,
            y: self.y >> level,
        }
    }

    /// The chunk that owns this cell, for a chunk size of `1 << chunk_shift`
    /// cells.
    #[inline]
    pub fn chunk(self, chunk_shift: u32) -> ChunkCoord {
        debug_assert!(chunk_shift < 32);
        ChunkCoord {
            x: self.x >> chunk_shift,
            y: self.y >> chunk_shift,
        }
    }
}

/// A fine cell's `(x, y)` pair packed into a single 64-bit key.
///
/// Layout:
///
/// ```text
/// | x (32) | y (32) |
/// 63     32 31      0
/// ```
///
/// Both halves are two's-complement, so `unpack(pack(x, y)) == (x, y)` for
/// every representable coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedCell(u64);

impl PackedCell {
    #[inline]
    pub fn pack(x: i32, y: i32) -> Self {
        Self(((x as u32 as u64) << COORD_BITS) | (y as u32 as u64))
    }

    #[inline]
    pub fn unpack(self) -> CellCoord {
        CellCoord {
            x: (self.0 >> COORD_BITS) as u32 as i32,
            y: (self.0 & COORD_MASK) as u32 as i32,
        }
    }

    /// The key as a signed integer, the form used by the persisted snapshot.
    #[inline]
    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }

    #[inline]
    pub fn from_i64(value: i64) -> Self {
        Self(value as u64)
    }
}

/// Coordinates of one chunk of the exploration grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
