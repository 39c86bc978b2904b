//! Chunk indexing and world/chunk/block coordinate conversion.
//!
//! All conversions floor toward negative infinity so the chunk grid tiles
//! continuously across the origin with no gap or double-counted column.

use serde::{Deserialize, Serialize};

use crate::{CHUNK_HEIGHT, CHUNK_WIDTH};

/// Identifies one chunk column on the XZ plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkIndex {
    pub x: i32,
    pub z: i32,
}

impl ChunkIndex {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Index of the chunk containing a continuous world position.
    #[inline]
    pub fn of_world(wx: f32, wz: f32) -> Self {
        Self::of_block(wx.floor() as i32, wz.floor() as i32)
    }

    /// Index of the chunk containing an integer block coordinate.
    #[inline]
    pub fn of_block(bx: i32, bz: i32) -> Self {
        let w = CHUNK_WIDTH as i32;
        Self {
            x: bx.div_euclid(w),
            z: bz.div_euclid(w),
        }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    #[inline]
    pub fn manhattan_distance(self, other: ChunkIndex) -> i32 {
        (self.x - other.x).abs() + (self.z - other.z).abs()
    }

    /// Block coordinate of this chunk's minimum corner.
    #[inline]
    pub fn world_origin(self) -> (i32, i32) {
        let w = CHUNK_WIDTH as i32;
        (self.x * w, self.z * w)
    }
}

impl From<(i32, i32)> for ChunkIndex {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// In-chunk block coordinate for a continuous world position, or `None` when
/// the Y value falls outside the vertical chunk range.
#[inline]
pub fn in_chunk_coords(wx: f32, wy: f32, wz: f32) -> Option<(usize, usize, usize)> {
    let by = wy.floor() as i32;
    if by < 0 || by >= CHUNK_HEIGHT as i32 {
        return None;
    }
    let w = CHUNK_WIDTH as i32;
    let lx = (wx.floor() as i32).rem_euclid(w) as usize;
    let lz = (wz.floor() as i32).rem_euclid(w) as usize;
    Some((lx, by as usize, lz))
}

/// Outcome of resolving a chunk-relative coordinate that may lie outside the
/// origin chunk's bounds.
///
/// `ExceededY` is a distinct signal rather than a chunk: the vertical range
/// is not tiled. This core treats such positions as air (passable); a meshing
/// collaborator may instead cull faces against them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolved {
    Within {
        chunk: ChunkIndex,
        x: usize,
        y: usize,
        z: usize,
    },
    ExceededY,
}

/// Resolves a coordinate relative to `origin` into the owning chunk and the
/// coordinate relative to that chunk. Used by face culling and stamping,
/// where offsets routinely cross chunk boundaries.
pub fn resolve_across(origin: ChunkIndex, x: i32, y: i32, z: i32) -> Resolved {
    if y < 0 || y >= CHUNK_HEIGHT as i32 {
        return Resolved::ExceededY;
    }
    let w = CHUNK_WIDTH as i32;
    Resolved::Within {
        chunk: origin.offset(x.div_euclid(w), z.div_euclid(w)),
        x: x.rem_euclid(w) as usize,
        y: y as usize,
        z: z.rem_euclid(w) as usize,
    }
}
