//! Chunk column storage, flat voxel-box index math, and terrain fill.
#![forbid(unsafe_code)]

use hashbrown::HashSet;

use veld_geom::{Aabb, Collidable, Vec3};
use veld_world::{
    AIR, BlockId, CHUNK_HEIGHT, CHUNK_WIDTH, ChunkIndex, DIRT, GRASS, HeightGenerator, STONE,
    StructureId,
};

/// Fixed-size box mapping a 3D coordinate to a flat sequence position and
/// back: z varies fastest, then y, then x. Preconditions are the caller's
/// responsibility; the functions do not bounds-check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelBox {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl VoxelBox {
    #[inline]
    pub const fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self { sx, sy, sz }
    }

    #[inline]
    pub const fn volume(&self) -> usize {
        self.sx * self.sy * self.sz
    }

    #[inline]
    pub const fn index_of(&self, x: usize, y: usize, z: usize) -> usize {
        z + y * self.sz + x * self.sy * self.sz
    }

    /// Exact inverse of [`index_of`](Self::index_of) over the box volume.
    #[inline]
    pub const fn coords_of(&self, i: usize) -> (usize, usize, usize) {
        let x = i / (self.sy * self.sz);
        let rem = i % (self.sy * self.sz);
        (x, rem / self.sz, rem % self.sz)
    }

    #[inline]
    pub const fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && (x as usize) < self.sx
            && y >= 0
            && (y as usize) < self.sy
            && z >= 0
            && (z as usize) < self.sz
    }
}

/// Entity snapshot cached on a chunk for collision candidate queries.
/// Rebuilt every tick, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityHandle {
    pub id: u64,
    pub bounds: Aabb,
}

impl Collidable for EntityHandle {
    #[inline]
    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// One vertical column of blocks plus its generation and streaming state.
///
/// `blocks` always holds exactly width * width * height entries; reads
/// outside the local bounds must go through coordinate resolution into a
/// neighboring chunk, never index this one directly.
pub struct Chunk {
    pub index: ChunkIndex,
    pub blocks: Vec<BlockId>,
    /// True once a position was changed by gameplay rather than generation.
    /// Structure stamping never overwrites a modified block.
    pub modified: Vec<bool>,
    /// Per-column generated height, reused by structure placement so that
    /// regeneration stays consistent.
    pub height_map: Vec<i32>,
    /// Render geometry is stale; consumed by the meshing collaborator.
    pub to_refresh: bool,
    /// Removed at the next terrain update compaction.
    pub to_delete: bool,
    pub entities_for_collision: Vec<EntityHandle>,
    /// Structures already stamped here; makes re-stamping idempotent.
    pub loaded_structures: HashSet<StructureId>,
    // UI-adjacent annotations, set externally, read by the mesh builder.
    pub is_highlighted: bool,
    pub highlighted_block_index: Option<usize>,
    pub block_break_progress: f32,
}

impl Chunk {
    pub const BOX: VoxelBox = VoxelBox::new(CHUNK_WIDTH, CHUNK_HEIGHT, CHUNK_WIDTH);

    pub fn empty(index: ChunkIndex) -> Self {
        Self {
            index,
            blocks: vec![AIR; Self::BOX.volume()],
            modified: vec![false; Self::BOX.volume()],
            height_map: vec![0; CHUNK_WIDTH * CHUNK_WIDTH],
            to_refresh: false,
            to_delete: false,
            entities_for_collision: Vec::new(),
            loaded_structures: HashSet::new(),
            is_highlighted: false,
            highlighted_block_index: None,
            block_break_progress: 0.0,
        }
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[Self::BOX.index_of(x, y, z)]
    }

    /// Generation/stamping write path: marks geometry stale but leaves the
    /// modified flag alone.
    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        self.blocks[Self::BOX.index_of(x, y, z)] = id;
        self.to_refresh = true;
    }

    /// Gameplay write path: also marks the position modified so structure
    /// stamping can never clobber the edit.
    #[inline]
    pub fn set_manual(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        let i = Self::BOX.index_of(x, y, z);
        self.blocks[i] = id;
        self.modified[i] = true;
        self.to_refresh = true;
    }

    #[inline]
    pub fn is_modified(&self, x: usize, y: usize, z: usize) -> bool {
        self.modified[Self::BOX.index_of(x, y, z)]
    }

    #[inline]
    pub fn column_height(&self, x: usize, z: usize) -> i32 {
        self.height_map[x * CHUNK_WIDTH + z]
    }

    /// Minimum corner in world units.
    #[inline]
    pub fn world_origin(&self) -> Vec3 {
        let (ox, oz) = self.index.world_origin();
        Vec3::new(ox as f32, 0.0, oz as f32)
    }

    /// World-space center of the block at a local coordinate.
    #[inline]
    pub fn block_center(&self, x: usize, y: usize, z: usize) -> Vec3 {
        self.world_origin() + Vec3::new(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5)
    }
}

impl Collidable for Chunk {
    fn bounds(&self) -> Aabb {
        let origin = self.world_origin();
        let size = Vec3::new(
            CHUNK_WIDTH as f32,
            CHUNK_HEIGHT as f32,
            CHUNK_WIDTH as f32,
        );
        Aabb::new(origin, origin + size)
    }
}

/// Fills a fresh chunk from the height field: grass at the surface, a dirt
/// band below it, stone down to the floor. The height map is cached on the
/// chunk for structure placement.
pub fn generate_chunk(index: ChunkIndex, generator: &HeightGenerator) -> Chunk {
    let mut chunk = Chunk::empty(index);
    for x in 0..CHUNK_WIDTH {
        for z in 0..CHUNK_WIDTH {
            let h = generator.height_at(index, x, z);
            chunk.height_map[x * CHUNK_WIDTH + z] = h;
            for y in 0..=h as usize {
                let id = if y as i32 == h {
                    GRASS
                } else if y as i32 >= h - 3 {
                    DIRT
                } else {
                    STONE
                };
                chunk.blocks[Chunk::BOX.index_of(x, y, z)] = id;
            }
        }
    }
    chunk
}
