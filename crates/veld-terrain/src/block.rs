//! Block lookups against the live chunk map.

use veld_chunk::{Chunk, EntityHandle};
use veld_geom::{Aabb, Collidable, Vec3, collided};
use veld_world::{AIR, BlockId, CHUNK_HEIGHT, ChunkIndex, Resolved, in_chunk_coords, resolve_across};

use crate::terrain::Terrain;

/// A resolved view of one block: which chunk owns it, where it sits locally,
/// and its id. Snapshot only; it does not track later edits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Block {
    pub chunk: ChunkIndex,
    pub local: (usize, usize, usize),
    pub flat_index: usize,
    pub world_center: Vec3,
    pub id: BlockId,
}

impl Block {
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.id != AIR
    }
}

impl Collidable for Block {
    #[inline]
    fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.world_center, Vec3::new(1.0, 1.0, 1.0))
    }
}

impl Terrain {
    /// Block at an integer block coordinate. `None` when the Y value falls
    /// outside the vertical range or the owning chunk is not loaded; both
    /// read as air.
    pub fn block_at(&self, bx: i32, by: i32, bz: i32) -> Option<Block> {
        if by < 0 || by >= CHUNK_HEIGHT as i32 {
            return None;
        }
        let index = ChunkIndex::of_block(bx, bz);
        let chunk = self.chunks.get(&index)?;
        let (ox, oz) = index.world_origin();
        let (lx, ly, lz) = ((bx - ox) as usize, by as usize, (bz - oz) as usize);
        Some(Block {
            chunk: index,
            local: (lx, ly, lz),
            flat_index: Chunk::BOX.index_of(lx, ly, lz),
            world_center: chunk.block_center(lx, ly, lz),
            id: chunk.get_local(lx, ly, lz),
        })
    }

    /// Block containing a continuous world position.
    #[inline]
    pub fn block_at_world(&self, x: f32, y: f32, z: f32) -> Option<Block> {
        self.block_at(x.floor() as i32, y.floor() as i32, z.floor() as i32)
    }

    /// Resolves a coordinate relative to `origin` (possibly outside its
    /// bounds) against the live chunk map.
    pub fn block_from(&self, origin: ChunkIndex, x: i32, y: i32, z: i32) -> Option<Block> {
        match resolve_across(origin, x, y, z) {
            Resolved::ExceededY => None,
            Resolved::Within { chunk, x, y, z } => {
                let (ox, oz) = chunk.world_origin();
                self.block_at(ox + x as i32, y as i32, oz + z as i32)
            }
        }
    }

    /// Gameplay edit at a continuous world position. The block becomes
    /// modified, so structure stamping will never overwrite it. Returns false
    /// when the position is out of vertical range or its chunk is unloaded.
    pub fn set_block_world(&mut self, x: f32, y: f32, z: f32, id: BlockId) -> bool {
        let Some((lx, ly, lz)) = in_chunk_coords(x, y, z) else {
            return false;
        };
        let index = ChunkIndex::of_world(x, z);
        let Some(chunk) = self.chunks.get_mut(&index) else {
            return false;
        };
        chunk.set_manual(lx, ly, lz, id);
        true
    }

    /// Gameplay edit through a previously resolved block view.
    pub fn set_block(&mut self, block: &Block, id: BlockId) -> bool {
        let Some(chunk) = self.chunks.get_mut(&block.chunk) else {
            return false;
        };
        let (lx, ly, lz) = block.local;
        chunk.set_manual(lx, ly, lz, id);
        true
    }

    /// Loaded chunks within a rectangular index window around `index`,
    /// excluding the center chunk itself.
    pub fn neighbor_chunks(&self, index: ChunkIndex, x_radius: i32, z_radius: i32) -> Vec<&Chunk> {
        let mut out = Vec::new();
        for dx in -x_radius..=x_radius {
            for dz in -z_radius..=z_radius {
                if dx == 0 && dz == 0 {
                    continue;
                }
                if let Some(chunk) = self.chunks.get(&index.offset(dx, dz)) {
                    out.push(chunk);
                }
            }
        }
        out
    }

    /// Cached entities whose bounds overlap `bounds`, deduplicated across the
    /// chunks the query box spans. Reflects the entity set passed to the most
    /// recent update.
    pub fn entities_near(&self, bounds: Aabb) -> Vec<EntityHandle> {
        let lo = ChunkIndex::of_world(bounds.min.x, bounds.min.z);
        let hi = ChunkIndex::of_world(bounds.max.x, bounds.max.z);
        let mut out: Vec<EntityHandle> = Vec::new();
        for cx in lo.x..=hi.x {
            for cz in lo.z..=hi.z {
                if let Some(chunk) = self.chunks.get(&ChunkIndex::new(cx, cz)) {
                    for e in &chunk.entities_for_collision {
                        if collided(&bounds, &e.bounds) && !out.contains(e) {
                            out.push(*e);
                        }
                    }
                }
            }
        }
        out
    }
}
