//! Structure prefabs, placed instances, and multi-chunk stamping.
#![forbid(unsafe_code)]

pub mod generator;
pub mod template;

pub use generator::StructureGenerator;
pub use template::StructureTemplate;

use std::sync::Arc;

use hashbrown::HashMap;
use veld_chunk::Chunk;
use veld_world::{AIR, CHUNK_HEIGHT, CHUNK_WIDTH, ChunkIndex, StructureId};

/// A placed prefab instance. Its footprint may span up to the eight chunks
/// neighboring the root chunk; the overlap set is computed once here.
pub struct Structure {
    pub id: StructureId,
    pub template: Arc<StructureTemplate>,
    /// World block position of the template's root anchor.
    pub anchor: (i32, i32, i32),
    /// Chunk whose generation created this structure; deleting it purges the
    /// structure from the terrain's list.
    pub root_chunk: ChunkIndex,
    min: (i32, i32, i32),
    max: (i32, i32, i32),
    overlapped: Vec<ChunkIndex>,
}

impl Structure {
    pub fn new(
        id: StructureId,
        template: Arc<StructureTemplate>,
        anchor: (i32, i32, i32),
        root_chunk: ChunkIndex,
    ) -> Self {
        let size = template.size;
        let root = template.root;
        // Template Y runs top-to-bottom, so the anchor row (root.y) maps to
        // the top of the world-space extent.
        let min = (
            anchor.0 - root.x,
            anchor.1 + root.y - (size.y as i32 - 1),
            anchor.2 - root.z,
        );
        let max = (
            min.0 + size.x as i32 - 1,
            anchor.1 + root.y,
            min.2 + size.z as i32 - 1,
        );
        let lo = ChunkIndex::of_block(min.0, min.2);
        let hi = ChunkIndex::of_block(max.0, max.2);
        let mut overlapped = Vec::new();
        for cx in lo.x..=hi.x {
            for cz in lo.z..=hi.z {
                overlapped.push(ChunkIndex::new(cx, cz));
            }
        }
        Self {
            id,
            template,
            anchor,
            root_chunk,
            min,
            max,
            overlapped,
        }
    }

    /// Minimum/maximum world block coordinates of the footprint, inclusive.
    #[inline]
    pub fn block_bounds(&self) -> ((i32, i32, i32), (i32, i32, i32)) {
        (self.min, self.max)
    }

    #[inline]
    pub fn overlapped_chunks(&self) -> &[ChunkIndex] {
        &self.overlapped
    }

    #[inline]
    pub fn overlaps(&self, index: ChunkIndex) -> bool {
        self.overlapped.contains(&index)
    }

    /// Stamps the template blocks that fall inside `chunk`. Idempotent: a
    /// chunk that already loaded this structure is left untouched. Template
    /// id 0 means "no placement" and gameplay-modified blocks are never
    /// overwritten.
    pub fn stamp_into(&self, chunk: &mut Chunk) -> bool {
        if chunk.loaded_structures.contains(&self.id) {
            return false;
        }
        if !self.overlaps(chunk.index) {
            return false;
        }
        let (ox, oz) = chunk.index.world_origin();
        let size = self.template.size;
        let width = CHUNK_WIDTH as i32;
        for tx in 0..size.x {
            let wx = self.min.0 + tx as i32;
            let lx = wx - ox;
            if !(0..width).contains(&lx) {
                continue;
            }
            for tz in 0..size.z {
                let wz = self.min.2 + tz as i32;
                let lz = wz - oz;
                if !(0..width).contains(&lz) {
                    continue;
                }
                for ty in 0..size.y {
                    let id = self.template.block_at(tx, ty, tz);
                    if id == AIR {
                        continue;
                    }
                    // Vertical flip: template row 0 is the prefab's top.
                    let wy = self.anchor.1 + self.template.root.y - ty as i32;
                    if wy < 0 || wy >= CHUNK_HEIGHT as i32 {
                        continue;
                    }
                    let (lx, ly, lz) = (lx as usize, wy as usize, lz as usize);
                    if chunk.is_modified(lx, ly, lz) {
                        continue;
                    }
                    chunk.set_local(lx, ly, lz, id);
                }
            }
        }
        chunk.loaded_structures.insert(self.id);
        true
    }

    /// Re-attempts stamping into every overlapped chunk that currently
    /// exists. Safe to call repeatedly; chunks that already loaded this
    /// structure are skipped. Returns how many chunks were newly stamped.
    pub fn reload(&self, chunks: &mut HashMap<ChunkIndex, Chunk>) -> usize {
        let mut stamped = 0;
        for index in &self.overlapped {
            if let Some(chunk) = chunks.get_mut(index) {
                if self.stamp_into(chunk) {
                    stamped += 1;
                }
            }
        }
        stamped
    }
}
