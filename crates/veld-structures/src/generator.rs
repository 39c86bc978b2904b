//! Noise-driven structure placement.

use std::sync::Arc;

use veld_world::{ChunkIndex, HeightGenerator, HillConfig, StructureId};

use crate::{Structure, StructureTemplate};

/// Decides, per surface column, whether a structure spawns there, and builds
/// the placed instance. Decisions depend only on (seed, chunk index, column),
/// so a destroyed and recreated chunk reproduces the same placements.
pub struct StructureGenerator {
    hill: HeightGenerator,
    threshold: f32,
    template: Arc<StructureTemplate>,
}

impl StructureGenerator {
    pub fn new(seed: i32, cfg: &HillConfig, template: Arc<StructureTemplate>) -> Self {
        Self {
            hill: HeightGenerator::hill(seed, cfg),
            threshold: cfg.threshold,
            template,
        }
    }

    /// True when the hill field exceeds the placement threshold at a column.
    #[inline]
    pub fn should_place(&self, index: ChunkIndex, x: usize, z: usize) -> bool {
        self.hill.sample(index, x, z) > self.threshold
    }

    /// Instantiates a structure anchored at the column's surface block.
    pub fn place(
        &self,
        id: StructureId,
        index: ChunkIndex,
        x: usize,
        z: usize,
        surface_y: i32,
    ) -> Structure {
        let (ox, oz) = index.world_origin();
        let anchor = (ox + x as i32, surface_y, oz + z as i32);
        Structure::new(id, Arc::clone(&self.template), anchor, index)
    }

    #[inline]
    pub fn template(&self) -> &Arc<StructureTemplate> {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: i32) -> StructureGenerator {
        StructureGenerator::new(seed, &HillConfig::default(), Arc::new(StructureTemplate::tree()))
    }

    #[test]
    fn placement_decision_is_deterministic() {
        let a = generator(99);
        let b = generator(99);
        let index = ChunkIndex::new(-4, 11);
        for x in 0..16 {
            for z in 0..16 {
                assert_eq!(a.should_place(index, x, z), b.should_place(index, x, z));
            }
        }
    }

    #[test]
    fn placed_structure_roots_in_the_generating_chunk() {
        let g = generator(5);
        let index = ChunkIndex::new(2, -3);
        let s = g.place(1, index, 9, 4, 60);
        assert_eq!(s.root_chunk, index);
        assert_eq!(s.anchor, (2 * 16 + 9, 60, -3 * 16 + 4));
        assert!(s.overlaps(index));
    }
}
