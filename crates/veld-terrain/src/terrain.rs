//! Authoritative chunk set, structure list, and the per-tick update pipeline.

use std::sync::Arc;

use hashbrown::HashMap;

use veld_chunk::{Chunk, EntityHandle, generate_chunk};
use veld_geom::Vec3;
use veld_structures::{Structure, StructureGenerator, StructureTemplate};
use veld_world::{CHUNK_WIDTH, ChunkIndex, HeightGenerator, StreamingConfig, StructureId, WorldConfig};

use crate::area::{AreaVisits, LoadedArea};

/// One tracked observer: a caller-owned id and a world position. Ids are
/// assigned by whatever constructs observers; the terrain never invents them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    pub id: u64,
    pub position: Vec3,
}

/// Owns the live chunks, the placed structures awaiting stamping, one loaded
/// area per tracked observer, and the generator set.
///
/// The chunk map is the uniqueness invariant: a `ChunkIndex` maps to at most
/// one live chunk, enforced by the key itself. `chunks` is mutated only by
/// chunk creation here and by the deletion compaction at the end of each
/// update; everything else reads.
pub struct Terrain {
    pub chunks: HashMap<ChunkIndex, Chunk>,
    structures: Vec<Structure>,
    areas: HashMap<u64, LoadedArea>,
    height_gen: HeightGenerator,
    structure_gen: StructureGenerator,
    streaming: StreamingConfig,
    remesh: Vec<ChunkIndex>,
}

/// Stable id for the structure rooted at a surface column. Chunk coordinates
/// wrap at 2^24, far beyond the distance between any two structures that can
/// share a chunk, so ids never collide where idempotent stamping depends on
/// them, and a regenerated root chunk reuses the old ids.
fn structure_id(index: ChunkIndex, x: usize, z: usize) -> StructureId {
    let cx = (index.x as u32 as u64) & 0xFF_FFFF;
    let cz = (index.z as u32 as u64) & 0xFF_FFFF;
    (cx << 40) | (cz << 16) | (x * CHUNK_WIDTH + z) as u64
}

impl Terrain {
    pub fn new(config: &WorldConfig) -> Self {
        Self::with_template(config, Arc::new(StructureTemplate::tree()))
    }

    pub fn with_template(config: &WorldConfig, template: Arc<StructureTemplate>) -> Self {
        Self {
            chunks: HashMap::new(),
            structures: Vec::new(),
            areas: HashMap::new(),
            height_gen: HeightGenerator::from_config(config.seed, &config.height),
            structure_gen: StructureGenerator::new(config.seed, &config.hills, template),
            streaming: config.streaming.clone(),
            remesh: Vec::new(),
        }
    }

    /// Advances the terrain one tick: refreshes per-chunk entity caches,
    /// drives each observer's loaded area, applies the resulting spreader
    /// visits, compacts out-of-range chunks, and re-attempts stamping of
    /// structures whose chunks were not all loaded yet.
    pub fn update(&mut self, observers: &[Observer], entities: &[EntityHandle]) {
        self.cache_entities(entities);

        // Areas live exactly as long as their observer.
        self.areas
            .retain(|id, _| observers.iter().any(|o| o.id == *id));

        let mut visits: Vec<AreaVisits> = Vec::with_capacity(observers.len());
        for obs in observers {
            let center = ChunkIndex::of_world(obs.position.x, obs.position.z);
            let streaming = &self.streaming;
            let area = self.areas.entry(obs.id).or_insert_with(|| {
                log::info!("tracking observer {} around {:?}", obs.id, center);
                LoadedArea::new(obs.id, center, streaming)
            });
            visits.push(area.update(center));
        }
        for v in visits {
            self.apply_visits(v);
        }

        self.delete_out_of_range();
        self.reload_structures();
    }

    /// Forces a full graphical sweep for one observer's area on its next
    /// update. Returns false if the observer is not tracked.
    pub fn request_reload(&mut self, observer_id: u64) -> bool {
        match self.areas.get_mut(&observer_id) {
            Some(area) => {
                area.request_reload();
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    #[inline]
    pub fn area(&self, observer_id: u64) -> Option<&LoadedArea> {
        self.areas.get(&observer_id)
    }

    /// Chunk indices whose geometry must be (re)built since the last drain.
    /// This is the hook surface for the meshing collaborator; the core never
    /// builds geometry itself.
    pub fn drain_remesh(&mut self) -> Vec<ChunkIndex> {
        std::mem::take(&mut self.remesh)
    }

    /// Creates and generates the chunk at `index` if it does not exist:
    /// terrain fill, structure placement for its surface columns, and lazy
    /// stamping of every known structure overlapping it. Returns true when a
    /// chunk was created.
    pub fn ensure_chunk(&mut self, index: ChunkIndex) -> bool {
        if self.chunks.contains_key(&index) {
            return false;
        }
        let chunk = generate_chunk(index, &self.height_gen);
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                if self.structure_gen.should_place(index, x, z) {
                    let id = structure_id(index, x, z);
                    let surface = chunk.column_height(x, z);
                    let structure = self.structure_gen.place(id, index, x, z, surface);
                    log::debug!(
                        "structure {} anchored at {:?} from chunk {:?}",
                        id,
                        structure.anchor,
                        index
                    );
                    self.structures.push(structure);
                }
            }
        }
        self.chunks.insert(index, chunk);
        if let Some(chunk) = self.chunks.get_mut(&index) {
            for s in &self.structures {
                if s.overlaps(index) {
                    s.stamp_into(chunk);
                }
            }
            // Physical load acquires geometry immediately.
            chunk.to_refresh = false;
        }
        self.remesh.push(index);
        log::debug!("generated chunk {:?}", index);
        true
    }

    fn apply_visits(&mut self, visits: AreaVisits) {
        if let Some(index) = visits.create {
            self.ensure_chunk(index);
        }
        if let Some(index) = visits.remesh {
            if let Some(chunk) = self.chunks.get_mut(&index) {
                chunk.to_refresh = false;
                self.remesh.push(index);
            }
        }
        if let Some(index) = visits.refresh {
            if let Some(chunk) = self.chunks.get_mut(&index) {
                if chunk.to_refresh {
                    chunk.to_refresh = false;
                    self.remesh.push(index);
                }
            }
        }
    }

    /// Rebuilds the transient per-chunk entity caches from this tick's
    /// entity set.
    fn cache_entities(&mut self, entities: &[EntityHandle]) {
        for chunk in self.chunks.values_mut() {
            chunk.entities_for_collision.clear();
        }
        for e in entities {
            let lo = ChunkIndex::of_world(e.bounds.min.x, e.bounds.min.z);
            let hi = ChunkIndex::of_world(e.bounds.max.x, e.bounds.max.z);
            for cx in lo.x..=hi.x {
                for cz in lo.z..=hi.z {
                    if let Some(chunk) = self.chunks.get_mut(&ChunkIndex::new(cx, cz)) {
                        chunk.entities_for_collision.push(*e);
                    }
                }
            }
        }
    }

    /// Marks and removes chunks at Manhattan distance >= radius from every
    /// area's center, then purges structures whose root chunk went away.
    fn delete_out_of_range(&mut self) {
        let areas: Vec<(ChunkIndex, i32)> = self
            .areas
            .values()
            .map(|a| (a.center(), a.radius()))
            .collect();
        for (index, chunk) in self.chunks.iter_mut() {
            let in_range = areas
                .iter()
                .any(|(center, radius)| center.manhattan_distance(*index) < *radius);
            if !in_range {
                chunk.to_delete = true;
            }
        }
        let before = self.chunks.len();
        self.chunks.retain(|_, chunk| !chunk.to_delete);
        let removed = before - self.chunks.len();
        if removed > 0 {
            let chunks = &self.chunks;
            self.structures
                .retain(|s| chunks.contains_key(&s.root_chunk));
            log::debug!("unloaded {} out-of-range chunks", removed);
        }
    }

    /// Opportunistic stamping: a structure created before all of its
    /// overlapping chunks were loaded stamps them as they appear.
    fn reload_structures(&mut self) {
        for s in &self.structures {
            s.reload(&mut self.chunks);
        }
    }
}
