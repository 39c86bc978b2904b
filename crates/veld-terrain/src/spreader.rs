//! Rate-limited ring walker over chunk indices.

use veld_world::ChunkIndex;

/// Visits chunk indices in concentric Manhattan-distance diamonds around an
/// origin: layer 0 is the origin, layer k the indices at distance exactly k,
/// enumerated by a fixed column sweep (x ascending, negative z arm first).
///
/// Each `update` call advances a cooldown; when it reaches `rate` the
/// spreader visits exactly one index and moves on, which is the system's
/// only throttling mechanism. A partially walked ring is never abandoned;
/// `restart` is the only way to discard progress.
pub struct Spreader {
    origin: ChunkIndex,
    rate: u32,
    cooldown: u32,
    layer: i32,
    cursor: usize,
}

impl Spreader {
    pub fn new(origin: ChunkIndex, rate: u32) -> Self {
        Self {
            origin,
            rate: rate.max(1),
            cooldown: 0,
            layer: 0,
            cursor: 0,
        }
    }

    #[inline]
    pub fn origin(&self) -> ChunkIndex {
        self.origin
    }

    /// Layer the next visit will come from.
    #[inline]
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Re-centers on `origin` and clears ring progress and cooldown.
    pub fn restart(&mut self, origin: ChunkIndex) {
        self.origin = origin;
        self.layer = 0;
        self.cursor = 0;
        self.cooldown = 0;
    }

    /// Advances one tick. Returns the visited index when the cooldown fires,
    /// `None` on the ticks in between.
    pub fn update(&mut self) -> Option<ChunkIndex> {
        self.cooldown += 1;
        if self.cooldown < self.rate {
            return None;
        }
        self.cooldown = 0;
        let visited = ring_index(self.origin, self.layer, self.cursor);
        self.cursor += 1;
        if self.cursor >= ring_len(self.layer) {
            self.cursor = 0;
            self.layer += 1;
        }
        Some(visited)
    }
}

/// Number of indices at Manhattan distance exactly `layer`.
#[inline]
pub fn ring_len(layer: i32) -> usize {
    if layer == 0 { 1 } else { 4 * layer as usize }
}

/// The `cursor`-th index of a layer under the fixed column sweep.
fn ring_index(origin: ChunkIndex, layer: i32, cursor: usize) -> ChunkIndex {
    if layer == 0 {
        return origin;
    }
    let mut remaining = cursor;
    for dx in -layer..=layer {
        let arm = layer - dx.abs();
        let column = if arm == 0 { 1 } else { 2 };
        if remaining < column {
            let dz = if arm == 0 {
                0
            } else if remaining == 0 {
                -arm
            } else {
                arm
            };
            return origin.offset(dx, dz);
        }
        remaining -= column;
    }
    unreachable!("cursor {cursor} exceeds ring length {}", ring_len(layer));
}
