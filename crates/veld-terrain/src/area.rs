//! Per-observer streaming state: three staggered ring spreaders.

use veld_world::{ChunkIndex, StreamingConfig};

use crate::spreader::Spreader;

/// Chunk indices visited by one `LoadedArea::update` call, at most one per
/// spreader. The terrain applies them: `create` constructs a missing chunk,
/// `remesh` rebuilds geometry unconditionally, `refresh` rebuilds only if the
/// chunk's dirty flag is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AreaVisits {
    pub create: Option<ChunkIndex>,
    pub remesh: Option<ChunkIndex>,
    pub refresh: Option<ChunkIndex>,
}

/// Streaming state around one tracked observer.
///
/// The physical spreader restarts on every center change, so chunk creation
/// reacts to movement immediately. The expensive graphical pass restarts only
/// after accumulated travel exceeds a quarter of the radius, or on an
/// explicit reload request. The refresh pass restarts on a long fixed period
/// regardless of movement, catching edits the graphical sweep already passed.
pub struct LoadedArea {
    id: u64,
    center: ChunkIndex,
    radius: i32,
    physical: Spreader,
    graphical: Spreader,
    refresh: Spreader,
    travel_since_reload: i32,
    refresh_cooldown: u32,
    refresh_period: u32,
    force_reload: bool,
}

impl LoadedArea {
    pub fn new(id: u64, center: ChunkIndex, cfg: &StreamingConfig) -> Self {
        Self {
            id,
            center,
            radius: cfg.radius.max(1),
            physical: Spreader::new(center, cfg.physical_rate),
            graphical: Spreader::new(center, cfg.graphical_rate),
            refresh: Spreader::new(center, cfg.refresh_rate),
            travel_since_reload: 0,
            refresh_cooldown: 0,
            refresh_period: cfg.refresh_period.max(1),
            force_reload: false,
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn center(&self) -> ChunkIndex {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Chunks strictly inside the radius are kept loaded by this area.
    #[inline]
    pub fn in_range(&self, index: ChunkIndex) -> bool {
        self.center.manhattan_distance(index) < self.radius
    }

    /// Requests a full graphical sweep on the next update.
    pub fn request_reload(&mut self) {
        self.force_reload = true;
    }

    /// Advances the area one tick with the observer's current chunk index.
    pub fn update(&mut self, new_center: ChunkIndex) -> AreaVisits {
        if new_center != self.center {
            self.travel_since_reload += self.center.manhattan_distance(new_center);
            self.center = new_center;
            self.physical.restart(new_center);
        }
        if self.force_reload || self.travel_since_reload > self.radius / 4 {
            self.graphical.restart(self.center);
            self.travel_since_reload = 0;
            self.force_reload = false;
        }
        self.refresh_cooldown += 1;
        if self.refresh_cooldown >= self.refresh_period {
            self.refresh_cooldown = 0;
            self.refresh.restart(self.center);
        }
        AreaVisits {
            create: poll_within(&mut self.physical, self.radius),
            remesh: poll_within(&mut self.graphical, self.radius),
            refresh: poll_within(&mut self.refresh, self.radius),
        }
    }
}

/// Advances a spreader unless it has exhausted the area's radius; an idle
/// spreader waits for its next restart.
fn poll_within(spreader: &mut Spreader, radius: i32) -> Option<ChunkIndex> {
    if spreader.layer() >= radius {
        return None;
    }
    spreader.update()
}
