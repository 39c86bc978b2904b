//! Terrain ownership, ring-based chunk streaming, and terrain collision.
#![forbid(unsafe_code)]

mod area;
mod block;
mod collision;
mod spreader;
mod terrain;

pub use area::{AreaVisits, LoadedArea};
pub use block::Block;
pub use collision::detect_collision_with_terrain;
pub use spreader::{Spreader, ring_len};
pub use terrain::{Observer, Terrain};
