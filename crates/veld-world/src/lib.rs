//! World sizing, chunk indexing, coordinate resolution, and terrain noise.
#![forbid(unsafe_code)]

pub mod config;
pub mod coords;
pub mod r#gen;

pub use config::{HeightConfig, HillConfig, StreamingConfig, WorldConfig};
pub use coords::{ChunkIndex, Resolved, in_chunk_coords, resolve_across};
pub use r#gen::HeightGenerator;

/// Chunk footprint in blocks on the X and Z axes.
pub const CHUNK_WIDTH: usize = 16;
/// Vertical extent of every chunk column. Chunks do not stream vertically.
pub const CHUNK_HEIGHT: usize = 128;

/// Block identifier stored in chunks and structure templates.
pub type BlockId = u16;

/// Id 0 is air everywhere: unstored, passable, and "no placement" in templates.
pub const AIR: BlockId = 0;
pub const STONE: BlockId = 1;
pub const DIRT: BlockId = 2;
pub const GRASS: BlockId = 3;
pub const WOOD: BlockId = 4;
pub const LEAVES: BlockId = 5;

/// Identifier of a placed structure instance. The terrain owner derives it
/// from the rooting chunk and surface column, so a deleted and regenerated
/// chunk re-creates its structures under the same ids.
pub type StructureId = u64;
