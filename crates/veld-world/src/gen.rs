//! Coherent-noise terrain height sampling.

use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::config::{HeightConfig, HillConfig};
use crate::{CHUNK_HEIGHT, ChunkIndex};

/// Seeded 2D height field. The same (seed, chunk index, local column) always
/// yields the same height, so destroyed chunks regenerate identically.
pub struct HeightGenerator {
    noise: FastNoiseLite,
    amplitude: f32,
    base: f32,
}

impl HeightGenerator {
    pub fn new(seed: i32, wavelength: f32, amplitude: f32, base: f32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(1.0 / wavelength.max(1.0)));
        Self {
            noise,
            amplitude,
            base,
        }
    }

    pub fn from_config(seed: i32, cfg: &HeightConfig) -> Self {
        Self::new(seed, cfg.wavelength, cfg.amplitude, cfg.base)
    }

    /// Secondary generator for structure placement, salted so it decorrelates
    /// from the terrain surface while staying tied to the world seed.
    pub fn hill(seed: i32, cfg: &HillConfig) -> Self {
        Self::new(seed ^ cfg.salt, cfg.wavelength, cfg.amplitude, cfg.base)
    }

    /// Raw height value at the absolute block column implied by the chunk
    /// index and local (x, z). Unclamped; used for threshold decisions.
    pub fn sample(&self, index: ChunkIndex, x: usize, z: usize) -> f32 {
        let (ox, oz) = index.world_origin();
        let wx = (ox + x as i32) as f32;
        let wz = (oz + z as i32) as f32;
        self.base + self.noise.get_noise_2d(wx, wz) * self.amplitude
    }

    /// Terrain height for a column, clamped into the chunk's vertical range.
    pub fn height_at(&self, index: ChunkIndex, x: usize, z: usize) -> i32 {
        let h = self.sample(index, x, z).round() as i32;
        h.clamp(0, CHUNK_HEIGHT as i32 - 1)
    }
}
