use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default)]
    pub height: HeightConfig,
    #[serde(default)]
    pub hills: HillConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            height: HeightConfig::default(),
            hills: HillConfig::default(),
            streaming: StreamingConfig::default(),
        }
    }
}

impl WorldConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldConfig = toml::from_str(toml_str)?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

fn default_seed() -> i32 {
    1337
}

/// Primary terrain surface: noise wavelength/amplitude around a base height.
#[derive(Clone, Debug, Deserialize)]
pub struct HeightConfig {
    #[serde(default = "default_height_wavelength")]
    pub wavelength: f32,
    #[serde(default = "default_height_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_height_base")]
    pub base: f32,
}
fn default_height_wavelength() -> f32 {
    96.0
}
fn default_height_amplitude() -> f32 {
    14.0
}
fn default_height_base() -> f32 {
    52.0
}
impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            wavelength: default_height_wavelength(),
            amplitude: default_height_amplitude(),
            base: default_height_base(),
        }
    }
}

/// Secondary "hill" field driving structure placement: a surface column
/// spawns a structure when this field exceeds `threshold` there.
#[derive(Clone, Debug, Deserialize)]
pub struct HillConfig {
    #[serde(default = "default_hill_wavelength")]
    pub wavelength: f32,
    #[serde(default = "default_hill_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_hill_base")]
    pub base: f32,
    #[serde(default = "default_hill_threshold")]
    pub threshold: f32,
    #[serde(default = "default_hill_salt")]
    pub salt: i32,
}
fn default_hill_wavelength() -> f32 {
    11.0
}
fn default_hill_amplitude() -> f32 {
    8.0
}
fn default_hill_base() -> f32 {
    0.0
}
fn default_hill_threshold() -> f32 {
    7.6
}
fn default_hill_salt() -> i32 {
    0x5f17
}
impl Default for HillConfig {
    fn default() -> Self {
        Self {
            wavelength: default_hill_wavelength(),
            amplitude: default_hill_amplitude(),
            base: default_hill_base(),
            threshold: default_hill_threshold(),
            salt: default_hill_salt(),
        }
    }
}

/// Loaded-area radius and spreader pacing, in ticks between ring visits.
/// Lower rate means faster. The physical pass reacts to movement at once;
/// the graphical pass only to accumulated movement or an explicit reload.
#[derive(Clone, Debug, Deserialize)]
pub struct StreamingConfig {
    #[serde(default = "default_radius")]
    pub radius: i32,
    #[serde(default = "default_physical_rate")]
    pub physical_rate: u32,
    #[serde(default = "default_graphical_rate")]
    pub graphical_rate: u32,
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate: u32,
    #[serde(default = "default_refresh_period")]
    pub refresh_period: u32,
}
fn default_radius() -> i32 {
    8
}
fn default_physical_rate() -> u32 {
    1
}
fn default_graphical_rate() -> u32 {
    3
}
fn default_refresh_rate() -> u32 {
    1
}
fn default_refresh_period() -> u32 {
    240
}
impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            physical_rate: default_physical_rate(),
            graphical_rate: default_graphical_rate(),
            refresh_rate: default_refresh_rate(),
            refresh_period: default_refresh_period(),
        }
    }
}
