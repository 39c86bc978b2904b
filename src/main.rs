//! Headless driver: streams terrain around a moving observer and reports
//! what the scheduler does each tick.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use veld_geom::{Aabb, Vec3};
use veld_structures::StructureTemplate;
use veld_terrain::{Observer, Terrain, detect_collision_with_terrain};
use veld_world::{CHUNK_HEIGHT, WorldConfig};

#[derive(Parser, Debug)]
#[command(name = "veld", about = "chunked voxel terrain streaming driver")]
struct Args {
    /// TOML world config; missing sections fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML structure template stamped instead of the built-in tree.
    #[arg(long)]
    template: Option<PathBuf>,

    /// World seed, overriding the config file.
    #[arg(long)]
    seed: Option<i32>,

    /// Loaded-area radius in chunks, overriding the config file.
    #[arg(long)]
    radius: Option<i32>,

    /// Ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Observer speed in blocks per tick along +X.
    #[arg(long, default_value_t = 0.5)]
    speed: f32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => WorldConfig::from_path(path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(radius) = args.radius {
        config.streaming.radius = radius;
    }
    log::info!(
        "seed={} radius={} ticks={}",
        config.seed,
        config.streaming.radius,
        args.ticks
    );

    let mut terrain = match &args.template {
        Some(path) => {
            Terrain::with_template(&config, Arc::new(StructureTemplate::from_path(path)?))
        }
        None => Terrain::new(&config),
    };
    let mut position = Vec3::new(8.0, 80.0, 8.0);
    let mut remeshed_total = 0usize;

    for tick in 0..args.ticks {
        position.x += args.speed;
        terrain.update(&[Observer { id: 0, position }], &[]);
        let remeshed = terrain.drain_remesh().len();
        remeshed_total += remeshed;
        if tick % 60 == 0 {
            log::info!(
                "tick {tick}: {} chunks loaded, {} structures, {remeshed} remeshed",
                terrain.chunks.len(),
                terrain.structures().len()
            );
        }
    }

    // Drop a probe body onto the surface under the observer's final position.
    let (bx, bz) = (position.x.floor() as i32, position.z.floor() as i32);
    let surface = (0..CHUNK_HEIGHT as i32)
        .rev()
        .find(|&y| terrain.block_at(bx, y, bz).is_some_and(|b| b.is_solid()))
        .unwrap_or(0);
    let probe = Aabb::from_center_size(
        Vec3::new(position.x, surface as f32 + 3.0, position.z),
        Vec3::new(0.8, 1.8, 0.8),
    );
    let fall = detect_collision_with_terrain(&probe, Vec3::new(0.0, -5.0, 0.0), &terrain);
    log::info!(
        "probe at x={:.1}: blocked_y={} momentum_y={:.1}",
        position.x,
        fall.hit[1],
        fall.momentum.y
    );
    println!(
        "simulated {} ticks: {} chunks loaded, {} remesh requests",
        args.ticks,
        terrain.chunks.len(),
        remeshed_total
    );
    Ok(())
}
