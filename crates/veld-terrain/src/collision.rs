//! Swept collision of one entity against the loaded terrain.

use veld_geom::{Aabb, Axis, Collidable, Collision, Vec3, detect_collision};

use crate::terrain::Terrain;

/// Sweeps `entity` by `momentum` against every solid block near it and folds
/// the per-block results: a blocked axis zeroes that momentum component for
/// all remaining candidates, and any static interpenetration sets `sank`.
///
/// Candidates come from a gather box padded by the entity's size plus two
/// blocks per side, wide enough that one tick of stepped sweeping cannot
/// reach a block outside it. Unloaded chunks and out-of-range Y read as air.
pub fn detect_collision_with_terrain(
    entity: &Aabb,
    momentum: Vec3,
    terrain: &Terrain,
) -> Collision {
    let mut result = Collision {
        momentum,
        sank: false,
        hit: [false; 3],
        obstacle: None,
    };
    let size = entity.size();
    let pad = Vec3::new(size.x + 2.0, size.y + 2.0, size.z + 2.0);
    let scan = Aabb::new(entity.min - pad, entity.max + pad);
    let (x0, x1) = (scan.min.x.floor() as i32, scan.max.x.floor() as i32);
    let (y0, y1) = (scan.min.y.floor() as i32, scan.max.y.floor() as i32);
    let (z0, z1) = (scan.min.z.floor() as i32, scan.max.z.floor() as i32);
    'scan: for bx in x0..=x1 {
        for by in y0..=y1 {
            for bz in z0..=z1 {
                let Some(block) = terrain.block_at(bx, by, bz) else {
                    continue;
                };
                if !block.is_solid() {
                    continue;
                }
                let bounds = block.bounds();
                let c = detect_collision(entity, momentum, Some(&bounds));
                if c.sank {
                    result.sank = true;
                    if result.obstacle.is_none() {
                        result.obstacle = Some(bounds);
                    }
                }
                for axis in Axis::ALL {
                    if c.hit[axis.index()] {
                        result.hit[axis.index()] = true;
                        axis.set_component(&mut result.momentum, 0.0);
                        result.obstacle = Some(bounds);
                    }
                }
                if result.hit_any() && result.momentum == Vec3::ZERO {
                    break 'scan;
                }
            }
        }
    }
    result
}
