//! Axis-aligned overlap and swept collision detection.
//!
//! Sweeps discretize per-axis momentum into steps of one block unit so a fast
//! body cannot pass through a single-block-thick obstacle within one tick.

use std::error::Error;
use std::fmt;

use crate::{Aabb, Axis, Vec3};

/// Anything a body can collide with exposes its world-space bounds.
pub trait Collidable {
    fn bounds(&self) -> Aabb;
}

impl Collidable for Aabb {
    #[inline]
    fn bounds(&self) -> Aabb {
        *self
    }
}

/// The swept 1D check was handed a direction that is not a cardinal unit axis.
/// Callers are expected never to construct such a call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NonCardinalAxis(pub Vec3);

impl fmt::Display for NonCardinalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "swept collision axis must be a cardinal unit vector, got ({}, {}, {})",
            self.0.x, self.0.y, self.0.z
        )
    }
}

impl Error for NonCardinalAxis {}

/// Outcome of a combined collision check. `momentum` is the entity's momentum
/// going into the check; terrain-level callers zero blocked components on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    pub momentum: Vec3,
    /// Already statically interpenetrating (not just about to touch).
    pub sank: bool,
    /// Per-axis swept hits, indexed by [`Axis::index`].
    pub hit: [bool; 3],
    /// Bounds of the blocking obstacle; `None` for a self-collision check.
    pub obstacle: Option<Aabb>,
}

impl Collision {
    #[inline]
    pub fn hit_on(&self, axis: Axis) -> bool {
        self.hit[axis.index()]
    }

    #[inline]
    pub fn hit_any(&self) -> bool {
        self.hit.iter().any(|h| *h)
    }
}

/// Closed-interval overlap on all three axes simultaneously.
#[inline]
pub fn collided(a: &Aabb, b: &Aabb) -> bool {
    a.min.x <= b.max.x
        && a.max.x >= b.min.x
        && a.min.y <= b.max.y
        && a.max.y >= b.min.y
        && a.min.z <= b.max.z
        && a.max.z >= b.min.z
}

/// Sweeps `entity` along one cardinal axis by its momentum component on that
/// axis, in steps of at most one block unit, and reports the first overlap
/// with `obstacle`. Fails if `axis` is not one of the six cardinal units.
pub fn detect_collision_1d(
    entity: &Aabb,
    momentum: Vec3,
    axis: Vec3,
    obstacle: &Aabb,
) -> Result<bool, NonCardinalAxis> {
    let axis = Axis::from_unit(axis).ok_or(NonCardinalAxis(axis))?;
    Ok(sweep_axis(entity, momentum, axis, obstacle))
}

fn sweep_axis(entity: &Aabb, momentum: Vec3, axis: Axis, obstacle: &Aabb) -> bool {
    let amount = axis.component(momentum);
    if amount == 0.0 {
        return false;
    }
    let distance = amount.abs();
    let sign = amount.signum();
    let steps = distance.ceil() as i32;
    for step in 1..=steps {
        let travelled = (step as f32).min(distance) * sign;
        let moved = entity.translated(axis.unit() * travelled);
        if collided(&moved, obstacle) {
            return true;
        }
    }
    false
}

/// Combines the static overlap check with the three per-axis sweeps.
/// `obstacle = None` checks the entity against itself (a self-collision
/// probe), which is trivially sank and never blocks an axis.
pub fn detect_collision(entity: &Aabb, momentum: Vec3, obstacle: Option<&Aabb>) -> Collision {
    let target = obstacle.copied().unwrap_or(*entity);
    let mut hit = [false; 3];
    if obstacle.is_some() {
        for axis in Axis::ALL {
            hit[axis.index()] = sweep_axis(entity, momentum, axis, &target);
        }
    }
    Collision {
        momentum,
        sank: collided(entity, &target),
        hit,
        obstacle: obstacle.copied(),
    }
}
