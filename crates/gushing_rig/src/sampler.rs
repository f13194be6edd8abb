//! Sampling the physics of a spray.
//!
//! This is pure apart from the random source and the ID sequence, both of which are handed in so
//! that tests can seed them.

use rand::Rng;

use crate::droplet::{Droplet, DropletIds};
use crate::physics::{PhysicsConfig, ValidatedPhysics};

/// Sample `count` independent droplets. A `count` of 0 is fine, it's just an empty spray.
pub fn sample<R: Rng + ?Sized>(
    physics: &ValidatedPhysics,
    count: usize,
    ids: &mut DropletIds,
    rng: &mut R,
) -> Vec<Droplet> {
    let config = physics.get();
    (0..count)
        .map(|_| sample_droplet(config, ids.next_id(), rng))
        .collect()
}

/// Sample a single droplet.
fn sample_droplet<R: Rng + ?Sized>(config: &PhysicsConfig, id: u64, rng: &mut R) -> Droplet {
    let (angle_min, angle_max) = config.angle_range();
    let angle_degrees = uniform(rng, angle_min, angle_max);
    let magnitude = uniform(rng, config.power_min, config.power_max);
    let angle = angle_degrees.to_radians();

    Droplet::builder()
        .id(id)
        .dx(angle.cos() * magnitude)
        .dy(angle.sin() * magnitude)
        .size(uniform(rng, config.size_min, config.size_max))
        .duration_ms(uniform(rng, config.duration_min, config.duration_max))
        .delay_ms(uniform(rng, 0.0, config.delay_max))
        .angle_degrees(angle_degrees)
        .magnitude(magnitude)
        .build()
}

/// Uniform over the closed range. When `min == max` this is always `min`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    rng.gen_range(min..=max)
}
