use crate::boid::Boid;
use crate::params::SpawnRange;
use crate::vector::Vector2D;
use rand::Rng;

fn sample_span<R: Rng + ?Sized>(rng: &mut R, upper: f32) -> f32 {
    if upper > 0.0 {
        rng.gen_range(0.0..upper)
    } else {
        0.0
    }
}

impl Boid {
    pub fn random(width: f32, height: f32) -> Self {
        Self::random_with(&mut rand::thread_rng(), width, height, &SpawnRange::default())
    }

    /// Uniform position inside the bounds, uniform heading in `[0, 2pi)`,
    /// uniform speed in the spawn range.
    pub fn random_with<R: Rng + ?Sized>(
        rng: &mut R,
        width: f32,
        height: f32,
        spawn: &SpawnRange,
    ) -> Self {
        let position = Vector2D::new(sample_span(rng, width), sample_span(rng, height));
        let angle = rng.gen_range(0.0..core::f32::consts::TAU);
        let (min_speed, max_speed) = spawn.ordered();
        let speed = rng.gen_range(min_speed..=max_speed);
        Self::new(position, Vector2D::from_polar(angle, speed))
    }
}

/// Fresh population of `count` boids using the thread-local RNG.
pub fn reset_world(count: usize, width: f32, height: f32) -> Vec<Boid> {
    reset_world_with(
        &mut rand::thread_rng(),
        count,
        width,
        height,
        &SpawnRange::default(),
    )
}

pub fn reset_world_with<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    width: f32,
    height: f32,
    spawn: &SpawnRange,
) -> Vec<Boid> {
    log::debug!(
        "Spawning {} boids in {}x{} (speed {:?})",
        count,
        width,
        height,
        spawn.ordered()
    );
    (0..count)
        .map(|_| Boid::random_with(&mut *rng, width, height, spawn))
        .collect()
}
