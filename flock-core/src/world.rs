//! Per-frame orchestration.
//!
//! A step runs in two passes. The force pass reads positions and velocities
//! of the untouched population and only writes each boid's accumulator, so
//! every boid sees the same pre-step snapshot. The integration pass then
//! moves boids independently.

use crate::behavior;
use crate::boid::Boid;
use crate::metrics::polarization;
use crate::neighbors::{BruteForce, NeighborQuery};
#[cfg(feature = "std")]
use crate::params::SpawnRange;
use crate::params::{WorldParams, FRAME_RATE_SCALE, MAX_FRAME_DT};

/// Converts a wall-clock delta (seconds) into the integration step: capped
/// at [`MAX_FRAME_DT`] so stalls cannot teleport the flock, then expressed in
/// 60fps frames.
pub fn frame_dt(raw_dt: f32) -> f32 {
    raw_dt.max(0.0).min(MAX_FRAME_DT) * FRAME_RATE_SCALE
}

/// Weighted steering for every boid, added to its accumulator.
pub fn accumulate_forces<Q: NeighborQuery>(query: &mut Q, boids: &mut [Boid], params: &WorldParams) {
    query.rebuild(boids, params);

    for i in 0..boids.len() {
        let force = {
            let snapshot: &[Boid] = boids;
            let neighbors = query.neighbors_of(snapshot, i, params.vision_radius);
            behavior::combined(&snapshot[i], neighbors, params)
        };
        boids[i].apply_force(force);
    }
}

/// Applies accumulated forces, moves and wraps every boid.
pub fn integrate(boids: &mut [Boid], dt: f32, params: &WorldParams) {
    for boid in boids.iter_mut() {
        boid.update(dt, params.max_speed);
        boid.wrap_edges(params.width, params.height);
    }
}

/// One step with an already scaled `dt`.
pub fn advance_with<Q: NeighborQuery>(
    query: &mut Q,
    boids: &mut [Boid],
    dt: f32,
    params: &WorldParams,
) {
    log::trace!("step: {} boids, dt {}", boids.len(), dt);
    accumulate_forces(query, boids, params);
    integrate(boids, dt, params);
}

pub fn advance(boids: &mut [Boid], dt: f32, params: &WorldParams) {
    advance_with(&mut BruteForce, boids, dt, params);
}

/// One frame, given the wall-clock time since the previous frame.
pub fn step_with<Q: NeighborQuery>(
    query: &mut Q,
    boids: &mut [Boid],
    raw_dt: f32,
    params: &WorldParams,
) {
    advance_with(query, boids, frame_dt(raw_dt), params);
}

pub fn step(boids: &mut [Boid], raw_dt: f32, params: &WorldParams) {
    step_with(&mut BruteForce, boids, raw_dt, params);
}

/// A fixed-capacity flock for embedded (no_std) environments
pub struct Flock<const N: usize> {
    pub boids: heapless::Vec<Boid, N>,
    pub params: WorldParams,
}

impl<const N: usize> Flock<N> {
    pub fn new(params: WorldParams) -> Self {
        Self {
            boids: heapless::Vec::new(),
            params,
        }
    }

    /// Replaces the whole population. Boids beyond the capacity are dropped;
    /// returns how many were kept.
    pub fn reset_from<I>(&mut self, boids: I) -> usize
    where
        I: IntoIterator<Item = Boid>,
    {
        self.boids.clear();
        for boid in boids {
            if self.boids.push(boid).is_err() {
                break;
            }
        }
        log::debug!("Flock reset with {} boids", self.boids.len());
        self.boids.len()
    }

    pub fn step(&mut self, raw_dt: f32) {
        step(&mut self.boids, raw_dt, &self.params);
    }

    pub fn polarization(&self) -> f32 {
        polarization(&self.boids)
    }

    /// Changes the bounds and folds every boid into them. There is no
    /// random source here to respawn from.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.params.width = width;
        self.params.height = height;
        for boid in self.boids.iter_mut() {
            boid.fold_into(width, height);
        }
    }
}

/// A collection of boids for std environments
#[cfg(feature = "std")]
pub struct FlockStd<Q = BruteForce> {
    pub boids: Vec<Boid>,
    pub params: WorldParams,
    pub spawn: SpawnRange,
    query: Q,
}

#[cfg(feature = "std")]
impl<Q: NeighborQuery + Default> FlockStd<Q> {
    pub fn new(count: usize, params: WorldParams) -> Self {
        let mut flock = Self::from_boids(Vec::new(), params);
        flock.reset(count);
        flock
    }

    pub fn from_boids(boids: Vec<Boid>, params: WorldParams) -> Self {
        Self {
            boids,
            params,
            spawn: SpawnRange::default(),
            query: Q::default(),
        }
    }
}

#[cfg(feature = "std")]
impl<Q: NeighborQuery> FlockStd<Q> {
    /// Replaces the population with `count` random boids inside the current
    /// bounds. Must not be interleaved with a step.
    pub fn reset(&mut self, count: usize) {
        self.reset_with(&mut rand::thread_rng(), count);
    }

    pub fn reset_with<R: rand::Rng + ?Sized>(&mut self, rng: &mut R, count: usize) {
        self.boids = crate::spawn::reset_world_with(
            rng,
            count,
            self.params.width,
            self.params.height,
            &self.spawn,
        );
    }

    pub fn step(&mut self, raw_dt: f32) {
        step_with(&mut self.query, &mut self.boids, raw_dt, &self.params);
    }

    pub fn advance(&mut self, dt: f32) {
        advance_with(&mut self.query, &mut self.boids, dt, &self.params);
    }

    pub fn polarization(&self) -> f32 {
        polarization(&self.boids)
    }

    /// Changes the bounds and respawns the same number of boids inside them.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.params.width = width;
        self.params.height = height;
        self.reset(self.boids.len());
    }
}
