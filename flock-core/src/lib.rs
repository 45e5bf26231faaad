#![cfg_attr(not(feature = "std"), no_std)]

//! Flocking engine: boids on a wrap-around plane steering by separation,
//! alignment, cohesion and fear of an optional predator.

pub mod behavior;
pub mod boid;
pub mod metrics;
pub mod neighbors;
pub mod params;
#[cfg(feature = "std")]
pub mod spawn;
pub mod vector;
pub mod world;

pub use boid::Boid;
pub use metrics::{polarization, FpsCounter};
pub use neighbors::{neighbors_of, BruteForce, NeighborQuery};
#[cfg(feature = "std")]
pub use neighbors::UniformGrid;
pub use params::{
    ParamError, Predator, SpawnRange, Weights, WorldParams, FRAME_RATE_SCALE, MAX_FRAME_DT,
};
#[cfg(feature = "std")]
pub use spawn::{reset_world, reset_world_with};
pub use vector::Vector2D;
pub use world::{advance, frame_dt, step, step_with, Flock};
#[cfg(feature = "std")]
pub use world::FlockStd;
