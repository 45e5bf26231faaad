//! Steering behaviors.
//!
//! Each behavior turns neighbor data into a desired velocity and returns
//! `limit(desired - velocity, max_force)`. Weighting happens in the world
//! step, never here.

use crate::boid::Boid;
use crate::params::WorldParams;
use crate::vector::{sqrt, Vector2D};

/// Lower bound on the squared distance used to weight separation.
pub const MIN_SEPARATION_DIST_SQ: f32 = 1e-6;

/// Reynolds steering: the change needed to reach `desired`, capped.
pub fn steer_toward(desired: Vector2D, current: Vector2D, max_force: f32) -> Vector2D {
    (desired - current).limit(max_force)
}

/// Push away from neighbors inside `avoid_radius`, closer ones weighted by
/// the inverse squared distance.
pub fn separation<'a, I>(boid: &Boid, others: I, params: &WorldParams) -> Vector2D
where
    I: IntoIterator<Item = &'a Boid>,
{
    let avoid_sq = params.avoid_radius * params.avoid_radius;
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        let d2 = boid.position.distance_squared(&other.position);
        if d2 > 0.0 && d2 < avoid_sq {
            let away = boid.position - other.position;
            sum += away / d2.max(MIN_SEPARATION_DIST_SQ);
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    let desired = sum.normalize() * params.max_speed;
    steer_toward(desired, boid.velocity, params.max_force)
}

/// Match the unweighted mean heading of the neighbors.
pub fn alignment<'a, I>(boid: &Boid, others: I, params: &WorldParams) -> Vector2D
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        sum += other.velocity;
        count += 1;
    }

    if count == 0 {
        return Vector2D::zero();
    }

    let desired = (sum / count as f32).normalize() * params.max_speed;
    steer_toward(desired, boid.velocity, params.max_force)
}

/// Steer toward the centroid of the neighbors.
pub fn cohesion<'a, I>(boid: &Boid, others: I, params: &WorldParams) -> Vector2D
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut center = Vector2D::zero();
    let mut count = 0;

    for other in others {
        center += other.position;
        count += 1;
    }

    if count == 0 {
        return Vector2D::zero();
    }

    center = center / count as f32;
    seek(boid, center, params)
}

pub fn seek(boid: &Boid, target: Vector2D, params: &WorldParams) -> Vector2D {
    let desired = (target - boid.position).normalize() * params.max_speed;
    steer_toward(desired, boid.velocity, params.max_force)
}

/// Flee from the predator with a linear falloff: full strength on top of
/// the predator, nothing at `fear_radius`.
///
/// A boid exactly on the predator has no "away" direction; it keeps running
/// along its current heading (or +x when stationary).
pub fn predator_flee(boid: &Boid, params: &WorldParams) -> Vector2D {
    let predator = &params.predator;
    if !predator.enabled || predator.fear_radius <= 0.0 {
        return Vector2D::zero();
    }

    let d2 = boid.position.distance_squared(&predator.position);
    if d2 > predator.fear_radius * predator.fear_radius {
        return Vector2D::zero();
    }

    let away = if d2 > 0.0 {
        (boid.position - predator.position).normalize()
    } else if !boid.velocity.is_zero() {
        boid.velocity.normalize()
    } else {
        Vector2D::new(1.0, 0.0)
    };

    let intensity = 1.0 - sqrt(d2) / predator.fear_radius;
    let steer = steer_toward(away * params.max_speed, boid.velocity, params.max_force);
    steer * intensity
}

/// Weighted sum of all four behaviors for one boid
pub fn combined<'a, I>(boid: &Boid, others: I, params: &WorldParams) -> Vector2D
where
    I: IntoIterator<Item = &'a Boid>,
    I::IntoIter: Clone,
{
    let others = others.into_iter();
    let weights = &params.weights;

    separation(boid, others.clone(), params) * weights.separation
        + alignment(boid, others.clone(), params) * weights.alignment
        + cohesion(boid, others, params) * weights.cohesion
        + predator_flee(boid, params) * weights.fear
}
