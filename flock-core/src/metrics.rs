use crate::boid::Boid;
use crate::vector::Vector2D;

/// Boids slower than this have no meaningful heading.
pub const MIN_HEADING_SPEED: f32 = 1e-8;

/// Heading coherence of the population: the magnitude of the mean unit
/// velocity, in `[0, 1]`. Stationary boids are left out of both the sum and
/// the count; an empty or fully stationary population scores 0.
pub fn polarization(boids: &[Boid]) -> f32 {
    let mut sum = Vector2D::zero();
    let mut count = 0usize;

    for boid in boids {
        let speed = boid.velocity.magnitude();
        if speed > MIN_HEADING_SPEED {
            sum += boid.velocity / speed;
            count += 1;
        }
    }

    if count == 0 {
        return 0.0;
    }

    (sum / count as f32).magnitude().min(1.0)
}

/// Frames-per-second estimate smoothed with an exponential moving average.
///
/// The host feeds it the wall-clock delta of every rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsCounter {
    estimate: f32,
    alpha: f32,
}

impl FpsCounter {
    pub const INITIAL_ESTIMATE: f32 = 60.0;
    pub const SMOOTHING: f32 = 0.12;

    pub fn new() -> Self {
        Self::with_smoothing(Self::SMOOTHING)
    }

    pub fn with_smoothing(alpha: f32) -> Self {
        Self {
            estimate: Self::INITIAL_ESTIMATE,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Folds one frame delta (seconds) into the estimate and returns it.
    /// Non-positive deltas carry no rate information and are ignored.
    pub fn update(&mut self, dt_seconds: f32) -> f32 {
        if dt_seconds > 0.0 && dt_seconds.is_finite() {
            let fps = 1.0 / dt_seconds;
            self.estimate = self.estimate * (1.0 - self.alpha) + fps * self.alpha;
        }
        self.estimate
    }

    pub fn fps(&self) -> f32 {
        self.estimate
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
