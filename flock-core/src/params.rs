use crate::vector::Vector2D;

/// Upper bound on a single frame's wall-clock delta, in seconds.
pub const MAX_FRAME_DT: f32 = 0.05;

/// Speeds and forces are tuned "per frame at 60fps"; deltas in seconds are
/// multiplied by this before integration.
pub const FRAME_RATE_SCALE: f32 = 60.0;

/// Relative weight of each steering behavior in the per-agent force sum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
    pub fear: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            separation: 1.5,
            alignment: 1.0,
            cohesion: 1.0,
            fear: 3.0,
        }
    }
}

/// Externally driven point the flock flees from. It is never steered or
/// integrated by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Predator {
    pub position: Vector2D,
    pub fear_radius: f32,
    pub enabled: bool,
}

impl Predator {
    pub fn at(position: Vector2D, fear_radius: f32) -> Self {
        Self {
            position,
            fear_radius,
            enabled: true,
        }
    }
}

impl Default for Predator {
    fn default() -> Self {
        Self {
            position: Vector2D::zero(),
            fear_radius: 120.0,
            enabled: false,
        }
    }
}

/// Initial speed range for a freshly reset population
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRange {
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for SpawnRange {
    fn default() -> Self {
        Self {
            min_speed: 0.4,
            max_speed: 2.2,
        }
    }
}

impl SpawnRange {
    /// Bounds ordered so that `min <= max`, both non-negative.
    pub fn ordered(&self) -> (f32, f32) {
        let a = self.min_speed.max(0.0);
        let b = self.max_speed.max(0.0);
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Parameters for one simulation instance. Read on every step, so callers
/// may change any field between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldParams {
    pub width: f32,
    pub height: f32,
    pub vision_radius: f32,
    pub avoid_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub weights: Weights,
    pub predator: Predator,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            vision_radius: 50.0,
            avoid_radius: 20.0,
            max_speed: 2.2,
            max_force: 0.05,
            weights: Weights::default(),
            predator: Predator::default(),
        }
    }
}

/// Caller misuse detected by [`WorldParams::validate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamError {
    /// Width or height is zero, negative or not finite
    InvalidBounds { width: f32, height: f32 },
    /// A radius, speed or force is negative or not finite
    Negative { name: &'static str, value: f32 },
    /// An agent at full speed can cross the whole world in one clamped frame,
    /// which the single-step wrap cannot represent
    WrapOverrun { max_step: f32, min_extent: f32 },
}

impl core::fmt::Display for ParamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParamError::InvalidBounds { width, height } => {
                write!(f, "world bounds must be positive, got {}x{}", width, height)
            }
            ParamError::Negative { name, value } => {
                write!(f, "{} must be a non-negative number, got {}", name, value)
            }
            ParamError::WrapOverrun {
                max_step,
                min_extent,
            } => write!(
                f,
                "max step distance {} per frame reaches the world extent {}",
                max_step, min_extent
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParamError {}

impl WorldParams {
    pub fn with_bounds(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Largest distance an agent can travel in one clamped, scaled frame.
    pub fn max_step_distance(&self) -> f32 {
        self.max_speed * FRAME_RATE_SCALE * MAX_FRAME_DT
    }

    /// Checks the preconditions the step relies on. The step itself never
    /// calls this; hosts decide whether to reject or just warn.
    pub fn validate(&self) -> Result<(), ParamError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(ParamError::InvalidBounds {
                width: self.width,
                height: self.height,
            });
        }

        let scalars = [
            ("vision_radius", self.vision_radius),
            ("avoid_radius", self.avoid_radius),
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("fear_radius", self.predator.fear_radius),
        ];
        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamError::Negative { name, value });
            }
        }

        let min_extent = self.width.min(self.height);
        let max_step = self.max_step_distance();
        if max_step >= min_extent {
            return Err(ParamError::WrapOverrun {
                max_step,
                min_extent,
            });
        }

        Ok(())
    }
}
