use crate::vector::{rem_euclid, Vector2D};

/// A single boid entity
#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Forces applied during the current step; zero outside of a step.
    pub acceleration: Vector2D,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2D::zero(),
        }
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.acceleration += force;
    }

    /// Semi-implicit Euler step: the clamped new velocity moves the boid.
    pub fn update(&mut self, dt: f32, max_speed: f32) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.limit(max_speed);
        self.position += self.velocity * dt;
        self.acceleration = Vector2D::zero();
    }

    /// Toroidal wrap with one adjustment per axis. Exact as long as the boid
    /// moved less than one world extent since the last wrap.
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        if self.position.x < 0.0 {
            self.position.x += width;
        }
        if self.position.x >= width {
            self.position.x -= width;
        }

        if self.position.y < 0.0 {
            self.position.y += height;
        }
        if self.position.y >= height {
            self.position.y -= height;
        }
    }

    /// Folds the position into `[0, width) x [0, height)` however far out it
    /// is. Used when the bounds change under an existing population.
    pub fn fold_into(&mut self, width: f32, height: f32) {
        self.position.x = rem_euclid(self.position.x, width);
        self.position.y = rem_euclid(self.position.y, height);
    }

    /// Drawing angle of the boid, in radians.
    pub fn heading(&self) -> f32 {
        self.velocity.angle()
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }
}
