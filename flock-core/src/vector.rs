/// A 2D vector used for position, velocity and force
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

#[inline]
pub(crate) fn sqrt(value: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        value.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrtf(value)
    }
}

#[inline]
pub(crate) fn atan2(y: f32, x: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        y.atan2(x)
    }
    #[cfg(not(feature = "std"))]
    {
        libm::atan2f(y, x)
    }
}

#[inline]
pub(crate) fn sin_cos(angle: f32) -> (f32, f32) {
    #[cfg(feature = "std")]
    {
        angle.sin_cos()
    }
    #[cfg(not(feature = "std"))]
    {
        (libm::sinf(angle), libm::cosf(angle))
    }
}

/// Remainder in `[0, modulus)` for a positive `modulus`.
#[inline]
pub(crate) fn rem_euclid(value: f32, modulus: f32) -> f32 {
    #[cfg(feature = "std")]
    let r = value.rem_euclid(modulus);
    #[cfg(not(feature = "std"))]
    let r = {
        let r = libm::fmodf(value, modulus);
        if r < 0.0 {
            r + modulus
        } else {
            r
        }
    };
    // Tiny negative inputs can round up to `modulus` itself.
    if r >= modulus {
        0.0
    } else {
        r
    }
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Unit vector pointing along `angle` (radians), scaled by `length`.
    pub fn from_polar(angle: f32, length: f32) -> Self {
        let (sin, cos) = sin_cos(angle);
        Self::new(cos * length, sin * length)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn magnitude(&self) -> f32 {
        sqrt(self.magnitude_squared())
    }

    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Division that yields the zero vector for a zero divisor instead of
    /// producing non-finite components.
    pub fn divide(&self, scalar: f32) -> Self {
        if scalar == 0.0 {
            Self::zero()
        } else {
            Self {
                x: self.x / scalar,
                y: self.y / scalar,
            }
        }
    }

    /// Returns `self` when `|self| <= max`, otherwise the same direction
    /// with magnitude exactly `max`.
    pub fn limit(&self, max: f32) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq <= max * max {
            return *self;
        }
        let scale = max / sqrt(mag_sq);
        Self {
            x: self.x * scale,
            y: self.y * scale,
        }
    }

    pub fn distance_squared(&self, other: &Vector2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        sqrt(self.distance_squared(other))
    }

    /// Angle of the vector in radians, as used for drawing a heading.
    pub fn angle(&self) -> f32 {
        atan2(self.y, self.x)
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        self.divide(scalar)
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rem_euclid_stays_below_modulus() {
        assert_eq!(rem_euclid(250.0, 100.0), 50.0);
        assert_eq!(rem_euclid(-30.0, 100.0), 70.0);
        assert_eq!(rem_euclid(-1.0e-9, 100.0), 0.0);
    }

    #[test]
    fn test_vector2d_new() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.x, 3.0);
        assert_eq!(v.y, 4.0);
    }

    #[test]
    fn test_vector2d_magnitude() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(v.magnitude_squared(), 25.0);
    }

    #[test]
    fn test_vector2d_normalize() {
        let v = Vector2D::new(3.0, 4.0);
        let normalized = v.normalize();
        assert!((normalized.magnitude() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vector2D::zero().normalize(), Vector2D::zero());
    }

    #[test]
    fn test_divide_by_zero_is_zero() {
        let v = Vector2D::new(3.0, -4.0);
        assert_eq!(v / 0.0, Vector2D::zero());
        assert_eq!(v.divide(2.0), Vector2D::new(1.5, -2.0));
    }

    #[test]
    fn test_vector2d_operations() {
        let v1 = Vector2D::new(1.0, 2.0);
        let v2 = Vector2D::new(3.0, 4.0);

        let sum = v1 + v2;
        assert_eq!(sum.x, 4.0);
        assert_eq!(sum.y, 6.0);

        let diff = v2 - v1;
        assert_eq!(diff.x, 2.0);
        assert_eq!(diff.y, 2.0);

        let scaled = v1 * 2.0;
        assert_eq!(scaled.x, 2.0);
        assert_eq!(scaled.y, 4.0);

        assert_eq!(-v1, Vector2D::new(-1.0, -2.0));
    }

    #[test]
    fn test_limit_leaves_short_vectors_alone() {
        let v = Vector2D::new(0.3, 0.4);
        assert_eq!(v.limit(1.0), v);
        // Exactly at the limit is unchanged too
        assert_eq!(Vector2D::new(3.0, 4.0).limit(5.0), Vector2D::new(3.0, 4.0));
    }

    #[test]
    fn test_limit_scales_to_max() {
        let limited = Vector2D::new(30.0, 40.0).limit(5.0);
        assert!((limited.magnitude() - 5.0).abs() < 1e-5);
        assert!((limited.x - 3.0).abs() < 1e-5);
        assert!((limited.y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_limit_is_idempotent() {
        let samples = [
            Vector2D::new(30.0, 40.0),
            Vector2D::new(-7.5, 0.25),
            Vector2D::new(0.01, -0.02),
            Vector2D::zero(),
        ];
        for v in samples {
            let once = v.limit(2.0);
            let twice = once.limit(2.0);
            assert!((once.x - twice.x).abs() < 1e-6);
            assert!((once.y - twice.y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_from_polar_and_angle() {
        let v = Vector2D::from_polar(core::f32::consts::FRAC_PI_2, 2.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 2.0).abs() < 1e-6);
        assert!((v.angle() - core::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_distance() {
        let a = Vector2D::new(0.0, 0.0);
        let b = Vector2D::new(3.0, 4.0);
        assert_eq!(a.distance_squared(&b), 25.0);
        assert_eq!(a.distance(&b), 5.0);
    }
}
