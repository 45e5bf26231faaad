#![cfg_attr(not(feature = "std"), no_std)]

use flock_core::{Predator, SpawnRange, Vector2D, Weights, WorldParams};
use serde::{Deserialize, Serialize};

/// Represents a 2D position in world coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }
}

impl From<Position> for Vector2D {
    fn from(p: Position) -> Self {
        Vector2D::new(p.x, p.y)
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Position::new(v.x, v.y)
    }
}

/// Flock simulation settings as exchanged with hosts and settings files.
/// Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub width: f32,
    pub height: f32,
    pub boid_count: usize,
    pub vision_radius: f32,
    pub avoid_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub fear_weight: f32,
    pub fear_radius: f32,
    /// Predator position; `None` disables the predator
    pub predator: Option<Position>,
    pub min_spawn_speed: f32,
    pub max_spawn_speed: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self::from_params(&WorldParams::default(), 200, &SpawnRange::default())
    }
}

impl FlockSettings {
    pub fn from_params(params: &WorldParams, boid_count: usize, spawn: &SpawnRange) -> Self {
        Self {
            width: params.width,
            height: params.height,
            boid_count,
            vision_radius: params.vision_radius,
            avoid_radius: params.avoid_radius,
            max_speed: params.max_speed,
            max_force: params.max_force,
            separation_weight: params.weights.separation,
            alignment_weight: params.weights.alignment,
            cohesion_weight: params.weights.cohesion,
            fear_weight: params.weights.fear,
            fear_radius: params.predator.fear_radius,
            predator: params
                .predator
                .enabled
                .then(|| params.predator.position.into()),
            min_spawn_speed: spawn.min_speed,
            max_spawn_speed: spawn.max_speed,
        }
    }

    pub fn world_params(&self) -> WorldParams {
        WorldParams {
            width: self.width,
            height: self.height,
            vision_radius: self.vision_radius,
            avoid_radius: self.avoid_radius,
            max_speed: self.max_speed,
            max_force: self.max_force,
            weights: Weights {
                separation: self.separation_weight,
                alignment: self.alignment_weight,
                cohesion: self.cohesion_weight,
                fear: self.fear_weight,
            },
            predator: Predator {
                position: self.predator.map(Vector2D::from).unwrap_or_default(),
                fear_radius: self.fear_radius,
                enabled: self.predator.is_some(),
            },
        }
    }

    pub fn spawn_range(&self) -> SpawnRange {
        SpawnRange {
            min_speed: self.min_spawn_speed,
            max_speed: self.max_spawn_speed,
        }
    }
}

#[cfg(feature = "std")]
impl FlockSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Status of the simulation after one frame, emitted by hosts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// Simulated wall-clock time in seconds
    pub elapsed: f32,
    pub boid_count: usize,
    pub polarization: f32,
    pub fps: f32,
    pub predator_active: bool,
}

#[cfg(feature = "std")]
impl FrameReport {
    /// Single-line JSON encoding
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let p1 = Position::new(0.0, 0.0);
        let p2 = Position::new(3.0, 4.0);
        assert_eq!(p1.distance_to(&p2), 5.0);
    }

    #[test]
    fn test_default_settings_match_default_params() {
        let settings = FlockSettings::default();
        assert_eq!(settings.world_params(), WorldParams::default());
        assert_eq!(settings.spawn_range(), SpawnRange::default());
        assert_eq!(settings.predator, None);
    }

    #[test]
    fn test_predator_round_trip() {
        let mut params = WorldParams::default();
        params.predator = Predator::at(Vector2D::new(12.0, 34.0), 80.0);
        params.weights.fear = 5.0;

        let settings = FlockSettings::from_params(&params, 64, &SpawnRange::default());
        assert_eq!(settings.predator, Some(Position::new(12.0, 34.0)));
        assert_eq!(settings.world_params(), params);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            FlockSettings::from_json(r#"{ "boid_count": 42, "max_speed": 3.5, "predator": { "x": 1.0, "y": 2.0 } }"#)
                .unwrap();

        assert_eq!(settings.boid_count, 42);
        assert_eq!(settings.max_speed, 3.5);
        assert_eq!(settings.vision_radius, FlockSettings::default().vision_radius);

        let params = settings.world_params();
        assert!(params.predator.enabled);
        assert_eq!(params.predator.position, Vector2D::new(1.0, 2.0));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_settings_json_round_trip() {
        let settings = FlockSettings {
            boid_count: 7,
            predator: Some(Position::new(5.0, 6.0)),
            ..FlockSettings::default()
        };
        let json = settings.to_json_pretty().unwrap();
        assert_eq!(FlockSettings::from_json(&json).unwrap(), settings);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_frame_report_is_one_line() {
        let report = FrameReport {
            frame: 10,
            elapsed: 0.5,
            boid_count: 3,
            polarization: 0.25,
            fps: 60.0,
            predator_active: false,
        };
        let line = report.to_json_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"polarization\":0.25"));
    }
}
