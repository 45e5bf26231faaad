use flock_core::{
    reset_world_with, step, FpsCounter, Predator, SpawnRange, Vector2D, WorldParams,
};
use flock_shared::FlockSettings;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// Browser-facing simulation. The page owns the animation loop and the
/// canvas; it calls `step` once per frame and draws from `positions`.
#[wasm_bindgen]
pub struct FlockSimulation {
    boids: Vec<flock_core::Boid>,
    params: WorldParams,
    spawn: SpawnRange,
    fps: FpsCounter,
    last_polarization: f32,
}

fn check_bounds(width: f64, height: f64) -> Result<(), String> {
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(format!(
            "world bounds must be positive, got {}x{}",
            width, height
        ));
    }
    Ok(())
}

fn js_bounds(width: f64, height: f64) -> Result<(), JsValue> {
    check_bounds(width, height).map_err(|e| JsValue::from_str(&e))
}

impl FlockSimulation {
    fn populate(&mut self, count: usize) {
        self.boids = reset_world_with(
            &mut rand::thread_rng(),
            count,
            self.params.width,
            self.params.height,
            &self.spawn,
        );
        self.last_polarization = flock_core::polarization(&self.boids);
    }

    fn warn_if_invalid(&self) {
        if let Err(e) = self.params.validate() {
            console_log!("Warning: {}", e);
        }
    }
}

#[wasm_bindgen]
impl FlockSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, boid_count: usize) -> Result<FlockSimulation, JsValue> {
        js_bounds(width, height)?;
        console_log!("Initializing flock simulation with {} boids", boid_count);

        let mut sim = FlockSimulation {
            boids: Vec::new(),
            params: WorldParams::with_bounds(width as f32, height as f32),
            spawn: SpawnRange::default(),
            fps: FpsCounter::new(),
            last_polarization: 0.0,
        };
        sim.populate(boid_count);
        Ok(sim)
    }

    /// Builds a simulation from a JSON `FlockSettings` document.
    pub fn from_settings(json: &str) -> Result<FlockSimulation, JsValue> {
        let settings =
            FlockSettings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        js_bounds(settings.width as f64, settings.height as f64)?;

        let mut sim = FlockSimulation {
            boids: Vec::new(),
            params: settings.world_params(),
            spawn: settings.spawn_range(),
            fps: FpsCounter::new(),
            last_polarization: 0.0,
        };
        sim.warn_if_invalid();
        sim.populate(settings.boid_count);
        Ok(sim)
    }

    /// Advances one frame. `dt` is the wall-clock time since the previous
    /// frame in seconds; the host skips this call while paused.
    pub fn step(&mut self, dt: f64) -> f32 {
        let dt = dt as f32;
        self.fps.update(dt);
        step(&mut self.boids, dt, &self.params);
        self.last_polarization = flock_core::polarization(&self.boids);
        self.last_polarization
    }

    /// Replaces the whole population. Call between frames only.
    pub fn reset(&mut self, boid_count: usize, width: f64, height: f64) -> Result<(), JsValue> {
        js_bounds(width, height)?;
        self.params.width = width as f32;
        self.params.height = height as f32;
        self.populate(boid_count);
        console_log!(
            "Reset to {} boids in {}x{}",
            self.boids.len(),
            width,
            height
        );
        Ok(())
    }

    /// Interleaved `[x0, y0, x1, y1, ...]` for the renderer
    pub fn positions(&self) -> Vec<f32> {
        self.boids
            .iter()
            .flat_map(|b| [b.position.x, b.position.y])
            .collect()
    }

    /// Heading angle per boid, in radians
    pub fn headings(&self) -> Vec<f32> {
        self.boids.iter().map(|b| b.heading()).collect()
    }

    pub fn boid_count(&self) -> usize {
        self.boids.len()
    }

    pub fn polarization(&self) -> f32 {
        self.last_polarization
    }

    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    pub fn set_predator(&mut self, x: f64, y: f64) {
        self.params.predator = Predator::at(
            Vector2D::new(x as f32, y as f32),
            self.params.predator.fear_radius,
        );
    }

    pub fn clear_predator(&mut self) {
        self.params.predator.enabled = false;
    }

    pub fn set_fear_radius(&mut self, radius: f64) {
        self.params.predator.fear_radius = radius as f32;
    }

    pub fn set_separation_weight(&mut self, weight: f64) {
        self.params.weights.separation = weight as f32;
    }

    pub fn set_alignment_weight(&mut self, weight: f64) {
        self.params.weights.alignment = weight as f32;
    }

    pub fn set_cohesion_weight(&mut self, weight: f64) {
        self.params.weights.cohesion = weight as f32;
    }

    pub fn set_fear_weight(&mut self, weight: f64) {
        self.params.weights.fear = weight as f32;
    }

    pub fn set_vision_radius(&mut self, radius: f64) {
        self.params.vision_radius = radius as f32;
    }

    pub fn set_avoid_radius(&mut self, radius: f64) {
        self.params.avoid_radius = radius as f32;
    }

    pub fn set_max_speed(&mut self, speed: f64) {
        self.params.max_speed = speed as f32;
        self.warn_if_invalid();
    }

    pub fn set_max_force(&mut self, force: f64) {
        self.params.max_force = force as f32;
    }

    /// Changes the bounds and respawns the same number of boids inside them.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        js_bounds(width, height)?;
        self.params.width = width as f32;
        self.params.height = height as f32;
        self.warn_if_invalid();
        self.populate(self.boids.len());
        console_log!("Resized to {}x{}", width, height);
        Ok(())
    }

    /// Current parameters as a JSON `FlockSettings` document.
    pub fn settings_json(&self) -> Result<String, JsValue> {
        FlockSettings::from_params(&self.params, self.boids.len(), &self.spawn)
            .to_json_pretty()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
