//! Headless driver for the flocking engine.
//!
//! Plays the role a browser animation loop plays for the wasm build: it owns
//! the scheduler, supplies frame deltas, moves the predator and reports the
//! polarization of every frame as JSON lines.

use anyhow::{bail, Context, Result};
use clap::Parser;
use flock_core::{
    frame_dt, polarization, reset_world_with, step_with, Boid, BruteForce, FpsCounter,
    Predator, SpawnRange, UniformGrid, Vector2D, WorldParams,
};
use flock_shared::{FlockSettings, FrameReport, Position};
use rand::{rngs::StdRng, SeedableRng};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Headless flocking simulation", long_about = None)]
pub struct Args {
    /// JSON settings file; flags below override its values
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Number of boids
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// World width
    #[arg(long)]
    pub width: Option<f32>,

    /// World height
    #[arg(long)]
    pub height: Option<f32>,

    /// Maximum boid speed (units per 60fps frame)
    #[arg(long)]
    pub max_speed: Option<f32>,

    /// Maximum steering force per frame
    #[arg(long)]
    pub max_force: Option<f32>,

    /// Static predator position, e.g. `400,300`
    #[arg(long, value_parser = parse_position)]
    pub predator: Option<Position>,

    /// Move the predator on a circle of this radius around the world center
    #[arg(long)]
    pub predator_orbit: Option<f32>,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    pub frames: u64,

    /// Fixed frame delta in seconds; ignored with --realtime
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Pace frames against the wall clock and feed measured deltas
    #[arg(long)]
    pub realtime: bool,

    /// Write a report every N frames
    #[arg(long, default_value_t = 60)]
    pub report_every: u64,

    /// Use the bucketed grid instead of the all-pairs neighbor scan
    #[arg(long)]
    pub grid: bool,

    /// Seed for the initial population
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

fn parse_position(s: &str) -> std::result::Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{}`", s))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x `{}`: {}", x, e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y `{}`: {}", y, e))?;
    Ok(Position::new(x, y))
}

/// Settings from the file (if any) with command-line overrides applied.
pub fn load_settings(args: &Args) -> Result<FlockSettings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            FlockSettings::from_json(&json)
                .with_context(|| format!("Invalid settings file {}", path.display()))?
        }
        None => FlockSettings::default(),
    };

    if let Some(count) = args.count {
        settings.boid_count = count;
    }
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(max_speed) = args.max_speed {
        settings.max_speed = max_speed;
    }
    if let Some(max_force) = args.max_force {
        settings.max_force = max_force;
    }
    if args.predator.is_some() {
        settings.predator = args.predator;
    }

    let finite = settings.width.is_finite() && settings.height.is_finite();
    if !(finite && settings.width > 0.0 && settings.height > 0.0) {
        bail!(
            "World must have a positive, finite size, got {}x{}",
            settings.width,
            settings.height
        );
    }

    Ok(settings)
}

/// Neighbor query selected at startup
#[derive(Debug, Clone)]
pub enum Query {
    BruteForce(BruteForce),
    Grid(UniformGrid),
}

impl Query {
    fn step(&mut self, boids: &mut [Boid], raw_dt: f32, params: &WorldParams) {
        match self {
            Query::BruteForce(q) => step_with(q, boids, raw_dt, params),
            Query::Grid(q) => step_with(q, boids, raw_dt, params),
        }
    }
}

/// Predator movement, standing in for pointer input
#[derive(Debug, Clone, Copy)]
pub enum PredatorPath {
    Fixed,
    Orbit { radius: f32, angular_speed: f32 },
}

pub struct Driver {
    pub boids: Vec<Boid>,
    pub params: WorldParams,
    query: Query,
    predator_path: PredatorPath,
    fps: FpsCounter,
    frame: u64,
    elapsed: f32,
}

impl Driver {
    pub fn new(settings: &FlockSettings, grid: bool, seed: Option<u64>) -> Self {
        let params = settings.world_params();
        let boids = spawn(settings, &params, seed);
        let query = if grid {
            Query::Grid(UniformGrid::new())
        } else {
            Query::BruteForce(BruteForce)
        };

        Self {
            boids,
            params,
            query,
            predator_path: PredatorPath::Fixed,
            fps: FpsCounter::new(),
            frame: 0,
            elapsed: 0.0,
        }
    }

    pub fn with_predator_path(mut self, path: PredatorPath) -> Self {
        self.predator_path = path;
        self
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Replaces the population between frames.
    pub fn reset(&mut self, settings: &FlockSettings, seed: Option<u64>) {
        self.params = settings.world_params();
        self.boids = spawn(settings, &self.params, seed);
        self.frame = 0;
        self.elapsed = 0.0;
        log::debug!("Population reset to {} boids", self.boids.len());
    }

    fn move_predator(&mut self) {
        if let PredatorPath::Orbit {
            radius,
            angular_speed,
        } = self.predator_path
        {
            let center = Vector2D::new(self.params.width / 2.0, self.params.height / 2.0);
            let offset = Vector2D::from_polar(self.elapsed * angular_speed, radius);
            self.params.predator = Predator::at(center + offset, self.params.predator.fear_radius);
        }
    }

    /// Runs one frame with the given wall-clock delta and reports on it.
    pub fn tick(&mut self, raw_dt: f32) -> FrameReport {
        self.move_predator();
        self.query.step(&mut self.boids, raw_dt, &self.params);
        self.frame += 1;
        self.elapsed += frame_dt(raw_dt) / flock_core::FRAME_RATE_SCALE;

        FrameReport {
            frame: self.frame,
            elapsed: self.elapsed,
            boid_count: self.boids.len(),
            polarization: polarization(&self.boids),
            fps: self.fps.update(raw_dt),
            predator_active: self.params.predator.enabled,
        }
    }

    /// Runs `frames` frames of fixed `dt`, writing every `report_every`-th
    /// report (and the last one) as a JSON line.
    pub fn run_fixed<W: Write>(
        &mut self,
        frames: u64,
        dt: f32,
        report_every: u64,
        out: &mut W,
    ) -> Result<Option<FrameReport>> {
        let mut last = None;
        for i in 0..frames {
            let report = self.tick(dt);
            if should_report(i, frames, report_every) {
                emit(&report, out)?;
            }
            last = Some(report);
        }
        Ok(last)
    }

    /// Like [`Driver::run_fixed`], but paced at roughly 60fps with measured
    /// deltas.
    pub fn run_realtime<W: Write>(
        &mut self,
        frames: u64,
        report_every: u64,
        out: &mut W,
    ) -> Result<Option<FrameReport>> {
        let target = Duration::from_secs_f32(1.0 / 60.0);
        let mut last_tick = Instant::now();
        let mut last = None;

        for i in 0..frames {
            let started = Instant::now();
            let raw_dt = started.duration_since(last_tick).as_secs_f32();
            last_tick = started;

            let report = self.tick(raw_dt);
            if should_report(i, frames, report_every) {
                emit(&report, out)?;
            }
            last = Some(report);

            if let Some(rest) = target.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        Ok(last)
    }
}

fn spawn(settings: &FlockSettings, params: &WorldParams, seed: Option<u64>) -> Vec<Boid> {
    let spawn: SpawnRange = settings.spawn_range();
    let count = settings.boid_count;
    match seed {
        Some(seed) => reset_world_with(
            &mut StdRng::seed_from_u64(seed),
            count,
            params.width,
            params.height,
            &spawn,
        ),
        None => reset_world_with(
            &mut rand::thread_rng(),
            count,
            params.width,
            params.height,
            &spawn,
        ),
    }
}

fn should_report(index: u64, frames: u64, every: u64) -> bool {
    let every = every.max(1);
    (index + 1) % every == 0 || index + 1 == frames
}

fn emit<W: Write>(report: &FrameReport, out: &mut W) -> Result<()> {
    let line = report.to_json_line().context("Failed to encode frame report")?;
    writeln!(out, "{}", line).context("Failed to write frame report")?;
    Ok(())
}

/// Entry point shared by the binary and tests.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<Option<FrameReport>> {
    let settings = load_settings(args)?;
    let params = settings.world_params();
    if let Err(e) = params.validate() {
        log::warn!("Questionable parameters: {}", e);
    }

    log::info!(
        "Simulating {} boids in {}x{} for {} frames ({} neighbor query)",
        settings.boid_count,
        settings.width,
        settings.height,
        args.frames,
        if args.grid { "grid" } else { "brute-force" }
    );

    let mut driver = Driver::new(&settings, args.grid, args.seed);
    if let Some(radius) = args.predator_orbit {
        driver = driver.with_predator_path(PredatorPath::Orbit {
            radius,
            angular_speed: 0.5,
        });
    }

    let last = if args.realtime {
        driver.run_realtime(args.frames, args.report_every, out)?
    } else {
        driver.run_fixed(args.frames, args.dt, args.report_every, out)?
    };

    if let Some(report) = &last {
        log::info!(
            "Finished after {} frames, polarization {:.3}",
            report.frame,
            report.polarization
        );
    }
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("1.5, -2").unwrap(), Position::new(1.5, -2.0));
        assert!(parse_position("12").is_err());
        assert!(parse_position("a,b").is_err());
    }

    #[test]
    fn test_should_report() {
        let reported: Vec<u64> = (0..10).filter(|&i| should_report(i, 10, 4)).collect();
        assert_eq!(reported, vec![3, 7, 9]);
        assert!(should_report(0, 5, 0));
    }

    #[test]
    fn test_orbiting_predator_stays_on_circle() {
        let settings = FlockSettings {
            width: 200.0,
            height: 100.0,
            boid_count: 0,
            ..FlockSettings::default()
        };
        let mut driver = Driver::new(&settings, false, Some(1)).with_predator_path(
            PredatorPath::Orbit {
                radius: 30.0,
                angular_speed: 1.0,
            },
        );

        for _ in 0..10 {
            let report = driver.tick(0.02);
            assert!(report.predator_active);
            let d = driver
                .params
                .predator
                .position
                .distance(&Vector2D::new(100.0, 50.0));
            assert!((d - 30.0).abs() < 1e-3);
        }
    }
}
