#![cfg(target_arch = "wasm32")]

use flock_wasm::FlockSimulation;
use wasm_bindgen_test::*;

fn assert_in_bounds(sim: &FlockSimulation, width: f32, height: f32) {
    let positions = sim.positions();
    assert_eq!(positions.len(), sim.boid_count() * 2);
    for pair in positions.chunks(2) {
        assert!(pair[0] >= 0.0 && pair[0] < width, "x out of bounds: {}", pair[0]);
        assert!(pair[1] >= 0.0 && pair[1] < height, "y out of bounds: {}", pair[1]);
    }
}

#[wasm_bindgen_test]
fn test_steps_keep_boids_in_bounds() {
    let mut sim = FlockSimulation::new(400.0, 300.0, 80).unwrap();
    assert_eq!(sim.boid_count(), 80);

    for _ in 0..120 {
        let p = sim.step(1.0 / 60.0);
        assert!((0.0..=1.0).contains(&p));
    }

    assert_in_bounds(&sim, 400.0, 300.0);
    assert!((sim.fps() - 60.0).abs() < 0.5);
}

#[wasm_bindgen_test]
fn test_predator_and_weights_can_change_between_frames() {
    let mut sim = FlockSimulation::new(400.0, 300.0, 40).unwrap();

    sim.set_predator(200.0, 150.0);
    sim.set_fear_weight(4.0);
    sim.step(0.016);
    sim.clear_predator();
    sim.set_separation_weight(0.0);
    sim.set_max_speed(3.0);
    sim.step(0.016);

    assert_in_bounds(&sim, 400.0, 300.0);
}

#[wasm_bindgen_test]
fn test_reset_replaces_population() {
    let mut sim = FlockSimulation::new(400.0, 300.0, 10).unwrap();

    sim.reset(25, 120.0, 90.0).unwrap();

    assert_eq!(sim.boid_count(), 25);
    assert_eq!(sim.headings().len(), 25);
    assert_in_bounds(&sim, 120.0, 90.0);
}

#[wasm_bindgen_test]
fn test_rejects_empty_world() {
    assert!(FlockSimulation::new(0.0, 300.0, 10).is_err());
}

#[wasm_bindgen_test]
fn test_settings_round_trip() {
    let sim = FlockSimulation::from_settings(r#"{ "width": 200.0, "height": 100.0, "boid_count": 12 }"#)
        .unwrap();
    assert_eq!(sim.boid_count(), 12);
    assert_in_bounds(&sim, 200.0, 100.0);

    let json = sim.settings_json().unwrap();
    let again = FlockSimulation::from_settings(&json).unwrap();
    assert_eq!(again.boid_count(), 12);
}

#[wasm_bindgen_test]
fn test_shrinking_keeps_boids_in_bounds() {
    let mut sim = FlockSimulation::new(800.0, 600.0, 40).unwrap();

    sim.resize(100.0, 80.0).unwrap();
    assert_eq!(sim.boid_count(), 40);
    assert_in_bounds(&sim, 100.0, 80.0);

    sim.step(1.0 / 60.0);
    assert_in_bounds(&sim, 100.0, 80.0);
    assert!(sim.resize(0.0, 80.0).is_err());
}
