use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use glam::Vec3;
use instant::Instant;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use winit::keyboard::KeyCode;

use jetpack_locomotion::{
    CharacterController, KeyboardInput, LocomotionConfig, LookCamera, MovementState, PhysicsWorld,
};

/// Headless driver: one character on a ground slab, fed a scripted input timeline.
#[derive(Parser, Debug)]
#[command(name = "jetpack-sim")]
struct Args {
    /// TOML file overriding locomotion tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of fixed steps to simulate
    #[arg(long, default_value_t = 900)]
    ticks: u32,

    /// Simulation rate in steps per second
    #[arg(long, default_value_t = 60)]
    hz: u32,

    /// Seed for the wander phase
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Pace steps against the wall clock
    #[arg(long)]
    realtime: bool,
}

fn set_key(keys: &mut KeyboardInput, key: KeyCode, down: bool) {
    if down {
        keys.handle_key_press(key);
    } else {
        keys.handle_key_release(key);
    }
}

/// Key levels for tick `i` of the timeline. After the scripted part the character wanders randomly.
fn press_scripted_keys(i: u32, hz: u32, rng: &mut SmallRng, keys: &mut KeyboardInput) {
    let t = i as f32 / hz as f32;

    if t < 6.0 {
        set_key(keys, KeyCode::KeyW, true);
        // jump, keep holding into the jet pack
        set_key(keys, KeyCode::Space, (1.0..2.5).contains(&t));
        // slide out of a run
        set_key(keys, KeyCode::ControlLeft, (4.0..4.1).contains(&t));
        return;
    }

    for key in [KeyCode::KeyW, KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyD, KeyCode::Space] {
        if rng.gen_bool(0.02) {
            let down = !keys.is_pressed(key);
            set_key(keys, key, down);
        }
    }
    set_key(keys, KeyCode::ControlLeft, rng.gen_bool(0.01));
}

pub fn run() -> Result<(), String> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => LocomotionConfig::load(path)?,
        None => LocomotionConfig::default(),
    };
    let dt = 1.0 / args.hz.max(1) as f32;

    let mut physics = PhysicsWorld::new(config.gravity);
    // top face at y = 0
    physics.add_ground_box(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(500.0, 0.5, 500.0),
        config.ground_layer,
    );
    let body = physics.add_character(
        Vec3::new(0.0, config.capsule_height / 2.0, 0.0),
        config.capsule_height,
        config.capsule_radius,
    );
    let mut controller = CharacterController::initialize(config, body, &mut physics)?.with_tilt();
    let mut camera = LookCamera::new(0.0);
    let mut rng = SmallRng::seed_from_u64(args.seed);

    let mut keys = KeyboardInput::new();
    let mut time_in_state: HashMap<MovementState, u32> = HashMap::new();
    let mut transitions = 0u32;
    let mut max_height = 0.0f32;

    let start = Instant::now();
    for i in 0..args.ticks {
        if args.realtime {
            let due = Duration::from_secs_f32(i as f32 * dt);
            let elapsed = start.elapsed();
            if due > elapsed {
                std::thread::sleep(due - elapsed);
            }
        }

        // slow pan so the wander phase exercises camera-relative movement
        keys.handle_mouse_move(0.5, 0.0);
        camera.apply_mouse_delta(keys.consume_mouse_delta());

        press_scripted_keys(i, args.hz, &mut rng, &mut keys);
        let input = keys.snapshot();
        let outcome = controller.tick(dt, &input, &camera, &mut physics);
        physics.step(dt);

        *time_in_state.entry(outcome.state).or_default() += 1;
        if outcome.transitioned() {
            transitions += 1;
            let position = physics.translation(body).unwrap_or_default();
            let facing = camera.forward();
            log::info!(
                "t={:.2}s {:?} -> {:?} at [{:.1}, {:.1}, {:.1}] facing [{:.2}, {:.2}] fuel={:.2}",
                i as f32 * dt,
                outcome.behavior,
                outcome.state,
                position.x,
                position.y,
                position.z,
                facing.x,
                facing.z,
                controller.locomotion().jet_fuel_remaining,
            );
        }
        if let Some(position) = physics.translation(body) {
            max_height = max_height.max(position.y);
        }
    }

    log::info!(
        "Simulated {} ticks in {:.2?}: {} transitions, max height {:.2}",
        args.ticks,
        start.elapsed(),
        transitions,
        max_height
    );
    for state in [
        MovementState::Walk,
        MovementState::Rise,
        MovementState::Fall,
        MovementState::Jet,
        MovementState::Slide,
    ] {
        let ticks = time_in_state.get(&state).copied().unwrap_or(0);
        log::info!("  {:?}: {:.2}s", state, ticks as f32 * dt);
    }
    if let Some(tilt) = controller.tilt() {
        log::info!("  final tilt {:.1} deg", tilt.pitch_degrees());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
