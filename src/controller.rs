use rapier3d::prelude::RigidBodyHandle;

use crate::camera::CameraRig;
use crate::config::LocomotionConfig;
use crate::input::InputFrame;
use crate::locomotion::{FrameInputs, LocomotionState, MovementState, TickOutcome};
use crate::physics::PhysicsWorld;
use crate::tilt::TiltBlend;

/// Binds one locomotion state machine to one physics body.
///
/// Only obtainable through [`CharacterController::initialize`], so a tick
/// always has a body to read and write.
pub struct CharacterController {
    config: LocomotionConfig,
    body: RigidBodyHandle,
    locomotion: LocomotionState,
    tilt: Option<TiltBlend>,
}

impl CharacterController {
    /// Take ownership of `body`'s vertical motion. Fails if the body is not in `physics`.
    pub fn initialize(
        config: LocomotionConfig,
        body: RigidBodyHandle,
        physics: &mut PhysicsWorld,
    ) -> Result<Self, String> {
        if !physics.disable_gravity(body) {
            return Err(format!("Rigid body {:?} not found in physics world", body));
        }

        let negative = config.negative_fields();
        if !negative.is_empty() {
            log::warn!("Locomotion config has negative values: {}", negative.join(", "));
        }

        log::info!(
            "Character {:?} initialized: {} jumps, {:.1} fuel",
            body,
            config.jumps_allowed,
            config.jet_fuel_max
        );

        let locomotion = LocomotionState::new(&config);
        Ok(Self {
            config,
            body,
            locomotion,
            tilt: None,
        })
    }

    /// Attach a model whose lean follows slides.
    pub fn with_tilt(mut self) -> Self {
        self.tilt = Some(TiltBlend::new());
        self
    }

    /// Advance one simulation step. Call once per fixed step, before `PhysicsWorld::step`.
    pub fn tick(
        &mut self,
        dt: f32,
        input: &InputFrame,
        camera: &impl CameraRig,
        physics: &mut PhysicsWorld,
    ) -> TickOutcome {
        let body_velocity = physics.linear_velocity(self.body).unwrap_or(self.locomotion.velocity);
        let grounded = physics.probe_ground(
            self.body,
            self.config.ground_probe_distance(),
            self.config.ground_layer,
        );

        let frame = FrameInputs {
            dt,
            input: *input,
            camera_yaw: camera.yaw(),
            grounded,
        };
        let outcome = self.locomotion.tick(&self.config, &frame, body_velocity);
        physics.set_linear_velocity(self.body, outcome.velocity);

        if let Some(tilt) = self.tilt.as_mut() {
            tilt.apply(&outcome, dt, self.config.tilt_speed, self.config.slide_tilt_angle);
        }

        outcome
    }

    pub fn state(&self) -> MovementState {
        self.locomotion.state
    }

    pub fn locomotion(&self) -> &LocomotionState {
        &self.locomotion
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn tilt(&self) -> Option<&TiltBlend> {
        self.tilt.as_ref()
    }
}
