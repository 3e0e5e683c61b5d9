//! Locomotion state machine.
//!
//! Every tick runs exactly one state behavior. A behavior computes horizontal
//! movement from input and camera yaw, recomputes vertical velocity from
//! gravity/jump/jet rules, returns the velocity to write to the body and
//! switches state in the same tick that detects a transition.
//!
//! Jump accounting is deliberately asymmetric: the ground jump out of `Walk`
//! goes through [`LocomotionState::rise_at_speed`] and never spends a remaining
//! jump, while every jump started through [`LocomotionState::try_to_jump`]
//! (from `Rise` or `Fall`) spends one.

use glam::{Quat, Vec3};

use crate::config::LocomotionConfig;
use crate::input::InputFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementState {
    Walk,
    Rise,
    Fall,
    Jet,
    Slide,
}

/// Everything a behavior reads besides the persistent record.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs {
    pub dt: f32,
    pub input: InputFrame,
    pub camera_yaw: f32,
    pub grounded: bool,
}

/// Result of one tick of the machine.
#[derive(Debug, Clone, Copy)]
pub struct TickOutcome {
    /// Velocity to write to the body.
    pub velocity: Vec3,
    /// Behavior that ran this tick.
    pub behavior: MovementState,
    /// State after transitions.
    pub state: MovementState,
}

impl TickOutcome {
    pub fn transitioned(&self) -> bool {
        self.behavior != self.state
    }
}

/// Per-character persistent fields. Owned by exactly one controller.
#[derive(Debug, Clone)]
pub struct LocomotionState {
    pub state: MovementState,
    pub velocity: Vec3,
    pub jumps_remaining: u32,
    pub jet_fuel_remaining: f32,
    pub slide_timer: f32,
    pub slide_cooldown_timer: f32,
}

/// Rotate the raw (x, 0, z) input by the camera's yaw only.
pub fn movement_from_input(input: &InputFrame, camera_yaw: f32) -> Vec3 {
    let (x, z) = input.clamped_axes();
    Quat::from_rotation_y(camera_yaw) * Vec3::new(x, 0.0, z)
}

impl LocomotionState {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            state: MovementState::Walk,
            velocity: Vec3::ZERO,
            jumps_remaining: config.jumps_allowed,
            jet_fuel_remaining: config.jet_fuel_max.max(0.0),
            slide_timer: 0.0,
            slide_cooldown_timer: 0.0,
        }
    }

    /// Advance one tick from the body's current velocity.
    pub fn tick(
        &mut self,
        config: &LocomotionConfig,
        frame: &FrameInputs,
        body_velocity: Vec3,
    ) -> TickOutcome {
        self.velocity = body_velocity;
        self.slide_cooldown_timer = (self.slide_cooldown_timer - frame.dt).max(0.0);

        let behavior = self.state;
        match behavior {
            MovementState::Walk => self.walk(config, frame),
            MovementState::Rise => self.rise(config, frame),
            MovementState::Fall => self.fall(config, frame),
            MovementState::Jet => self.jet(config, frame),
            MovementState::Slide => self.slide(config, frame),
        }

        if self.state != behavior {
            log::debug!("locomotion {:?} -> {:?}", behavior, self.state);
        }

        TickOutcome {
            velocity: self.velocity,
            behavior,
            state: self.state,
        }
    }

    fn walk(&mut self, config: &LocomotionConfig, frame: &FrameInputs) {
        self.jumps_remaining = config.jumps_allowed;
        self.jet_fuel_remaining = (self.jet_fuel_remaining
            + config.jet_fuel_refill_rate * frame.dt)
            .clamp(0.0, config.jet_fuel_max.max(0.0));

        let mut velocity = movement_from_input(&frame.input, frame.camera_yaw) * config.walk_speed;
        // grounded: gravity may cancel upward speed but never pulls below zero
        velocity.y = (self.velocity.y - config.gravity * frame.dt).max(0.0);
        self.velocity = velocity;

        if !frame.grounded {
            self.state = MovementState::Fall;
            return;
        }
        if frame.input.jump.pressed {
            self.rise_at_speed(config.jump_power);
        }
        // evaluated after the jump, so a same-tick slide press wins
        if frame.input.slide_pressed {
            self.start_slide(config);
        }
    }

    fn rise(&mut self, config: &LocomotionConfig, frame: &FrameInputs) {
        self.airborne_velocity(config, frame);

        if self.velocity.y < 0.0 {
            if frame.input.jump.held && self.jet_fuel_remaining > 0.0 {
                self.state = MovementState::Jet;
            } else {
                self.state = MovementState::Fall;
            }
        }

        self.try_to_jump(config, frame);
    }

    fn fall(&mut self, config: &LocomotionConfig, frame: &FrameInputs) {
        self.airborne_velocity(config, frame);

        self.try_to_jump(config, frame);
        if self.state != MovementState::Fall {
            return;
        }

        if frame.input.jump.held {
            self.state = MovementState::Jet;
        } else if frame.grounded {
            self.state = MovementState::Walk;
        }
    }

    fn jet(&mut self, config: &LocomotionConfig, frame: &FrameInputs) {
        self.jet_fuel_remaining = (self.jet_fuel_remaining
            - config.jet_fuel_consumption * frame.dt)
            .clamp(0.0, config.jet_fuel_max.max(0.0));

        let mut velocity = movement_from_input(&frame.input, frame.camera_yaw) * config.walk_speed;
        velocity.y = self.velocity.y + config.jet_accel * frame.dt;
        self.velocity = velocity;

        if frame.input.jump.released || self.jet_fuel_remaining <= 0.0 {
            self.state = MovementState::Rise;
        }
    }

    fn slide(&mut self, config: &LocomotionConfig, frame: &FrameInputs) {
        self.slide_timer += frame.dt;

        let horizontal = Vec3::new(self.velocity.x, 0.0, self.velocity.z).normalize_or_zero();
        let mut velocity = horizontal * (config.walk_speed + config.slide_speed_boost);
        velocity.y = self.velocity.y;
        self.velocity = velocity;

        if self.slide_timer >= config.slide_duration || !frame.grounded {
            self.state = MovementState::Walk;
            self.slide_timer = 0.0;
            self.slide_cooldown_timer = config.slide_cooldown.max(0.0);
        }
    }

    /// Shared by Rise and Fall: free fall with input steering.
    fn airborne_velocity(&mut self, config: &LocomotionConfig, frame: &FrameInputs) {
        let mut velocity = movement_from_input(&frame.input, frame.camera_yaw) * config.walk_speed;
        velocity.y = self.velocity.y - config.gravity * frame.dt;
        self.velocity = velocity;
    }

    /// Jump if it was pressed this tick and the character is grounded or has jumps left.
    /// Spends one remaining jump.
    pub fn try_to_jump(&mut self, config: &LocomotionConfig, frame: &FrameInputs) -> bool {
        if !frame.input.jump.pressed {
            return false;
        }
        if !frame.grounded && self.jumps_remaining == 0 {
            return false;
        }
        self.rise_at_speed(config.jump_power);
        self.jumps_remaining = self.jumps_remaining.saturating_sub(1);
        true
    }

    /// Replace vertical speed and enter Rise. Does not touch the jump budget.
    pub fn rise_at_speed(&mut self, speed: f32) {
        self.velocity.y = speed;
        self.state = MovementState::Rise;
    }

    /// Enter Slide unless the cooldown is still running.
    pub fn start_slide(&mut self, config: &LocomotionConfig) -> bool {
        if self.slide_cooldown_timer > 0.0 {
            return false;
        }
        self.state = MovementState::Slide;
        self.slide_timer = 0.0;
        self.slide_cooldown_timer = config.slide_cooldown.max(0.0);
        true
    }
}
