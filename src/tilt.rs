use glam::{EulerRot, Quat};

use crate::locomotion::{MovementState, TickOutcome};

/// Visual lean of the character model. Runs after the state machine and never feeds back into it.
#[derive(Debug, Clone, Copy)]
pub struct TiltBlend {
    pub rotation: Quat,
}

impl Default for TiltBlend {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
        }
    }
}

impl TiltBlend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pose leaning `angle_deg` around the pitch axis, keeping current yaw and roll.
    fn slide_pose(&self, angle_deg: f32) -> Quat {
        let (yaw, _pitch, roll) = self.rotation.to_euler(EulerRot::YXZ);
        Quat::from_euler(EulerRot::YXZ, yaw, angle_deg.to_radians(), roll)
    }

    fn blend_toward(&mut self, target: Quat, t: f32) {
        self.rotation = self.rotation.lerp(target, t.clamp(0.0, 1.0)).normalize();
    }

    pub fn apply(&mut self, outcome: &TickOutcome, dt: f32, tilt_speed: f32, slide_tilt_angle: f32) {
        let t = dt * tilt_speed;
        if outcome.behavior == MovementState::Slide {
            let target = self.slide_pose(slide_tilt_angle);
            self.blend_toward(target, t);
        }
        if outcome.state != MovementState::Slide {
            self.blend_toward(Quat::IDENTITY, t);
        }
    }

    /// Current lean around the pitch axis in degrees.
    pub fn pitch_degrees(&self) -> f32 {
        let (_, pitch, _) = self.rotation.to_euler(EulerRot::YXZ);
        pitch.to_degrees()
    }
}
