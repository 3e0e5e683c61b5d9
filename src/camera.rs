use glam::{Quat, Vec3};

use crate::config::{MOUSE_SENSITIVITY, PITCH_LIMIT};

/// Anything that can report a world-space yaw for movement. Queried, never driven.
pub trait CameraRig {
    /// Rotation around +Y in radians. Zero looks down +Z.
    fn yaw(&self) -> f32;
}

impl CameraRig for f32 {
    fn yaw(&self) -> f32 {
        *self
    }
}

/// Mouse-look camera. Pitch is tracked for the view only and never affects movement.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookCamera {
    pub yaw: f32,
    pub pitch: f32,
}

impl LookCamera {
    pub fn new(yaw: f32) -> Self {
        Self { yaw, pitch: 0.0 }
    }

    pub fn apply_mouse_delta(&mut self, (dx, dy): (f32, f32)) {
        // positive dx turns right: forward (+Z) swings toward strafe-right (+X)
        self.yaw += dx * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch - dy * MOUSE_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(-self.pitch)
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::Z
    }
}

impl CameraRig for LookCamera {
    fn yaw(&self) -> f32 {
        self.yaw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputFrame, KeyboardInput};
    use winit::keyboard::KeyCode;
    use crate::locomotion::movement_from_input;

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = LookCamera::new(0.0);
        camera.apply_mouse_delta((0.0, -100_000.0));
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.apply_mouse_delta((0.0, 100_000.0));
        assert_eq!(camera.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_forward_follows_yaw() {
        let camera = LookCamera::new(std::f32::consts::FRAC_PI_2);
        let forward = camera.forward();
        assert!((forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_mouse_right_turns_forward_toward_strafe_right() {
        let strafe_right = movement_from_input(&InputFrame::axes(1.0, 0.0), 0.0);

        let mut camera = LookCamera::new(0.0);
        camera.apply_mouse_delta((std::f32::consts::FRAC_PI_2 / MOUSE_SENSITIVITY, 0.0));
        let forward = movement_from_input(&InputFrame::axes(0.0, 1.0), camera.yaw());

        assert!((forward - strafe_right).length() < 1e-4, "forward = {:?}", forward);
        assert!((camera.forward() - strafe_right).length() < 1e-4);
    }

    #[test]
    fn test_keyboard_drives_camera_relative_movement() {
        let mut keys = KeyboardInput::new();
        let mut camera = LookCamera::new(0.0);

        keys.handle_mouse_move(std::f32::consts::FRAC_PI_2 / MOUSE_SENSITIVITY, 0.0);
        camera.apply_mouse_delta(keys.consume_mouse_delta());
        keys.handle_key_press(KeyCode::KeyW);
        let frame = keys.snapshot();

        let movement = movement_from_input(&frame, camera.yaw());
        assert!((movement - Vec3::X).length() < 1e-4, "movement = {:?}", movement);
    }

    #[test]
    fn test_pitch_does_not_change_yaw() {
        let mut camera = LookCamera::new(0.3);
        camera.apply_mouse_delta((0.0, 200.0));
        assert_eq!(CameraRig::yaw(&camera), 0.3);
    }
}
