use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Edge-detected button sample for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: bool,
    pub held: bool,
    pub released: bool,
}

impl ButtonState {
    pub fn from_levels(was_down: bool, is_down: bool) -> Self {
        Self {
            pressed: is_down && !was_down,
            held: is_down,
            released: was_down && !is_down,
        }
    }

    pub fn press() -> Self {
        Self {
            pressed: true,
            held: true,
            released: false,
        }
    }

    pub fn hold() -> Self {
        Self {
            pressed: false,
            held: true,
            released: false,
        }
    }

    pub fn release() -> Self {
        Self {
            pressed: false,
            held: false,
            released: true,
        }
    }
}

/// Input snapshot consumed by one locomotion tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Strafe axis, right is positive.
    pub horizontal: f32,
    /// Forward axis, forward is positive.
    pub vertical: f32,
    pub jump: ButtonState,
    pub slide_pressed: bool,
}

impl InputFrame {
    pub fn axes(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
            ..Default::default()
        }
    }

    pub fn with_jump(mut self, jump: ButtonState) -> Self {
        self.jump = jump;
        self
    }

    pub fn with_slide(mut self) -> Self {
        self.slide_pressed = true;
        self
    }

    /// Axes clamped to [-1, 1].
    pub fn clamped_axes(&self) -> (f32, f32) {
        (
            self.horizontal.clamp(-1.0, 1.0),
            self.vertical.clamp(-1.0, 1.0),
        )
    }
}

const JUMP_KEY: KeyCode = KeyCode::Space;
const SLIDE_KEY: KeyCode = KeyCode::ControlLeft;

/// Keyboard/mouse state fed by window events and sampled once per tick.
pub struct KeyboardInput {
    pressed_keys: HashSet<KeyCode>,
    previous_keys: HashSet<KeyCode>,
    mouse_delta: (f32, f32),
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            previous_keys: HashSet::new(),
            mouse_delta: (0.0, 0.0),
        }
    }

    pub fn handle_key_press(&mut self, key: KeyCode) {
        self.pressed_keys.insert(key);
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.pressed_keys.remove(&key);
    }

    pub fn handle_mouse_move(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        let delta = self.mouse_delta;
        self.mouse_delta = (0.0, 0.0);
        delta
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    fn was_pressed(&self, key: KeyCode) -> bool {
        self.previous_keys.contains(&key)
    }

    fn axis(&self, positive: [KeyCode; 2], negative: [KeyCode; 2]) -> f32 {
        let mut value = 0.0;
        if positive.iter().any(|&k| self.is_pressed(k)) {
            value += 1.0;
        }
        if negative.iter().any(|&k| self.is_pressed(k)) {
            value -= 1.0;
        }
        value
    }

    /// Sample the current frame and latch key levels for next frame's edge detection.
    pub fn snapshot(&mut self) -> InputFrame {
        let frame = InputFrame {
            horizontal: self.axis(
                [KeyCode::KeyD, KeyCode::ArrowRight],
                [KeyCode::KeyA, KeyCode::ArrowLeft],
            ),
            vertical: self.axis(
                [KeyCode::KeyW, KeyCode::ArrowUp],
                [KeyCode::KeyS, KeyCode::ArrowDown],
            ),
            jump: ButtonState::from_levels(self.was_pressed(JUMP_KEY), self.is_pressed(JUMP_KEY)),
            slide_pressed: self.is_pressed(SLIDE_KEY) && !self.was_pressed(SLIDE_KEY),
        };
        self.previous_keys = self.pressed_keys.clone();
        frame
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_edges_across_frames() {
        let mut input = KeyboardInput::new();

        input.handle_key_press(KeyCode::Space);
        let frame = input.snapshot();
        assert_eq!(frame.jump, ButtonState::press());

        let frame = input.snapshot();
        assert_eq!(frame.jump, ButtonState::hold());

        input.handle_key_release(KeyCode::Space);
        let frame = input.snapshot();
        assert_eq!(frame.jump, ButtonState::release());

        let frame = input.snapshot();
        assert_eq!(frame.jump, ButtonState::default());
    }

    #[test]
    fn test_slide_is_press_edge_only() {
        let mut input = KeyboardInput::new();
        input.handle_key_press(KeyCode::ControlLeft);
        assert!(input.snapshot().slide_pressed);
        assert!(!input.snapshot().slide_pressed);
    }

    #[test]
    fn test_axes_from_keys() {
        let mut input = KeyboardInput::new();
        input.handle_key_press(KeyCode::KeyW);
        input.handle_key_press(KeyCode::KeyA);
        let frame = input.snapshot();
        assert_eq!(frame.vertical, 1.0);
        assert_eq!(frame.horizontal, -1.0);

        // Opposing keys cancel
        input.handle_key_press(KeyCode::KeyS);
        assert_eq!(input.snapshot().vertical, 0.0);
    }

    #[test]
    fn test_mouse_delta_is_consumed() {
        let mut input = KeyboardInput::new();
        input.handle_mouse_move(3.0, -1.0);
        input.handle_mouse_move(1.0, 0.5);
        assert_eq!(input.consume_mouse_delta(), (4.0, -0.5));
        assert_eq!(input.consume_mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_axes_are_clamped() {
        let frame = InputFrame::axes(3.0, -2.0);
        assert_eq!(frame.clamped_axes(), (1.0, -1.0));
    }
}
