pub mod camera;
pub mod config;
pub mod controller;
pub mod input;
pub mod locomotion;
pub mod physics;
pub mod tilt;

pub use camera::{CameraRig, LookCamera};
pub use config::LocomotionConfig;
pub use controller::CharacterController;
pub use input::{ButtonState, InputFrame, KeyboardInput};
pub use locomotion::{FrameInputs, LocomotionState, MovementState, TickOutcome};
pub use physics::PhysicsWorld;
pub use tilt::TiltBlend;
