use std::path::Path;

use serde::Deserialize;

// Movement
pub const WALK_SPEED: f32 = 6.0;
pub const JUMP_POWER: f32 = 8.0;
pub const GRAVITY: f32 = 20.0;
pub const JUMPS_ALLOWED: u32 = 2;

// Slide
pub const SLIDE_DURATION: f32 = 1.0; // seconds
pub const SLIDE_SPEED_BOOST: f32 = 5.0; // added on top of walk speed
pub const SLIDE_COOLDOWN: f32 = 1.0; // seconds between slides
pub const SLIDE_TILT_ANGLE: f32 = 45.0; // degrees
pub const TILT_SPEED: f32 = 10.0;

// Jet pack
pub const JET_FUEL_MAX: f32 = 2.0;
pub const JET_FUEL_CONSUMPTION: f32 = 1.0; // fuel per second while jetting
pub const JET_FUEL_REFILL_RATE: f32 = 1.0; // fuel per second while walking
pub const JET_ACCEL: f32 = 30.0;

// Body
pub const CAPSULE_HEIGHT: f32 = 2.0;
pub const CAPSULE_RADIUS: f32 = 0.5;
pub const GROUND_PROBE_EPSILON: f32 = 0.01; // probe reach past the capsule bottom
pub const GROUND_LAYER: u32 = 0b0001;

// Camera
pub const MOUSE_SENSITIVITY: f32 = 0.002;
pub const PITCH_LIMIT: f32 = 1.5;

/// Tuning for one character. Set once at initialization, never mutated by the controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub walk_speed: f32,
    pub jump_power: f32,
    pub gravity: f32,
    pub jumps_allowed: u32,
    pub slide_duration: f32,
    pub slide_speed_boost: f32,
    pub slide_cooldown: f32,
    /// Degrees around the model's pitch axis.
    pub slide_tilt_angle: f32,
    pub tilt_speed: f32,
    pub jet_fuel_max: f32,
    pub jet_fuel_consumption: f32,
    pub jet_fuel_refill_rate: f32,
    pub jet_accel: f32,
    /// Bit mask of collision groups the ground probe accepts.
    pub ground_layer: u32,
    pub capsule_height: f32,
    pub capsule_radius: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            jump_power: JUMP_POWER,
            gravity: GRAVITY,
            jumps_allowed: JUMPS_ALLOWED,
            slide_duration: SLIDE_DURATION,
            slide_speed_boost: SLIDE_SPEED_BOOST,
            slide_cooldown: SLIDE_COOLDOWN,
            slide_tilt_angle: SLIDE_TILT_ANGLE,
            tilt_speed: TILT_SPEED,
            jet_fuel_max: JET_FUEL_MAX,
            jet_fuel_consumption: JET_FUEL_CONSUMPTION,
            jet_fuel_refill_rate: JET_FUEL_REFILL_RATE,
            jet_accel: JET_ACCEL,
            ground_layer: GROUND_LAYER,
            capsule_height: CAPSULE_HEIGHT,
            capsule_radius: CAPSULE_RADIUS,
        }
    }
}

impl LocomotionConfig {
    /// Load from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Ray length from the body origin down to just past the capsule bottom.
    pub fn ground_probe_distance(&self) -> f32 {
        self.capsule_height / 2.0 + GROUND_PROBE_EPSILON
    }

    /// Names of fields holding negative values. These are not rejected, only reported.
    pub fn negative_fields(&self) -> Vec<&'static str> {
        [
            ("walk_speed", self.walk_speed),
            ("jump_power", self.jump_power),
            ("gravity", self.gravity),
            ("slide_duration", self.slide_duration),
            ("slide_speed_boost", self.slide_speed_boost),
            ("slide_cooldown", self.slide_cooldown),
            ("tilt_speed", self.tilt_speed),
            ("jet_fuel_max", self.jet_fuel_max),
            ("jet_fuel_consumption", self.jet_fuel_consumption),
            ("jet_fuel_refill_rate", self.jet_fuel_refill_rate),
            ("jet_accel", self.jet_accel),
            ("capsule_height", self.capsule_height),
            ("capsule_radius", self.capsule_radius),
        ]
        .into_iter()
        .filter(|(_, value)| *value < 0.0)
        .map(|(name, _)| name)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LocomotionConfig::from_toml_str("walk_speed = 5.0\njumps_allowed = 3\n").unwrap();
        assert_eq!(config.walk_speed, 5.0);
        assert_eq!(config.jumps_allowed, 3);
        assert_eq!(config.gravity, GRAVITY);
        assert_eq!(config.ground_layer, GROUND_LAYER);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = LocomotionConfig::from_toml_str("").unwrap();
        assert_eq!(config, LocomotionConfig::default());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let err = LocomotionConfig::from_toml_str("walk_speed = \"fast\"").unwrap_err();
        assert!(err.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = LocomotionConfig::load(Path::new("/nonexistent/locomotion.toml")).unwrap_err();
        assert!(err.contains("/nonexistent/locomotion.toml"));
    }

    #[test]
    fn test_probe_distance_reaches_past_capsule() {
        let config = LocomotionConfig {
            capsule_height: 2.0,
            ..Default::default()
        };
        assert!((config.ground_probe_distance() - 1.01).abs() < 1e-6);
    }

    #[test]
    fn test_negative_fields_are_reported() {
        let config = LocomotionConfig {
            walk_speed: -1.0,
            slide_cooldown: -0.5,
            ..Default::default()
        };
        assert_eq!(config.negative_fields(), vec!["walk_speed", "slide_cooldown"]);
        assert!(LocomotionConfig::default().negative_fields().is_empty());
    }
}
