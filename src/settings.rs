//! Scenario settings
//!
//! Everything a scenario needs to set itself up, loadable from JSON. Missing
//! fields fall back to the defaults, so a config file only has to name what
//! it changes.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Predefined body layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BodyPreset {
    /// Full stick figure: legs, feet, torso, head and two three-part arms
    #[default]
    Humanoid,
    /// Torso with two arms and two legs, one segment each
    Simple,
}

impl BodyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPreset::Humanoid => "Humanoid",
            BodyPreset::Simple => "Simple",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "humanoid" | "human" => Some(BodyPreset::Humanoid),
            "simple" => Some(BodyPreset::Simple),
            _ => None,
        }
    }
}

/// Walk-and-grab tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Distance covered by one walk move
    pub walk_speed: f64,
    /// Horizontal gap kept to the target before reaching
    pub reach_distance: f64,
    /// Ground contacts required before any walk or reach
    pub min_ground_contacts: usize,
    /// Endpoint segments that must touch the target for a grab
    pub min_object_contacts: usize,
    /// Segments rotated toward the target, in order
    pub reaching_segments: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            reach_distance: REACH_DISTANCE,
            min_ground_contacts: MIN_GROUND_CONTACTS,
            min_object_contacts: MIN_OBJECT_CONTACTS,
            reaching_segments: vec![
                "left_lower_arm".to_string(),
                "right_lower_arm".to_string(),
                "left_hand".to_string(),
                "right_hand".to_string(),
            ],
        }
    }
}

/// Throwing tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowballConfig {
    pub radius: f64,
    /// Downward acceleration (y grows toward the ground)
    pub gravity: f64,
    /// Launch point height above the body base
    pub launch_height: f64,
}

impl Default for SnowballConfig {
    fn default() -> Self {
        Self {
            radius: SNOWBALL_RADIUS,
            gravity: GRAVITY,
            launch_height: LAUNCH_HEIGHT,
        }
    }
}

/// Errors raised while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Complete scenario configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World ===
    /// y-coordinate of the ground line
    pub ground_level: f64,
    /// How close an endpoint must be to the ground to count as contact
    pub ground_tolerance: f64,

    // === Body ===
    pub body_position: DVec2,
    pub body_preset: BodyPreset,

    // === Targets ===
    /// Target center for the walk-and-grab scenario
    pub target_position: DVec2,
    /// Target center for the snowball scenario
    pub snowball_target_position: DVec2,
    pub target_radius: f64,

    // === Strategies ===
    pub walker: WalkerConfig,
    pub snowball: SnowballConfig,

    // === Driver ===
    /// Time step fed to the projectile per tick
    pub time_step: f64,
    /// Tick budget for `Scenario::run`
    pub max_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ground_level: GROUND_LEVEL,
            ground_tolerance: GROUND_TOLERANCE,

            body_position: DVec2::new(100.0, GROUND_LEVEL),
            body_preset: BodyPreset::Humanoid,

            target_position: DVec2::new(500.0, 350.0),
            snowball_target_position: DVec2::new(400.0, 300.0),
            target_radius: TARGET_RADIUS,

            walker: WalkerConfig::default(),
            snowball: SnowballConfig::default(),

            time_step: SIM_DT,
            max_ticks: MAX_TICKS,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
