//! Declarative body construction
//!
//! Collect segment specs and connections first, then produce a [`Body`] in
//! one go. Segments are inserted before any connection is made, and a full
//! update pass runs at the end so the result is ready for queries.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::DVec2;

use super::body::{Body, BodyError};
use super::segment::AngleLimits;
use crate::consts::{GROUND_LEVEL, GROUND_TOLERANCE};
use crate::settings::{BodyPreset, SimConfig};

const UP: f64 = 3.0 * FRAC_PI_2;

#[derive(Debug, Clone, PartialEq)]
struct SegmentSpec {
    name: String,
    length: f64,
    angle: f64,
    limits: AngleLimits,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyBuilder {
    base_position: DVec2,
    ground_level: f64,
    ground_tolerance: f64,
    segments: Vec<SegmentSpec>,
    /// (parent, child) pairs in the order they will be applied
    connections: Vec<(String, String)>,
}

impl Default for BodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self {
            base_position: DVec2::new(100.0, GROUND_LEVEL),
            ground_level: GROUND_LEVEL,
            ground_tolerance: GROUND_TOLERANCE,
            segments: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Builder for one of the predefined layouts
    pub fn from_preset(preset: BodyPreset) -> Self {
        Self::new().preset(preset)
    }

    /// World placement and layout taken from a scenario config
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new()
            .base_position(config.body_position)
            .ground_level(config.ground_level)
            .ground_tolerance(config.ground_tolerance)
            .preset(config.body_preset)
    }

    pub fn base_position(mut self, base_position: DVec2) -> Self {
        self.base_position = base_position;
        self
    }

    pub fn ground_level(mut self, ground_level: f64) -> Self {
        self.ground_level = ground_level;
        self
    }

    pub fn ground_tolerance(mut self, tolerance: f64) -> Self {
        self.ground_tolerance = tolerance;
        self
    }

    pub fn add_segment(mut self, name: &str, length: f64, angle: f64, limits: AngleLimits) -> Self {
        self.segments.push(SegmentSpec {
            name: name.to_string(),
            length,
            angle,
            limits,
        });
        self
    }

    pub fn connect_segments(mut self, parent: &str, child: &str) -> Self {
        self.connections.push((parent.to_string(), child.to_string()));
        self
    }

    /// Drop all segments and connections; placement is kept
    pub fn reset(mut self) -> Self {
        self.segments.clear();
        self.connections.clear();
        self
    }

    pub fn preset(self, preset: BodyPreset) -> Self {
        match preset {
            BodyPreset::Humanoid => self.humanoid(),
            BodyPreset::Simple => self.simple(),
        }
    }

    /// Standing stick figure.
    ///
    /// Feet and lower legs are rooted at the base so the figure keeps six
    /// ground contacts; the torso sits on the left leg and carries the head
    /// and both arms.
    pub fn humanoid(self) -> Self {
        let vertical = AngleLimits::new(5.0 * FRAC_PI_4, 7.0 * FRAC_PI_4);
        let leg = AngleLimits::new(PI, TAU);
        let left_arm = AngleLimits::new(FRAC_PI_2, UP);
        let right_arm = AngleLimits::new(UP, FRAC_PI_2);

        self.reset()
            // Legs and feet
            .add_segment("left_lower_leg", 50.0, UP, leg)
            .add_segment("left_upper_leg", 50.0, UP, leg)
            .connect_segments("left_lower_leg", "left_upper_leg")
            .add_segment("left_foot", 30.0, PI, AngleLimits::new(3.0 * FRAC_PI_4, 5.0 * FRAC_PI_4))
            .add_segment("right_lower_leg", 50.0, UP, leg)
            .add_segment("right_upper_leg", 50.0, UP, leg)
            .connect_segments("right_lower_leg", "right_upper_leg")
            .add_segment("right_foot", 30.0, 0.0, AngleLimits::new(7.0 * FRAC_PI_4, FRAC_PI_4))
            // Torso and head
            .add_segment("torso", 60.0, UP, vertical)
            .connect_segments("left_upper_leg", "torso")
            .add_segment("head", 30.0, UP, vertical)
            .connect_segments("torso", "head")
            // Left arm
            .add_segment("left_upper_arm", 40.0, 3.0 * FRAC_PI_4, left_arm)
            .connect_segments("torso", "left_upper_arm")
            .add_segment("left_lower_arm", 40.0, 3.0 * FRAC_PI_4, AngleLimits::FULL)
            .connect_segments("left_upper_arm", "left_lower_arm")
            .add_segment("left_hand", 20.0, 3.0 * FRAC_PI_4, left_arm)
            .connect_segments("left_lower_arm", "left_hand")
            // Right arm
            .add_segment("right_upper_arm", 40.0, FRAC_PI_4, right_arm)
            .connect_segments("torso", "right_upper_arm")
            .add_segment("right_lower_arm", 40.0, FRAC_PI_4, AngleLimits::FULL)
            .connect_segments("right_upper_arm", "right_lower_arm")
            .add_segment("right_hand", 20.0, FRAC_PI_4, right_arm)
            .connect_segments("right_lower_arm", "right_hand")
    }

    /// Two legs, a torso and two arms, one segment each
    pub fn simple(self) -> Self {
        let leg = AngleLimits::new(PI, TAU);

        self.reset()
            .add_segment("left_leg", 50.0, UP, leg)
            .add_segment("right_leg", 50.0, UP, leg)
            .add_segment("torso", 50.0, UP, AngleLimits::new(5.0 * FRAC_PI_4, 7.0 * FRAC_PI_4))
            .connect_segments("left_leg", "torso")
            .add_segment("left_arm", 40.0, 5.0 * FRAC_PI_4, AngleLimits::new(PI, TAU))
            .connect_segments("torso", "left_arm")
            .add_segment("right_arm", 40.0, 7.0 * FRAC_PI_4, AngleLimits::new(UP, FRAC_PI_2))
            .connect_segments("torso", "right_arm")
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Build the body, logging and skipping any spec that does not apply
    pub fn build(self) -> Body {
        let mut body = self.empty_body();
        for spec in &self.segments {
            if let Err(e) = body.add_segment(&spec.name, spec.length, spec.angle, spec.limits) {
                log::warn!("Skipping segment: {e}");
            }
        }
        for (parent, child) in &self.connections {
            if let Err(e) = body.connect_segments(parent, child) {
                log::warn!("Skipping connection: {e}");
            }
        }
        body.update_segments();
        body
    }

    /// Build the body, stopping at the first invalid spec
    pub fn try_build(self) -> Result<Body, BodyError> {
        let mut body = self.empty_body();
        for spec in &self.segments {
            body.add_segment(&spec.name, spec.length, spec.angle, spec.limits)?;
        }
        for (parent, child) in &self.connections {
            body.connect_segments(parent, child)?;
        }
        body.update_segments();
        Ok(body)
    }

    fn empty_body(&self) -> Body {
        let mut body = Body::new(self.base_position, self.ground_level);
        body.set_ground_tolerance(self.ground_tolerance);
        body
    }
}
