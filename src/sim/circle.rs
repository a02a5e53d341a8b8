//! Circle geometry for targets and projectiles
//!
//! A circle can optionally carry ballistic state, in which case `step`
//! integrates it under constant downward gravity.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Velocity and gravity of a circle in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ballistics {
    pub velocity: DVec2,
    /// Acceleration along +y (toward the ground)
    pub gravity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: DVec2,
    radius: f64,
    /// Present only while the circle is simulated
    ballistics: Option<Ballistics>,
}

impl Default for Circle {
    fn default() -> Self {
        Self::new(DVec2::ZERO, 10.0)
    }
}

impl Circle {
    /// Negative radii are treated as zero
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            ballistics: None,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    pub fn translate(&mut self, displacement: DVec2) {
        self.center += displacement;
    }

    /// Enable ballistic motion with the given launch velocity
    pub fn set_ballistics(&mut self, velocity: DVec2, gravity: f64) {
        self.ballistics = Some(Ballistics { velocity, gravity });
    }

    pub fn clear_ballistics(&mut self) {
        self.ballistics = None;
    }

    pub fn ballistics(&self) -> Option<Ballistics> {
        self.ballistics
    }

    pub fn has_physics(&self) -> bool {
        self.ballistics.is_some()
    }

    /// Current velocity, zero when not simulated
    pub fn velocity(&self) -> DVec2 {
        self.ballistics.map(|b| b.velocity).unwrap_or(DVec2::ZERO)
    }

    /// Advance one Euler step: gravity into velocity first, then velocity
    /// into position. No-op without ballistic state.
    pub fn step(&mut self, dt: f64) {
        if let Some(ballistics) = self.ballistics.as_mut() {
            ballistics.velocity.y += ballistics.gravity * dt;
            self.center += ballistics.velocity * dt;
        }
    }

    /// Point inside or on the boundary
    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Circles overlap or touch
    pub fn intersects(&self, other: &Circle) -> bool {
        let sum = self.radius + other.radius;
        self.center.distance_squared(other.center) <= sum * sum
    }

    /// Bottom edge at or below the ground line
    pub fn is_on_ground(&self, ground_level: f64) -> bool {
        self.center.y + self.radius >= ground_level
    }

    /// Gap between the two boundaries, zero when overlapping
    pub fn distance_to(&self, other: &Circle) -> f64 {
        (self.distance_to_center(other) - self.radius - other.radius).max(0.0)
    }

    pub fn distance_to_center(&self, other: &Circle) -> f64 {
        self.center.distance(other.center)
    }
}
