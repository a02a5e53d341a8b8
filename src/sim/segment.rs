//! Rigid body segments
//!
//! A segment is a fixed-length link defined by a start point and an angle.
//! Its end point is always derived, never stored, so it cannot go stale.
//!
//! Angles live in [0, 2π) with y growing toward the ground: 0 points right,
//! π/2 points down, π left and 3π/2 up.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::consts::MIN_SEGMENT_LENGTH;
use crate::{normalize_angle, polar_to_cartesian};

/// Handle of a segment inside its owning body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub usize);

impl SegmentId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Allowed angular range of a joint
///
/// When `min > max` the range wraps through zero, e.g. min = 3π/2 and
/// max = π/2 allow everything except the left half-plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for AngleLimits {
    fn default() -> Self {
        Self::FULL
    }
}

impl AngleLimits {
    /// No restriction
    pub const FULL: AngleLimits = AngleLimits { min: 0.0, max: TAU };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range crosses zero
    #[inline]
    pub fn wraps(&self) -> bool {
        self.min > self.max
    }

    /// Check if an angle is within the range (handles wraparound)
    pub fn contains(&self, angle: f64) -> bool {
        let angle = normalize_angle(angle);
        if self.wraps() {
            angle >= self.min || angle <= self.max
        } else {
            angle >= self.min && angle <= self.max
        }
    }

    /// Normalize `angle` into [0, 2π) and bring it inside the range.
    ///
    /// Ordinary ranges clamp directly. Wrapping ranges keep in-range angles
    /// and snap the rest to whichever bound is circularly nearer, with ties
    /// going to `min`.
    pub fn clamp(&self, angle: f64) -> f64 {
        let angle = normalize_angle(angle);
        if !self.wraps() {
            return angle.max(self.min).min(self.max);
        }
        if angle >= self.min || angle <= self.max {
            return angle;
        }
        let to_min = (angle - self.min).abs().min((angle - (self.min - TAU)).abs());
        let to_max = (angle - self.max).abs().min((angle - (self.max + TAU)).abs());
        if to_min <= to_max { self.min } else { self.max }
    }
}

/// A single rigid link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    name: String,
    start: DVec2,
    length: f64,
    /// Current angle, always inside `limits`
    angle: f64,
    limits: AngleLimits,
    /// Angle at creation, restored by a pose reset
    rest_angle: f64,
    /// Non-owning link used only to re-derive `start`
    parent: Option<SegmentId>,
}

impl Segment {
    pub fn new(
        name: impl Into<String>,
        start: DVec2,
        length: f64,
        angle: f64,
        limits: AngleLimits,
    ) -> Self {
        let angle = limits.clamp(angle);
        Self {
            name: name.into(),
            start,
            length: length.max(MIN_SEGMENT_LENGTH),
            angle,
            limits,
            rest_angle: angle,
            parent: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn start(&self) -> DVec2 {
        self.start
    }

    /// `start + length * (cos angle, sin angle)`
    #[inline]
    pub fn end(&self) -> DVec2 {
        self.start + polar_to_cartesian(self.length, self.angle)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn limits(&self) -> AngleLimits {
        self.limits
    }

    pub fn rest_angle(&self) -> f64 {
        self.rest_angle
    }

    pub fn parent(&self) -> Option<SegmentId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn set_start(&mut self, start: DVec2) {
        self.start = start;
    }

    /// Shift the start point by `displacement`
    pub fn translate(&mut self, displacement: DVec2) {
        self.start += displacement;
    }

    /// Set the angle directly, clamped to the limits
    pub fn set_angle(&mut self, angle: f64) {
        if angle.is_finite() {
            self.angle = self.limits.clamp(angle);
        }
    }

    /// Replace the limits and re-clamp the current angle
    pub fn set_angle_limits(&mut self, limits: AngleLimits) {
        self.limits = limits;
        self.angle = limits.clamp(self.angle);
    }

    /// Rotate by `delta` radians. See [`Segment::rotate_to`].
    pub fn rotate(&mut self, delta: f64) -> bool {
        self.rotate_to(self.angle + delta)
    }

    /// Rotate to `target`, clamped to the limits.
    ///
    /// The clamped angle is always stored. Returns true when no clamping was
    /// needed and false when the angle stopped at a limit. Non-finite
    /// targets leave the segment unchanged and return false.
    pub fn rotate_to(&mut self, target: f64) -> bool {
        if !target.is_finite() {
            return false;
        }
        let requested = normalize_angle(target);
        let clamped = self.limits.clamp(requested);
        self.angle = clamped;
        clamped == requested
    }

    /// Attach under `parent`, starting at the parent's current end point
    pub fn connect_to(&mut self, parent: SegmentId, parent_end: DVec2) {
        self.parent = Some(parent);
        self.start = parent_end;
    }

    /// Closest point on the segment to `point`
    pub fn closest_point_to(&self, point: DVec2) -> DVec2 {
        let start = self.start;
        let line = self.end() - start;
        let len_sq = line.length_squared();
        if len_sq <= f64::EPSILON {
            return start;
        }
        let t = ((point - start).dot(line) / len_sq).clamp(0.0, 1.0);
        start + line * t
    }

    pub fn distance_to_point(&self, point: DVec2) -> f64 {
        point.distance(self.closest_point_to(point))
    }

    /// Point lies within `threshold` of the segment
    pub fn contains_point(&self, point: DVec2, threshold: f64) -> bool {
        self.distance_to_point(point) <= threshold
    }

    pub fn start_on_ground(&self, ground_level: f64, tolerance: f64) -> bool {
        (self.start.y - ground_level).abs() <= tolerance
    }

    pub fn end_on_ground(&self, ground_level: f64, tolerance: f64) -> bool {
        (self.end().y - ground_level).abs() <= tolerance
    }

    /// Number of endpoints (0, 1 or 2) touching the ground
    pub fn ground_contacts(&self, ground_level: f64, tolerance: f64) -> usize {
        usize::from(self.start_on_ground(ground_level, tolerance))
            + usize::from(self.end_on_ground(ground_level, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::VectorExt;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn wrap_limits() -> AngleLimits {
        AngleLimits::new(3.0 * PI / 2.0, FRAC_PI_2)
    }

    #[test]
    fn test_end_is_derived() {
        let mut seg = Segment::new("arm", DVec2::new(10.0, 20.0), 5.0, 0.0, AngleLimits::FULL);
        assert!(seg.end().approx_eq(DVec2::new(15.0, 20.0)));

        seg.set_start(DVec2::new(0.0, 0.0));
        seg.rotate_to(FRAC_PI_2);
        assert!(seg.end().approx_eq(DVec2::new(0.0, 5.0)));
    }

    #[test]
    fn test_minimum_length() {
        let seg = Segment::new("stub", DVec2::ZERO, 0.0, 0.0, AngleLimits::FULL);
        assert_eq!(seg.length(), MIN_SEGMENT_LENGTH);
        let seg = Segment::new("neg", DVec2::ZERO, -4.0, 0.0, AngleLimits::FULL);
        assert_eq!(seg.length(), MIN_SEGMENT_LENGTH);
    }

    #[test]
    fn test_clamp_ordinary_range() {
        let limits = AngleLimits::new(0.0, PI);
        assert_eq!(limits.clamp(FRAC_PI_2), FRAC_PI_2);
        assert_eq!(limits.clamp(4.0), PI);
        // -π/2 normalizes to 3π/2, above max
        assert_eq!(limits.clamp(-FRAC_PI_2), PI);
    }

    #[test]
    fn test_clamp_wraparound_accepts_inside() {
        let limits = wrap_limits();
        assert_eq!(limits.clamp(0.1), 0.1);
        assert_eq!(limits.clamp(5.0), 5.0);
        assert!((limits.clamp(-0.1) - (TAU - 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_wraparound_snaps_to_nearer_bound() {
        let limits = wrap_limits();
        // just past max
        assert_eq!(limits.clamp(0.6 * PI), FRAC_PI_2);
        // just before min
        assert_eq!(limits.clamp(1.4 * PI), 3.0 * PI / 2.0);
        // opposite the wrap point lands on one of the bounds
        let opposite = limits.clamp(PI);
        assert!(opposite == limits.min || opposite == limits.max);
    }

    #[test]
    fn test_rotate_reports_clamping() {
        let mut seg = Segment::new("knee", DVec2::ZERO, 10.0, FRAC_PI_2, AngleLimits::new(0.0, PI));
        assert!(seg.rotate(0.25));
        assert!((seg.angle() - (FRAC_PI_2 + 0.25)).abs() < 1e-12);

        // soft fail: the angle still moves, but only as far as the limit
        assert!(!seg.rotate(PI));
        assert_eq!(seg.angle(), PI);
    }

    #[test]
    fn test_rotate_through_zero_is_not_clamping() {
        let mut seg = Segment::new("free", DVec2::ZERO, 10.0, 0.1, AngleLimits::FULL);
        assert!(seg.rotate(-0.2));
        assert!((seg.angle() - (TAU - 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_non_finite_is_ignored() {
        let mut seg = Segment::new("free", DVec2::ZERO, 10.0, 1.0, AngleLimits::FULL);
        assert!(!seg.rotate(f64::NAN));
        assert_eq!(seg.angle(), 1.0);
    }

    #[test]
    fn test_set_angle_limits_reclamps() {
        let mut seg = Segment::new("elbow", DVec2::ZERO, 10.0, 4.0, AngleLimits::FULL);
        seg.set_angle_limits(wrap_limits());
        assert_eq!(seg.angle(), 3.0 * PI / 2.0);
        assert_eq!(seg.rest_angle(), 4.0);
    }

    #[test]
    fn test_connect_to_snaps_start() {
        let parent = Segment::new("upper", DVec2::ZERO, 10.0, 0.0, AngleLimits::FULL);
        let mut child = Segment::new("lower", DVec2::new(99.0, 99.0), 5.0, 0.0, AngleLimits::FULL);
        child.connect_to(SegmentId(0), parent.end());
        assert_eq!(child.parent(), Some(SegmentId(0)));
        assert!(child.start().approx_eq(DVec2::new(10.0, 0.0)));
        assert!(!child.is_root());
    }

    #[test]
    fn test_closest_point_projection() {
        let seg = Segment::new("bar", DVec2::ZERO, 10.0, 0.0, AngleLimits::FULL);
        assert!(seg.closest_point_to(DVec2::new(5.0, 3.0)).approx_eq(DVec2::new(5.0, 0.0)));
        assert!(seg.closest_point_to(DVec2::new(-4.0, 1.0)).approx_eq(DVec2::ZERO));
        assert!(seg.closest_point_to(DVec2::new(14.0, -2.0)).approx_eq(DVec2::new(10.0, 0.0)));
        assert!((seg.distance_to_point(DVec2::new(5.0, 3.0)) - 3.0).abs() < 1e-12);
        assert!(seg.contains_point(DVec2::new(5.0, 0.5), 1.0));
        assert!(!seg.contains_point(DVec2::new(5.0, 1.5), 1.0));
    }

    #[test]
    fn test_ground_contact_predicates() {
        // vertical segment from the ground straight up
        let seg = Segment::new("shin", DVec2::new(0.0, 400.0), 50.0, 3.0 * FRAC_PI_2, AngleLimits::FULL);
        assert!(seg.start_on_ground(400.0, 1.0));
        assert!(!seg.end_on_ground(400.0, 1.0));
        assert!(seg.start_on_ground(400.9, 1.0));
        assert_eq!(seg.ground_contacts(400.0, 1.0), 1);

        let foot = Segment::new("foot", DVec2::new(0.0, 400.0), 30.0, 0.0, AngleLimits::FULL);
        assert_eq!(foot.ground_contacts(400.0, 1.0), 2);
    }

    proptest! {
        #[test]
        fn prop_clamp_is_idempotent(
            min in 0.0..TAU,
            max in 0.0..TAU,
            angle in -20.0f64..20.0,
        ) {
            let limits = AngleLimits::new(min, max);
            let once = limits.clamp(angle);
            prop_assert_eq!(limits.clamp(once), once);
            prop_assert!(limits.contains(once));
        }

        #[test]
        fn prop_in_range_angle_unchanged(
            min in 0.0..TAU,
            max in 0.0..TAU,
            angle in 0.0..TAU,
        ) {
            let limits = AngleLimits::new(min, max);
            prop_assume!(limits.contains(angle));
            prop_assert_eq!(limits.clamp(angle), angle);
        }

        #[test]
        fn prop_end_matches_polar_form(
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
            length in 0.1f64..200.0,
            delta in -10.0f64..10.0,
        ) {
            let mut seg = Segment::new("s", DVec2::new(x, y), length, 0.0, AngleLimits::FULL);
            seg.rotate(delta);
            let expected = DVec2::new(
                x + length * seg.angle().cos(),
                y + length * seg.angle().sin(),
            );
            prop_assert_eq!(seg.end(), expected);
        }
    }
}
