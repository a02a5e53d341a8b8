//! Articulated body: an arena of segments wired into a forest
//!
//! Segments are addressed by [`SegmentId`]. Each segment knows its parent,
//! and the body keeps the child lists. Root segments start at the base
//! position and every other segment starts at its parent's end. Rotating a
//! segment or moving the base re-derives all downstream start points in a
//! fixed order (children in connection order, roots in insertion order).

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::circle::Circle;
use super::segment::{AngleLimits, Segment, SegmentId};
use crate::consts::GROUND_TOLERANCE;

/// Structural errors; the body is left unchanged when one is returned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyError {
    #[error("Segment '{0}' already exists")]
    DuplicateSegment(String),
    #[error("Segment '{0}' not found")]
    UnknownSegment(String),
    #[error("Segment '{0}' cannot be connected to itself")]
    SelfConnection(String),
    #[error("Segment '{child}' is already connected to '{parent}'")]
    AlreadyConnected { child: String, parent: String },
    #[error("Connecting '{child}' under '{parent}' would create a cycle")]
    WouldCycle { parent: String, child: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    base_position: DVec2,
    ground_level: f64,
    /// Max distance from the ground line that still counts as contact
    ground_tolerance: f64,
    /// Arena, indexed by `SegmentId`
    segments: Vec<Segment>,
    /// Child lists, parallel to `segments`
    children: Vec<Vec<SegmentId>>,
}

impl Body {
    pub fn new(base_position: DVec2, ground_level: f64) -> Self {
        Self {
            base_position,
            ground_level,
            ground_tolerance: GROUND_TOLERANCE,
            segments: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn set_ground_tolerance(&mut self, tolerance: f64) {
        self.ground_tolerance = tolerance.max(0.0);
    }

    pub fn base_position(&self) -> DVec2 {
        self.base_position
    }

    pub fn ground_level(&self) -> f64 {
        self.ground_level
    }

    pub fn ground_tolerance(&self) -> f64 {
        self.ground_tolerance
    }

    // === Structure ===

    /// Add a segment starting at the current base position
    pub fn add_segment(
        &mut self,
        name: &str,
        length: f64,
        angle: f64,
        limits: AngleLimits,
    ) -> Result<SegmentId, BodyError> {
        if self.find(name).is_some() {
            return Err(BodyError::DuplicateSegment(name.to_string()));
        }
        let id = SegmentId(self.segments.len());
        self.segments
            .push(Segment::new(name, self.base_position, length, angle, limits));
        self.children.push(Vec::new());
        Ok(id)
    }

    /// Attach `child_name` under `parent_name`; the child (and its subtree)
    /// immediately moves to the parent's end.
    pub fn connect_segments(&mut self, parent_name: &str, child_name: &str) -> Result<(), BodyError> {
        let parent = self
            .find(parent_name)
            .ok_or_else(|| BodyError::UnknownSegment(parent_name.to_string()))?;
        let child = self
            .find(child_name)
            .ok_or_else(|| BodyError::UnknownSegment(child_name.to_string()))?;
        self.connect(parent, child)
    }

    /// Attach `child` under `parent` by handle
    pub fn connect(&mut self, parent: SegmentId, child: SegmentId) -> Result<(), BodyError> {
        let (Some(parent_seg), Some(child_seg)) = (self.segment(parent), self.segment(child)) else {
            let missing = if self.segment(parent).is_none() { parent } else { child };
            return Err(BodyError::UnknownSegment(format!("#{}", missing.0)));
        };
        if parent == child {
            return Err(BodyError::SelfConnection(child_seg.name().to_string()));
        }
        if let Some(existing) = child_seg.parent() {
            return Err(BodyError::AlreadyConnected {
                child: child_seg.name().to_string(),
                parent: self.segments[existing.0].name().to_string(),
            });
        }
        if self.is_ancestor(child, parent) {
            return Err(BodyError::WouldCycle {
                parent: parent_seg.name().to_string(),
                child: child_seg.name().to_string(),
            });
        }

        let anchor = parent_seg.end();
        self.children[parent.0].push(child);
        self.segments[child.0].connect_to(parent, anchor);
        self.update_child_segments(child);
        Ok(())
    }

    /// Whether `ancestor` lies on the parent chain above `id`
    fn is_ancestor(&self, ancestor: SegmentId, id: SegmentId) -> bool {
        let mut current = self.segments[id.0].parent();
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.segments[p.0].parent();
        }
        false
    }

    // === Queries ===

    pub fn find(&self, name: &str) -> Option<SegmentId> {
        self.segments
            .iter()
            .position(|s| s.name() == name)
            .map(SegmentId)
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    pub fn segment_by_name(&self, name: &str) -> Option<&Segment> {
        self.find(name).and_then(|id| self.segment(id))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        (0..self.segments.len()).map(SegmentId)
    }

    pub fn segment_names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name()).collect()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn children(&self, id: SegmentId) -> &[SegmentId] {
        self.children.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Segments without a parent, in insertion order
    pub fn roots(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.segment_ids().filter(move |&id| self.segments[id.0].is_root())
    }

    /// Leaf of the forest; only leaves can touch a target
    pub fn is_endpoint(&self, id: SegmentId) -> bool {
        self.segment(id).is_some() && self.children(id).is_empty()
    }

    /// (start, end) of every segment, for drawing
    pub fn segment_lines(&self) -> Vec<(DVec2, DVec2)> {
        self.segments.iter().map(|s| (s.start(), s.end())).collect()
    }

    // === Motion ===

    /// Rotate a segment by `delta` and carry its subtree along.
    ///
    /// Returns false if the segment is missing or the rotation stopped at a
    /// joint limit. A limited rotation still moves the segment (to the
    /// limit) and its subtree.
    pub fn rotate_segment(&mut self, id: SegmentId, delta: f64) -> bool {
        let Some(segment) = self.segments.get_mut(id.0) else {
            log::warn!("Segment #{} not found", id.0);
            return false;
        };
        let unclamped = segment.rotate(delta);
        self.update_child_segments(id);
        unclamped
    }

    /// Rotate a segment to an absolute angle; see [`Body::rotate_segment`]
    pub fn rotate_segment_to(&mut self, id: SegmentId, angle: f64) -> bool {
        let Some(segment) = self.segments.get_mut(id.0) else {
            log::warn!("Segment #{} not found", id.0);
            return false;
        };
        let unclamped = segment.rotate_to(angle);
        self.update_child_segments(id);
        unclamped
    }

    pub fn rotate_segment_by_name(&mut self, name: &str, delta: f64) -> bool {
        match self.find(name) {
            Some(id) => self.rotate_segment(id, delta),
            None => {
                log::warn!("Segment not found: {name}");
                false
            }
        }
    }

    pub fn rotate_segment_to_by_name(&mut self, name: &str, angle: f64) -> bool {
        match self.find(name) {
            Some(id) => self.rotate_segment_to(id, angle),
            None => {
                log::warn!("Segment not found: {name}");
                false
            }
        }
    }

    /// Translate the base and every root subtree by the same displacement
    pub fn move_base_to(&mut self, new_base: DVec2) {
        let displacement = new_base - self.base_position;
        self.base_position = new_base;

        for index in 0..self.segments.len() {
            if self.segments[index].is_root() {
                self.segments[index].translate(displacement);
                self.update_child_segments(SegmentId(index));
            }
        }
    }

    /// Return every segment to its rest angle and re-derive positions
    pub fn reset_pose(&mut self) {
        for segment in &mut self.segments {
            let rest = segment.rest_angle();
            segment.rotate_to(rest);
        }
        self.update_segments();
    }

    /// Full pass: pin every root to the base and propagate downward
    pub fn update_segments(&mut self) {
        let base = self.base_position;
        for index in 0..self.segments.len() {
            if self.segments[index].is_root() {
                self.segments[index].set_start(base);
                self.update_child_segments(SegmentId(index));
            }
        }
    }

    fn update_child_segments(&mut self, parent: SegmentId) {
        let end = self.segments[parent.0].end();
        for i in 0..self.children[parent.0].len() {
            let child = self.children[parent.0][i];
            self.segments[child.0].set_start(end);
            self.update_child_segments(child);
        }
    }

    // === Contacts ===

    /// Endpoints (start and end of every segment) touching the ground
    pub fn count_ground_contacts(&self) -> usize {
        self.segments
            .iter()
            .map(|s| s.ground_contacts(self.ground_level, self.ground_tolerance))
            .sum()
    }

    pub fn has_minimum_ground_contacts(&self, min_contacts: usize) -> bool {
        self.count_ground_contacts() >= min_contacts
    }

    /// Names of segments with at least one endpoint on the ground
    pub fn segments_on_ground(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter(|s| s.ground_contacts(self.ground_level, self.ground_tolerance) > 0)
            .map(|s| s.name())
            .collect()
    }

    /// Leaf segments whose end lies inside the circle or whose closest point
    /// to the center is within the radius
    pub fn segments_touching_object(&self, object: &Circle) -> Vec<SegmentId> {
        self.segment_ids()
            .filter(|&id| self.is_endpoint(id))
            .filter(|id| {
                let segment = &self.segments[id.0];
                object.contains(segment.end())
                    || segment.distance_to_point(object.center) <= object.radius()
            })
            .collect()
    }

    pub fn can_reach_object(&self, object: &Circle, min_touching: usize) -> bool {
        self.segments_touching_object(object).len() >= min_touching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::VectorExt;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const UP: f64 = 3.0 * FRAC_PI_2;

    /// hip (root, up) -> spine -> arm -> hand, plus a foot root lying flat
    fn sample_body() -> Body {
        let mut body = Body::new(DVec2::new(0.0, 400.0), 400.0);
        body.add_segment("hip", 50.0, UP, AngleLimits::FULL).unwrap();
        body.add_segment("spine", 40.0, UP, AngleLimits::FULL).unwrap();
        body.add_segment("arm", 30.0, 0.0, AngleLimits::new(0.0, PI)).unwrap();
        body.add_segment("hand", 10.0, 0.0, AngleLimits::new(UP, FRAC_PI_2)).unwrap();
        body.add_segment("foot", 20.0, 0.0, AngleLimits::FULL).unwrap();
        body.connect_segments("hip", "spine").unwrap();
        body.connect_segments("spine", "arm").unwrap();
        body.connect_segments("arm", "hand").unwrap();
        body.update_segments();
        body
    }

    fn assert_tree_consistent(body: &Body) {
        for id in body.segment_ids() {
            let seg = body.segment(id).unwrap();
            match seg.parent() {
                None => assert!(seg.start().approx_eq(body.base_position())),
                Some(p) => assert!(seg.start().approx_eq(body.segment(p).unwrap().end())),
            }
        }
    }

    #[test]
    fn test_construction_positions() {
        let body = sample_body();
        assert_eq!(body.segment_count(), 5);
        assert_tree_consistent(&body);

        let hand = body.segment_by_name("hand").unwrap();
        assert!(hand.start().approx_eq(DVec2::new(30.0, 310.0)));
        assert!(hand.end().approx_eq(DVec2::new(40.0, 310.0)));
        let roots: Vec<_> = body.roots().collect();
        assert_eq!(roots, vec![SegmentId(0), SegmentId(4)]);
    }

    #[test]
    fn test_duplicate_segment_is_rejected() {
        let mut body = sample_body();
        let before = body.clone();
        let err = body.add_segment("arm", 5.0, 0.0, AngleLimits::FULL).unwrap_err();
        assert_eq!(err, BodyError::DuplicateSegment("arm".into()));
        assert_eq!(body, before);
    }

    #[test]
    fn test_connect_errors_leave_body_unchanged() {
        let mut body = sample_body();
        let before = body.clone();

        assert_eq!(
            body.connect_segments("hip", "tail"),
            Err(BodyError::UnknownSegment("tail".into()))
        );
        assert_eq!(
            body.connect_segments("foot", "foot"),
            Err(BodyError::SelfConnection("foot".into()))
        );
        assert!(matches!(
            body.connect_segments("foot", "arm"),
            Err(BodyError::AlreadyConnected { .. })
        ));
        assert!(matches!(
            body.connect_segments("hand", "hip"),
            Err(BodyError::WouldCycle { .. })
        ));
        assert_eq!(body, before);
    }

    #[test]
    fn test_rotation_propagates_to_descendants() {
        let mut body = sample_body();
        let spine = body.find("spine").unwrap();
        assert!(body.rotate_segment(spine, FRAC_PI_2));
        assert_tree_consistent(&body);

        // spine now points right from the top of the hip
        let spine_end = body.segment(spine).unwrap().end();
        assert!(spine_end.approx_eq(DVec2::new(40.0, 350.0)));
        assert!(body.segment_by_name("arm").unwrap().start().approx_eq(spine_end));
    }

    #[test]
    fn test_clamped_rotation_still_propagates() {
        let mut body = sample_body();
        let arm = body.find("arm").unwrap();
        assert!(!body.rotate_segment(arm, 5.0));
        let arm_seg = body.segment(arm).unwrap();
        assert!(arm_seg.angle() == 0.0 || arm_seg.angle() == PI);
        assert_tree_consistent(&body);
    }

    #[test]
    fn test_rotate_missing_segment() {
        let mut body = sample_body();
        assert!(!body.rotate_segment(SegmentId(42), 0.1));
        assert!(!body.rotate_segment_to(SegmentId(42), 0.1));
        assert!(!body.rotate_segment_by_name("tail", 0.1));
        assert_eq!(body, sample_body());

        assert!(body.rotate_segment_to_by_name("arm", FRAC_PI_2));
        assert!(body.segment_by_name("hand").unwrap().start().approx_eq(DVec2::new(0.0, 340.0)));
    }

    #[test]
    fn test_move_base_translates_rigidly() {
        let mut body = sample_body();
        let before = body.clone();
        let displacement = DVec2::new(25.0, -3.0);
        body.move_base_to(before.base_position() + displacement);

        for (old, new) in before.segments().iter().zip(body.segments()) {
            assert!((new.start() - old.start()).approx_eq(displacement));
            assert!((new.end() - old.end()).approx_eq(displacement));
            assert_eq!(new.angle(), old.angle());
        }
        assert_tree_consistent(&body);
    }

    #[test]
    fn test_ground_contacts() {
        let mut body = sample_body();
        // hip start + foot start + foot end
        assert_eq!(body.count_ground_contacts(), 3);
        assert!(body.has_minimum_ground_contacts(3));
        assert!(!body.has_minimum_ground_contacts(4));
        assert_eq!(body.segments_on_ground(), vec!["hip", "foot"]);

        body.move_base_to(DVec2::new(0.0, 300.0));
        assert_eq!(body.count_ground_contacts(), 0);

        body.set_ground_tolerance(100.0);
        assert!(body.count_ground_contacts() >= 3);
    }

    #[test]
    fn test_touching_only_counts_endpoints() {
        let body = sample_body();
        // covers the hand end and the spine/arm joint region
        let target = Circle::new(DVec2::new(40.0, 310.0), 3.0);
        assert_eq!(body.segments_touching_object(&target), vec![SegmentId(3)]);
        assert!(body.can_reach_object(&target, 1));
        assert!(!body.can_reach_object(&target, 2));

        // crosses the middle of the arm, which has a child
        let mid_arm = Circle::new(DVec2::new(15.0, 312.0), 3.0);
        assert!(body.segments_touching_object(&mid_arm).is_empty());

        // the flat foot is a leaf touched along its length
        let on_foot = Circle::new(DVec2::new(10.0, 402.0), 3.0);
        assert_eq!(body.segments_touching_object(&on_foot), vec![SegmentId(4)]);
    }

    #[test]
    fn test_reset_pose_restores_rest_angles() {
        let mut body = sample_body();
        let spine = body.find("spine").unwrap();
        let arm = body.find("arm").unwrap();
        body.rotate_segment(spine, 0.7);
        body.rotate_segment(arm, 1.1);
        body.reset_pose();
        assert_eq!(body, sample_body());
    }

    #[test]
    fn test_endpoint_and_lines() {
        let body = sample_body();
        assert!(body.is_endpoint(body.find("hand").unwrap()));
        assert!(body.is_endpoint(body.find("foot").unwrap()));
        assert!(!body.is_endpoint(body.find("arm").unwrap()));
        assert!(!body.is_endpoint(SegmentId(99)));
        assert_eq!(body.segment_lines().len(), 5);
        assert_eq!(body.children(SegmentId(99)), &[] as &[SegmentId]);
    }

    proptest! {
        #[test]
        fn prop_tree_stays_consistent(
            ops in prop::collection::vec((0usize..5, -7.0f64..7.0, -50.0f64..50.0), 1..40)
        ) {
            let mut body = sample_body();
            for (index, delta, shift) in ops {
                body.rotate_segment(SegmentId(index), delta);
                let base = body.base_position();
                body.move_base_to(base + DVec2::new(shift, 0.0));
            }
            for id in body.segment_ids() {
                let seg = body.segment(id).unwrap();
                prop_assert!(seg.limits().contains(seg.angle()));
                if let Some(p) = seg.parent() {
                    prop_assert!(seg.start().approx_eq(body.segment(p).unwrap().end()));
                }
            }
        }
    }
}
