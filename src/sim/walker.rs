//! Walk-and-grab planning
//!
//! The walker plans the whole approach up front: horizontal walk steps that
//! stop `reach_distance` short of the target, one rotation per reaching
//! segment, then a grab. Execution pops one move per call. A move whose
//! precondition fails is consumed anyway; nothing is retried.

use std::collections::VecDeque;

use glam::DVec2;

use super::body::Body;
use super::circle::Circle;
use super::segment::SegmentId;
use crate::consts::{MAX_WALK_MOVES, MIN_WALK_SPEED};
use crate::journal::Journal;
use crate::settings::WalkerConfig;
use crate::vector::VectorExt;
use crate::wrap_angle;

/// Wind-up, throw and follow-through rotations of a throwing motion
const THROW_WIND_UP: f64 = 0.6;
const THROW_RELEASE: f64 = 1.2;
const THROW_FOLLOW_THROUGH: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ReachDirection {
    /// Rotation applied for a reach of `angle` radians.
    /// Up and Right turn the angle down, Down and Left turn it up.
    pub fn signed(self, angle: f64) -> f64 {
        match self {
            ReachDirection::Up | ReachDirection::Right => -angle,
            ReachDirection::Down | ReachDirection::Left => angle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReachDirection::Up => "up",
            ReachDirection::Down => "down",
            ReachDirection::Left => "left",
            ReachDirection::Right => "right",
        }
    }
}

/// One queued action; never changed once planned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Move {
    /// Step toward +x, ending with the base at `destination`
    WalkForward { distance: f64, destination: DVec2 },
    /// Step toward -x, ending with the base at `destination`
    WalkBackward { distance: f64, destination: DVec2 },
    Reach {
        direction: ReachDirection,
        segment: SegmentId,
        /// Magnitude of the rotation, always >= 0
        angle: f64,
    },
    /// Every segment back to its rest angle
    ResetPose,
    Grab,
}

impl Move {
    pub fn is_walk(&self) -> bool {
        matches!(self, Move::WalkForward { .. } | Move::WalkBackward { .. })
    }

    /// Signed rotation of a reach move
    pub fn rotation(&self) -> Option<f64> {
        match self {
            Move::Reach { direction, angle, .. } => Some(direction.signed(*angle)),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct WalkerStrategy {
    config: WalkerConfig,
    moves: VecDeque<Move>,
    completed_moves: usize,
    object_caught: bool,
    journal: Journal,
}

impl WalkerStrategy {
    pub fn new(config: WalkerConfig) -> Self {
        Self {
            config,
            moves: VecDeque::new(),
            completed_moves: 0,
            object_caught: false,
            journal: Journal::disabled(),
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn set_journal(&mut self, journal: Journal) {
        self.journal = journal;
    }

    pub(crate) fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    pub fn walk_speed(&self) -> f64 {
        self.config.walk_speed
    }

    /// Speeds below `MIN_WALK_SPEED` or non-finite ones are ignored
    pub fn set_walk_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed >= MIN_WALK_SPEED {
            self.config.walk_speed = speed;
        } else {
            log::warn!("Ignoring invalid walk speed {speed}");
        }
    }

    /// Remaining moves, front first
    pub fn moves(&self) -> &VecDeque<Move> {
        &self.moves
    }

    pub fn completed_moves(&self) -> usize {
        self.completed_moves
    }

    pub fn has_object_been_caught(&self) -> bool {
        self.object_caught
    }

    pub fn is_sequence_complete(&self) -> bool {
        self.moves.is_empty()
    }

    /// Forget the current plan and any catch
    pub fn reset(&mut self) {
        self.moves.clear();
        self.completed_moves = 0;
        self.object_caught = false;
    }

    // === Planning ===

    /// Plan walking toward `target`, reaching for it and grabbing
    pub fn plan_sequence(&mut self, body: &Body, target: DVec2) {
        self.reset();

        self.journal.message("Planning catch sequence");
        let distance = body.base_position().distance(target);
        self.journal.message(format!("Distance to object: {distance}"));

        let walks = self.add_walking_sequence(body, target);
        self.journal
            .message(format!("Added walking sequence: {walks} moves"));

        let reaches = self.add_reaching_sequence(body, target);
        self.journal
            .message(format!("Added reaching sequence: {reaches} moves"));

        self.journal
            .message(format!("Total planned moves: {}", self.moves.len()));
        log::debug!(
            "Planned {} walk and {} reach moves toward ({}, {})",
            walks,
            reaches,
            target.x,
            target.y
        );
    }

    /// Plan a throwing motion with one arm: wind up, release, follow
    /// through, then return to the rest pose
    pub fn plan_throw_sequence(&mut self, body: &Body, target: DVec2) {
        self.reset();

        self.journal.message("Planning throw sequence");
        let distance = body.base_position().distance(target);
        self.journal.message(format!("Distance to target: {distance}"));

        let Some(arm) = self.throwing_segment(body) else {
            self.journal
                .warning("No suitable segments found for throwing");
            return;
        };

        let reach = |direction, angle| Move::Reach {
            direction,
            segment: arm,
            angle,
        };
        self.moves.extend([
            reach(ReachDirection::Left, THROW_WIND_UP),
            reach(ReachDirection::Right, THROW_RELEASE),
            reach(ReachDirection::Right, THROW_FOLLOW_THROUGH),
            Move::ResetPose,
        ]);

        self.journal.message("Added throwing sequence: 4 moves");
        self.journal
            .message(format!("Total planned moves: {}", self.moves.len()));
    }

    /// First configured reaching segment that is an endpoint, else the first
    /// endpoint of the body
    fn throwing_segment(&self, body: &Body) -> Option<SegmentId> {
        self.config
            .reaching_segments
            .iter()
            .filter_map(|name| body.find(name))
            .find(|&id| body.is_endpoint(id))
            .or_else(|| body.segment_ids().find(|&id| body.is_endpoint(id)))
    }

    /// Horizontal steps of `walk_speed`, the last one truncated so the base
    /// stops exactly `reach_distance` short of the target. Nothing is queued
    /// when the speed is below `MIN_WALK_SPEED` or the walk would need more
    /// than `MAX_WALK_MOVES` steps.
    fn add_walking_sequence(&mut self, body: &Body, target: DVec2) -> usize {
        let start = body.base_position();
        let dx = target.x - start.x;
        let distance = dx.abs() - self.config.reach_distance;
        let speed = self.config.walk_speed;
        if distance <= 0.0 || distance.is_nan() {
            return 0;
        }
        if !speed.is_finite() || speed < MIN_WALK_SPEED {
            self.journal
                .warning(format!("Walk speed too small: {speed}"));
            return 0;
        }
        let steps = (distance / speed).ceil();
        if steps > MAX_WALK_MOVES as f64 {
            self.journal.warning(format!(
                "Walk of {distance} needs {steps} moves, limit is {MAX_WALK_MOVES}"
            ));
            return 0;
        }

        let forward = dx > 0.0;
        let sign = if forward { 1.0 } else { -1.0 };
        let steps = steps as usize;
        let mut covered = 0.0;

        for i in 0..steps {
            let next = ((i + 1) as f64 * speed).min(distance);
            let step = next - covered;
            covered = next;
            let destination = DVec2::new(start.x + sign * covered, start.y);
            self.moves.push_back(if forward {
                Move::WalkForward {
                    distance: step,
                    destination,
                }
            } else {
                Move::WalkBackward {
                    distance: step,
                    destination,
                }
            });
        }
        steps
    }

    /// One reach per configured segment that exists, aiming its current
    /// direction at the target, followed by the grab
    fn add_reaching_sequence(&mut self, body: &Body, target: DVec2) -> usize {
        let mut count = 0;
        for name in &self.config.reaching_segments {
            let Some(id) = body.find(name) else {
                self.journal.warning(format!("Segment not found: {name}"));
                continue;
            };
            let Some(segment) = body.segment(id) else {
                continue;
            };

            let to_target = target - segment.start();
            let delta = wrap_angle(to_target.heading() - segment.angle());
            let direction = match (to_target.x.abs() >= to_target.y.abs(), delta < 0.0) {
                (true, true) => ReachDirection::Right,
                (true, false) => ReachDirection::Left,
                (false, true) => ReachDirection::Up,
                (false, false) => ReachDirection::Down,
            };
            self.moves.push_back(Move::Reach {
                direction,
                segment: id,
                angle: delta.abs(),
            });
            count += 1;
        }
        self.moves.push_back(Move::Grab);
        count
    }

    // === Execution ===

    /// Pop and perform the next move. Returns whether it succeeded; a
    /// failed move is still consumed.
    pub fn execute_next_move(&mut self, body: &mut Body, target: &Circle) -> bool {
        let Some(next) = self.moves.pop_front() else {
            return false;
        };

        let success = match next {
            Move::WalkForward { destination, .. } | Move::WalkBackward { destination, .. } => {
                if body.has_minimum_ground_contacts(self.config.min_ground_contacts) {
                    body.move_base_to(destination);
                    true
                } else {
                    self.journal
                        .warning("Cannot move - insufficient ground contacts");
                    false
                }
            }
            Move::Reach {
                direction,
                segment,
                angle,
            } => {
                if !body.has_minimum_ground_contacts(self.config.min_ground_contacts) {
                    self.journal
                        .warning("Cannot reach - insufficient ground contacts");
                    false
                } else if body.segment(segment).is_none() {
                    self.journal
                        .warning(format!("Segment not found: #{}", segment.index()));
                    false
                } else {
                    log::debug!("Reaching {} by {angle:.3} rad", direction.as_str());
                    body.rotate_segment(segment, direction.signed(angle))
                }
            }
            Move::ResetPose => {
                body.reset_pose();
                true
            }
            Move::Grab => {
                if body.can_reach_object(target, self.config.min_object_contacts) {
                    self.object_caught = true;
                    self.journal.message("Object caught successfully!");
                    true
                } else {
                    self.journal.message("Failed to grab object");
                    false
                }
            }
        };

        self.completed_moves += 1;
        self.journal.message(format!(
            "Completed move {} of {}",
            self.completed_moves,
            self.completed_moves + self.moves.len()
        ));
        success
    }
}
