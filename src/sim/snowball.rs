//! Snowball throwing
//!
//! The thrower solves for a launch velocity once, then the projectile flies
//! under gravity until it lands on the ground or hits the target. Ground is
//! checked before the target on every step.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::circle::Circle;
use crate::journal::Journal;
use crate::settings::SnowballConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThrowPhase {
    /// Waiting to be thrown
    #[default]
    Idle,
    /// In flight
    Active,
    HitTarget,
    HitGround,
}

impl ThrowPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ThrowPhase::HitTarget | ThrowPhase::HitGround)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThrowPhase::Idle => "Idle",
            ThrowPhase::Active => "Active",
            ThrowPhase::HitTarget => "HitTarget",
            ThrowPhase::HitGround => "HitGround",
        }
    }
}

/// Launch velocity that carries a projectile from `from` to `to`.
///
/// Time of flight comes from the horizontal offset alone,
/// `t = sqrt(2|dx| / |g|)`, and the vertical component is chosen so the
/// projectile arrives at `to.y` after `t`. Zero horizontal offset or zero
/// gravity has no flight time and yields a zero velocity.
pub fn launch_velocity(from: DVec2, to: DVec2, gravity: f64) -> DVec2 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 || gravity == 0.0 || !dx.is_finite() || !gravity.is_finite() {
        return DVec2::ZERO;
    }
    let time = (2.0 * dx.abs() / gravity.abs()).sqrt();
    DVec2::new(dx / time, -gravity * time / 2.0 + dy / time)
}

#[derive(Debug)]
pub struct SnowballStrategy {
    config: SnowballConfig,
    projectile: Circle,
    phase: ThrowPhase,
    /// Launch position and velocity already set
    prepared: bool,
    journal: Journal,
}

impl SnowballStrategy {
    pub fn new(config: SnowballConfig) -> Self {
        let projectile = Circle::new(DVec2::ZERO, config.radius);
        Self {
            config,
            projectile,
            phase: ThrowPhase::Idle,
            prepared: false,
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

    pub fn config(&self) -> &SnowballConfig {
        &self.config
    }

    pub fn phase(&self) -> ThrowPhase {
        self.phase
    }

    pub fn projectile(&self) -> &Circle {
        &self.projectile
    }

    pub fn position(&self) -> DVec2 {
        self.projectile.center
    }

    pub fn velocity(&self) -> DVec2 {
        self.projectile.velocity()
    }

    pub fn radius(&self) -> f64 {
        self.projectile.radius()
    }

    pub fn is_active(&self) -> bool {
        self.phase == ThrowPhase::Active
    }

    pub fn has_hit_target(&self) -> bool {
        self.phase == ThrowPhase::HitTarget
    }

    pub fn has_hit_ground(&self) -> bool {
        self.phase == ThrowPhase::HitGround
    }

    /// Done only once the snowball has landed somewhere
    pub fn is_sequence_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Back to idle with no launch parameters
    pub fn reset(&mut self) {
        self.projectile = Circle::new(DVec2::ZERO, self.config.radius);
        self.phase = ThrowPhase::Idle;
        self.prepared = false;
    }

    pub fn plan_sequence(&mut self) {
        self.reset();
        self.journal.message("Snowball sequence planned");
    }

    /// Set an explicit launch, replacing the automatic solve
    pub fn prepare_throw(&mut self, position: DVec2, velocity: DVec2) {
        self.set_launch(position, velocity);
        self.phase = ThrowPhase::Idle;
        self.journal.message(format!(
            "Snowball prepared at position {}, {}",
            position.x, position.y
        ));
    }

    fn set_launch(&mut self, position: DVec2, velocity: DVec2) {
        self.projectile.center = position;
        self.projectile
            .set_ballistics(velocity, self.config.gravity);
        self.prepared = true;
    }

    /// Launch from above the body toward the target unless a throw was
    /// prepared, then release. Only does anything while idle.
    pub fn execute_next_move(&mut self, body: &Body, target: &Circle) -> bool {
        if self.phase != ThrowPhase::Idle {
            return false;
        }
        if !self.prepared {
            let position = body.base_position() - DVec2::new(0.0, self.config.launch_height);
            let velocity = launch_velocity(position, target.center, self.config.gravity);
            self.set_launch(position, velocity);
        }
        self.throw_snowball()
    }

    /// Release the snowball from its current position. Returns false if it
    /// is already in flight.
    pub fn throw_snowball(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        if !self.projectile.has_physics() {
            self.projectile
                .set_ballistics(DVec2::ZERO, self.config.gravity);
        }
        self.phase = ThrowPhase::Active;
        self.journal
            .throw(self.projectile.center, self.projectile.velocity());
        log::info!(
            "Snowball thrown from ({:.1}, {:.1})",
            self.projectile.center.x,
            self.projectile.center.y
        );
        true
    }

    /// Advance the flight by `dt` and resolve landing
    pub fn update(&mut self, body: &Body, target: &Circle, dt: f64) {
        if !self.is_active() {
            return;
        }
        self.projectile.step(dt);
        let position = self.projectile.center;

        if self.projectile.is_on_ground(body.ground_level()) {
            self.phase = ThrowPhase::HitGround;
            self.journal.landing(position, false);
        } else if self.projectile.intersects(target) {
            self.phase = ThrowPhase::HitTarget;
            self.journal.landing(position, true);
        }
    }
}
