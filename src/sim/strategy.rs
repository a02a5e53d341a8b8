//! Strategy dispatch
//!
//! The two ways of going after a target share one interface: plan, execute
//! one move at a time, and report completion. A throw additionally needs
//! per-tick updates while the snowball is in flight.

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::circle::Circle;
use super::snowball::SnowballStrategy;
use super::walker::WalkerStrategy;
use crate::journal::Journal;
use crate::settings::SimConfig;

/// Which strategy a scenario runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Walk up to the target and grab it
    #[default]
    Walker,
    /// Throw a snowball at the target
    Snowball,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Walker => "Walker",
            Mode::Snowball => "Snowball",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "walker" | "walk" | "catch" => Some(Mode::Walker),
            "snowball" | "throw" => Some(Mode::Snowball),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Strategy {
    Walking(WalkerStrategy),
    Throwing(SnowballStrategy),
}

impl Strategy {
    pub fn new(mode: Mode, config: &SimConfig) -> Self {
        match mode {
            Mode::Walker => Strategy::Walking(WalkerStrategy::new(config.walker.clone())),
            Mode::Snowball => Strategy::Throwing(SnowballStrategy::new(config.snowball.clone())),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Strategy::Walking(_) => Mode::Walker,
            Strategy::Throwing(_) => Mode::Snowball,
        }
    }

    pub fn set_journal(&mut self, journal: Journal) {
        match self {
            Strategy::Walking(walker) => walker.set_journal(journal),
            Strategy::Throwing(snowball) => snowball.set_journal(journal),
        }
    }

    /// Hand the journal over, leaving a disabled one behind
    pub fn take_journal(&mut self) -> Journal {
        match self {
            Strategy::Walking(walker) => std::mem::take(walker.journal_mut()),
            Strategy::Throwing(snowball) => std::mem::take(snowball.journal_mut()),
        }
    }

    pub fn plan_sequence(&mut self, body: &Body, target: &Circle) {
        match self {
            Strategy::Walking(walker) => walker.plan_sequence(body, target.center),
            Strategy::Throwing(snowball) => snowball.plan_sequence(),
        }
    }

    pub fn execute_next_move(&mut self, body: &mut Body, target: &Circle) -> bool {
        match self {
            Strategy::Walking(walker) => walker.execute_next_move(body, target),
            Strategy::Throwing(snowball) => snowball.execute_next_move(body, target),
        }
    }

    pub fn is_sequence_complete(&self) -> bool {
        match self {
            Strategy::Walking(walker) => walker.is_sequence_complete(),
            Strategy::Throwing(snowball) => snowball.is_sequence_complete(),
        }
    }

    /// Per-tick physics; only a thrown snowball has any
    pub fn update(&mut self, body: &Body, target: &Circle, dt: f64) {
        if let Strategy::Throwing(snowball) = self {
            snowball.update(body, target, dt);
        }
    }

    pub fn as_walker(&self) -> Option<&WalkerStrategy> {
        match self {
            Strategy::Walking(walker) => Some(walker),
            Strategy::Throwing(_) => None,
        }
    }

    pub fn as_snowball(&self) -> Option<&SnowballStrategy> {
        match self {
            Strategy::Throwing(snowball) => Some(snowball),
            Strategy::Walking(_) => None,
        }
    }
}
