//! Deterministic simulation module
//!
//! The body model and both strategies live here. Everything in this module
//! is pure and deterministic:
//! - Fixed time step supplied by the caller
//! - Stable iteration order (arena order for roots, insertion order for children)
//! - Gravity applied to velocity before velocity is applied to position
//! - No rendering or platform dependencies

pub mod body;
pub mod builder;
pub mod circle;
pub mod scenario;
pub mod segment;
pub mod snowball;
pub mod strategy;
pub mod walker;

pub use body::{Body, BodyError};
pub use builder::BodyBuilder;
pub use circle::{Ballistics, Circle};
pub use scenario::{Outcome, Scenario};
pub use segment::{AngleLimits, Segment, SegmentId};
pub use snowball::{SnowballStrategy, ThrowPhase, launch_velocity};
pub use strategy::{Mode, Strategy};
pub use walker::{Move, ReachDirection, WalkerStrategy};
