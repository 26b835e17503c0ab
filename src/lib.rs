//! Ball Pit - a bouncing-ball playground
//!
//! Click the page to drop a ball, grab a ball to drag it around, release to
//! let it fall. Physics advances one step per animation frame.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity, wall bounces, ball collisions, drag)
//! - `settings`: Tunable physics parameters persisted in LocalStorage
//!
//! The DOM front end (ball elements, input handlers, frame driver) lives in
//! the binary crate.

pub mod settings;
pub mod sim;

pub use settings::Tuning;
pub use sim::World;

use glam::Vec2;

/// Playground constants
pub mod consts {
    /// Ball radius in px. Identical for every ball; the collision code
    /// compares anchor deltas against summed radii and relies on this.
    pub const BALL_RADIUS: f32 = 25.0;
    /// Hard cap on the ball count; spawns beyond it are silently dropped.
    pub const MAX_BALLS: usize = 999;

    /// Downward acceleration in px/frame^2.
    pub const GRAVITY: f32 = 0.2;
    /// Fraction of vertical speed kept by a floor or ceiling bounce.
    pub const BOUNCE_DAMPING: f32 = 0.7;
    /// Per-component speed below which a ball snaps to rest.
    pub const STOP_THRESHOLD: f32 = 0.1;

    /// Gap reserved above the footer, in px.
    pub const FLOOR_CLEARANCE: f32 = 90.0;
    /// Spawn velocity components are drawn from [-SPAWN_SPEED, SPAWN_SPEED).
    pub const SPAWN_SPEED: f32 = 2.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(v: Vec2) -> (f32, f32) {
    (v.length(), v.y.atan2(v.x))
}
