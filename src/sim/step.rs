//! Per-frame simulation update
//!
//! One `advance` call is one frame; velocities are px/frame so there is no
//! dt anywhere. Each ball is updated fully, in insertion order: integrate,
//! gravity, wall bounce, collisions against every other ball, rest snap.
//! Later balls have not moved yet when an earlier ball collides with them,
//! and every pair is visited in both directed orders per frame. That
//! ordering is part of the playground's feel and is pinned by the tests
//! below; do not replace it with a phase-by-phase update.

use glam::Vec2;

use super::collision::resolve_pair;
use super::state::World;
use crate::consts::BALL_RADIUS;

/// Clamp rectangle for one frame, derived from live layout reads.
///
/// `max_x`/`max_y` bound the top-left anchor, so the ball diameter is
/// already subtracted from the viewport extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Bounds for a viewport, reserving the footer strip plus a fixed
    /// clearance at the bottom.
    pub fn from_viewport(viewport: Vec2, footer_height: f32, floor_clearance: f32) -> Self {
        let diameter = BALL_RADIUS * 2.0;
        Self {
            max_x: viewport.x - diameter,
            max_y: viewport.y - footer_height - floor_clearance - diameter,
        }
    }
}

/// Advance every non-dragged ball by one frame.
///
/// The dragged ball is skipped entirely but still participates as a
/// collision partner, so a forced frame during a drag can displace it.
/// The frame driver never schedules frames while a drag is active.
pub fn advance(world: &mut World, bounds: &Bounds) {
    let gravity = world.tuning.gravity;
    let damping = world.tuning.bounce_damping;
    let stop = world.tuning.stop_threshold;
    let dragged = world.dragged_index();

    for i in 0..world.balls.len() {
        if Some(i) == dragged {
            continue;
        }

        {
            let ball = &mut world.balls[i];
            ball.pos += ball.vel;
            ball.vel.y += gravity;

            // Clamp to the crossed edge and invert that component. Vertical
            // bounces lose energy, horizontal bounces do not.
            if ball.pos.x >= bounds.max_x {
                ball.pos.x = bounds.max_x;
                ball.vel.x = -ball.vel.x;
            } else if ball.pos.x <= 0.0 {
                ball.pos.x = 0.0;
                ball.vel.x = -ball.vel.x;
            }
            if ball.pos.y >= bounds.max_y {
                ball.pos.y = bounds.max_y;
                ball.vel.y = -(ball.vel.y * damping);
            } else if ball.pos.y <= 0.0 {
                ball.pos.y = 0.0;
                ball.vel.y = -(ball.vel.y * damping);
            }
        }

        for j in 0..world.balls.len() {
            if j != i {
                resolve_pair(&mut world.balls, i, j);
            }
        }

        let ball = &mut world.balls[i];
        if ball.vel.x.abs() < stop && ball.vel.y.abs() < stop {
            ball.vel = Vec2::ZERO;
        }
    }
}
