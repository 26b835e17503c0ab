//! Pairwise ball collision resolution
//!
//! Equal-mass elastic exchange: both velocities are rotated into the contact
//! frame, exchanged, and rotated back, then the pair is pushed apart to exact
//! contact. All radii are equal, so the delta between the top-left anchors is
//! also the delta between the centers and the math runs on anchors directly.

use glam::Vec2;

use super::state::Ball;
use crate::{cartesian_to_polar, polar_to_cartesian};

/// Center distance below which a pair is treated as coincident and skipped:
/// there is no line of centers to exchange along or push apart on.
pub const COINCIDENT_EPSILON: f32 = 1e-6;

/// Resolve one directed overlap between `balls[i]` and `balls[j]`.
///
/// The frame update evaluates both (i, j) and (j, i); the first resolution
/// separates the pair to exact contact, so the mirrored evaluation normally
/// finds no overlap and returns without touching anything.
pub fn resolve_pair(balls: &mut [Ball], i: usize, j: usize) {
    debug_assert_ne!(i, j);
    let (a, b) = pair_mut(balls, i, j);
    collide(a, b);
}

/// Split two mutable entities out of the slice.
fn pair_mut(balls: &mut [Ball], i: usize, j: usize) -> (&mut Ball, &mut Ball) {
    if i < j {
        let (head, tail) = balls.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = balls.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

fn collide(a: &mut Ball, b: &mut Ball) {
    let delta = a.pos - b.pos;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;

    if distance >= min_distance {
        return;
    }
    if distance <= COINCIDENT_EPSILON {
        // Coincident centers: skip the pair rather than divide by zero.
        return;
    }

    // Rotate both velocities into the contact frame, swap them, rotate back.
    let angle = delta.y.atan2(delta.x);
    let rot = Vec2::from_angle(angle);
    let (speed_a, dir_a) = cartesian_to_polar(a.vel);
    let (speed_b, dir_b) = cartesian_to_polar(b.vel);
    a.vel = rot.rotate(polar_to_cartesian(speed_b, dir_b - angle));
    b.vel = rot.rotate(polar_to_cartesian(speed_a, dir_a - angle));

    // Push each ball half the overlap along the line of centers, in
    // opposite directions, leaving the pair at exact contact.
    let overlap = min_distance - distance;
    let correction = (overlap / 2.0) * (delta / distance);
    a.pos += correction;
    b.pos -= correction;
}
