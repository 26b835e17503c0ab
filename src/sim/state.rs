//! Simulation state and entity types
//!
//! `World` is the explicit simulation context: the ball set, the active drag,
//! the loop phase, the seeded RNG and the tuning. Everything the input layer
//! does to the simulation goes through methods here so the same operations
//! can be driven by DOM events or by tests.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::settings::Tuning;

/// Scheduling phase of the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// No frame scheduled yet (before the first spawn)
    Idle,
    /// Frame loop active
    Running,
    /// Frames suspended while a drag is active; entities retain state
    Paused,
}

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub id: u32,
    /// Top-left anchor of the bounding box, not the center.
    pub pos: Vec2,
    /// Pixels per frame.
    pub vel: Vec2,
    pub radius: f32,
    /// Packed 0xRRGGBB fill color, chosen at spawn.
    pub color: u32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, color: u32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: BALL_RADIUS,
            color,
        }
    }

    /// CSS color string for the view layer.
    pub fn color_css(&self) -> String {
        format!("#{:06x}", self.color & 0x00ff_ffff)
    }
}

/// The active drag. At most one at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Id of the dragged ball
    pub ball_id: u32,
    /// Pointer position minus the ball's anchor, captured at drag start
    pub offset: Vec2,
}

/// The simulation context
#[derive(Debug, Clone)]
pub struct World {
    /// Seed the RNG was created from, kept for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Insertion-ordered ball set. Balls are never removed.
    pub balls: Vec<Ball>,
    pub drag: Option<DragState>,
    pub phase: LoopPhase,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create an empty world with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            tuning,
            balls: Vec::new(),
            drag: None,
            phase: LoopPhase::Idle,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a ball with an explicit anchor, velocity and color.
    ///
    /// Returns the new id, or `None` when the set is at capacity (the
    /// request is silently dropped). The first successful spawn moves the
    /// loop phase from Idle to Running.
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2, color: u32) -> Option<u32> {
        if self.balls.len() >= self.tuning.max_balls {
            return None;
        }
        let id = self.next_entity_id();
        self.balls.push(Ball::new(id, pos, vel, color));
        if self.phase == LoopPhase::Idle {
            self.phase = LoopPhase::Running;
        }
        Some(id)
    }

    /// Spawn a ball centered on the pointer, with randomized velocity and
    /// color drawn from the world RNG.
    pub fn spawn_at_pointer(&mut self, pointer: Vec2) -> Option<u32> {
        if self.balls.len() >= self.tuning.max_balls {
            return None;
        }
        let s = self.tuning.spawn_speed;
        let vel = Vec2::new(
            self.rng.random_range(-s..s),
            self.rng.random_range(-s..s),
        );
        let color = self.rng.random_range(0..=0x00ff_ffffu32);
        // Anchor is top-left, so back off by one radius to center on the pointer.
        self.spawn(pointer - Vec2::splat(BALL_RADIUS), vel, color)
    }

    /// Begin dragging the ball with `id`, capturing the pointer offset and
    /// suspending the loop. Ignored if the id is unknown or a drag is
    /// already active. Returns whether a drag began.
    pub fn begin_drag(&mut self, id: u32, pointer: Vec2) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(ball) = self.balls.iter().find(|b| b.id == id) else {
            return false;
        };
        self.drag = Some(DragState {
            ball_id: id,
            offset: pointer - ball.pos,
        });
        if self.phase == LoopPhase::Running {
            self.phase = LoopPhase::Paused;
        }
        true
    }

    /// Move the dragged ball to follow the pointer. Velocity is untouched.
    /// Returns the new anchor so the caller can update the visual handle.
    pub fn drag_to(&mut self, pointer: Vec2) -> Option<Vec2> {
        let drag = self.drag?;
        let ball = self.balls.iter_mut().find(|b| b.id == drag.ball_id)?;
        ball.pos = pointer - drag.offset;
        Some(ball.pos)
    }

    /// End the drag: the ball keeps its position, its velocity resets to
    /// exactly zero, and the loop resumes. Returns the released id.
    pub fn end_drag(&mut self) -> Option<u32> {
        let drag = self.drag.take()?;
        if let Some(ball) = self.balls.iter_mut().find(|b| b.id == drag.ball_id) {
            ball.vel = Vec2::ZERO;
        }
        self.phase = LoopPhase::Running;
        Some(drag.ball_id)
    }

    pub fn dragged_id(&self) -> Option<u32> {
        self.drag.map(|d| d.ball_id)
    }

    /// Index of the dragged ball in the insertion-ordered set
    pub fn dragged_index(&self) -> Option<usize> {
        let id = self.dragged_id()?;
        self.balls.iter().position(|b| b.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn world() -> World {
        World::new(7, Tuning::default())
    }

    #[test]
    fn test_spawn_centers_on_pointer() {
        let mut w = world();
        let id = w.spawn_at_pointer(Vec2::new(200.0, 150.0)).unwrap();
        let ball = &w.balls[0];
        assert_eq!(ball.id, id);
        assert_eq!(ball.pos, Vec2::new(175.0, 125.0));
        assert_eq!(ball.radius, 25.0);
    }

    #[test]
    fn test_spawn_velocity_within_bounds() {
        let mut w = world();
        for i in 0..50 {
            w.spawn_at_pointer(Vec2::new(i as f32, 0.0));
        }
        for ball in &w.balls {
            assert!(ball.vel.x >= -2.0 && ball.vel.x < 2.0);
            assert!(ball.vel.y >= -2.0 && ball.vel.y < 2.0);
            assert!(ball.color <= 0x00ff_ffff);
        }
    }

    #[test]
    fn test_spawn_cap_silently_drops() {
        let mut w = world();
        w.tuning.max_balls = 3;
        for i in 0..5 {
            let got = w.spawn_at_pointer(Vec2::new(i as f32 * 100.0, 50.0));
            assert_eq!(got.is_some(), i < 3);
        }
        assert_eq!(w.ball_count(), 3);
        // Ids stay dense; dropped spawns do not burn ids.
        assert_eq!(
            w.balls.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_first_spawn_starts_loop() {
        let mut w = world();
        assert_eq!(w.phase, LoopPhase::Idle);
        w.spawn_at_pointer(Vec2::new(100.0, 100.0));
        assert_eq!(w.phase, LoopPhase::Running);
        // A second spawn leaves the phase alone.
        w.spawn_at_pointer(Vec2::new(300.0, 100.0));
        assert_eq!(w.phase, LoopPhase::Running);
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut w = world();
        let id = w.spawn(Vec2::new(100.0, 100.0), Vec2::new(1.5, -0.5), 0xff0000).unwrap();

        assert!(w.begin_drag(id, Vec2::new(110.0, 120.0)));
        assert_eq!(w.phase, LoopPhase::Paused);
        assert_eq!(
            w.drag,
            Some(DragState {
                ball_id: id,
                offset: Vec2::new(10.0, 20.0),
            })
        );

        let pos = w.drag_to(Vec2::new(310.0, 320.0)).unwrap();
        assert_eq!(pos, Vec2::new(300.0, 300.0));
        assert_eq!(w.balls[0].pos, pos);
        // Dragging never touches velocity.
        assert_eq!(w.balls[0].vel, Vec2::new(1.5, -0.5));

        let released = w.end_drag();
        assert_eq!(released, Some(id));
        assert_eq!(w.balls[0].vel, Vec2::ZERO);
        assert_eq!(w.phase, LoopPhase::Running);
        assert!(w.drag.is_none());
    }

    #[test]
    fn test_second_drag_ignored_while_active() {
        let mut w = world();
        let a = w.spawn(Vec2::new(0.0, 0.0), Vec2::ZERO, 0).unwrap();
        let b = w.spawn(Vec2::new(200.0, 0.0), Vec2::ZERO, 0).unwrap();

        assert!(w.begin_drag(a, Vec2::new(10.0, 10.0)));
        assert!(!w.begin_drag(b, Vec2::new(210.0, 10.0)));
        assert_eq!(w.dragged_id(), Some(a));
    }

    #[test]
    fn test_begin_drag_unknown_id_is_ignored() {
        let mut w = world();
        w.spawn(Vec2::new(0.0, 0.0), Vec2::ZERO, 0).unwrap();
        assert!(!w.begin_drag(999, Vec2::ZERO));
        assert!(w.drag.is_none());
        assert_eq!(w.phase, LoopPhase::Running);
    }

    #[test]
    fn test_drag_ops_without_active_drag_are_noops() {
        let mut w = world();
        w.spawn(Vec2::new(50.0, 50.0), Vec2::new(1.0, 1.0), 0).unwrap();
        assert_eq!(w.drag_to(Vec2::new(300.0, 300.0)), None);
        assert_eq!(w.end_drag(), None);
        assert_eq!(w.balls[0].pos, Vec2::new(50.0, 50.0));
        assert_eq!(w.balls[0].vel, Vec2::new(1.0, 1.0));
        assert_eq!(w.phase, LoopPhase::Running);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = World::new(1234, Tuning::default());
        let mut b = World::new(1234, Tuning::default());
        for i in 0..10 {
            let p = Vec2::new(i as f32 * 37.0, i as f32 * 11.0);
            a.spawn_at_pointer(p);
            b.spawn_at_pointer(p);
        }
        assert_eq!(a.balls, b.balls);
    }

    #[test]
    fn test_color_css_formatting() {
        let ball = Ball::new(1, Vec2::ZERO, Vec2::ZERO, 0x0012_abcd);
        assert_eq!(ball.color_css(), "#12abcd");
        let dark = Ball::new(2, Vec2::ZERO, Vec2::ZERO, 0x0000_000f);
        assert_eq!(dark.color_css(), "#00000f");
    }

    proptest! {
        #[test]
        fn prop_capacity_never_exceeded(n in 0usize..1200) {
            let mut w = world();
            for i in 0..n {
                w.spawn_at_pointer(Vec2::new((i % 800) as f32, (i % 500) as f32));
            }
            prop_assert!(w.ball_count() <= MAX_BALLS);
            prop_assert_eq!(w.ball_count(), n.min(MAX_BALLS));
        }

        #[test]
        fn prop_radius_invariant(n in 1usize..64) {
            let mut w = world();
            for i in 0..n {
                w.spawn_at_pointer(Vec2::new(i as f32 * 13.0, i as f32 * 7.0));
            }
            prop_assert!(w.balls.iter().all(|b| b.radius == BALL_RADIUS));
        }
    }
}
