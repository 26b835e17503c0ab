//! Deterministic simulation module
//!
//! All physics lives here. This module must stay pure and deterministic:
//! - The frame is the unit of time (one `advance` call per frame, no dt)
//! - Seeded RNG only
//! - Stable insertion-order iteration
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod step;

pub use collision::resolve_pair;
pub use state::{Ball, DragState, LoopPhase, World};
pub use step::{Bounds, advance};
