//! Simulation module
//!
//! All gameplay logic lives here. No rendering, audio or page access:
//! - Variable timestep, every motion scaled by `dt`
//! - Seeded RNG only
//! - Side effects reported as `GameEvent`s for the session to act on

pub mod difficulty;
pub mod geometry;
pub mod state;
pub mod tick;

pub use difficulty::{Difficulty, difficulty_for};
pub use geometry::{Rect, Viewport, intersects};
pub use state::{
    Bullet, Enemy, GameEvent, GamePhase, GameState, GridLayout, Owner, PageTarget, Particle,
    Player, TargetHandle,
};
pub use tick::{TickInput, generate_enemies, spawn_explosion, start_next_level, tick};
