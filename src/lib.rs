//! Page Invaders - a Space Invaders easter egg for a web page
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, difficulty, level progression)
//! - `session`: Phase state machine wiring input, simulation, audio and page
//! - `renderer`: 2D canvas rendering of every phase
//! - `audio`: Procedural sound cues and the background rhythm
//! - `platform`: Host capabilities (page targets, trigger, timers, storage)
//! - `persistence`: Key/value storage contract
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod input;
pub mod name_entry;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Distance from the bottom of the viewport to the player's top edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;

    /// Enemy grid top edge
    pub const GRID_TOP: f32 = 80.0;
    /// Largest enemy tile edge
    pub const MAX_ENEMY_SIZE: f32 = 50.0;
    /// Fraction of the viewport width the grid may use
    pub const GRID_WIDTH_FRACTION: f32 = 0.6;
    /// Viewports narrower than this get the compact grid
    pub const NARROW_VIEWPORT: f32 = 500.0;
    /// Sample size used for the mosaic until the image reports its own
    pub const FALLBACK_IMAGE_SIZE: f32 = 300.0;

    /// Particles per explosion
    pub const EXPLOSION_PARTICLES: usize = 10;
    /// Particle lifetime in seconds
    pub const PARTICLE_LIFE: f32 = 0.5;
    /// Fastest a particle can leave an explosion (px/s)
    pub const PARTICLE_MAX_SPEED: f32 = 100.0;

    /// Page elements smaller than this (either edge) are not targets
    pub const MIN_TARGET_SIZE: f32 = 10.0;

    /// Touch drag moves the ship at this multiple of its keyboard speed
    pub const TOUCH_SPEED_FACTOR: f32 = 1.5;
    /// Touch drag stops approaching once this close
    pub const TOUCH_SNAP_DISTANCE: f32 = 5.0;

    /// Level banner duration (seconds)
    pub const LEVEL_BANNER_SECS: f32 = 2.0;
    /// Level banner fades during this final stretch (seconds)
    pub const LEVEL_BANNER_FADE_SECS: f32 = 0.5;
    /// Controls hint duration at the start of play (seconds)
    pub const CONTROLS_HINT_SECS: f32 = 4.0;

    /// High score table size
    pub const MAX_HIGH_SCORES: usize = 5;

    /// Colors
    pub const GREEN: &str = "#00ff00";
    pub const DARK_GREEN: &str = "#005500";
    pub const CYAN: &str = "#22d3ee";
    pub const DARK_CYAN: &str = "#005555";
    pub const WHITE: &str = "#ffffff";
    pub const RED: &str = "#ff0000";
    pub const YELLOW: &str = "#ffff00";
    pub const GREY: &str = "#aaaaaa";
}
