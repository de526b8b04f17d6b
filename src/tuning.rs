//! Data-driven game balance
//!
//! Every number that shapes how the game plays lives here so a host can
//! override it (e.g. from a JSON blob) without touching the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::difficulty::{Difficulty, difficulty_for};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player horizontal speed (px/s)
    pub player_speed: f32,
    pub player_size: Vec2,

    pub player_bullet_size: Vec2,
    /// Player bullet speed, upward (px/s)
    pub player_bullet_speed: f32,
    pub enemy_bullet_size: Vec2,
    /// Enemy bullet speed, downward (px/s)
    pub enemy_bullet_speed: f32,

    /// Enemy speed at level 1 (px/s)
    pub base_enemy_speed: f32,
    /// Seconds between enemy shots at level 1
    pub base_fire_interval: f32,
    /// Enemies never fire faster than this
    pub min_fire_interval: f32,
    /// Fractional speed increase per level
    pub speed_step: f32,
    /// Fire interval reduction per level (seconds)
    pub fire_interval_step: f32,
    /// Grid drop when it reaches an edge (px)
    pub enemy_drop: f32,
    /// Distance from the viewport edge that turns the grid around (px)
    pub edge_margin: f32,

    pub enemy_points: u64,
    pub target_points: u64,
    /// Multiplied by the level just cleared
    pub level_bonus: u64,

    /// Rhythm note spacing at level 1 with a full grid (ms)
    pub rhythm_base_interval_ms: f64,
    /// Rhythm never plays faster than this (ms)
    pub rhythm_min_interval_ms: f64,

    /// Minimum time between tap-to-fire shots (ms)
    pub tap_debounce_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 500.0,
            player_size: Vec2::new(40.0, 24.0),

            player_bullet_size: Vec2::new(4.0, 10.0),
            player_bullet_speed: 600.0,
            enemy_bullet_size: Vec2::new(4.0, 12.0),
            enemy_bullet_speed: 300.0,

            base_enemy_speed: 100.0,
            base_fire_interval: 1.0,
            min_fire_interval: 0.2,
            speed_step: 0.2,
            fire_interval_step: 0.15,
            enemy_drop: 30.0,
            edge_margin: 20.0,

            enemy_points: 100,
            target_points: 50,
            level_bonus: 500,

            rhythm_base_interval_ms: 500.0,
            rhythm_min_interval_ms: 100.0,

            tap_debounce_ms: 150.0,
        }
    }
}

impl Tuning {
    /// Enemy speed and fire interval for a level
    pub fn difficulty(&self, level: u32) -> Difficulty {
        difficulty_for(
            level,
            self.base_enemy_speed,
            self.base_fire_interval,
            self.speed_step,
            self.fire_interval_step,
            self.min_fire_interval,
        )
    }

    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
