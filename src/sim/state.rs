//! Game state and entity records
//!
//! Entities are plain data; `tick` mutates them. Dead enemies stay in the
//! grid until the next batch so iteration order and grid roles are stable.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::geometry::{Rect, Viewport};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Instructions screen, waiting for any key or tap
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended; showing the high score table
    GameOver,
    /// Run ended with a qualifying score; capturing initials
    NameEntry,
}

impl GamePhase {
    /// Both end-of-run phases
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::NameEntry)
    }
}

/// Things that happened during a tick that the session must react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PlayerFired,
    EnemyDestroyed,
    TargetDestroyed { handle: TargetHandle },
    PlayerDestroyed,
    LevelCleared { level: u32 },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal speed (px/s)
    pub speed: f32,
}

impl Player {
    pub fn new(viewport: Viewport, tuning: &Tuning) -> Self {
        let size = tuning.player_size;
        Self {
            pos: Vec2::new(
                (viewport.width - size.x) / 2.0,
                viewport.height - PLAYER_BOTTOM_OFFSET,
            ),
            size,
            speed: tuning.player_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Re-anchor to the bottom of a resized viewport
    pub fn anchor(&mut self, viewport: Viewport) {
        self.pos.y = viewport.height - PLAYER_BOTTOM_OFFSET;
        self.clamp(viewport);
    }

    pub fn clamp(&mut self, viewport: Viewport) {
        self.pos.x = self.pos.x.min(viewport.width - self.size.x).max(0.0);
    }

    /// Move toward a touch point at a capped speed, stopping once close enough
    pub fn approach(&mut self, touch_x: f32, dt: f32) {
        let target = touch_x - self.size.x / 2.0;
        let diff = target - self.pos.x;
        if diff.abs() > TOUCH_SNAP_DISTANCE {
            let step = self.speed * TOUCH_SPEED_FACTOR * dt;
            self.pos.x += diff.signum() * diff.abs().min(step);
        }
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical speed; negative travels up
    pub vel_y: f32,
    pub owner: Owner,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// One tile of the mosaic grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
    pub row: usize,
    pub col: usize,
    /// Region of the shared image this enemy shows
    pub sample: Rect,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Explosion debris
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub color: &'static str,
    pub size: f32,
}

/// Opaque id the host uses to find a page element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetHandle(pub u32);

/// Snapshot of a page element that can be shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTarget {
    pub handle: TargetHandle,
    /// Bounding box measured when the snapshot was taken
    pub rect: Rect,
    pub alive: bool,
}

/// Grid shape for a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
    pub padding: f32,
    pub tile: f32,
    pub origin: Vec2,
}

impl GridLayout {
    pub fn for_viewport(viewport: Viewport) -> Self {
        let narrow = viewport.is_narrow();
        let cols = if narrow { 4 } else { 6 };
        let rows = if narrow { 5 } else { 6 };
        let padding = if narrow { 6.0 } else { 10.0 };

        let max_width = viewport.width * GRID_WIDTH_FRACTION;
        let tile = ((max_width - (cols - 1) as f32 * padding) / cols as f32)
            .min(MAX_ENEMY_SIZE)
            .floor()
            .max(1.0);
        let grid_width = cols as f32 * tile + (cols - 1) as f32 * padding;

        Self {
            cols,
            rows,
            padding,
            tile,
            origin: Vec2::new((viewport.width - grid_width) / 2.0, GRID_TOP),
        }
    }

    /// Region of an image of `image_size` shown by the tile at (row, col)
    pub fn sample(&self, image_size: Vec2, row: usize, col: usize) -> Rect {
        let w = image_size.x / self.cols as f32;
        let h = image_size.y / self.rows as f32;
        Rect::new(col as f32 * w, row as f32 * h, w, h)
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub viewport: Viewport,
    pub tuning: Tuning,

    pub player: Player,
    /// Player-fired bullets
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    /// Layout the current batch was generated with
    pub grid: GridLayout,
    pub particles: Vec<Particle>,
    pub targets: Vec<PageTarget>,

    pub score: u64,
    pub level: u32,
    /// Seconds spent on the ready screen
    pub ready_time: f32,
    /// Seconds of play
    pub game_time: f32,
    /// `game_time` when the current level began
    pub level_start_time: f32,
    /// +1 moving right, -1 moving left
    pub enemy_direction: f32,
    pub difficulty: Difficulty,
    /// Seconds since the last enemy shot
    pub enemy_fire_timer: f32,

    /// Natural size of the mosaic image, once known
    pub image_size: Option<Vec2>,

    /// Events produced since the session last drained them
    pub events: Vec<GameEvent>,

    pub(crate) rng: Pcg32,
}

impl GameState {
    pub fn new(viewport: Viewport, tuning: Tuning, seed: u64) -> Self {
        Self {
            phase: GamePhase::Ready,
            viewport,
            player: Player::new(viewport, &tuning),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            grid: GridLayout::for_viewport(viewport),
            particles: Vec::new(),
            targets: Vec::new(),
            score: 0,
            level: 1,
            ready_time: 0.0,
            game_time: 0.0,
            level_start_time: 0.0,
            enemy_direction: 1.0,
            difficulty: tuning.difficulty(1),
            enemy_fire_timer: 0.0,
            image_size: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    /// Non-empty batch with every enemy dead
    pub fn grid_cleared(&self) -> bool {
        !self.enemies.is_empty() && self.enemies.iter().all(|e| !e.alive)
    }

    /// Recompute enemy speed and fire interval; the grid starts moving right again
    pub fn apply_level_difficulty(&mut self) {
        self.difficulty = self.tuning.difficulty(self.level);
        self.enemy_direction = 1.0;
    }

    /// Image size used for sampling (fallback until the image has loaded)
    pub fn mosaic_size(&self) -> Vec2 {
        self.image_size.unwrap_or(Vec2::splat(FALLBACK_IMAGE_SIZE))
    }

    /// Record the image's natural size and resample every enemy tile
    pub fn set_image_size(&mut self, size: Vec2) {
        self.image_size = Some(size);
        let layout = self.grid;
        for enemy in &mut self.enemies {
            enemy.sample = layout.sample(size, enemy.row, enemy.col);
        }
    }

    /// Fit a running game to a new viewport: the player is re-anchored to
    /// the bottom and enemy columns are spread over the new width.
    pub fn resize(&mut self, viewport: Viewport) {
        let old = self.viewport;
        self.viewport = viewport;
        self.player.anchor(viewport);

        if old.width <= 0.0 {
            return;
        }
        let scale = viewport.width / old.width;
        for enemy in &mut self.enemies {
            let center = (enemy.pos.x + enemy.size.x / 2.0) * scale;
            enemy.pos.x = (center - enemy.size.x / 2.0)
                .min(viewport.width - enemy.size.x)
                .max(0.0);
        }
    }

    /// Move into game over once; later calls are ignored
    pub fn trigger_game_over(&mut self) {
        if self.phase.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::PlayerDestroyed);
    }

    /// Take the pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_starts_centered_at_bottom() {
        let player = Player::new(Viewport::new(800.0, 600.0), &Tuning::default());
        assert_eq!(player.pos, Vec2::new(380.0, 540.0));
    }

    #[test]
    fn test_player_approach_snaps_when_close() {
        let mut player = Player::new(Viewport::new(800.0, 600.0), &Tuning::default());
        let before = player.pos.x;
        // Target center sits 4px away: inside the snap distance, no movement
        player.approach(before + 20.0 + 4.0, 0.016);
        assert_eq!(player.pos.x, before);
    }

    #[test]
    fn test_player_approach_is_capped() {
        let mut player = Player::new(Viewport::new(800.0, 600.0), &Tuning::default());
        let before = player.pos.x;
        player.approach(0.0, 0.1);
        // 500 * 1.5 * 0.1 = 75
        assert!((before - player.pos.x - 75.0).abs() < 1e-3);
    }

    #[test]
    fn test_grid_layout_wide_and_narrow() {
        let wide = GridLayout::for_viewport(Viewport::new(1200.0, 800.0));
        assert_eq!((wide.cols, wide.rows), (6, 6));
        assert_eq!(wide.tile, 50.0);
        assert_eq!(wide.origin.y, GRID_TOP);

        let narrow = GridLayout::for_viewport(Viewport::new(360.0, 640.0));
        assert_eq!((narrow.cols, narrow.rows), (4, 5));
        // (216 - 18) / 4 = 49.5 -> 49
        assert_eq!(narrow.tile, 49.0);
    }

    #[test]
    fn test_grid_is_centered() {
        let vp = Viewport::new(1000.0, 800.0);
        let layout = GridLayout::for_viewport(vp);
        let width = layout.cols as f32 * layout.tile + (layout.cols - 1) as f32 * layout.padding;
        assert!((layout.origin.x * 2.0 + width - vp.width).abs() < 1e-3);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut state = GameState::new(Viewport::default(), Tuning::default(), 1);
        state.phase = GamePhase::Playing;
        state.trigger_game_over();
        state.trigger_game_over();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.drain_events(), vec![GameEvent::PlayerDestroyed]);
    }

    #[test]
    fn test_grid_cleared_requires_enemies() {
        let state = GameState::new(Viewport::default(), Tuning::default(), 1);
        assert!(!state.grid_cleared());
    }
}
