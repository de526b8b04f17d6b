//! 2D rendering
//!
//! `Renderer` repaints the whole frame from a `Scene` every tick through the
//! `Canvas` drawing-surface trait. The browser backend is `Canvas2d`; tests
//! draw into a recording canvas.

#[cfg(target_arch = "wasm32")]
mod canvas2d;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2d;

use glam::Vec2;

use crate::consts::*;
use crate::highscores::HighScoreEntry;
use crate::name_entry::{NAME_LEN, NameEntry, NameEntryLayout};
use crate::sim::{GamePhase, GameState, Rect};

/// Font family used for all text
pub const FONT_FAMILY: &str = "\"Courier New\", monospace";

const BACKDROP: &str = "rgba(0, 0, 0, 0.85)";
const BOX_BACKDROP: &str = "rgba(0, 0, 0, 0.7)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
}

impl Baseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Baseline::Top => "top",
            Baseline::Middle => "middle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub align: Align,
    pub baseline: Baseline,
}

impl TextStyle {
    /// Centered, vertically middle
    pub fn centered(size: f32, bold: bool) -> Self {
        Self {
            size,
            bold,
            align: Align::Center,
            baseline: Baseline::Middle,
        }
    }

    /// CSS font shorthand
    pub fn font(&self) -> String {
        let weight = if self.bold { "bold " } else { "" };
        format!("{weight}{}px {FONT_FAMILY}", self.size)
    }
}

/// A small repeating texture: one painted rect on a transparent tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternTile {
    pub width: u32,
    pub height: u32,
    pub paint: Rect,
    pub color: &'static str,
}

/// Faint green line every 4px
pub const SCANLINES: PatternTile = PatternTile {
    width: 1,
    height: 4,
    paint: Rect {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    },
    color: "rgba(0, 20, 0, 0.1)",
};

/// Drawing surface
pub trait Canvas {
    /// Backend handle for a repeating texture
    type Pattern;

    fn clear(&mut self, width: f32, height: f32);
    /// Global opacity for subsequent draws
    fn set_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn fill_polygon(&mut self, points: &[Vec2], color: &str);
    fn fill_text(&mut self, text: &str, pos: Vec2, style: &TextStyle, color: &str);
    /// Draw the `src` region of the mosaic image into `dst`
    fn draw_image(&mut self, src: Rect, dst: Rect);
    fn create_pattern(&mut self, tile: &PatternTile) -> Option<Self::Pattern>;
    fn fill_pattern(&mut self, pattern: &Self::Pattern, rect: Rect);
}

/// Everything one frame shows
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub state: &'a GameState,
    pub high_scores: &'a [HighScoreEntry],
    pub name_entry: &'a NameEntry,
    /// The run's score has been handled (saved or skipped)
    pub score_saved: bool,
    /// Show tap wording instead of keys
    pub touch_device: bool,
    pub reduced_motion: bool,
    pub show_controls_hint: bool,
}

/// Frame painter; owns the canvas and the cached scanline pattern
pub struct Renderer<C: Canvas> {
    canvas: C,
    scanlines: Option<C::Pattern>,
}

impl<C: Canvas> Renderer<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            scanlines: None,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Drop cached textures (session end)
    pub fn invalidate(&mut self) {
        self.scanlines = None;
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Paint a full frame
    pub fn draw(&mut self, scene: &Scene) {
        let state = scene.state;
        let vp = state.viewport;
        self.canvas.clear(vp.width, vp.height);

        if state.phase == GamePhase::Ready {
            self.draw_ready(scene);
            self.draw_scanlines(vp.rect());
            return;
        }

        self.draw_hud(state);
        self.draw_entities(state);
        self.draw_scanlines(vp.rect());
        self.draw_level_banner(state);

        if state.phase.is_over() {
            self.draw_game_over(scene);
        } else if scene.show_controls_hint {
            self.draw_controls_hint(scene);
        }
    }

    fn draw_scanlines(&mut self, area: Rect) {
        if self.scanlines.is_none() {
            self.scanlines = self.canvas.create_pattern(&SCANLINES);
        }
        if let Some(pattern) = &self.scanlines {
            self.canvas.fill_pattern(pattern, area);
        }
    }

    fn draw_ready(&mut self, scene: &Scene) {
        let state = scene.state;
        let vp = state.viewport;
        let narrow = vp.is_narrow();
        let center = Vec2::new(vp.width / 2.0, vp.height / 2.0);
        let c = &mut self.canvas;

        c.fill_rect(vp.rect(), BACKDROP);

        let pulse = if scene.reduced_motion {
            1.0
        } else {
            (state.ready_time * 3.0).sin() * 0.2 + 0.8
        };
        let title = TextStyle::centered(if narrow { 30.0 } else { 52.0 }, true);
        c.set_alpha(pulse);
        c.fill_text(
            "READY PLAYER ONE",
            center + Vec2::new(2.0, -48.0),
            &title,
            DARK_GREEN,
        );
        c.fill_text("READY PLAYER ONE", center + Vec2::new(0.0, -50.0), &title, GREEN);
        c.set_alpha(1.0);

        let instructions = TextStyle::centered(if narrow { 14.0 } else { 20.0 }, false);
        c.fill_text(
            controls_text(scene.touch_device),
            center + Vec2::new(0.0, 15.0),
            &instructions,
            WHITE,
        );

        let blink = scene.reduced_motion || (state.ready_time * 4.0).sin() > 0.0;
        if blink {
            let prompt = if scene.touch_device {
                "TAP TO START"
            } else {
                "PRESS ANY KEY TO START"
            };
            let style = TextStyle::centered(if narrow { 13.0 } else { 18.0 }, false);
            c.fill_text(prompt, center + Vec2::new(0.0, 65.0), &style, GREY);
        }
    }

    fn draw_hud(&mut self, state: &GameState) {
        let c = &mut self.canvas;
        let score = format!("SCORE {:06}", state.score);
        let left = TextStyle {
            size: 32.0,
            bold: true,
            align: Align::Left,
            baseline: Baseline::Top,
        };
        c.fill_text(&score, Vec2::new(22.0, 22.0), &left, DARK_GREEN);
        c.fill_text(&score, Vec2::new(20.0, 20.0), &left, GREEN);

        let level = format!("LEVEL {}", state.level);
        let right = TextStyle {
            align: Align::Right,
            ..left
        };
        let x = state.viewport.width;
        c.fill_text(&level, Vec2::new(x - 18.0, 22.0), &right, DARK_CYAN);
        c.fill_text(&level, Vec2::new(x - 20.0, 20.0), &right, CYAN);
    }

    fn draw_entities(&mut self, state: &GameState) {
        let c = &mut self.canvas;

        if !state.phase.is_over() {
            c.fill_polygon(&ship_outline(state.player.rect()), CYAN);
        }

        let image_ready = state.image_size.is_some();
        for enemy in state.enemies.iter().filter(|e| e.alive) {
            if image_ready {
                c.draw_image(enemy.sample, enemy.rect());
            } else {
                c.fill_rect(enemy.rect(), WHITE);
            }
        }

        for bullet in &state.bullets {
            c.fill_rect(bullet.rect(), GREEN);
        }
        for bullet in &state.enemy_bullets {
            c.fill_rect(bullet.rect(), RED);
        }

        for p in &state.particles {
            c.set_alpha((p.life * 2.0).clamp(0.0, 1.0));
            c.fill_rect(Rect::new(p.pos.x, p.pos.y, p.size, p.size), p.color);
        }
        c.set_alpha(1.0);
    }

    fn draw_level_banner(&mut self, state: &GameState) {
        let Some(alpha) = level_banner_alpha(state) else {
            return;
        };
        let vp = state.viewport;
        let c = &mut self.canvas;
        c.set_alpha(alpha);
        c.fill_rect(
            Rect::new(vp.width / 2.0 - 150.0, vp.height / 2.0 - 50.0, 300.0, 100.0),
            BOX_BACKDROP,
        );
        c.fill_text(
            &format!("LEVEL {}", state.level),
            Vec2::new(vp.width / 2.0, vp.height / 2.0),
            &TextStyle::centered(48.0, true),
            YELLOW,
        );
        c.set_alpha(1.0);
    }

    fn draw_controls_hint(&mut self, scene: &Scene) {
        let Some(alpha) = controls_hint_alpha(scene.state) else {
            return;
        };
        let vp = scene.state.viewport;
        let c = &mut self.canvas;
        c.set_alpha(alpha);
        c.fill_rect(
            Rect::new((vp.width - 400.0) / 2.0, (vp.height - 60.0) / 2.0, 400.0, 60.0),
            BOX_BACKDROP,
        );
        c.fill_text(
            controls_text(scene.touch_device),
            Vec2::new(vp.width / 2.0, vp.height / 2.0),
            &TextStyle::centered(18.0, true),
            WHITE,
        );
        c.set_alpha(1.0);
    }

    fn draw_game_over(&mut self, scene: &Scene) {
        let state = scene.state;
        let vp = state.viewport;
        let center = Vec2::new(vp.width / 2.0, vp.height / 2.0);
        let c = &mut self.canvas;

        c.fill_rect(vp.rect(), BACKDROP);
        c.fill_text(
            "GAME OVER",
            center + Vec2::new(0.0, -140.0),
            &TextStyle::centered(48.0, true),
            RED,
        );
        c.fill_text(
            &format!("SCORE: {}", state.score),
            center + Vec2::new(0.0, -85.0),
            &TextStyle::centered(32.0, true),
            WHITE,
        );
        c.fill_text(
            &format!("LEVEL {}", state.level),
            center + Vec2::new(0.0, -50.0),
            &TextStyle::centered(24.0, false),
            CYAN,
        );

        if state.phase == GamePhase::NameEntry {
            self.draw_name_entry(scene, center);
        } else {
            self.draw_high_scores(scene, center);
        }
    }

    fn draw_name_entry(&mut self, scene: &Scene, center: Vec2) {
        let c = &mut self.canvas;
        c.fill_text(
            "NEW HIGH SCORE!",
            center + Vec2::new(0.0, -30.0),
            &TextStyle::centered(20.0, false),
            YELLOW,
        );
        c.fill_text(
            "ENTER YOUR NAME",
            center,
            &TextStyle::centered(16.0, false),
            GREY,
        );

        let layout = NameEntryLayout::new(scene.state.viewport);
        let letter = TextStyle::centered(36.0, true);
        let arrow = TextStyle::centered(18.0, false);
        for i in 0..NAME_LEN {
            let pos = layout.slot_center(i);
            let active = i == scene.name_entry.cursor();
            // Touch players can tap any slot's arrows, so show them all
            if active || scene.touch_device {
                let shade = if active { GREEN } else { DARK_GREEN };
                c.fill_text("▲", pos + Vec2::new(0.0, -30.0), &arrow, shade);
                c.fill_text("▼", pos + Vec2::new(0.0, 35.0), &arrow, shade);
            }
            let ch = scene.name_entry.char_at(i).to_string();
            c.fill_text(&ch, pos, &letter, if active { GREEN } else { WHITE });
        }

        let submit = layout.submit_rect();
        c.fill_rect(submit, DARK_GREEN);
        c.fill_text(
            "SUBMIT",
            layout.submit_center(),
            &TextStyle::centered(20.0, true),
            GREEN,
        );

        let help = if scene.touch_device {
            "TAP ▲ ▼ to change • TAP SUBMIT when done"
        } else {
            "← → to select • ↑ ↓ to change • ENTER to submit"
        };
        c.fill_text(
            help,
            center + Vec2::new(0.0, 200.0),
            &TextStyle::centered(14.0, false),
            GREY,
        );
    }

    fn draw_high_scores(&mut self, scene: &Scene, center: Vec2) {
        let state = scene.state;
        let c = &mut self.canvas;
        c.fill_text(
            "HIGH SCORES",
            center + Vec2::new(0.0, -20.0),
            &TextStyle::centered(28.0, true),
            YELLOW,
        );

        let row = TextStyle::centered(24.0, true);
        let rows: Vec<(String, bool)> = if scene.high_scores.is_empty() {
            vec![(table_row(1, "---", 0), false)]
        } else {
            scene
                .high_scores
                .iter()
                .take(MAX_HIGH_SCORES)
                .enumerate()
                .map(|(i, e)| {
                    let current = scene.score_saved && e.score == state.score;
                    (table_row(i + 1, &e.name, e.score), current)
                })
                .collect()
        };
        for (i, (text, current)) in rows.iter().enumerate() {
            let pos = center + Vec2::new(0.0, 25.0 + i as f32 * 36.0);
            c.fill_text(text, pos, &row, if *current { GREEN } else { WHITE });
        }

        let exit = if scene.touch_device {
            "Tap anywhere to return"
        } else {
            "Press 'ESC' or 'Q' to return"
        };
        c.fill_text(
            exit,
            center + Vec2::new(0.0, 220.0),
            &TextStyle::centered(18.0, false),
            GREY,
        );
    }
}

fn controls_text(touch: bool) -> &'static str {
    if touch {
        "DRAG to move • TAP to shoot"
    } else {
        "← → to move • SPACE to shoot • ESC to quit"
    }
}

/// "1. AAA  000500"
pub fn table_row(rank: usize, name: &str, score: u64) -> String {
    format!("{rank}. {name}  {score:06}")
}

/// Arrowhead ship filling `r`
pub fn ship_outline(r: Rect) -> [Vec2; 4] {
    [
        Vec2::new(r.x + r.w / 2.0, r.y),
        Vec2::new(r.right(), r.bottom()),
        Vec2::new(r.x + r.w / 2.0, r.bottom() - 5.0),
        Vec2::new(r.x, r.bottom()),
    ]
}

/// Opacity of the "LEVEL n" banner, if it is showing
pub fn level_banner_alpha(state: &GameState) -> Option<f32> {
    let since = state.game_time - state.level_start_time;
    if state.level <= 1 || since >= LEVEL_BANNER_SECS {
        return None;
    }
    let fade_start = LEVEL_BANNER_SECS - LEVEL_BANNER_FADE_SECS;
    Some(if since > fade_start {
        1.0 - (since - fade_start) / LEVEL_BANNER_FADE_SECS
    } else {
        1.0
    })
}

/// Opacity of the controls hint, if it is showing
pub fn controls_hint_alpha(state: &GameState) -> Option<f32> {
    let t = state.game_time;
    if state.phase.is_over() || t >= CONTROLS_HINT_SECS {
        return None;
    }
    let fade_start = CONTROLS_HINT_SECS - 1.0;
    Some(if t > fade_start { 1.0 - (t - fade_start) } else { 1.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::{Viewport, generate_enemies};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Alpha(f32),
        Rect(Rect, String),
        Polygon(Vec<Vec2>, String),
        Text(String, Vec2, String),
        Image(Rect, Rect),
        Pattern,
    }

    #[derive(Default)]
    struct RecordingCanvas {
        ops: Vec<Op>,
        patterns_built: usize,
    }

    impl RecordingCanvas {
        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(t, _, _) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn has_text(&self, text: &str) -> bool {
            self.texts().contains(&text)
        }

        fn text_color(&self, text: &str) -> Option<&str> {
            self.ops.iter().rev().find_map(|op| match op {
                Op::Text(t, _, color) if t == text => Some(color.as_str()),
                _ => None,
            })
        }
    }

    impl Canvas for RecordingCanvas {
        type Pattern = ();

        fn clear(&mut self, _width: f32, _height: f32) {
            self.ops.clear();
            self.ops.push(Op::Clear);
        }
        fn set_alpha(&mut self, alpha: f32) {
            self.ops.push(Op::Alpha(alpha));
        }
        fn fill_rect(&mut self, rect: Rect, color: &str) {
            self.ops.push(Op::Rect(rect, color.to_string()));
        }
        fn fill_polygon(&mut self, points: &[Vec2], color: &str) {
            self.ops.push(Op::Polygon(points.to_vec(), color.to_string()));
        }
        fn fill_text(&mut self, text: &str, pos: Vec2, _style: &TextStyle, color: &str) {
            self.ops
                .push(Op::Text(text.to_string(), pos, color.to_string()));
        }
        fn draw_image(&mut self, src: Rect, dst: Rect) {
            self.ops.push(Op::Image(src, dst));
        }
        fn create_pattern(&mut self, _tile: &PatternTile) -> Option<()> {
            self.patterns_built += 1;
            Some(())
        }
        fn fill_pattern(&mut self, _pattern: &(), _rect: Rect) {
            self.ops.push(Op::Pattern);
        }
    }

    fn state(phase: GamePhase) -> GameState {
        let mut state = GameState::new(Viewport::new(800.0, 600.0), Tuning::default(), 3);
        state.phase = phase;
        state
    }

    fn draw(state: &GameState, scores: &[HighScoreEntry], saved: bool) -> RecordingCanvas {
        let entry = NameEntry::new();
        let scene = Scene {
            state,
            high_scores: scores,
            name_entry: &entry,
            score_saved: saved,
            touch_device: false,
            reduced_motion: false,
            show_controls_hint: true,
        };
        let mut renderer = Renderer::new(RecordingCanvas::default());
        renderer.draw(&scene);
        renderer.into_canvas()
    }

    #[test]
    fn test_ready_screen_hides_game() {
        let mut s = state(GamePhase::Ready);
        generate_enemies(&mut s);
        let canvas = draw(&s, &[], false);
        assert!(canvas.has_text("READY PLAYER ONE"));
        assert!(!canvas.texts().iter().any(|t| t.starts_with("SCORE")));
        assert!(!canvas.ops.iter().any(|op| matches!(op, Op::Polygon(..))));
        assert_eq!(canvas.ops.last(), Some(&Op::Pattern));
    }

    #[test]
    fn test_prompt_blinks() {
        let mut s = state(GamePhase::Ready);
        s.ready_time = 0.2; // sin(0.8) > 0
        assert!(draw(&s, &[], false).has_text("PRESS ANY KEY TO START"));
        s.ready_time = 1.0; // sin(4.0) < 0
        assert!(!draw(&s, &[], false).has_text("PRESS ANY KEY TO START"));
    }

    #[test]
    fn test_hud_and_entities() {
        let mut s = state(GamePhase::Playing);
        s.score = 1250;
        s.game_time = 10.0;
        generate_enemies(&mut s);
        let canvas = draw(&s, &[], false);
        assert!(canvas.has_text("SCORE 001250"));
        assert!(canvas.has_text("LEVEL 1"));
        assert_eq!(canvas.text_color("SCORE 001250"), Some(GREEN));

        let polygons: Vec<_> = canvas
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Polygon(..)))
            .collect();
        assert_eq!(polygons.len(), 1);

        // Image not loaded yet: white placeholders, no image draws
        let placeholders = canvas
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Rect(_, c) if c == WHITE))
            .count();
        assert_eq!(placeholders, s.enemies.len());
        assert!(!canvas.ops.iter().any(|op| matches!(op, Op::Image(..))));
    }

    #[test]
    fn test_mosaic_uses_distinct_samples() {
        let mut s = state(GamePhase::Playing);
        s.game_time = 10.0;
        generate_enemies(&mut s);
        s.set_image_size(Vec2::new(600.0, 600.0));
        s.enemies[0].alive = false;
        let canvas = draw(&s, &[], false);
        let samples: Vec<Rect> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Image(src, _) => Some(*src),
                _ => None,
            })
            .collect();
        assert_eq!(samples.len(), s.enemies.len() - 1);
        for (i, a) in samples.iter().enumerate() {
            assert!(samples[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn test_game_over_table() {
        let mut s = state(GamePhase::GameOver);
        s.score = 300;
        let scores = vec![
            HighScoreEntry {
                name: "ZED".into(),
                score: 900,
            },
            HighScoreEntry {
                name: "YOU".into(),
                score: 300,
            },
        ];
        let canvas = draw(&s, &scores, true);
        assert!(canvas.has_text("GAME OVER"));
        assert!(canvas.has_text("1. ZED  000900"));
        assert_eq!(canvas.text_color("2. YOU  000300"), Some(GREEN));
        assert_eq!(canvas.text_color("1. ZED  000900"), Some(WHITE));
        assert!(canvas.has_text("Press 'ESC' or 'Q' to return"));
        // No ship once the player is dead
        assert!(!canvas.ops.iter().any(|op| matches!(op, Op::Polygon(..))));
    }

    #[test]
    fn test_empty_table_placeholder() {
        let canvas = draw(&state(GamePhase::GameOver), &[], true);
        assert!(canvas.has_text("1. ---  000000"));
    }

    #[test]
    fn test_name_entry_screen() {
        let s = state(GamePhase::NameEntry);
        let canvas = draw(&s, &[], false);
        assert!(canvas.has_text("NEW HIGH SCORE!"));
        assert!(canvas.has_text("▲"));
        assert_eq!(canvas.texts().iter().filter(|t| **t == "A").count(), 3);
        assert!(!canvas.has_text("HIGH SCORES"));
        assert!(canvas.has_text("SUBMIT"));
        assert_eq!(canvas.texts().iter().filter(|t| **t == "▲").count(), 1);
    }

    #[test]
    fn test_touch_name_entry_offers_tap_controls() {
        let s = state(GamePhase::NameEntry);
        let entry = NameEntry::new();
        let scene = Scene {
            state: &s,
            high_scores: &[],
            name_entry: &entry,
            score_saved: false,
            touch_device: true,
            reduced_motion: false,
            show_controls_hint: true,
        };
        let mut renderer = Renderer::new(RecordingCanvas::default());
        renderer.draw(&scene);
        let canvas = renderer.into_canvas();
        assert_eq!(canvas.texts().iter().filter(|t| **t == "▲").count(), 3);
        assert_eq!(canvas.texts().iter().filter(|t| **t == "▼").count(), 3);
        assert!(canvas.has_text("SUBMIT"));
        assert!(!canvas.texts().iter().any(|t| t.contains("ENTER")));
    }

    #[test]
    fn test_level_banner_fades() {
        let mut s = state(GamePhase::Playing);
        s.level = 2;
        s.level_start_time = 10.0;
        s.game_time = 11.0;
        assert_eq!(level_banner_alpha(&s), Some(1.0));
        s.game_time = 11.75;
        assert!((level_banner_alpha(&s).unwrap() - 0.5).abs() < 1e-4);
        s.game_time = 12.0;
        assert_eq!(level_banner_alpha(&s), None);

        s.level = 1;
        s.game_time = 10.5;
        assert_eq!(level_banner_alpha(&s), None);
    }

    #[test]
    fn test_controls_hint_window() {
        let mut s = state(GamePhase::Playing);
        s.game_time = 1.0;
        assert!(draw(&s, &[], false).has_text("← → to move • SPACE to shoot • ESC to quit"));
        s.game_time = 3.5;
        assert!((controls_hint_alpha(&s).unwrap() - 0.5).abs() < 1e-4);
        s.game_time = 4.0;
        assert!(!draw(&s, &[], false).has_text("← → to move • SPACE to shoot • ESC to quit"));
    }

    #[test]
    fn test_scanline_pattern_is_cached() {
        let s = state(GamePhase::Ready);
        let entry = NameEntry::new();
        let scene = Scene {
            state: &s,
            high_scores: &[],
            name_entry: &entry,
            score_saved: false,
            touch_device: true,
            reduced_motion: true,
            show_controls_hint: false,
        };
        let mut renderer = Renderer::new(RecordingCanvas::default());
        renderer.draw(&scene);
        renderer.draw(&scene);
        assert_eq!(renderer.canvas().patterns_built, 1);
        assert!(renderer.canvas().has_text("TAP TO START"));

        renderer.invalidate();
        renderer.draw(&scene);
        assert_eq!(renderer.canvas().patterns_built, 2);
    }

    #[test]
    fn test_ship_outline() {
        let pts = ship_outline(Rect::new(0.0, 0.0, 40.0, 24.0));
        assert_eq!(pts[0], Vec2::new(20.0, 0.0));
        assert_eq!(pts[2], Vec2::new(20.0, 19.0));
    }
}
