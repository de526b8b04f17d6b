//! Session controller
//!
//! Owns one run of the game from the ready screen to exit: the phase
//! machine, the simulation state, high scores and name entry. Side effects
//! (sound, hiding page elements, the rhythm timer) go through `Host`.

use glam::Vec2;

use crate::audio::{AudioCue, Rhythm};
use crate::highscores::HighScores;
use crate::input::{Controls, InputEvent, Key};
use crate::name_entry::{NameEntry, NameEntryLayout, NameTap};
use crate::persistence::KeyValueStore;
use crate::platform::Host;
use crate::renderer::Scene;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Viewport, generate_enemies, tick};
use crate::tuning::Tuning;

pub struct Session {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    /// Where preference changes are written, if anywhere
    settings_store: Option<Box<dyn KeyValueStore>>,
    high_scores: HighScores,
    name_entry: NameEntry,
    /// The finished run's score was saved or deliberately skipped
    score_saved: bool,
    controls: Controls,
    rhythm: Rhythm,
    host: Host,
    active: bool,
    touch_device: bool,
    /// Natural size of the mosaic image, kept across runs
    image_size: Option<Vec2>,
    seed: u64,
    runs: u64,
}

impl Session {
    pub fn new(
        host: Host,
        high_scores: HighScores,
        settings: Settings,
        tuning: Tuning,
        seed: u64,
    ) -> Self {
        Self {
            state: GameState::new(Viewport::default(), tuning.clone(), seed),
            tuning,
            settings,
            settings_store: None,
            high_scores,
            name_entry: NameEntry::new(),
            score_saved: false,
            controls: Controls::new(),
            rhythm: Rhythm::new(),
            host,
            active: false,
            touch_device: false,
            image_size: None,
            seed,
            runs: 0,
        }
    }

    /// Load preferences from `store` and save later changes back to it
    pub fn with_settings_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        self.settings = Settings::load(&*store);
        self.settings_store = Some(store);
        self
    }

    /// Use tap wording in on-screen instructions
    pub fn set_touch_device(&mut self, touch: bool) {
        self.touch_device = touch;
    }

    /// Changes on every successful `start`
    pub fn run_id(&self) -> u64 {
        self.runs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn name_entry(&self) -> &NameEntry {
        &self.name_entry
    }

    pub fn score_saved(&self) -> bool {
        self.score_saved
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// What the renderer should paint this frame
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            state: &self.state,
            high_scores: self.high_scores.entries(),
            name_entry: &self.name_entry,
            score_saved: self.score_saved,
            touch_device: self.touch_device,
            reduced_motion: self.settings.reduced_motion,
            show_controls_hint: self.settings.show_controls_hint,
        }
    }

    /// Begin a run on the ready screen. No-op while a run is active.
    pub fn start(&mut self, viewport: Viewport) -> bool {
        if self.active {
            log::debug!("start() ignored: session already active");
            return false;
        }
        self.active = true;
        self.host.trigger.hide();
        self.controls.reset();

        self.runs += 1;
        self.state = GameState::new(
            viewport,
            self.tuning.clone(),
            self.seed.wrapping_add(self.runs),
        );
        self.state.image_size = self.image_size;
        generate_enemies(&mut self.state);

        self.name_entry = NameEntry::new();
        self.score_saved = false;
        self.high_scores.refresh();
        self.rhythm.reset();

        self.host.audio.open(self.settings.effective_volume());
        self.host.audio.play(AudioCue::ReadyArpeggio);

        log::info!(
            "Session started ({}x{}, {} enemies)",
            viewport.width,
            viewport.height,
            self.state.enemies.len()
        );
        true
    }

    /// Leave the ready screen: snapshot page targets and start the rhythm
    pub fn begin_gameplay(&mut self) {
        if !self.active || self.state.phase != GamePhase::Ready {
            return;
        }
        self.state.phase = GamePhase::Playing;
        self.state.targets = self.host.targets.scan(self.state.viewport);
        log::info!("Gameplay started with {} page targets", self.state.targets.len());

        self.rhythm.reset();
        self.on_rhythm_tick();
    }

    /// Advance one display frame
    pub fn frame(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        let input = self.controls.take_tick_input();
        tick(&mut self.state, &input, dt);

        for event in self.state.drain_events() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::PlayerFired => self.host.audio.play(AudioCue::Shoot),
            GameEvent::EnemyDestroyed => self.host.audio.play(AudioCue::Explosion),
            GameEvent::TargetDestroyed { handle } => {
                self.host.targets.set_visible(handle, false);
                self.host.audio.play(AudioCue::Explosion);
            }
            GameEvent::PlayerDestroyed => self.on_game_over(),
            GameEvent::LevelCleared { level } => {
                log::info!("Level {level} (score {})", self.state.score);
            }
        }
    }

    fn on_game_over(&mut self) {
        self.host.timer.cancel();
        self.host.audio.play(AudioCue::GameOver);
        self.controls.reset();

        let score = self.state.score;
        if score > 0 && self.high_scores.is_high_score(score) {
            self.state.phase = GamePhase::NameEntry;
            self.name_entry = NameEntry::new();
            log::info!("Game over with new high score {score}");
        } else {
            self.score_saved = true;
            log::info!("Game over (score {score}, level {})", self.state.level);
        }
    }

    /// Route an input event. Returns true when the event was consumed and
    /// the page's default handling should be suppressed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if !self.active {
            return false;
        }
        match event {
            InputEvent::KeyDown { key, repeat } => self.key_down(key, repeat),
            InputEvent::KeyUp { key } => {
                self.controls.key_up(key);
                false
            }
            InputEvent::TouchStart { x, y, time_ms } => {
                match self.state.phase {
                    GamePhase::Ready => self.begin_gameplay(),
                    // Taps edit the initials; they never exit
                    GamePhase::NameEntry => self.name_tap(Vec2::new(x, y)),
                    GamePhase::GameOver => self.stop(),
                    GamePhase::Playing => {
                        self.controls
                            .touch_start(x, time_ms, self.tuning.tap_debounce_ms)
                    }
                }
                true
            }
            InputEvent::TouchMove { x } => self.controls.touch_move(x),
            InputEvent::TouchEnd => {
                self.controls.touch_end();
                false
            }
        }
    }

    fn key_down(&mut self, key: Key, repeat: bool) -> bool {
        if key == Key::Mute {
            self.toggle_mute();
            return true;
        }
        match self.state.phase {
            GamePhase::Ready => {
                self.begin_gameplay();
                return true;
            }
            GamePhase::NameEntry => match key {
                Key::Up => self.name_entry.increment(),
                Key::Down => self.name_entry.decrement(),
                Key::Left => self.name_entry.left(),
                Key::Right => self.name_entry.right(),
                Key::Confirm => self.submit_name(),
                Key::Quit => {
                    log::info!("Name entry skipped");
                    self.state.phase = GamePhase::GameOver;
                    self.score_saved = true;
                }
                Key::Fire | Key::Mute | Key::Other => return false,
            },
            GamePhase::Playing | GamePhase::GameOver => {
                if key.is_control() {
                    self.controls.key_down(key, repeat);
                } else if key == Key::Quit {
                    self.stop();
                    return false;
                } else {
                    return false;
                }
            }
        }
        true
    }

    fn name_tap(&mut self, pos: Vec2) {
        let Some(tap) = NameEntryLayout::new(self.state.viewport).hit(pos) else {
            return;
        };
        match tap {
            NameTap::Select(slot) => self.name_entry.select(slot),
            NameTap::Increment(slot) => {
                self.name_entry.select(slot);
                self.name_entry.increment();
            }
            NameTap::Decrement(slot) => {
                self.name_entry.select(slot);
                self.name_entry.decrement();
            }
            NameTap::Submit => self.submit_name(),
        }
    }

    /// Flip mute, apply it to audio and remember it
    pub fn toggle_mute(&mut self) {
        self.settings.muted = !self.settings.muted;
        self.host.audio.set_volume(self.settings.effective_volume());
        log::info!("Sound {}", if self.settings.muted { "off" } else { "on" });

        if let Some(store) = self.settings_store.as_deref_mut()
            && let Err(err) = self.settings.save(store)
        {
            log::warn!("Could not save settings ({err})");
        }
    }

    fn submit_name(&mut self) {
        let name = self.name_entry.name();
        let score = self.state.score;
        match self.high_scores.add_high_score(&name, score) {
            Some(rank) => log::info!("High score #{rank}: {name} {score}"),
            None => log::info!("High score {name} {score} did not place"),
        }
        self.state.phase = GamePhase::GameOver;
        self.score_saved = true;
    }

    /// Viewport changed. Before play the grid is laid out afresh; during
    /// play the live grid is stretched to the new width.
    pub fn resize(&mut self, viewport: Viewport) {
        if !self.active {
            return;
        }
        self.state.resize(viewport);
        if self.state.phase == GamePhase::Ready {
            generate_enemies(&mut self.state);
        }
    }

    /// The mosaic image finished loading
    pub fn on_image_ready(&mut self, size: Vec2) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        self.image_size = Some(size);
        self.state.set_image_size(size);
    }

    /// Rhythm timer fired: play a beat and arm the next one
    pub fn on_rhythm_tick(&mut self) {
        if !self.active || self.state.phase != GamePhase::Playing {
            return;
        }
        let cue = self.rhythm.next_note();
        self.host.audio.play(cue);

        let delay = Rhythm::interval_ms(
            &self.state.tuning,
            self.state.level,
            self.state.alive_enemies(),
            self.state.enemies.len(),
        );
        self.host.timer.schedule(delay);
    }

    /// End the run and give the page back. No-op when not active.
    pub fn stop(&mut self) {
        if !self.active {
            log::debug!("stop() ignored: session not active");
            return;
        }
        self.active = false;

        self.host.timer.cancel();
        self.host.audio.close();
        self.controls.reset();

        for target in self.state.targets.drain(..) {
            self.host.targets.set_visible(target.handle, true);
        }
        self.host.trigger.restore();

        log::info!(
            "Session ended (score {}, level {})",
            self.state.score,
            self.state.level
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Bullet, Owner, Rect};

    fn session() -> Session {
        let scores = HighScores::load(Box::new(MemoryStore::new()));
        Session::new(
            Host::headless(),
            scores,
            Settings::default(),
            Tuning::default(),
            9,
        )
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::KeyDown { key, repeat: false }
    }

    /// Put an enemy bullet on the player
    fn kill_player(s: &mut Session) {
        let player = s.state.player.rect();
        s.state.enemy_bullets.push(Bullet {
            pos: Vec2::new(player.x, player.y),
            size: Vec2::new(4.0, 12.0),
            vel_y: 0.0,
            owner: Owner::Enemy,
        });
        s.frame(0.001);
    }

    #[test]
    fn test_start_is_not_reentrant() {
        let mut s = session();
        assert!(s.start(Viewport::default()));
        s.state.score = 42;
        assert!(!s.start(Viewport::default()));
        assert_eq!(s.state.score, 42);
    }

    #[test]
    fn test_run_id_changes_per_run() {
        let mut s = session();
        s.start(Viewport::default());
        let first = s.run_id();
        s.start(Viewport::default());
        assert_eq!(s.run_id(), first);

        s.stop();
        assert_eq!(s.run_id(), first);
        s.start(Viewport::default());
        assert_ne!(s.run_id(), first);
    }

    #[test]
    fn test_any_key_leaves_ready() {
        let mut s = session();
        s.start(Viewport::default());
        assert_eq!(s.phase(), GamePhase::Ready);
        s.frame(0.5);
        assert_eq!(s.state.ready_time, 0.5);
        assert!(s.handle_input(key(Key::Other)));
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_inactive_session_ignores_input() {
        let mut s = session();
        assert!(!s.handle_input(key(Key::Fire)));
        s.frame(1.0);
        assert_eq!(s.phase(), GamePhase::Ready);
        assert_eq!(s.state.ready_time, 0.0);
    }

    #[test]
    fn test_space_fires_once_per_press() {
        let mut s = session();
        s.start(Viewport::default());
        s.begin_gameplay();
        s.handle_input(key(Key::Fire));
        s.handle_input(InputEvent::KeyDown {
            key: Key::Fire,
            repeat: true,
        });
        s.frame(0.001);
        s.frame(0.001);
        assert_eq!(s.state.bullets.len(), 1);
    }

    #[test]
    fn test_zero_score_skips_name_entry() {
        let mut s = session();
        s.start(Viewport::default());
        s.begin_gameplay();
        kill_player(&mut s);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(s.score_saved());
    }

    #[test]
    fn test_name_entry_submit() {
        let mut s = session();
        s.start(Viewport::default());
        s.begin_gameplay();
        s.state.score = 700;
        kill_player(&mut s);
        assert_eq!(s.phase(), GamePhase::NameEntry);
        assert!(!s.score_saved());

        for k in [Key::Down, Key::Right, Key::Up, Key::Up, Key::Right, Key::Right] {
            assert!(s.handle_input(key(k)));
        }
        assert_eq!(s.name_entry().name(), " CA");
        s.handle_input(key(Key::Confirm));

        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(s.score_saved());
        assert_eq!(s.high_scores().entries()[0].name, " CA");
        assert_eq!(s.high_scores().top_score(), Some(700));
    }

    #[test]
    fn test_quit_skips_name_entry_without_saving() {
        let mut s = session();
        s.start(Viewport::default());
        s.begin_gameplay();
        s.state.score = 700;
        kill_player(&mut s);

        s.handle_input(key(Key::Quit));
        assert!(s.is_active());
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(s.score_saved());
        assert!(s.high_scores().is_empty());

        // A second quit leaves
        s.handle_input(key(Key::Quit));
        assert!(!s.is_active());
    }

    #[test]
    fn test_tap_never_exits_name_entry() {
        let mut s = session();
        s.start(Viewport::default());
        s.begin_gameplay();
        s.state.score = 100;
        kill_player(&mut s);
        assert!(s.handle_input(InputEvent::TouchStart {
            x: 10.0,
            y: 10.0,
            time_ms: 0.0
        }));
        assert!(s.is_active());
        assert_eq!(s.phase(), GamePhase::NameEntry);
    }

    #[test]
    fn test_tap_exits_table() {
        let mut s = session();
        s.start(Viewport::default());
        s.begin_gameplay();
        kill_player(&mut s);
        s.handle_input(InputEvent::TouchStart {
            x: 10.0,
            y: 10.0,
            time_ms: 0.0,
        });
        assert!(!s.is_active());
    }

    #[test]
    fn test_resize_reanchors_player() {
        let mut s = session();
        s.start(Viewport::new(800.0, 600.0));
        let ready_grid = s.state.enemies[0].pos;
        s.resize(Viewport::new(1200.0, 900.0));
        assert_eq!(s.state.player.pos.y, 840.0);
        assert_ne!(s.state.enemies[0].pos, ready_grid);

        s.begin_gameplay();
        let playing_grid: Vec<Vec2> = s.state.enemies.iter().map(|e| e.pos).collect();
        s.resize(Viewport::new(400.0, 700.0));
        assert_eq!(s.state.player.pos.y, 640.0);
        assert!(s.state.player.pos.x <= 400.0 - s.state.player.size.x);

        // Same rows, columns squeezed into the narrower window
        for (enemy, before) in s.state.enemies.iter().zip(&playing_grid) {
            assert_eq!(enemy.pos.y, before.y);
            assert!(enemy.pos.x >= 0.0 && enemy.rect().right() <= 400.0);
        }
        assert!(s.state.enemies[1].pos.x > s.state.enemies[0].pos.x);
    }

    #[test]
    fn test_late_image_after_resize_samples_inside_image() {
        let mut s = session();
        s.start(Viewport::new(800.0, 600.0));
        s.begin_gameplay();
        s.resize(Viewport::new(400.0, 800.0));
        s.on_image_ready(Vec2::new(600.0, 600.0));

        let image = Rect::new(0.0, 0.0, 600.0, 600.0);
        assert_eq!(s.state.enemies.len(), 36);
        assert!(s.state.enemies.iter().all(|e| e.sample.inside(&image)));
        assert_eq!(s.state.enemies[35].sample, Rect::new(500.0, 500.0, 100.0, 100.0));
    }

    #[test]
    fn test_touch_edits_and_submits_name() {
        let mut s = session();
        s.set_touch_device(true);
        s.start(Viewport::new(800.0, 600.0));
        s.begin_gameplay();
        s.state.score = 300;
        kill_player(&mut s);
        assert_eq!(s.phase(), GamePhase::NameEntry);

        let layout = NameEntryLayout::new(s.state.viewport);
        let tap = |s: &mut Session, p: Vec2| {
            s.handle_input(InputEvent::TouchStart {
                x: p.x,
                y: p.y,
                time_ms: 0.0,
            });
            s.handle_input(InputEvent::TouchEnd);
        };
        tap(&mut s, layout.up_rect(1).center());
        tap(&mut s, layout.up_rect(1).center());
        tap(&mut s, layout.down_rect(2).center());
        assert_eq!(s.name_entry().name(), "AC ");
        assert_eq!(s.name_entry().cursor(), 2);
        tap(&mut s, layout.slot_rect(0).center());
        assert_eq!(s.name_entry().cursor(), 0);
        assert_eq!(s.phase(), GamePhase::NameEntry);

        tap(&mut s, layout.submit_rect().center());
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(s.is_active());
        assert_eq!(s.high_scores().entries()[0].name, "AC ");

        // Back on the table a tap leaves
        tap(&mut s, Vec2::new(5.0, 5.0));
        assert!(!s.is_active());
    }

    #[test]
    fn test_mute_toggle_is_saved() {
        let scores = HighScores::load(Box::new(MemoryStore::new()));
        let mut s = Session::new(Host::headless(), scores, Settings::default(), Tuning::default(), 2)
            .with_settings_store(Box::new(MemoryStore::new()));
        assert!(!s.settings().muted);
        s.start(Viewport::default());
        assert!(s.handle_input(key(Key::Mute)));
        assert!(s.settings().muted);
        assert_eq!(s.settings().effective_volume(), 0.0);
        // Mute does not start the game
        assert_eq!(s.phase(), GamePhase::Ready);

        let saved = s
            .settings_store
            .as_deref()
            .and_then(|store| store.load(Settings::STORAGE_KEY).ok().flatten())
            .unwrap();
        assert!(saved.contains("\"muted\":true"));
    }

    #[test]
    fn test_settings_load_from_store() {
        let json = r#"{"muted":true,"master_volume":0.5}"#;
        let scores = HighScores::load(Box::new(MemoryStore::new()));
        let s = Session::new(Host::headless(), scores, Settings::default(), Tuning::default(), 2)
            .with_settings_store(Box::new(MemoryStore::with_value(Settings::STORAGE_KEY, json)));
        assert!(s.settings().muted);
        assert_eq!(s.settings().master_volume, 0.5);
    }

    #[test]
    fn test_image_size_survives_restart() {
        let mut s = session();
        s.on_image_ready(Vec2::new(600.0, 300.0));
        s.start(Viewport::default());
        assert_eq!(s.state.image_size, Some(Vec2::new(600.0, 300.0)));
        assert_eq!(s.state.enemies[0].sample.w, 100.0);
    }

    #[test]
    fn test_scene_reflects_settings() {
        let scores = HighScores::load(Box::new(MemoryStore::new()));
        let settings = Settings {
            reduced_motion: true,
            show_controls_hint: false,
            ..Default::default()
        };
        let mut s = Session::new(Host::headless(), scores, settings, Tuning::default(), 1);
        s.set_touch_device(true);
        let scene = s.scene();
        assert!(scene.reduced_motion && scene.touch_device);
        assert!(!scene.show_controls_hint);
    }
}
