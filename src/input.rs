//! Input normalization
//!
//! Browser keyboard and touch events become a small set of logical keys
//! plus a continuous drag target. `Controls` folds them into the
//! `TickInput` the simulation consumes each frame.

use crate::sim::TickInput;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Fire,
    /// Name entry: next letter
    Up,
    /// Name entry: previous letter
    Down,
    /// Name entry: submit
    Confirm,
    Quit,
    /// Toggle sound
    Mute,
    /// Anything else (still skips the ready screen)
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent` (`code`, `key`) pair
    pub fn from_event(code: &str, key: &str) -> Self {
        match code {
            "ArrowLeft" => return Key::Left,
            "ArrowRight" => return Key::Right,
            "Space" => return Key::Fire,
            _ => {}
        }
        match key {
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            " " => Key::Fire,
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "Enter" => Key::Confirm,
            "Escape" | "q" | "Q" => Key::Quit,
            "m" | "M" => Key::Mute,
            _ => Key::Other,
        }
    }

    /// Movement and fire keys, whose held state is tracked
    pub fn is_control(self) -> bool {
        matches!(self, Key::Left | Key::Right | Key::Fire)
    }
}

/// A normalized input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key },
    /// First finger down at (`x`, `y`); `time_ms` is a monotonic timestamp
    TouchStart { x: f32, y: f32, time_ms: f64 },
    TouchMove { x: f32 },
    TouchEnd,
}

/// Held keys, touch drag and pending shots
#[derive(Debug, Clone, Default)]
pub struct Controls {
    left: bool,
    right: bool,
    fire_held: bool,
    fire_queued: bool,
    touch_x: Option<f32>,
    last_tap_ms: Option<f64>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release everything (session end, phase change)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn key_down(&mut self, key: Key, repeat: bool) {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Fire => {
                // One shot per press; auto-repeat never fires
                if !repeat && !self.fire_held {
                    self.fire_queued = true;
                }
                self.fire_held = true;
            }
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Fire => self.fire_held = false,
            _ => {}
        }
    }

    /// Finger down: start dragging and fire, at most once per `debounce_ms`
    pub fn touch_start(&mut self, x: f32, time_ms: f64, debounce_ms: f64) {
        self.touch_x = Some(x);
        let ready = self
            .last_tap_ms
            .is_none_or(|last| time_ms - last > debounce_ms);
        if ready {
            self.fire_queued = true;
            self.last_tap_ms = Some(time_ms);
        }
    }

    /// Returns whether a drag is in progress
    pub fn touch_move(&mut self, x: f32) -> bool {
        match &mut self.touch_x {
            Some(current) => {
                *current = x;
                true
            }
            None => false,
        }
    }

    pub fn touch_end(&mut self) {
        self.touch_x = None;
    }

    /// Snapshot for one tick; consumes any pending shot
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            fire: std::mem::take(&mut self.fire_queued),
            touch_x: self.touch_x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_event("ArrowLeft", "ArrowLeft"), Key::Left);
        assert_eq!(Key::from_event("Space", " "), Key::Fire);
        assert_eq!(Key::from_event("KeyQ", "q"), Key::Quit);
        assert_eq!(Key::from_event("KeyQ", "Q"), Key::Quit);
        assert_eq!(Key::from_event("Escape", "Escape"), Key::Quit);
        assert_eq!(Key::from_event("ArrowUp", "ArrowUp"), Key::Up);
        assert_eq!(Key::from_event("Enter", "Enter"), Key::Confirm);
        assert_eq!(Key::from_event("KeyM", "m"), Key::Mute);
        assert_eq!(Key::from_event("KeyX", "x"), Key::Other);
    }

    #[test]
    fn test_fire_is_edge_triggered() {
        let mut controls = Controls::new();
        controls.key_down(Key::Fire, false);
        assert!(controls.take_tick_input().fire);
        assert!(!controls.take_tick_input().fire);

        // Held with auto-repeat: no extra shots
        controls.key_down(Key::Fire, true);
        controls.key_down(Key::Fire, false);
        assert!(!controls.take_tick_input().fire);

        controls.key_up(Key::Fire);
        controls.key_down(Key::Fire, false);
        assert!(controls.take_tick_input().fire);
    }

    #[test]
    fn test_held_movement() {
        let mut controls = Controls::new();
        controls.key_down(Key::Left, false);
        controls.key_down(Key::Right, false);
        let input = controls.take_tick_input();
        assert!(input.left && input.right);
        controls.key_up(Key::Left);
        let input = controls.take_tick_input();
        assert!(!input.left && input.right);
    }

    #[test]
    fn test_tap_debounce() {
        let mut controls = Controls::new();
        controls.touch_start(100.0, 1000.0, 150.0);
        assert!(controls.take_tick_input().fire);
        controls.touch_end();

        controls.touch_start(100.0, 1100.0, 150.0);
        assert!(!controls.take_tick_input().fire);
        controls.touch_end();

        controls.touch_start(100.0, 1151.0, 150.0);
        assert!(controls.take_tick_input().fire);
    }

    #[test]
    fn test_touch_drag() {
        let mut controls = Controls::new();
        assert!(!controls.touch_move(50.0));
        controls.touch_start(10.0, 0.0, 150.0);
        assert!(controls.touch_move(50.0));
        assert_eq!(controls.take_tick_input().touch_x, Some(50.0));
        controls.touch_end();
        assert_eq!(controls.take_tick_input().touch_x, None);
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut controls = Controls::new();
        controls.key_down(Key::Left, false);
        controls.key_down(Key::Fire, false);
        controls.touch_start(10.0, 0.0, 150.0);
        controls.reset();
        let input = controls.take_tick_input();
        assert!(!input.left && !input.fire);
        assert!(input.touch_x.is_none());
    }
}
