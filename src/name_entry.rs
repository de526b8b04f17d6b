//! Three-letter initials entry
//!
//! Each slot cycles through `A-Z` and space; the cursor is clamped to the
//! three slots. `NameEntryLayout` places the widgets on screen so taps can
//! drive the same edits as the keyboard.

use glam::Vec2;

use crate::sim::{Rect, Viewport};

/// Symbols a slot can hold, in cycling order
pub const ALPHABET: &[u8; 27] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ ";

/// Number of slots
pub const NAME_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameEntry {
    /// Alphabet index per slot
    slots: [usize; NAME_LEN],
    cursor: usize,
}

impl Default for NameEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl NameEntry {
    /// "AAA" with the cursor on the first slot
    pub fn new() -> Self {
        Self {
            slots: [0; NAME_LEN],
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Character in a slot
    pub fn char_at(&self, slot: usize) -> char {
        ALPHABET[self.slots[slot]] as char
    }

    /// Next symbol in the active slot, wrapping space back to A
    pub fn increment(&mut self) {
        let slot = &mut self.slots[self.cursor];
        *slot = (*slot + 1) % ALPHABET.len();
    }

    /// Previous symbol in the active slot, wrapping A to space
    pub fn decrement(&mut self) {
        let slot = &mut self.slots[self.cursor];
        *slot = (*slot + ALPHABET.len() - 1) % ALPHABET.len();
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(NAME_LEN - 1);
    }

    /// Move the cursor straight to `slot` (clamped)
    pub fn select(&mut self, slot: usize) {
        self.cursor = slot.min(NAME_LEN - 1);
    }

    /// The entered name
    pub fn name(&self) -> String {
        (0..NAME_LEN).map(|i| self.char_at(i)).collect()
    }
}

/// Edit requested by a tap on the name-entry screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTap {
    Select(usize),
    Increment(usize),
    Decrement(usize),
    Submit,
}

/// Where the name-entry widgets sit, relative to the viewport centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameEntryLayout {
    center: Vec2,
}

impl NameEntryLayout {
    /// Horizontal distance between letters
    pub const SLOT_SPACING: f32 = 50.0;
    /// Letter row, below the centre
    pub const SLOT_Y: f32 = 50.0;
    /// Half height of a letter's tap zone
    const SLOT_HALF_HEIGHT: f32 = 22.0;
    /// Height of the arrow zones above and below a letter
    const ARROW_HEIGHT: f32 = 40.0;
    /// Submit button centre, below the centre
    pub const SUBMIT_Y: f32 = 150.0;
    const SUBMIT_SIZE: Vec2 = Vec2::new(160.0, 44.0);

    pub fn new(viewport: Viewport) -> Self {
        Self {
            center: Vec2::new(viewport.width / 2.0, viewport.height / 2.0),
        }
    }

    /// Centre of the letter in `slot`
    pub fn slot_center(&self, slot: usize) -> Vec2 {
        self.center
            + Vec2::new(
                (slot as f32 - 1.0) * Self::SLOT_SPACING,
                Self::SLOT_Y,
            )
    }

    pub fn slot_rect(&self, slot: usize) -> Rect {
        let c = self.slot_center(slot);
        Rect::new(
            c.x - Self::SLOT_SPACING / 2.0,
            c.y - Self::SLOT_HALF_HEIGHT,
            Self::SLOT_SPACING,
            Self::SLOT_HALF_HEIGHT * 2.0,
        )
    }

    /// Zone above a letter ("▲")
    pub fn up_rect(&self, slot: usize) -> Rect {
        let r = self.slot_rect(slot);
        Rect::new(r.x, r.y - Self::ARROW_HEIGHT, r.w, Self::ARROW_HEIGHT)
    }

    /// Zone below a letter ("▼")
    pub fn down_rect(&self, slot: usize) -> Rect {
        let r = self.slot_rect(slot);
        Rect::new(r.x, r.bottom(), r.w, Self::ARROW_HEIGHT)
    }

    pub fn submit_rect(&self) -> Rect {
        let c = self.submit_center();
        Rect::new(
            c.x - Self::SUBMIT_SIZE.x / 2.0,
            c.y - Self::SUBMIT_SIZE.y / 2.0,
            Self::SUBMIT_SIZE.x,
            Self::SUBMIT_SIZE.y,
        )
    }

    pub fn submit_center(&self) -> Vec2 {
        self.center + Vec2::new(0.0, Self::SUBMIT_Y)
    }

    /// Map a tap to an edit; taps outside every widget do nothing
    pub fn hit(&self, p: Vec2) -> Option<NameTap> {
        let contains = |r: Rect| p.x >= r.x && p.x < r.right() && p.y >= r.y && p.y < r.bottom();
        if contains(self.submit_rect()) {
            return Some(NameTap::Submit);
        }
        (0..NAME_LEN).find_map(|slot| {
            if contains(self.up_rect(slot)) {
                Some(NameTap::Increment(slot))
            } else if contains(self.down_rect(slot)) {
                Some(NameTap::Decrement(slot))
            } else if contains(self.slot_rect(slot)) {
                Some(NameTap::Select(slot))
            } else {
                None
            }
        })
    }
}
