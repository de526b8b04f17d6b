//! Player preferences
//!
//! Persisted separately from the high score table.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0), scales every cue
    pub master_volume: f32,
    /// Silence all cues
    pub muted: bool,

    // === Accessibility ===
    /// Steady ready-screen text instead of pulsing/blinking
    pub reduced_motion: bool,

    // === HUD ===
    /// Show the controls hint at the start of play
    pub show_controls_hint: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            muted: false,
            reduced_motion: false,
            show_controls_hint: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "spaceInvadersSettings";

    /// Load settings, falling back to defaults on any storage problem
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match Self::read(store) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Settings unavailable ({err}), using defaults");
                Self::default()
            }
        }
    }

    fn read(store: &dyn KeyValueStore) -> Result<Option<Self>, StorageError> {
        match store.load(Self::STORAGE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str::<Self>(&json)?.sanitized())),
            None => Ok(None),
        }
    }

    /// Persist settings
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.save(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Gain multiplier applied to every cue (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume
        }
    }

    fn sanitized(mut self) -> Self {
        self.master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, NullStore};

    #[test]
    fn test_missing_settings_use_defaults() {
        assert_eq!(Settings::load(&MemoryStore::new()), Settings::default());
        assert_eq!(Settings::load(&NullStore), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            master_volume: 0.25,
            muted: true,
            ..Default::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_and_out_of_range_values() {
        let store = MemoryStore::with_value(Settings::STORAGE_KEY, r#"{ "master_volume": 3.0 }"#);
        let settings = Settings::load(&store);
        assert_eq!(settings.master_volume, 1.0);
        assert!(settings.show_controls_hint);
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let settings = Settings {
            master_volume: 0.7,
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_save_failure_is_reported() {
        assert!(Settings::default().save(&mut NullStore).is_err());
    }
}
