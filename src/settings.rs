//! Player settings and preferences
//!
//! Persisted in LocalStorage. Journey progress is never saved; a reload
//! always starts from the welcome step.

use serde::{Deserialize, Serialize};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Gameplay ===
    /// Allow jumping past a mini-game's rules screen
    pub allow_rules_skip: bool,
    /// Fixed RNG seed for a reproducible journey
    pub seed: Option<u64>,

    // === Accessibility ===
    /// Reduced motion (no confetti bursts)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            allow_rules_skip: false,
            seed: None,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "birthday_quest_settings";

    /// Whether confetti cues should be shown
    pub fn confetti_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Clamp out-of-range values from hand-edited storage
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Self>(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings.sanitized();
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No {} outside the browser", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.allow_rules_skip);
        assert!(settings.seed.is_none());
        assert!(settings.confetti_enabled());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"muted": true, "seed": 7}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_sanitized_clamps_volume() {
        let settings = Settings {
            master_volume: 3.0,
            sfx_volume: -1.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }
}
