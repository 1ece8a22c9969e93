//! Game settings and preferences
//!
//! Persisted separately from any game state: LocalStorage on the web, a JSON
//! file on native targets.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::effects::EffectToggles;
use crate::error::{GameError, Result};
use crate::palette::Palette;
use crate::sim::SessionConfig;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Game ===
    /// Difficulty level
    pub level: u32,
    /// Field size tier (1-based)
    pub size: u32,
    /// Life limit, 0 for unlimited
    pub lives: u32,

    // === Looks ===
    /// Index into the background alpha table
    pub background: usize,
    pub palette: Palette,

    // === Feedback ===
    pub haptics: bool,
    pub sound: bool,
    pub music: bool,

    /// Show the help on the very first start
    pub first_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            size: DEFAULT_TIER,
            lives: DEFAULT_LIVES,

            background: DEFAULT_BACKGROUND,
            palette: Palette::default(),

            haptics: true,
            sound: true,
            music: false,

            first_run: true,
        }
    }
}

impl Settings {
    /// Strict check, reporting the first out-of-range value
    pub fn validate(&self) -> Result<()> {
        if !ALLOWED_LIVES.contains(&self.lives) {
            return Err(GameError::InvalidConfiguration {
                what: "lives",
                value: self.lives as i64,
            });
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err(GameError::InvalidConfiguration {
                what: "level",
                value: self.level as i64,
            });
        }
        if !(1..=OBSTACLE_ROWS.len() as u32).contains(&self.size) {
            return Err(GameError::InvalidConfiguration {
                what: "size",
                value: self.size as i64,
            });
        }
        if self.background >= BACKGROUND_ALPHA.len() {
            return Err(GameError::InvalidConfiguration {
                what: "background",
                value: self.background as i64,
            });
        }
        Ok(())
    }

    /// Copy with every out-of-range value replaced by a safe one
    pub fn sanitized(&self) -> Self {
        let background = if self.background < BACKGROUND_ALPHA.len() {
            self.background
        } else {
            log::warn!("Background {} out of range, using default", self.background);
            DEFAULT_BACKGROUND
        };
        Self {
            level: crate::sanitize_level(self.level),
            size: crate::sanitize_tier(self.size),
            lives: crate::sanitize_lives(self.lives),
            background,
            ..self.clone()
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            level: self.level,
            lives: self.lives,
        }
    }

    pub fn effect_toggles(&self) -> EffectToggles {
        EffectToggles {
            haptics: self.haptics,
            sound: self.sound,
        }
    }

    /// Alpha of the field background fill
    pub fn background_alpha(&self) -> u8 {
        BACKGROUND_ALPHA
            .get(self.background)
            .copied()
            .unwrap_or(BACKGROUND_ALPHA[DEFAULT_BACKGROUND])
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "blind_man_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str::<Settings>(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings.sanitized();
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<()> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| GameError::Storage("LocalStorage not available".into()))?;

        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| GameError::Storage(format!("{e:?}")))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Settings file location (`BLIND_MAN_SETTINGS` overrides)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> std::path::PathBuf {
        std::env::var_os("BLIND_MAN_SETTINGS")
            .map(Into::into)
            .unwrap_or_else(|| "blind_man_settings.json".into())
    }

    /// Load settings from the default file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Save settings to the default file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Load settings from a file, falling back to defaults on any problem
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match crate::persistence::load::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        crate::persistence::save(path, self)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.lives, 3);
        assert_eq!(settings.background_alpha(), 0x40);
        assert_eq!(settings.sanitized(), settings);
    }

    #[test]
    fn test_validate_reports_first_problem() {
        let settings = Settings {
            lives: 5,
            level: 9,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(GameError::InvalidConfiguration { what: "lives", value: 5 })
        ));
    }

    #[test]
    fn test_sanitized_substitutes_safe_values() {
        let settings = Settings {
            lives: 5,
            level: 0,
            size: 8,
            background: 7,
            music: true,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.lives, 3);
        assert_eq!(settings.level, 1);
        assert_eq!(settings.size, 3);
        assert_eq!(settings.background, DEFAULT_BACKGROUND);
        assert!(settings.music);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"lives": 0, "sound": false}"#).unwrap();
        assert_eq!(settings.lives, 0);
        assert!(!settings.sound);
        assert_eq!(settings.level, DEFAULT_LEVEL);
        assert_eq!(settings.effect_toggles(), EffectToggles { haptics: true, sound: false });
    }

    #[test]
    fn test_file_round_trip_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        assert_eq!(Settings::load_from(&path), Settings::default());

        let settings = Settings {
            level: 2,
            lives: 9,
            first_run: false,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);

        // Hand-edited junk values are repaired on load
        std::fs::write(&path, r#"{"version": 1, "payload": {"lives": 7}}"#).unwrap();
        assert_eq!(Settings::load_from(&path).lives, 3);
    }
}
