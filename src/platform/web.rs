//! Browser-facing game handle
//!
//! The page script owns input and drawing; it forwards taps, drags and keys
//! here and reads back a JSON snapshot plus effect cues after each call.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::Settings;
use crate::effects::EffectCue;
use crate::sim::{FieldLayout, GameSession};

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    settings: Settings,
    cues: Vec<EffectCue>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game fitted to a canvas
    #[wasm_bindgen(constructor)]
    pub fn new(view_width: u32, view_height: u32) -> Result<WebGame, JsValue> {
        let settings = Settings::load();
        let layout = FieldLayout::from_viewport(view_width, view_height, settings.size)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let seed = super::time_seed();
        log::info!("Game initialized with seed: {}", seed);
        Ok(WebGame {
            session: GameSession::with_layout(layout, settings.session_config(), seed),
            settings,
            cues: Vec::new(),
        })
    }

    /// Tap on the field
    pub fn activate(&mut self) {
        self.session.activate();
        self.collect_cues();
    }

    /// Fling by a pixel delta
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.session.move_by(dx, dy);
        self.collect_cues();
    }

    /// Drag by the pixel delta since the drag (re)started
    ///
    /// Returns true when the drag produced a step and should restart from
    /// the current pointer position.
    pub fn drag(&mut self, dx: f32, dy: f32) -> bool {
        let outcome = self.session.drag_by(Vec2::new(dx, dy));
        self.collect_cues();
        outcome.has_update()
    }

    /// Long press on the player
    pub fn grab(&mut self) -> bool {
        let grabbed = self.session.grab();
        self.collect_cues();
        grabbed
    }

    /// Double tap
    pub fn reveal(&mut self) {
        self.session.reveal();
        self.collect_cues();
    }

    pub fn new_game(&mut self, level: u32) {
        self.session.new_game(level);
        self.settings.level = self.session.level();
        self.collect_cues();
    }

    pub fn resize(&mut self, tier: u32, view_width: u32, view_height: u32) -> Result<(), JsValue> {
        self.session
            .resize_tier(tier, view_width, view_height)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        if let Some(layout) = self.session.layout() {
            self.settings.size = layout.tier;
        }
        Ok(())
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.session.set_lives(lives);
        self.settings.lives = self.session.lives();
        self.collect_cues();
    }

    /// Cell side in pixels
    pub fn cell_side(&self) -> i32 {
        self.session.layout().map(|l| l.cell_side).unwrap_or(0)
    }

    /// Current session state as JSON
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_default()
    }

    /// Effect cues since the last call, as JSON
    pub fn take_cues(&mut self) -> String {
        let cues = std::mem::take(&mut self.cues);
        serde_json::to_string(&cues).unwrap_or_default()
    }

    pub fn save_settings(&self) {
        if let Err(e) = self.settings.save() {
            log::warn!("Settings not saved: {}", e);
        }
    }
}

impl WebGame {
    fn collect_cues(&mut self) {
        let events = self.session.drain_events();
        let toggles = self.settings.effect_toggles();
        self.cues.extend(toggles.cues_for(&events));
    }
}

/// Module entry point: logging and panic hook
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Blind Man starting...");
}
