//! Feedback effects
//!
//! The simulation only emits events. This module decides which sound, haptic
//! pulse and field flash a host should play for each of them; the playback
//! itself stays with the host.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Player grabbed for dragging
    Grab,
    /// Hidden obstacle struck, game goes on
    Hit,
    /// Goal reached
    Goal,
    /// Last life lost
    Over,
}

/// Haptic feedback pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Haptic {
    LongPress,
    VirtualKey,
}

/// Sound cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Boing,
    Tada,
    Crash,
}

impl Sound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sound::Boing => "boing",
            Sound::Tada => "tada",
            Sound::Crash => "crash",
        }
    }
}

/// Field flash: alpha dips from 1.0 to `min_alpha` and back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub min_alpha: f32,
    /// Length of one dim (or brighten) leg
    pub leg_ms: u32,
    /// Legs after the first, alternating direction
    pub repeats: u32,
    /// Player and goal colours trade places while flashing
    pub swap_colors: bool,
}

impl Flash {
    const fn standard(swap_colors: bool) -> Self {
        Self {
            min_alpha: 0.7,
            leg_ms: 50,
            repeats: 5,
            swap_colors,
        }
    }

    /// Total running time
    pub fn duration_ms(&self) -> u32 {
        self.leg_ms * (self.repeats + 1)
    }
}

impl Effect {
    pub fn haptic(&self) -> Option<Haptic> {
        match self {
            Effect::Grab => Some(Haptic::LongPress),
            Effect::Hit | Effect::Over => Some(Haptic::VirtualKey),
            Effect::Goal => None,
        }
    }

    pub fn sound(&self) -> Option<Sound> {
        match self {
            Effect::Grab => None,
            Effect::Hit => Some(Sound::Boing),
            Effect::Goal => Some(Sound::Tada),
            Effect::Over => Some(Sound::Crash),
        }
    }

    pub fn flash(&self) -> Option<Flash> {
        match self {
            Effect::Goal => Some(Flash::standard(true)),
            Effect::Over => Some(Flash::standard(false)),
            Effect::Grab | Effect::Hit => None,
        }
    }

    /// Effect for a session event, if any
    ///
    /// A fatal hit is left to the following `GameOver` event.
    pub fn for_event(event: &GameEvent) -> Option<Effect> {
        match event {
            GameEvent::Grabbed { .. } => Some(Effect::Grab),
            GameEvent::Hit { game_over: false, .. } => Some(Effect::Hit),
            GameEvent::GameOver { .. } => Some(Effect::Over),
            GameEvent::GoalReached { .. } => Some(Effect::Goal),
            _ => None,
        }
    }
}

/// Which feedback channels the player enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectToggles {
    pub haptics: bool,
    pub sound: bool,
}

impl Default for EffectToggles {
    fn default() -> Self {
        Self {
            haptics: true,
            sound: true,
        }
    }
}

/// What the host should actually play for one effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectCue {
    pub effect: Effect,
    pub haptic: Option<Haptic>,
    pub sound: Option<Sound>,
    pub flash: Option<Flash>,
}

impl EffectToggles {
    /// Filter an effect through the enabled channels (flashes always play)
    pub fn cue(&self, effect: Effect) -> EffectCue {
        EffectCue {
            effect,
            haptic: effect.haptic().filter(|_| self.haptics),
            sound: effect.sound().filter(|_| self.sound),
            flash: effect.flash(),
        }
    }

    /// Cues for a batch of drained session events
    pub fn cues_for(&self, events: &[GameEvent]) -> Vec<EffectCue> {
        events
            .iter()
            .filter_map(Effect::for_event)
            .map(|effect| self.cue(effect))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use glam::IVec2;

    #[test]
    fn test_event_mapping() {
        let hit = GameEvent::Hit {
            cell: IVec2::new(2, 3),
            hits: 1,
            game_over: false,
        };
        let fatal = GameEvent::Hit {
            cell: IVec2::new(2, 3),
            hits: 3,
            game_over: true,
        };
        assert_eq!(Effect::for_event(&hit), Some(Effect::Hit));
        assert_eq!(
            Effect::for_event(&GameEvent::Grabbed { cell: IVec2::ONE }),
            Some(Effect::Grab)
        );
        let cue = EffectToggles::default().cue(Effect::Grab);
        assert_eq!(cue.haptic, Some(Haptic::LongPress));
        assert_eq!(cue.sound, None);
        assert_eq!(Effect::for_event(&fatal), None);
        assert_eq!(Effect::for_event(&GameEvent::GameOver { hits: 3 }), Some(Effect::Over));
        assert_eq!(
            Effect::for_event(&GameEvent::StateChanged {
                from: GamePhase::Play,
                to: GamePhase::Idle
            }),
            None
        );
    }

    #[test]
    fn test_toggles_filter_channels() {
        let toggles = EffectToggles {
            haptics: false,
            sound: true,
        };
        let cue = toggles.cue(Effect::Over);
        assert_eq!(cue.haptic, None);
        assert_eq!(cue.sound, Some(Sound::Crash));
        assert!(cue.flash.is_some());

        let quiet = EffectToggles {
            haptics: true,
            sound: false,
        };
        let cue = quiet.cue(Effect::Goal);
        assert_eq!(cue.sound, None);
        assert_eq!(cue.haptic, None);
        assert!(cue.flash.unwrap().swap_colors);
    }

    #[test]
    fn test_flash_duration() {
        assert_eq!(Effect::Goal.flash().unwrap().duration_ms(), 300);
        assert!(Effect::Hit.flash().is_none());
    }

    #[test]
    fn test_cues_for_game_over_sequence() {
        let events = [
            GameEvent::Hit {
                cell: IVec2::new(1, 2),
                hits: 3,
                game_over: true,
            },
            GameEvent::GameOver { hits: 3 },
            GameEvent::StateChanged {
                from: GamePhase::Play,
                to: GamePhase::Idle,
            },
        ];
        let cues = EffectToggles::default().cues_for(&events);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].effect, Effect::Over);
    }
}
