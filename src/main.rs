//! Blind Man entry point
//!
//! The browser build starts through `platform::web`; natively this runs a
//! small terminal host that reads commands from stdin.

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};

    use blind_man::Settings;
    use blind_man::effects::EffectToggles;
    use blind_man::platform::time_seed;
    use blind_man::sim::{
        Direction, FieldLayout, GamePhase, GameSession, MoveOutcome, ObstacleState,
    };

    /// Virtual portrait viewport the field is fitted into
    const VIEWPORT: (u32, u32) = (600, 1000);

    const HELP: &str = "w/a/s/d move, <enter> tap, r reveal, n [level] new game, \
                        z <tier> size, l <lives> lives, q quit";

    fn render(session: &GameSession) -> String {
        let size = session.size();
        let goal = session.goal();
        let mut out = String::new();
        for y in 0..size.height {
            for x in 0..size.width {
                let cell = glam::IVec2::new(x, y);
                let visible = session.visible_obstacles().find(|o| o.cell == cell);
                let ch = if !size.is_playable(cell) {
                    '#'
                } else if cell == session.player() {
                    '@'
                } else if let Some(obstacle) = visible {
                    match obstacle.state {
                        ObstacleState::Hit => 'X',
                        _ => 'o',
                    }
                } else if goal.contains(cell) {
                    'G'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    fn status(session: &GameSession) -> String {
        let lives = match session.lives() {
            0 => "∞".to_string(),
            n => n.to_string(),
        };
        let message = match session.phase() {
            GamePhase::Idle if session.is_game_over() => "Game over. Tap to show a new field.",
            GamePhase::Idle => "Tap to show a new field.",
            GamePhase::Show => "Memorize the field, then tap to start.",
            GamePhase::Play => "Find your way to the goal.",
            GamePhase::Hint => "Hint shown. Tap to continue.",
        };
        format!(
            "Level {} | Hits {}/{} | {}",
            session.level(),
            session.hits(),
            lives,
            message
        )
    }

    fn apply(session: &mut GameSession, settings: &mut Settings, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let arg = parts.next().and_then(|s| s.parse::<u32>().ok());

        let outcome = match command {
            "" => {
                session.activate();
                None
            }
            "w" => Some(session.step(Direction::Up)),
            "a" => Some(session.step(Direction::Left)),
            "s" => Some(session.step(Direction::Down)),
            "d" => Some(session.step(Direction::Right)),
            "r" => {
                session.reveal();
                None
            }
            "n" => {
                session.new_game(arg.unwrap_or(0));
                settings.level = session.level();
                None
            }
            "z" => {
                let tier = arg.unwrap_or(settings.size);
                match session.resize_tier(tier, VIEWPORT.0, VIEWPORT.1) {
                    Ok(()) => {
                        if let Some(layout) = session.layout() {
                            settings.size = layout.tier;
                        }
                    }
                    Err(e) => println!("{e}"),
                }
                None
            }
            "l" => {
                session.set_lives(arg.unwrap_or(settings.lives));
                settings.lives = session.lives();
                None
            }
            "q" => return false,
            _ => {
                println!("{HELP}");
                None
            }
        };

        if outcome == Some(MoveOutcome::Blocked) {
            println!("Blocked.");
        }
        true
    }

    fn print_cues(toggles: &EffectToggles, session: &mut GameSession) {
        for cue in toggles.cues_for(&session.drain_events()) {
            let mut parts = vec![format!("{:?}", cue.effect)];
            if let Some(sound) = cue.sound {
                parts.push(format!("sound: {}", sound.as_str()));
            }
            if let Some(haptic) = cue.haptic {
                parts.push(format!("haptic: {haptic:?}"));
            }
            if cue.flash.is_some() {
                parts.push("flash".to_string());
            }
            println!("[{}]", parts.join(", "));
        }
    }

    pub fn run() -> blind_man::Result<()> {
        let mut settings = Settings::load();
        let seed = std::env::args()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(time_seed);

        let layout = FieldLayout::from_viewport(VIEWPORT.0, VIEWPORT.1, settings.size)?;
        let mut session = GameSession::with_layout(layout, settings.session_config(), seed);
        log::info!("Game initialized with seed: {}", seed);

        if settings.first_run {
            println!("{HELP}");
            settings.first_run = false;
        }

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("{}{}\n> ", render(&session), status(&session));
            io::stdout().flush()?;

            let Some(line) = lines.next() else { break };
            if !apply(&mut session, &mut settings, line?.trim()) {
                break;
            }
            print_cues(&settings.effect_toggles(), &mut session);
        }

        settings.save()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use blind_man::sim::SessionConfig;

        #[test]
        fn test_render_marks_border_player_and_goal() {
            let layout = FieldLayout::from_viewport(VIEWPORT.0, VIEWPORT.1, 1).unwrap();
            let session = GameSession::with_layout(layout, SessionConfig::default(), 1);
            let text = render(&session);
            let rows: Vec<&str> = text.lines().collect();
            assert_eq!(rows.len() as i32, layout.size.height);
            assert!(rows[0].chars().all(|c| c == '#'));
            assert_eq!(rows[1].chars().nth(1), Some('@'));
            assert_eq!(text.matches('G').count(), 4);
        }

        #[test]
        fn test_commands_drive_session() {
            let layout = FieldLayout::from_viewport(VIEWPORT.0, VIEWPORT.1, 1).unwrap();
            let mut session = GameSession::with_layout(layout, SessionConfig::default(), 1);
            let mut settings = Settings::default();

            assert!(apply(&mut session, &mut settings, ""));
            assert_eq!(session.phase(), GamePhase::Show);
            assert!(apply(&mut session, &mut settings, "l 9"));
            assert_eq!(settings.lives, 9);
            assert!(apply(&mut session, &mut settings, "z 2"));
            assert_eq!(settings.size, 2);
            assert_eq!(session.phase(), GamePhase::Idle);
            assert!(!apply(&mut session, &mut settings, "q"));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Blind Man (native) starting...");
    if let Err(e) = terminal::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is `blind_man::platform::web::start`
}
