use crossterm::event::{Event, KeyCode};
use herdfall_engine::{ConfigError, EngineConfig, GameEvent, GameSession, SessionSeed, SessionState};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{command::play::FRAME_MS, ui::widgets::SessionDisplay};

/// Player intents decoded from key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateCcw,
    RotateCw,
    TogglePause,
    Restart,
    Quit,
}

impl Command {
    fn from_key(code: KeyCode) -> Option<Self> {
        let command = match code {
            KeyCode::Left => Self::MoveLeft,
            KeyCode::Right => Self::MoveRight,
            KeyCode::Down => Self::SoftDrop,
            KeyCode::Char('z' | 'Z') => Self::RotateCcw,
            KeyCode::Char('x' | 'X') | KeyCode::Up => Self::RotateCw,
            KeyCode::Char('p' | 'P') => Self::TogglePause,
            KeyCode::Char('r' | 'R') => Self::Restart,
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Text shown under the board for the events of one update, if any of them
/// deserves a mention.
fn banner_for(events: &[GameEvent]) -> Option<String> {
    let parts: Vec<String> = events
        .iter()
        .filter_map(|event| match event {
            GameEvent::MoveBlocked | GameEvent::PieceLocked { .. } => None,
            GameEvent::WolvesBlast { popped } => Some(format!("🐺 Wolves! {} popped", popped.len())),
            GameEvent::BlackSheepConverted { animal, .. } => {
                Some(format!("Black sheep joined the {}", animal.group_name()))
            }
            GameEvent::RegionCleared(region) => Some(region.banner()),
            GameEvent::LevelUp { level } => Some(format!("Level {level}!")),
            GameEvent::GameOver => Some("Game over".to_owned()),
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(" | "))
}

#[derive(Debug)]
pub struct PlayScreen {
    session: GameSession,
    banner: Option<String>,
    is_exiting: bool,
}

impl PlayScreen {
    pub fn new(config: EngineConfig, seed: SessionSeed) -> Result<Self, ConfigError> {
        Ok(Self {
            session: GameSession::with_seed(config, seed)?,
            banner: None,
            is_exiting: false,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn is_playing(&self) -> bool {
        !self.is_exiting && self.session.session_state().is_playing()
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let session_display = SessionDisplay::new(&self.session).banner(self.banner.as_deref());
        let help_text = match self.session.session_state() {
            SessionState::Playing => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | Z X (Rotate) | P (Pause) | R (Restart) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | R (Restart) | Q (Quit)",
            SessionState::GameOver => "Controls: R (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    pub fn handle_event(&mut self, event: &Event) {
        if let Some(command) = event
            .as_key_press_event()
            .and_then(|key| Command::from_key(key.code))
        {
            self.apply(command);
        }
    }

    /// Advances the fall timer by one frame.
    pub fn update(&mut self) {
        self.session.tick(FRAME_MS);
        self.take_events();
    }

    fn apply(&mut self, command: Command) {
        let is_playing = self.is_playing();
        match command {
            Command::MoveLeft if is_playing => _ = self.session.move_left(),
            Command::MoveRight if is_playing => _ = self.session.move_right(),
            Command::SoftDrop if is_playing => _ = self.session.soft_drop(),
            Command::RotateCcw if is_playing => _ = self.session.rotate_ccw(),
            Command::RotateCw if is_playing => _ = self.session.rotate_cw(),
            Command::TogglePause => self.session.toggle_pause(),
            Command::Restart => {
                self.session.restart();
                self.banner = None;
            }
            Command::Quit => self.is_exiting = true,
            _ => {}
        }
        self.take_events();
    }

    fn take_events(&mut self) {
        if let Some(banner) = banner_for(&self.session.drain_events()) {
            self.banner = Some(banner);
        }
    }
}
