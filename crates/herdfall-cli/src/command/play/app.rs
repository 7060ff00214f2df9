use crossterm::event::Event;
use herdfall_engine::{ConfigError, EngineConfig, SessionSeed};
use ratatui::Frame;

use crate::{
    command::play::{FRAME, screen::PlayScreen},
    tui::{App, Tui},
};

#[derive(Debug)]
pub struct PlayApp {
    screen: PlayScreen,
    seed: SessionSeed,
}

impl PlayApp {
    pub fn new(config: EngineConfig, seed: SessionSeed) -> Result<Self, ConfigError> {
        Ok(Self {
            screen: PlayScreen::new(config, seed)?,
            seed,
        })
    }

    /// One-line result printed after the terminal is restored.
    pub fn summary(&self) -> String {
        let stats = self.screen.session().stats();
        format!(
            "score {} | level {} | locks {} | clears {} | seed {}",
            stats.score(),
            stats.level(),
            stats.locks(),
            stats.regions_cleared(),
            self.seed
        )
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(FRAME);
    }

    fn should_exit(&self) -> bool {
        self.screen.is_exiting()
    }

    fn handle_event(&mut self, event: &Event) {
        self.screen.handle_event(event);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn update(&mut self) {
        if self.screen.is_playing() {
            self.screen.update();
        }
    }
}
