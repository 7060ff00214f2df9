use std::time::Duration;

use crate::{
    command::{ConfigArg, play::app::PlayApp},
    tui::Tui,
};

mod app;
mod screen;

/// Simulated time fed to the session on every tick.
const FRAME_MS: u64 = 16;
const FRAME: Duration = Duration::from_millis(FRAME_MS);

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    pub(super) config: ConfigArg,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { config } = arg;

    let engine_config = config.load_config()?;
    let seed = config.seed();
    let mut app = PlayApp::new(engine_config, seed)?;
    Tui::new().run(&mut app)?;

    println!("{}", app.summary());
    Ok(())
}
