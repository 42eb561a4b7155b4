// Entry point: parses CLI overrides, loads config, starts logging, and runs the TUI.

use std::path::PathBuf;

use clap::Parser;

use pulsebars::app::App;
use pulsebars::config::Config;
use pulsebars::logging;

#[derive(Parser)]
#[command(name = "pulsebars", about = "Real-time spectrum bars in the terminal")]
struct Cli {
    /// Config file (default: ~/.config/pulsebars/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of bars to display
    #[arg(long)]
    bars: Option<usize>,

    /// Per-frame decay factor while paused, between 0 and 1
    #[arg(long)]
    decay: Option<f32>,

    /// Frames per second
    #[arg(long)]
    fps: Option<f64>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(bars) = self.bars {
            config.visualizer.bar_count = bars;
        }
        if let Some(decay) = self.decay {
            config.visualizer.decay_factor = decay;
        }
        if let Some(fps) = self.fps {
            config.general.frame_rate = fps;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    logging::init(&config)?;
    tracing::info!(
        bars = config.visualizer.bar_count,
        fps = config.general.frame_rate,
        "starting pulsebars"
    );

    let mut app = App::new(config)?;
    app.run().await?;

    Ok(())
}
