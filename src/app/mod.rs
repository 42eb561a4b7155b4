// Central coordinator: owns the player, the visualizer loop and the components.
// Runs the event loop (key/frame → Action → handle_action → draw).

mod input;
mod playback;

use tokio::sync::mpsc;
use tracing::warn;

use crate::action::Action;
use crate::components::spectrum_bars::SpectrumBars;
use crate::components::transport::Transport;
use crate::config::Config;
use crate::player::synth::{self, Track};
use crate::player::Player;
use crate::spectrum::ChannelSource;
use crate::tui::{Tui, TuiEvent};
use crate::ui;
use crate::visualizer::{TickOutcome, VisualizerLoop};

/// Top-level coordinator. The visualizer loop is ticked once per frame event
/// and draws into `spectrum_bars`; the player reports transport changes back
/// as actions.
pub struct App {
    running: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,

    // Components
    pub spectrum_bars: SpectrumBars,
    pub transport: Transport,

    // State
    pub visualizer: VisualizerLoop<ChannelSource>,
    player: Player,
    pub config: Config,
    pub(crate) tracks: Vec<Track>,
    pub(crate) track_index: Option<usize>,
    pub show_help: bool,
    pub error_message: Option<String>,
}

impl App {
    /// Build the app and spawn the player task. Needs a tokio runtime.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let settings = config.visualizer_settings();
        let visualizer = VisualizerLoop::new(settings)?;
        let player = Player::spawn(config.player_settings(), Some(action_tx.clone()))?;

        Ok(Self {
            running: true,
            action_tx,
            action_rx,
            spectrum_bars: SpectrumBars::new(settings.bar_count),
            transport: Transport::new(config.audio.gain),
            visualizer,
            player,
            config,
            tracks: synth::presets(),
            track_index: None,
            show_help: false,
            error_message: None,
        })
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut tui = Tui::new(self.config.general.frame_rate)?;
        tui.enter()?;

        self.action_tx.send(Action::NextTrack)?;

        while self.running {
            let state = ui::DrawState {
                spectrum_bars: &self.spectrum_bars,
                transport: &self.transport,
                error_message: &self.error_message,
                show_help: self.show_help,
            };
            tui.draw(|frame| ui::draw(frame, &state))?;

            tokio::select! {
                Some(event) = tui.event_rx.recv() => {
                    match event {
                        TuiEvent::Key(key) => self.handle_key(key)?,
                        TuiEvent::Resize => {} // ratatui redraws at correct size automatically
                        TuiEvent::Frame => self.action_tx.send(Action::Tick)?,
                    }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action)?;
                }
            }
        }

        self.visualizer.stop();
        tui.exit()?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn handle_action(&mut self, action: Action) -> anyhow::Result<()> {
        use crate::components::Component;

        match action {
            // Lifecycle
            Action::Quit => {
                let _ = self.player.stop();
                self.running = false;
            }
            Action::Tick => self.on_frame(),

            // Transport requests
            Action::TogglePlayPause => self.toggle_play_pause()?,
            Action::NextTrack => self.play_next_track()?,
            Action::Stop => self.player.stop()?,
            Action::SeekRelative(delta) => self.player.seek(delta)?,
            Action::GainUp => self.player.adjust_gain(playback::GAIN_STEP)?,
            Action::GainDown => self.player.adjust_gain(-playback::GAIN_STEP)?,

            // Player events
            Action::PlaybackStarted { .. } => {
                self.transport.update(&action)?;
                self.on_track_started();
            }
            Action::PlaybackStopped => {
                self.transport.update(&action)?;
                self.on_playback_stopped();
            }
            Action::PlaybackPaused
            | Action::PlaybackResumed
            | Action::PlaybackProgress { .. }
            | Action::GainChanged(_) => {
                self.transport.update(&action)?;
            }

            // Errors & help
            Action::ShowError(msg) => {
                self.error_message = Some(msg);
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                    tx.send(Action::ClearError).ok();
                });
            }
            Action::ClearError => self.error_message = None,
            Action::ShowHelp => self.show_help = true,
            Action::HideHelp => self.show_help = false,
        }
        Ok(())
    }

    /// One frame: advance the visualizer and refresh its diagnostics.
    fn on_frame(&mut self) {
        let outcome = self.visualizer.tick(&mut self.spectrum_bars);
        if outcome == TickOutcome::SourceFault && !self.player.is_running() {
            warn!("player task has exited; unbinding visualizer");
            self.on_playback_stopped();
            self.action_tx
                .send(Action::ShowError("Audio engine stopped".to_string()))
                .ok();
        }
        self.transport
            .set_diagnostics(self.visualizer.state(), self.visualizer.stats());
    }

    /// Receive every action queued so far and handle it.
    pub fn flush_actions(&mut self) {
        while let Ok(action) = self.action_rx.try_recv() {
            if let Err(e) = self.handle_action(action) {
                warn!(error = %e, "action failed");
            }
        }
    }

    /// Wait for the next queued action (e.g. a player event) and handle it.
    pub async fn next_action(&mut self) -> anyhow::Result<Option<Action>> {
        let Some(action) = self.action_rx.recv().await else {
            return Ok(None);
        };
        self.handle_action(action.clone())?;
        Ok(Some(action))
    }

    pub fn action_sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }
}
