// Audio player stand-in: a tokio task that renders the current track block by
// block, runs it through the gain stage and analyser, and publishes spectrum
// snapshots for the visualizer. Controlled over a command channel; reports
// transport changes back to the app as Actions.

pub mod analyser;
pub mod engine;
pub mod synth;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{debug, info};

use crate::action::Action;
use crate::error::Error;
use crate::spectrum::{ChannelSource, SpectrumSnapshot};
use analyser::{Analyser, AnalyserSettings};
use engine::GainStage;
use synth::{Synth, Track};

// Audio is rendered in 10ms blocks.
const BLOCKS_PER_SEC: u32 = 100;
// Progress (position + peak) is reported every 100ms.
const BLOCKS_PER_PROGRESS: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Play(Track),
    TogglePause,
    Stop,
    /// Relative seek in seconds.
    Seek(f64),
    /// Add to the current gain (clamped to the engine's range).
    AdjustGain(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSettings {
    pub sample_rate: u32,
    pub gain: f32,
    pub analyser: AnalyserSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            gain: 1.0,
            analyser: AnalyserSettings::default(),
        }
    }
}

/// Handle to the running player task. Dropping it stops the task.
pub struct Player {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    frames: watch::Receiver<SpectrumSnapshot>,
    playing: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl Player {
    /// Spawn the player task. Must be called inside a tokio runtime.
    pub fn spawn(
        settings: PlayerSettings,
        action_tx: Option<mpsc::UnboundedSender<Action>>,
    ) -> Result<Self, Error> {
        if settings.sample_rate < BLOCKS_PER_SEC {
            return Err(Error::invalid(
                "sample_rate",
                format!("must be at least {} Hz", BLOCKS_PER_SEC),
            ));
        }
        let analyser = Analyser::new(settings.analyser)?;
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (frames_tx, frames) = watch::channel(SpectrumSnapshot::default());
        let (playing_tx, playing) = watch::channel(false);

        let task = PlayerTask {
            settings,
            analyser,
            gain: GainStage::new(settings.gain),
            synth: None,
            paused: false,
            frames_tx,
            playing_tx,
            action_tx,
        };
        let task = tokio::spawn(task.run(command_rx));

        Ok(Self {
            commands,
            frames,
            playing,
            task,
        })
    }

    /// A fresh signal source reading this player's analyser output.
    pub fn source(&self) -> ChannelSource {
        ChannelSource::new(self.frames.clone(), self.playing.clone())
    }

    pub fn is_playing(&self) -> bool {
        *self.playing.borrow()
    }

    /// False once the task has exited (panicked or aborted).
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn play(&self, track: Track) -> anyhow::Result<()> {
        self.send(PlayerCommand::Play(track))
    }

    pub fn toggle_pause(&self) -> anyhow::Result<()> {
        self.send(PlayerCommand::TogglePause)
    }

    pub fn stop(&self) -> anyhow::Result<()> {
        self.send(PlayerCommand::Stop)
    }

    pub fn seek(&self, delta_secs: f64) -> anyhow::Result<()> {
        self.send(PlayerCommand::Seek(delta_secs))
    }

    pub fn adjust_gain(&self, delta: f32) -> anyhow::Result<()> {
        self.send(PlayerCommand::AdjustGain(delta))
    }

    fn send(&self, command: PlayerCommand) -> anyhow::Result<()> {
        self.commands
            .send(command)
            .map_err(|e| anyhow::anyhow!("player task is gone: {:?}", e.0))
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct PlayerTask {
    settings: PlayerSettings,
    analyser: Analyser,
    gain: GainStage,
    synth: Option<Synth>,
    paused: bool,
    frames_tx: watch::Sender<SpectrumSnapshot>,
    playing_tx: watch::Sender<bool>,
    action_tx: Option<mpsc::UnboundedSender<Action>>,
}

impl PlayerTask {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<PlayerCommand>) {
        let block_len = (self.settings.sample_rate / BLOCKS_PER_SEC) as usize;
        let mut block = vec![0.0f32; block_len];
        let mut blocks_rendered: u32 = 0;

        let mut clock = tokio::time::interval(Duration::from_secs(1) / BLOCKS_PER_SEC);
        clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle(command);
                }
                _ = clock.tick() => {
                    if self.paused {
                        continue;
                    }
                    let Some(synth) = self.synth.as_mut() else { continue };
                    synth.render(&mut block);
                    self.gain.process(&mut block);
                    self.analyser.push(&block);
                    let bins = self.analyser.byte_frequency_data();
                    self.frames_tx.send_modify(|snapshot| {
                        snapshot.sequence += 1;
                        snapshot.bins.clear();
                        snapshot.bins.extend_from_slice(bins);
                    });

                    blocks_rendered = blocks_rendered.wrapping_add(1);
                    if blocks_rendered % BLOCKS_PER_PROGRESS == 0 {
                        let position_secs = synth.position_secs();
                        let peak = self.gain.peak();
                        self.emit(Action::PlaybackProgress { position_secs, peak });
                    }
                }
            }
        }
        debug!("player task exiting");
    }

    fn handle(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Play(track) => {
                info!(title = %track.title, "playing track");
                self.analyser.clear();
                self.publish_silence();
                let title = track.title.clone();
                self.synth = Some(Synth::new(track, self.settings.sample_rate));
                self.set_paused(false);
                self.emit(Action::PlaybackStarted { title });
            }
            PlayerCommand::TogglePause => {
                if self.synth.is_none() {
                    return;
                }
                let paused = !self.paused;
                self.set_paused(paused);
                self.emit(if paused {
                    Action::PlaybackPaused
                } else {
                    Action::PlaybackResumed
                });
            }
            PlayerCommand::Stop => {
                if self.synth.take().is_some() {
                    info!("playback stopped");
                    self.analyser.clear();
                    self.publish_silence();
                    self.set_paused(false);
                    self.emit(Action::PlaybackStopped);
                }
            }
            PlayerCommand::Seek(delta) => {
                if let Some(synth) = self.synth.as_mut() {
                    synth.seek(delta);
                    let position_secs = synth.position_secs();
                    let peak = self.gain.peak();
                    self.emit(Action::PlaybackProgress { position_secs, peak });
                }
            }
            PlayerCommand::AdjustGain(delta) => {
                self.gain.set_gain(self.gain.gain() + delta);
                debug!(gain = self.gain.gain(), "gain changed");
                self.emit(Action::GainChanged(self.gain.gain()));
            }
        }
    }

    /// Replace the published frame with an empty one so nothing from the
    /// previous track can be sampled before the next block lands.
    fn publish_silence(&self) {
        self.frames_tx.send_modify(|snapshot| {
            snapshot.sequence += 1;
            snapshot.bins.clear();
        });
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        let playing = self.synth.is_some() && !paused;
        self.playing_tx.send_replace(playing);
    }

    fn emit(&self, action: Action) {
        if let Some(tx) = &self.action_tx {
            tx.send(action).ok();
        }
    }
}
