// Playback glue: starting tracks, pause/resume, and keeping the visualizer's
// binding in step with the player.

use tracing::info;

use crate::app::App;

pub(super) const GAIN_STEP: f32 = 0.1;

impl App {
    /// Start the next preset, wrapping around at the end of the list.
    pub(super) fn play_next_track(&mut self) -> anyhow::Result<()> {
        if self.tracks.is_empty() {
            return Ok(());
        }
        let next = self.track_index.map_or(0, |i| (i + 1) % self.tracks.len());
        self.track_index = Some(next);
        self.player.play(self.tracks[next].clone())
    }

    /// Pause/resume, or (re)start the current track if nothing is loaded.
    pub(super) fn toggle_play_pause(&mut self) -> anyhow::Result<()> {
        if self.visualizer.is_bound() {
            return self.player.toggle_pause();
        }
        let index = self.track_index.unwrap_or(0);
        let Some(track) = self.tracks.get(index).cloned() else {
            return Ok(());
        };
        self.track_index = Some(index);
        self.player.play(track)
    }

    /// A new track began: bind on first play, otherwise start from a clean
    /// set of bars so nothing carries over from the previous track.
    pub(super) fn on_track_started(&mut self) {
        if !self.visualizer.bind(self.player.source()) {
            self.visualizer.reset();
        }
        self.spectrum_bars.clear();
    }

    /// Playback ended or the engine went away: unbind and blank the bars.
    pub(super) fn on_playback_stopped(&mut self) {
        if self.visualizer.unbind().is_some() {
            info!("visualizer idle");
        }
        self.spectrum_bars.clear();
    }
}
