// Signal sources: the narrow contract the visualizer loop samples every tick,
// plus the channel-backed source fed by the player task.

use tokio::sync::watch;

use crate::error::SourceError;

/// One frequency-domain snapshot, lent out for a single reduce step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyFrame<'a> {
    /// Per-bin energies, lowest frequency first.
    pub bins: &'a [f32],
    /// The source's full-scale value, if it differs from the loop's default.
    pub max_value: Option<f32>,
}

impl<'a> FrequencyFrame<'a> {
    pub fn new(bins: &'a [f32]) -> Self {
        Self {
            bins,
            max_value: None,
        }
    }

    pub fn with_max_value(bins: &'a [f32], max_value: f32) -> Self {
        Self {
            bins,
            max_value: Some(max_value),
        }
    }
}

/// Anything that can hand the visualizer a frequency snapshot on demand.
pub trait SignalSource {
    /// Whether audio is currently being produced. Read once per tick.
    fn is_playing(&self) -> bool;

    /// Capture the current spectrum. `bin_hint` is the bar count the caller
    /// will reduce to; sources are free to ignore it.
    fn sample(&mut self, bin_hint: usize) -> Result<FrequencyFrame<'_>, SourceError>;
}

impl<S: SignalSource + ?Sized> SignalSource for Box<S> {
    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }

    fn sample(&mut self, bin_hint: usize) -> Result<FrequencyFrame<'_>, SourceError> {
        (**self).sample(bin_hint)
    }
}

/// A frame published by a producer on another task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumSnapshot {
    /// Bumped on every publish; 0 means nothing has been analysed yet.
    pub sequence: u64,
    pub bins: Vec<u8>,
}

/// Receiving half of a producer/consumer hand-off. The producer publishes
/// whole snapshots; `sample` copies the latest one into a local buffer so the
/// producer never waits on the render side. Bins are handed over as raw
/// analyser bytes with no max override, so the loop's configured
/// `max_value` decides the scale.
pub struct ChannelSource {
    frames: watch::Receiver<SpectrumSnapshot>,
    playing: watch::Receiver<bool>,
    buffer: Vec<f32>,
}

impl ChannelSource {
    pub fn new(frames: watch::Receiver<SpectrumSnapshot>, playing: watch::Receiver<bool>) -> Self {
        Self {
            frames,
            playing,
            buffer: Vec::new(),
        }
    }
}

impl SignalSource for ChannelSource {
    fn is_playing(&self) -> bool {
        *self.playing.borrow()
    }

    fn sample(&mut self, _bin_hint: usize) -> Result<FrequencyFrame<'_>, SourceError> {
        if self.frames.has_changed().is_err() {
            return Err(SourceError::Disconnected);
        }
        let snapshot = self.frames.borrow_and_update();
        if snapshot.sequence == 0 {
            return Err(SourceError::Unavailable("analyser not started"));
        }
        self.buffer.clear();
        self.buffer.extend(snapshot.bins.iter().map(|&b| b as f32));
        drop(snapshot);
        Ok(FrequencyFrame::new(&self.buffer))
    }
}
