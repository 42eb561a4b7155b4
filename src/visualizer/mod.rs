// Visualizer loop: per-frame state machine that samples a bound source, reduces
// it to bars, and fades the bars out when playback stops.
//
// Frame-based rather than time-based: one tick is one reduce-or-decay step no
// matter how much wall time has passed since the previous tick.

use tracing::{debug, info, warn};

use crate::error::{Error, SourceError};
use crate::spectrum::{SignalSource, SpectrumReducer, DEFAULT_MAX_VALUE};

pub const DEFAULT_BAR_COUNT: usize = 32;
pub const DEFAULT_DECAY_FACTOR: f32 = 0.9;
pub const DEFAULT_DECAY_EPSILON: f32 = 1e-3;

/// Consumer of the bar sequence. Receives a read-only view once per emitting
/// tick; implementations that keep the values must copy them.
pub trait RenderAdapter {
    fn render(&mut self, bars: &[f32]);
}

impl<F: FnMut(&[f32])> RenderAdapter for F {
    fn render(&mut self, bars: &[f32]) {
        self(bars)
    }
}

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No source bound. Ticks do nothing.
    Idle,
    /// Bound to a playing source; every tick samples a fresh frame.
    Active,
    /// Bound, but the source is not playing; bars fade toward zero.
    Decaying,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Idle or stopped; nothing emitted.
    Skipped,
    /// A frame was sampled and reduced.
    Sampled,
    /// Bars were decayed because the source is paused.
    Decayed,
    /// The source failed to produce a frame; bars were decayed instead.
    SourceFault,
}

/// Tunables for a visualizer instance. `bar_count` is fixed for the lifetime
/// of the loop built from these settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualizerSettings {
    pub bar_count: usize,
    pub decay_factor: f32,
    pub decay_epsilon: f32,
    pub max_value: f32,
    pub contrast: f32,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            bar_count: DEFAULT_BAR_COUNT,
            decay_factor: DEFAULT_DECAY_FACTOR,
            decay_epsilon: DEFAULT_DECAY_EPSILON,
            max_value: DEFAULT_MAX_VALUE,
            contrast: 1.0,
        }
    }
}

impl VisualizerSettings {
    pub fn validate(&self) -> Result<(), Error> {
        if self.bar_count == 0 {
            return Err(Error::invalid("bar_count", "must be at least 1"));
        }
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return Err(Error::invalid(
                "decay_factor",
                format!("must lie strictly between 0 and 1, got {}", self.decay_factor),
            ));
        }
        if !(self.decay_epsilon >= 0.0 && self.decay_epsilon < 1.0) {
            return Err(Error::invalid(
                "decay_epsilon",
                format!("must lie in [0, 1), got {}", self.decay_epsilon),
            ));
        }
        Ok(())
    }

    fn reducer(&self) -> Result<SpectrumReducer, Error> {
        SpectrumReducer::new(self.max_value)?.with_contrast(self.contrast)
    }
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub frames_reduced: u64,
    pub decay_steps: u64,
    pub source_faults: u64,
}

pub struct VisualizerLoop<S> {
    settings: VisualizerSettings,
    reducer: SpectrumReducer,
    source: Option<S>,
    state: LoopState,
    /// Last emitted magnitude per bar.
    bars: Vec<f32>,
    scratch: Vec<f32>,
    faulted: bool,
    stopped: bool,
    stats: LoopStats,
}

impl<S: SignalSource> VisualizerLoop<S> {
    pub fn new(settings: VisualizerSettings) -> Result<Self, Error> {
        settings.validate()?;
        let reducer = settings.reducer()?;
        Ok(Self {
            settings,
            reducer,
            source: None,
            state: LoopState::Idle,
            bars: vec![0.0; settings.bar_count],
            scratch: vec![0.0; settings.bar_count],
            faulted: false,
            stopped: false,
            stats: LoopStats::default(),
        })
    }

    /// Build a loop already bound to `source`.
    pub fn with_source(settings: VisualizerSettings, source: S) -> Result<Self, Error> {
        let mut visualizer = Self::new(settings)?;
        visualizer.bind(source);
        Ok(visualizer)
    }

    /// Bind a source. Returns false (and drops `source`) when one is already
    /// bound or the loop has been stopped.
    pub fn bind(&mut self, source: S) -> bool {
        if self.stopped || self.source.is_some() {
            return false;
        }
        self.state = if source.is_playing() {
            LoopState::Active
        } else {
            LoopState::Decaying
        };
        self.source = Some(source);
        self.faulted = false;
        info!(state = ?self.state, "visualizer bound to signal source");
        true
    }

    /// Drop the bound source and clear the bars at once (no fade). Returns the
    /// source, or None if nothing was bound.
    pub fn unbind(&mut self) -> Option<S> {
        let source = self.source.take()?;
        self.state = LoopState::Idle;
        self.faulted = false;
        self.bars.fill(0.0);
        info!("visualizer unbound; bars cleared");
        Some(source)
    }

    /// Clear the bars for a fresh track without touching the binding.
    pub fn reset(&mut self) {
        self.bars.fill(0.0);
        debug!("visualizer bars reset");
    }

    /// Tear the loop down: unbind, and turn every later tick into a no-op.
    pub fn stop(&mut self) {
        self.unbind();
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn bars(&self) -> &[f32] {
        &self.bars
    }

    pub fn bar_count(&self) -> usize {
        self.settings.bar_count
    }

    pub fn settings(&self) -> &VisualizerSettings {
        &self.settings
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    /// Advance one frame and push the result to `adapter`.
    pub fn tick<R: RenderAdapter + ?Sized>(&mut self, adapter: &mut R) -> TickOutcome {
        if self.stopped {
            return TickOutcome::Skipped;
        }
        let Some(source) = self.source.as_mut() else {
            return TickOutcome::Skipped;
        };
        self.stats.ticks += 1;

        let next_state = if source.is_playing() {
            LoopState::Active
        } else {
            LoopState::Decaying
        };
        if next_state != self.state {
            debug!(from = ?self.state, to = ?next_state, "visualizer state change");
            self.state = next_state;
        }

        let outcome = match self.state {
            LoopState::Active => {
                match sample_into(source, &self.reducer, &mut self.scratch) {
                    Ok(()) => {
                        if self.faulted {
                            debug!("signal source recovered");
                            self.faulted = false;
                        }
                        self.bars.copy_from_slice(&self.scratch);
                        self.stats.frames_reduced += 1;
                        TickOutcome::Sampled
                    }
                    Err(reason) => {
                        if !self.faulted {
                            warn!(%reason, "spectrum sample failed; decaying this frame");
                            self.faulted = true;
                        }
                        self.stats.source_faults += 1;
                        self.decay_step();
                        TickOutcome::SourceFault
                    }
                }
            }
            LoopState::Decaying => {
                self.decay_step();
                TickOutcome::Decayed
            }
            LoopState::Idle => return TickOutcome::Skipped,
        };

        adapter.render(&self.bars);
        outcome
    }

    fn decay_step(&mut self) {
        let factor = self.settings.decay_factor;
        let epsilon = self.settings.decay_epsilon;
        for bar in &mut self.bars {
            let next = *bar * factor;
            *bar = if next < epsilon { 0.0 } else { next.min(1.0) };
        }
        self.stats.decay_steps += 1;
    }
}

/// Sample `source` and reduce into `out`. Failures carry a static reason;
/// nothing on this path allocates.
fn sample_into<S: SignalSource>(
    source: &mut S,
    reducer: &SpectrumReducer,
    out: &mut [f32],
) -> Result<(), SourceError> {
    let frame = source.sample(out.len())?;
    let reducer = match frame.max_value {
        Some(max) if !(max.is_finite() && max > 0.0) => {
            return Err(SourceError::Unavailable("frame max_value must be finite and > 0"));
        }
        Some(max) if max != reducer.max_value() => reducer
            .with_max_value(max)
            .map_err(|_| SourceError::Unavailable("frame max_value rejected"))?,
        _ => *reducer,
    };
    reducer
        .reduce_into(frame.bins, out)
        .map_err(|_| SourceError::Unavailable("bar buffer is empty"))
}
