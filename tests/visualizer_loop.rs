// Visualizer loop: state transitions, per-tick sample/decay behavior, fault
// handling, and binding rules, all driven by a scripted in-memory source.

use pulsebars::error::{Error, SourceError};
use pulsebars::spectrum::{FrequencyFrame, SignalSource};
use pulsebars::visualizer::{
    LoopState, RenderAdapter, TickOutcome, VisualizerLoop, VisualizerSettings,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Source whose playing flag, frame, and failure mode are set by the test.
struct ScriptedSource {
    playing: bool,
    frame: Vec<f32>,
    max_value: Option<f32>,
    failure: Option<SourceError>,
    samples_taken: usize,
}

impl ScriptedSource {
    fn playing(frame: Vec<f32>) -> Self {
        Self {
            playing: true,
            frame,
            max_value: None,
            failure: None,
            samples_taken: 0,
        }
    }
}

impl SignalSource for ScriptedSource {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn sample(&mut self, _bin_hint: usize) -> Result<FrequencyFrame<'_>, SourceError> {
        self.samples_taken += 1;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(FrequencyFrame {
            bins: &self.frame,
            max_value: self.max_value,
        })
    }
}

/// Adapter that records every emitted bar sequence.
#[derive(Default)]
struct Recorder {
    frames: Vec<Vec<f32>>,
}

impl RenderAdapter for Recorder {
    fn render(&mut self, bars: &[f32]) {
        self.frames.push(bars.to_vec());
    }
}

fn settings(bar_count: usize) -> VisualizerSettings {
    VisualizerSettings {
        bar_count,
        ..VisualizerSettings::default()
    }
}

fn bound_loop(bar_count: usize, frame: Vec<f32>) -> VisualizerLoop<ScriptedSource> {
    VisualizerLoop::with_source(settings(bar_count), ScriptedSource::playing(frame)).unwrap()
}

// ── Construction ─────────────────────────────────────────────────────────────

#[test]
fn test_new_loop_is_idle_with_zero_bars() {
    let visualizer: VisualizerLoop<ScriptedSource> = VisualizerLoop::new(settings(8)).unwrap();
    assert_eq!(visualizer.state(), LoopState::Idle);
    assert_eq!(visualizer.bars(), &[0.0; 8]);
    assert!(!visualizer.is_bound());
}

#[test]
fn test_invalid_settings_are_rejected() {
    let cases = [
        VisualizerSettings { bar_count: 0, ..Default::default() },
        VisualizerSettings { decay_factor: 0.0, ..Default::default() },
        VisualizerSettings { decay_factor: 1.0, ..Default::default() },
        VisualizerSettings { decay_epsilon: -0.1, ..Default::default() },
        VisualizerSettings { max_value: 0.0, ..Default::default() },
    ];
    for case in cases {
        let result = VisualizerLoop::<ScriptedSource>::new(case);
        assert!(
            matches!(result, Err(Error::InvalidArgument { .. })),
            "accepted {:?}",
            case
        );
    }
}

// ── Idle ─────────────────────────────────────────────────────────────────────

#[test]
fn test_idle_tick_emits_nothing() {
    let mut visualizer: VisualizerLoop<ScriptedSource> = VisualizerLoop::new(settings(4)).unwrap();
    let mut calls = 0;
    let mut adapter = |_: &[f32]| calls += 1;
    assert_eq!(visualizer.tick(&mut adapter), TickOutcome::Skipped);
    assert_eq!(visualizer.tick(&mut adapter), TickOutcome::Skipped);
    assert_eq!(calls, 0);
    assert_eq!(visualizer.stats().ticks, 0);
}

// ── Active ───────────────────────────────────────────────────────────────────

#[test]
fn test_active_tick_reduces_fresh_frame() {
    let mut visualizer = bound_loop(4, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0]);
    let mut recorder = Recorder::default();

    assert_eq!(visualizer.tick(&mut recorder), TickOutcome::Sampled);
    assert_eq!(visualizer.state(), LoopState::Active);
    assert_eq!(recorder.frames.len(), 1);
    let expected: [f32; 4] = [15.0 / 255.0, 35.0 / 255.0, 55.0 / 255.0, 75.0 / 255.0];
    for (bar, e) in recorder.frames[0].iter().zip(expected) {
        assert!((bar - e).abs() < 1e-6);
    }
}

#[test]
fn test_rising_signal_has_no_smoothing_lag() {
    let mut visualizer = bound_loop(2, vec![0.0, 0.0]);
    let mut recorder = Recorder::default();
    visualizer.tick(&mut recorder);
    assert_eq!(visualizer.bars(), &[0.0, 0.0]);

    visualizer.source_mut().unwrap().frame = vec![255.0, 255.0];
    visualizer.tick(&mut recorder);
    assert_eq!(visualizer.bars(), &[1.0, 1.0]);
}

#[test]
fn test_frame_length_may_change_between_ticks() {
    let mut visualizer = bound_loop(4, vec![255.0; 16]);
    let mut recorder = Recorder::default();
    visualizer.tick(&mut recorder);

    visualizer.source_mut().unwrap().frame = vec![255.0; 2];
    visualizer.tick(&mut recorder);
    assert_eq!(recorder.frames[1], vec![1.0, 1.0, 0.0, 0.0]);

    visualizer.source_mut().unwrap().frame = vec![];
    visualizer.tick(&mut recorder);
    assert_eq!(recorder.frames[2], vec![0.0; 4]);
}

#[test]
fn test_frame_max_value_overrides_default_normalization() {
    let mut visualizer = bound_loop(2, vec![0.5, 0.5, 1.0, 1.0]);
    visualizer.source_mut().unwrap().max_value = Some(1.0);
    let mut recorder = Recorder::default();
    visualizer.tick(&mut recorder);
    assert_eq!(visualizer.bars(), &[0.5, 1.0]);
}

// ── Decaying ─────────────────────────────────────────────────────────────────

#[test]
fn test_paused_source_decays_geometrically() {
    let mut visualizer = bound_loop(2, vec![255.0, 127.5]);
    let mut recorder = Recorder::default();
    visualizer.tick(&mut recorder);
    let before = visualizer.bars().to_vec();

    visualizer.source_mut().unwrap().playing = false;
    assert_eq!(visualizer.tick(&mut recorder), TickOutcome::Decayed);
    assert_eq!(visualizer.state(), LoopState::Decaying);
    assert_eq!(visualizer.bars(), &[before[0] * 0.9, before[1] * 0.9]);
    assert_eq!(visualizer.source().unwrap().samples_taken, 1, "paused ticks must not sample");
}

#[test]
fn test_decay_converges_to_exact_zero() {
    let mut visualizer = bound_loop(16, vec![255.0; 64]);
    let mut recorder = Recorder::default();
    visualizer.tick(&mut recorder);
    assert_eq!(visualizer.bars(), &[1.0; 16]);

    visualizer.source_mut().unwrap().playing = false;
    let mut ticks = 0;
    while visualizer.bars().iter().any(|&b| b != 0.0) {
        visualizer.tick(&mut recorder);
        ticks += 1;
        assert!(ticks <= 100, "decay did not converge within 100 ticks");
    }
    for bar in visualizer.bars() {
        assert!((0.0..=1.0).contains(bar));
    }
}

#[test]
fn test_resume_returns_to_active() {
    let mut visualizer = bound_loop(2, vec![100.0, 100.0]);
    let mut recorder = Recorder::default();
    visualizer.source_mut().unwrap().playing = false;
    visualizer.tick(&mut recorder);
    assert_eq!(visualizer.state(), LoopState::Decaying);

    visualizer.source_mut().unwrap().playing = true;
    assert_eq!(visualizer.tick(&mut recorder), TickOutcome::Sampled);
    assert_eq!(visualizer.state(), LoopState::Active);
}

// ── Faults ───────────────────────────────────────────────────────────────────

#[test]
fn test_source_failure_decays_for_that_tick_only() {
    let mut visualizer = bound_loop(2, vec![255.0, 255.0]);
    let mut recorder = Recorder::default();
    visualizer.tick(&mut recorder);

    visualizer.source_mut().unwrap().failure =
        Some(SourceError::Unavailable("context suspended".into()));
    assert_eq!(visualizer.tick(&mut recorder), TickOutcome::SourceFault);
    assert_eq!(visualizer.bars(), &[0.9, 0.9]);
    assert_eq!(recorder.frames.len(), 2, "fault tick still emits decayed bars");
    assert_eq!(visualizer.stats().source_faults, 1);
    assert_eq!(visualizer.state(), LoopState::Active);

    visualizer.source_mut().unwrap().failure = None;
    assert_eq!(visualizer.tick(&mut recorder), TickOutcome::Sampled);
    assert_eq!(visualizer.bars(), &[1.0, 1.0]);
}

#[test]
fn test_invalid_frame_max_is_treated_as_fault() {
    for max in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let mut visualizer = bound_loop(2, vec![1.0, 1.0]);
        visualizer.source_mut().unwrap().max_value = Some(max);
        let mut recorder = Recorder::default();
        assert_eq!(visualizer.tick(&mut recorder), TickOutcome::SourceFault, "max {}", max);
        assert_eq!(visualizer.bars(), &[0.0, 0.0]);
        assert_eq!(visualizer.stats().source_faults, 1);
    }
}

// ── Binding ──────────────────────────────────────────────────────────────────

#[test]
fn test_bind_is_idempotent() {
    let mut visualizer = bound_loop(2, vec![255.0, 255.0]);
    assert!(!visualizer.bind(ScriptedSource::playing(vec![0.0, 0.0])));
    let mut recorder = Recorder::default();
    visualizer.tick(&mut recorder);
    assert_eq!(visualizer.bars(), &[1.0, 1.0], "original source must stay bound");
}

#[test]
fn test_unbind_clears_immediately_and_is_idempotent() {
    let mut visualizer = bound_loop(3, vec![255.0; 3]);
    let mut recorder = Recorder::default();
    visualizer.tick(&mut recorder);

    assert!(visualizer.unbind().is_some());
    assert_eq!(visualizer.state(), LoopState::Idle);
    assert_eq!(visualizer.bars(), &[0.0; 3]);
    assert!(visualizer.unbind().is_none());
    assert_eq!(visualizer.tick(&mut recorder), TickOutcome::Skipped);
}

#[test]
fn test_reset_clears_bars_but_keeps_binding() {
    let mut visualizer = bound_loop(2, vec![255.0, 255.0]);
    let mut recorder = Recorder::default();
    visualizer.tick(&mut recorder);

    visualizer.reset();
    assert_eq!(visualizer.bars(), &[0.0, 0.0]);
    assert!(visualizer.is_bound());
}

#[test]
fn test_stopped_loop_ignores_ticks_and_binds() {
    let mut visualizer = bound_loop(2, vec![255.0, 255.0]);
    visualizer.stop();
    let mut recorder = Recorder::default();
    assert_eq!(visualizer.tick(&mut recorder), TickOutcome::Skipped);
    assert!(!visualizer.bind(ScriptedSource::playing(vec![1.0])));
    assert!(recorder.frames.is_empty());
    assert!(visualizer.is_stopped());
}

// ── Full session ─────────────────────────────────────────────────────────────

#[test]
fn test_play_pause_unbind_session() {
    let mut visualizer = bound_loop(4, vec![0.0; 8]);
    let mut recorder = Recorder::default();

    // Ticks 1-3: live samples.
    for tick in 1..=3u8 {
        let level = tick as f32 * 50.0;
        visualizer.source_mut().unwrap().frame = vec![level; 8];
        assert_eq!(visualizer.tick(&mut recorder), TickOutcome::Sampled);
        for bar in visualizer.bars() {
            assert!((bar - level / 255.0).abs() < 1e-6, "tick {}: {}", tick, bar);
        }
    }

    // Ticks 4-8: geometric decay from the last live value.
    visualizer.source_mut().unwrap().playing = false;
    let mut expected = visualizer.bars()[0];
    for _ in 4..=8 {
        assert_eq!(visualizer.tick(&mut recorder), TickOutcome::Decayed);
        expected *= 0.9;
        assert_eq!(visualizer.bars(), &[expected; 4]);
    }
    assert!(expected > 0.0);

    // Tick 9: unbind forces zeros without waiting for the fade.
    visualizer.unbind();
    assert_eq!(visualizer.bars(), &[0.0; 4]);
    assert_eq!(visualizer.tick(&mut recorder), TickOutcome::Skipped);
    assert_eq!(recorder.frames.len(), 8);

    let stats = visualizer.stats();
    assert_eq!(stats.frames_reduced, 3);
    assert_eq!(stats.decay_steps, 5);
}
