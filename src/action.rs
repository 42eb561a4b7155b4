// Every user interaction, player event, and clock tick is represented as an
// Action variant. The App event loop dispatches these to handlers.

/// All events flowing through the app. The [`App`](crate::app::App) event
/// loop dispatches each variant to the appropriate handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Tick,

    // Transport requests (keyboard)
    TogglePlayPause,
    NextTrack,
    Stop,
    SeekRelative(f64),
    GainUp,
    GainDown,

    // Player events
    PlaybackStarted { title: String },
    PlaybackPaused,
    PlaybackResumed,
    PlaybackStopped,
    PlaybackProgress { position_secs: f64, peak: f32 },
    GainChanged(f32),

    ShowError(String),
    ClearError,
    ShowHelp,
    HideHelp,
}
