// Library root: re-exports all modules so integration tests can `use pulsebars::*`.

pub mod action;
pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod player;
pub mod spectrum;
pub mod tui;
pub mod ui;
pub mod visualizer;

pub use error::{Error, SourceError};
pub use spectrum::{reduce, FrequencyFrame, SignalSource, SpectrumReducer};
pub use visualizer::{LoopState, RenderAdapter, TickOutcome, VisualizerLoop, VisualizerSettings};
