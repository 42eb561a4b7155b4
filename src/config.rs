// User configuration loaded from ~/.config/pulsebars/config.toml.
// Falls back to sensible defaults when the file or any field is missing.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::player::analyser::AnalyserSettings;
use crate::player::PlayerSettings;
use crate::visualizer::{
    VisualizerSettings, DEFAULT_BAR_COUNT, DEFAULT_DECAY_EPSILON, DEFAULT_DECAY_FACTOR,
};

/// Application configuration, deserialized from `~/.config/pulsebars/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub visualizer: VisualizerConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Visualizer frame rate in frames per second (default: 60).
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// Log level for the `pulsebars` target (default: "debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualizerConfig {
    #[serde(default = "default_bar_count")]
    pub bar_count: usize,
    /// Per-frame multiplier applied to the bars while paused.
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f32,
    /// Bars below this snap to zero while decaying.
    #[serde(default = "default_decay_epsilon")]
    pub decay_epsilon: f32,
    /// Full-scale input value used for normalization.
    #[serde(default = "default_max_value")]
    pub max_value: f32,
    /// Exponent applied to normalized bars; 1.0 is linear.
    #[serde(default = "default_contrast")]
    pub contrast: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    #[serde(default = "default_min_decibels")]
    pub min_decibels: f32,
    #[serde(default = "default_max_decibels")]
    pub max_decibels: f32,
    #[serde(default = "default_gain")]
    pub gain: f32,
}

fn default_frame_rate() -> f64 {
    60.0
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_bar_count() -> usize {
    DEFAULT_BAR_COUNT
}

fn default_decay_factor() -> f32 {
    DEFAULT_DECAY_FACTOR
}

fn default_decay_epsilon() -> f32 {
    DEFAULT_DECAY_EPSILON
}

fn default_max_value() -> f32 {
    crate::spectrum::DEFAULT_MAX_VALUE
}

fn default_contrast() -> f32 {
    1.0
}

fn default_sample_rate() -> u32 {
    44_100
}

fn default_fft_size() -> usize {
    256
}

fn default_smoothing() -> f32 {
    0.8
}

fn default_min_decibels() -> f32 {
    -100.0
}

fn default_max_decibels() -> f32 {
    -30.0
}

fn default_gain() -> f32 {
    1.0
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            log_level: default_log_level(),
        }
    }
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            bar_count: default_bar_count(),
            decay_factor: default_decay_factor(),
            decay_epsilon: default_decay_epsilon(),
            max_value: default_max_value(),
            contrast: default_contrast(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            fft_size: default_fft_size(),
            smoothing: default_smoothing(),
            min_decibels: default_min_decibels(),
            max_decibels: default_max_decibels(),
            gain: default_gain(),
        }
    }
}

impl Config {
    /// Read config from the default location, or return defaults if the file
    /// doesn't exist.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read config from `path`, or return defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pulsebars")
            .join("config.toml")
    }

    /// Check every section; the first bad value wins.
    pub fn validate(&self) -> anyhow::Result<()> {
        let fps = self.general.frame_rate;
        if !fps.is_finite() || fps <= 0.0 || fps > 1000.0 {
            anyhow::bail!("general.frame_rate must be in (0, 1000], got {}", fps);
        }
        self.visualizer_settings().validate()?;
        crate::spectrum::SpectrumReducer::new(self.visualizer.max_value)?
            .with_contrast(self.visualizer.contrast)?;
        self.player_settings().analyser.validate()?;
        Ok(())
    }

    pub fn visualizer_settings(&self) -> VisualizerSettings {
        VisualizerSettings {
            bar_count: self.visualizer.bar_count,
            decay_factor: self.visualizer.decay_factor,
            decay_epsilon: self.visualizer.decay_epsilon,
            max_value: self.visualizer.max_value,
            contrast: self.visualizer.contrast,
        }
    }

    pub fn player_settings(&self) -> PlayerSettings {
        PlayerSettings {
            sample_rate: self.audio.sample_rate,
            gain: self.audio.gain,
            analyser: AnalyserSettings {
                fft_size: self.audio.fft_size,
                smoothing: self.audio.smoothing,
                min_decibels: self.audio.min_decibels,
                max_decibels: self.audio.max_decibels,
            },
        }
    }
}
