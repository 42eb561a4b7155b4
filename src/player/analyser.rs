// Frequency analyser modelled on the browser AnalyserNode: keeps the most
// recent `fft_size` output samples, and on request produces `fft_size / 2`
// byte energies (Blackman window, time smoothing, dB range mapped to 0..=255).

use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::Error;

/// Analyser tuning, mirrored from the `[audio]` config section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyserSettings {
    pub fft_size: usize,
    /// Weight of the previous frame in the time smoothing, `0.0..1.0`.
    pub smoothing: f32,
    pub min_decibels: f32,
    pub max_decibels: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserSettings {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(Error::invalid(
                "fft_size",
                format!("must be a power of two in 32..=32768, got {}", self.fft_size),
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(Error::invalid(
                "smoothing",
                format!("must lie in [0, 1), got {}", self.smoothing),
            ));
        }
        if !(self.min_decibels < self.max_decibels) {
            return Err(Error::invalid(
                "min_decibels",
                format!(
                    "must be below max_decibels ({} >= {})",
                    self.min_decibels, self.max_decibels
                ),
            ));
        }
        Ok(())
    }
}

pub struct Analyser {
    settings: AnalyserSettings,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    history: VecDeque<f32>,
    spectrum: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
}

impl Analyser {
    pub fn new(settings: AnalyserSettings) -> Result<Self, Error> {
        settings.validate()?;
        let size = settings.fft_size;
        let fft = FftPlanner::new().plan_fft_forward(size);
        Ok(Self {
            settings,
            fft,
            window: (0..size).map(|i| blackman_window(i, size)).collect(),
            history: std::iter::repeat(0.0).take(size).collect(),
            spectrum: vec![Complex::new(0.0, 0.0); size],
            smoothed: vec![0.0; size / 2],
            bytes: vec![0; size / 2],
        })
    }

    pub fn settings(&self) -> &AnalyserSettings {
        &self.settings
    }

    /// Number of frequency bins produced per analysis.
    pub fn bin_count(&self) -> usize {
        self.settings.fft_size / 2
    }

    /// Feed output samples. Only the last `fft_size` are kept.
    pub fn push(&mut self, samples: &[f32]) {
        let size = self.settings.fft_size;
        let skip = samples.len().saturating_sub(size);
        for &sample in &samples[skip..] {
            if self.history.len() == size {
                self.history.pop_front();
            }
            self.history.push_back(sample);
        }
    }

    /// Forget all history, as after a track change.
    pub fn clear(&mut self) {
        self.history.iter_mut().for_each(|s| *s = 0.0);
        self.smoothed.fill(0.0);
        self.bytes.fill(0);
    }

    /// Run the transform over the current history and return byte energies,
    /// lowest frequency first.
    pub fn byte_frequency_data(&mut self) -> &[u8] {
        let size = self.settings.fft_size;
        for ((slot, &sample), &w) in self
            .spectrum
            .iter_mut()
            .zip(self.history.iter())
            .zip(self.window.iter())
        {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.spectrum);

        let tau = self.settings.smoothing;
        let scale = 1.0 / size as f32;
        let db_range = self.settings.max_decibels - self.settings.min_decibels;
        for (k, (smoothed, byte)) in self
            .smoothed
            .iter_mut()
            .zip(self.bytes.iter_mut())
            .enumerate()
        {
            let magnitude = self.spectrum[k].norm() * scale;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
            let db = 20.0 * smoothed.max(1e-10).log10();
            let scaled = 255.0 * (db - self.settings.min_decibels) / db_range;
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }
        &self.bytes
    }
}

/// Blackman window (alpha = 0.16), the analyser's standard taper.
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let x = index as f32 / size as f32;
    0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
}
