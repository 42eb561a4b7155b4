// Output gain stage: applies gain, hard-limits to [-1, 1], and remembers the
// block peak for the transport readout.

pub const MAX_GAIN: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct GainStage {
    gain: f32,
    peak: f32,
}

impl Default for GainStage {
    fn default() -> Self {
        Self {
            gain: 1.0,
            peak: 0.0,
        }
    }
}

impl GainStage {
    pub fn new(gain: f32) -> Self {
        let mut stage = Self::default();
        stage.set_gain(gain);
        stage
    }

    /// Set the gain, clamped to `0.0..=MAX_GAIN`.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = if gain.is_finite() {
            gain.clamp(0.0, MAX_GAIN)
        } else {
            1.0
        };
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Peak absolute sample value of the last processed block.
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Process a block in place.
    pub fn process(&mut self, block: &mut [f32]) {
        let mut peak = 0.0f32;
        for sample in block.iter_mut() {
            *sample = (*sample * self.gain).clamp(-1.0, 1.0);
            peak = peak.max(sample.abs());
        }
        self.peak = peak;
    }
}
