// Spectrum reducer: squeezes an arbitrarily long frequency-energy buffer into a
// fixed number of normalized bar magnitudes.
//
// Windows are contiguous, ceil(n / bars) samples wide, with the last one taking
// the remainder. When that sizing would starve a trailing window even though
// n >= bars, the split falls back to q = n / bars, r = n % bars: the first r
// windows take q + 1 samples, the rest take q. Fewer samples than bars leaves
// the trailing windows empty (those bars read 0).

use std::ops::Range;

use crate::error::Error;

/// Default normalization maximum, matching 8-bit analyser output.
pub const DEFAULT_MAX_VALUE: f32 = 255.0;

/// Stateless reducer configuration. Cheap to copy; owned by whoever drives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumReducer {
    max_value: f32,
    contrast: f32,
}

impl Default for SpectrumReducer {
    fn default() -> Self {
        Self {
            max_value: DEFAULT_MAX_VALUE,
            contrast: 1.0,
        }
    }
}

impl SpectrumReducer {
    /// Build a reducer normalizing against `max_value`, with a linear response.
    pub fn new(max_value: f32) -> Result<Self, Error> {
        Self::default().with_max_value(max_value)
    }

    /// Same reducer, different normalization maximum.
    pub fn with_max_value(self, max_value: f32) -> Result<Self, Error> {
        if !max_value.is_finite() || max_value <= 0.0 {
            return Err(Error::invalid(
                "max_value",
                format!("must be finite and > 0, got {}", max_value),
            ));
        }
        Ok(Self { max_value, ..self })
    }

    /// Same reducer with a response curve applied after normalization
    /// (`bar = value^contrast`). 1.0 is linear; larger values sharpen peaks.
    pub fn with_contrast(self, contrast: f32) -> Result<Self, Error> {
        if !contrast.is_finite() || contrast <= 0.0 {
            return Err(Error::invalid(
                "contrast",
                format!("must be finite and > 0, got {}", contrast),
            ));
        }
        Ok(Self { contrast, ..self })
    }

    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    /// Reduce `frame` into a freshly allocated sequence of `bar_count` bars.
    pub fn reduce<T>(&self, frame: &[T], bar_count: usize) -> Result<Vec<f32>, Error>
    where
        T: Copy + Into<f64>,
    {
        check_bar_count(bar_count)?;
        let mut bars = vec![0.0; bar_count];
        self.reduce_into(frame, &mut bars)?;
        Ok(bars)
    }

    /// Reduce `frame` into `out`, one bar per element. Does not allocate, so
    /// the per-frame path can reuse a single buffer.
    pub fn reduce_into<T>(&self, frame: &[T], out: &mut [f32]) -> Result<(), Error>
    where
        T: Copy + Into<f64>,
    {
        let bar_count = out.len();
        check_bar_count(bar_count)?;

        let max = self.max_value as f64;
        for (index, bar) in out.iter_mut().enumerate() {
            let window = &frame[window_range(index, frame.len(), bar_count)];
            if window.is_empty() {
                *bar = 0.0;
                continue;
            }
            let sum: f64 = window.iter().map(|&sample| sample.into()).sum();
            let mean = sum / window.len() as f64;
            *bar = self.shape((mean / max) as f32);
        }
        Ok(())
    }

    fn shape(&self, normalized: f32) -> f32 {
        // NaN fails the comparison and lands on 0.
        let clamped = if normalized > 0.0 { normalized.min(1.0) } else { 0.0 };
        if self.contrast == 1.0 {
            clamped
        } else {
            clamped.powf(self.contrast)
        }
    }
}

/// Reduce with the default reducer (max 255, linear response).
pub fn reduce<T>(frame: &[T], bar_count: usize) -> Result<Vec<f32>, Error>
where
    T: Copy + Into<f64>,
{
    SpectrumReducer::default().reduce(frame, bar_count)
}

/// Index range of input samples feeding bar `index` when `n` samples are
/// split over `bar_count` bars. Callers must pass `bar_count > 0`.
pub fn window_range(index: usize, n: usize, bar_count: usize) -> Range<usize> {
    window_start(index, n, bar_count)..window_start(index + 1, n, bar_count)
}

/// Every window, left to right. Together they tile `0..n` exactly.
pub fn window_ranges(n: usize, bar_count: usize) -> impl Iterator<Item = Range<usize>> {
    (0..bar_count).map(move |index| window_range(index, n, bar_count))
}

fn window_start(index: usize, n: usize, bar_count: usize) -> usize {
    let width = n.div_ceil(bar_count);
    if n < bar_count || (bar_count - 1).saturating_mul(width) < n {
        return index.saturating_mul(width).min(n);
    }
    let base = n / bar_count;
    let extra = n % bar_count;
    (index * base + index.min(extra)).min(n)
}

fn check_bar_count(bar_count: usize) -> Result<(), Error> {
    if bar_count == 0 {
        return Err(Error::invalid("bar_count", "must be at least 1"));
    }
    Ok(())
}
