// Spectrum engine: the frame-to-bars reducer and the source contract it reads.

pub mod reducer;
pub mod source;

pub use reducer::{reduce, window_range, window_ranges, SpectrumReducer, DEFAULT_MAX_VALUE};
pub use source::{ChannelSource, FrequencyFrame, SignalSource, SpectrumSnapshot};
