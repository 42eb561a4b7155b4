// Procedural track generator standing in for decoded audio. Each preset is a
// small drum-and-bass loop whose spectrum moves on the beat, which is all the
// visualizer needs to show something.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A built-in synth preset.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub title: String,
    pub bpm: f32,
    /// Bass fundamental in Hz.
    pub root_hz: f32,
    /// 0.0..=1.0: how much hat and pad energy sits in the upper bins.
    pub brightness: f32,
}

impl Track {
    pub fn new(title: &str, bpm: f32, root_hz: f32, brightness: f32) -> Self {
        Self {
            title: title.to_string(),
            bpm,
            root_hz,
            brightness: brightness.clamp(0.0, 1.0),
        }
    }

    fn beat_secs(&self) -> f32 {
        60.0 / self.bpm.max(1.0)
    }
}

/// The presets cycled by "next track".
pub fn presets() -> Vec<Track> {
    vec![
        Track::new("Sub Pulse", 124.0, 55.0, 0.35),
        Track::new("Glass Arp", 96.0, 110.0, 0.9),
        Track::new("Night Drive", 140.0, 41.2, 0.6),
        Track::new("Slow Bloom", 72.0, 73.4, 0.5),
    ]
}

pub struct Synth {
    track: Track,
    sample_rate: u32,
    position: u64,
    rng: StdRng,
}

impl Synth {
    pub fn new(track: Track, sample_rate: u32) -> Self {
        Self {
            track,
            sample_rate: sample_rate.max(1),
            position: 0,
            rng: StdRng::seed_from_u64(0x5eed),
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn position_secs(&self) -> f64 {
        self.position as f64 / self.sample_rate as f64
    }

    /// Move the play head by `delta` seconds, never before the start.
    pub fn seek(&mut self, delta: f64) {
        let target = (self.position_secs() + delta).max(0.0);
        self.position = (target * self.sample_rate as f64) as u64;
    }

    /// Render the next `out.len()` mono samples.
    pub fn render(&mut self, out: &mut [f32]) {
        let rate = self.sample_rate as f32;
        let beat = self.track.beat_secs();
        let eighth = beat / 2.0;
        let root = self.track.root_hz;
        let bright = self.track.brightness;

        for sample in out.iter_mut() {
            let t = self.position as f32 / rate;
            let in_beat = t % beat;
            let in_eighth = t % eighth;
            let bar_step = ((t / beat) as u32) % 4;

            // Kick: pitch drops quickly, amplitude decays over ~100ms.
            let kick_hz = 48.0 + 90.0 * (-in_beat * 30.0).exp();
            let kick = (TAU * kick_hz * in_beat).sin() * (-in_beat * 14.0).exp();

            // Bass walks root / fifth / octave across the bar.
            let bass_hz = root * [1.0, 1.0, 1.5, 2.0][bar_step as usize];
            let bass = (TAU * bass_hz * t).sin() * (-in_eighth * 6.0).exp() * 0.6;

            // Off-beat hats.
            let hat = if in_beat >= eighth {
                let env = (-(in_beat - eighth) * 60.0).exp();
                self.rng.gen_range(-1.0f32..1.0) * env * bright * 0.35
            } else {
                0.0
            };

            let pad = [4.0, 5.0, 6.0]
                .iter()
                .map(|&ratio| (TAU * root * ratio * t).sin())
                .sum::<f32>()
                * 0.05
                * bright;

            *sample = (kick * 0.8 + bass + hat + pad) * 0.5;
            self.position += 1;
        }
    }
}
