//! Deterministic test signal: a kick on every beat, a few drifting tonal
//! partials and a little noise.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SAMPLE_RATE: f32 = 44_100.0;

const KICK_HZ: f32 = 55.0;
const KICK_DECAY: f32 = 12.0;
const NOISE_LEVEL: f32 = 0.02;

struct Partial {
    freq: f32,
    amp: f32,
}

pub struct SyntheticSignal {
    rng: StdRng,
    sample_rate: f32,
    bpm: f32,
    partials: Vec<Partial>,
    time: f64,
}

impl SyntheticSignal {
    pub fn new(seed: u64, sample_rate: f32, bpm: f32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let partials = (0..4)
            .map(|_| Partial {
                freq: rng.gen_range(110.0..2_000.0),
                amp: rng.gen_range(0.05..0.3),
            })
            .collect();
        Self {
            rng,
            sample_rate,
            bpm,
            partials,
            time: 0.0,
        }
    }

    /// Advance the signal clock by `dt` seconds, then render `out.len()`
    /// samples starting at the new time.
    pub fn next_window(&mut self, dt: f32, out: &mut [f32]) {
        self.time += dt as f64;
        for p in self.partials.iter_mut() {
            p.amp = (p.amp + self.rng.gen_range(-0.02f32..0.02)).clamp(0.05, 0.3);
        }
        let beat_hz = self.bpm / 60.0;
        for (i, sample) in out.iter_mut().enumerate() {
            let t = (self.time + i as f64 / self.sample_rate as f64) as f32;
            let beat_phase = (t * beat_hz).fract();
            let kick = (-beat_phase * KICK_DECAY).exp() * (TAU * KICK_HZ * t).sin() * 0.6;
            let tone: f32 = self
                .partials
                .iter()
                .map(|p| p.amp * (TAU * p.freq * t).sin())
                .sum();
            let noise = self.rng.gen_range(-1.0f32..1.0) * NOISE_LEVEL;
            *sample = (kick + tone * 0.5 + noise).clamp(-1.0, 1.0);
        }
    }
}
