//! Magnitude spectra from time-domain samples.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Windowed forward FFT producing `bins` magnitudes from `2 * bins` samples.
///
/// Magnitudes are scaled by the window's coherent gain, so a full-scale sine
/// centred on a bin reads close to its amplitude.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scale: f32,
}

impl SpectrumAnalyzer {
    pub fn new(bins: usize) -> Self {
        let size = bins.max(1) * 2;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let window: Vec<f32> = (0..size).map(|i| blackman_harris(i, size)).collect();
        let gain: f32 = window.iter().sum();
        Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); size],
            scale: 2.0 / gain,
        }
    }

    /// Samples consumed per call to [`process`](Self::process).
    pub fn input_len(&self) -> usize {
        self.window.len()
    }

    /// Missing samples are treated as silence; bins past Nyquist read zero.
    pub fn process(&mut self, samples: &[f32], out: &mut [f32]) {
        for (i, (slot, w)) in self.buffer.iter_mut().zip(&self.window).enumerate() {
            let s = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(s * w, 0.0);
        }
        self.fft.process(&mut self.buffer);
        let half = self.buffer.len() / 2;
        for (i, m) in out.iter_mut().enumerate() {
            *m = if i < half {
                self.buffer[i].norm() * self.scale
            } else {
                0.0
            };
        }
    }
}

/// Four-term Blackman-Harris window.
pub fn blackman_harris(index: usize, size: usize) -> f32 {
    if size < 2 {
        return 1.0;
    }
    let t = 2.0 * PI * index as f32 / (size - 1) as f32;
    0.35875 - 0.48829 * t.cos() + 0.14128 * (2.0 * t).cos() - 0.01168 * (3.0 * t).cos()
}
