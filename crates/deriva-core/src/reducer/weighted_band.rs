use super::{frame_fits, SpectrumReducer};
use crate::constants::WEIGHTED_BAND_SCALE;
use crate::error::ConfigError;
use crate::spectrum::SpectrumFrame;

/// Weighted average over one octave-wide sub-band.
///
/// The band index picks `n = 2^(band+1)` bins starting at `n - 2`; bin `i`
/// of the band is weighted by `i + 1` so higher frequencies count more.
#[derive(Clone, Debug)]
pub struct WeightedBand {
    band: u32,
    start: usize,
    n: usize,
}

impl WeightedBand {
    /// `bins` is the frame length the host will supply.
    pub fn new(band: u32, bins: usize) -> Result<Self, ConfigError> {
        let required = band_span(band);
        if required > bins {
            return Err(ConfigError::BandOutOfRange {
                band,
                required,
                bins,
            });
        }
        let n = 1usize << (band + 1);
        let start = n - 2;
        log::debug!("[weighted-band] band={} start={} n={}", band, start, n);
        Ok(Self { band, start, n })
    }

    pub fn band(&self) -> u32 {
        self.band
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn width(&self) -> usize {
        self.n
    }
}

/// Bins needed for `band`, saturating for absurd indices.
fn band_span(band: u32) -> usize {
    1usize
        .checked_shl(band.saturating_add(1))
        .and_then(|n| n.checked_mul(2))
        .map(|n| n - 2)
        .unwrap_or(usize::MAX)
}

impl SpectrumReducer for WeightedBand {
    fn reduce(&mut self, frame: &SpectrumFrame) -> f32 {
        if !frame_fits(self.name(), frame, self.required_bins()) {
            return f32::NAN;
        }
        let band = &frame.bins()[self.start..self.start + self.n];
        let mut average = 0.0f32;
        for (i, sample) in band.iter().enumerate() {
            average += sample * (i + 1) as f32;
        }
        average /= self.n as f32;
        average * WEIGHTED_BAND_SCALE
    }

    fn required_bins(&self) -> usize {
        self.start + self.n
    }

    fn name(&self) -> &'static str {
        "weighted-band"
    }
}
