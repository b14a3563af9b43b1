use super::{frame_fits, SpectrumReducer};
use crate::constants::{LOG_MAGNITUDE_OFFSET, LOG_MAGNITUDE_SCALE};
use crate::error::ConfigError;
use crate::spectrum::SpectrumFrame;

/// Least-squares line through the log-magnitude spectrum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Spectral tilt reducer.
///
/// Fits `y = ln(m) * 10 + 100` against bin index over the even bins only
/// (the top odd bin of some analysers reports huge values) and maps the
/// fitted line's zero crossing, relative to the spectrum length, to a
/// scalar: `((-b / (a * bins)) + 1) / 2`. Bright, flat spectra push the
/// value up, steep roll-offs push it down. The result is not clamped.
///
/// Sums are accumulated in `f64`; a 512-bin frame has `Σx²` around 2e7,
/// beyond what `f32` keeps exactly.
#[derive(Clone, Debug)]
pub struct RegressionSlope {
    bins: usize,
    count: f64,
    sum_x: f64,
    sum_x2: f64,
}

impl RegressionSlope {
    pub fn new(bins: usize) -> Result<Self, ConfigError> {
        // Two sampled points minimum, i.e. bins 0 and 2.
        if bins < 3 {
            return Err(ConfigError::TooFewBins { bins, min: 3 });
        }
        let (mut sum_x, mut sum_x2, mut count) = (0.0f64, 0.0f64, 0usize);
        for i in (0..bins).step_by(2) {
            let x = i as f64;
            sum_x += x;
            sum_x2 += x * x;
            count += 1;
        }
        Ok(Self {
            bins,
            count: count as f64,
            sum_x,
            sum_x2,
        })
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Fit the line without mapping it to a scalar. A zero magnitude in any
    /// sampled bin makes both coefficients non-finite.
    pub fn fit(&self, frame: &SpectrumFrame) -> Option<LineFit> {
        if !frame_fits(self.name(), frame, self.bins) {
            return None;
        }
        let samples = &frame.bins()[..self.bins];
        let (mut sum_y, mut sum_xy) = (0.0f64, 0.0f64);
        for (i, m) in samples.iter().enumerate().step_by(2) {
            let y = (*m as f64).ln() * LOG_MAGNITUDE_SCALE + LOG_MAGNITUDE_OFFSET;
            sum_y += y;
            sum_xy += i as f64 * y;
        }
        let slope = (self.count * sum_xy - self.sum_x * sum_y)
            / (self.count * self.sum_x2 - self.sum_x * self.sum_x);
        let intercept = (sum_y - slope * self.sum_x) / self.count;
        Some(LineFit { slope, intercept })
    }
}

impl SpectrumReducer for RegressionSlope {
    fn reduce(&mut self, frame: &SpectrumFrame) -> f32 {
        match self.fit(frame) {
            Some(LineFit { slope, intercept }) => {
                ((-intercept / (slope * self.bins as f64) + 1.0) / 2.0) as f32
            }
            None => f32::NAN,
        }
    }

    fn required_bins(&self) -> usize {
        self.bins
    }

    fn name(&self) -> &'static str {
        "regression-slope"
    }
}
