//! Spectrum reducers: one scalar "activity" value per spectrum frame.
//!
//! Three interchangeable strategies exist. Each can be used directly through
//! the [`SpectrumReducer`] trait or wrapped in the [`Reducer`] enum when the
//! strategy is picked at runtime from configuration.
//!
//! A reducer never fails: degenerate input (silent frames, frames shorter
//! than the strategy needs) yields a non-finite value, and downstream stages
//! drop non-finite values instead of propagating them.

mod onset_threshold;
mod regression_slope;
mod weighted_band;

pub use onset_threshold::{OnsetParams, OnsetThreshold};
pub use regression_slope::{LineFit, RegressionSlope};
pub use weighted_band::WeightedBand;

use crate::spectrum::SpectrumFrame;

pub trait SpectrumReducer {
    /// Reduce one frame to a scalar. Called once per tick.
    fn reduce(&mut self, frame: &SpectrumFrame) -> f32;

    /// Minimum frame length this reducer reads.
    fn required_bins(&self) -> usize;

    fn name(&self) -> &'static str;
}

#[derive(Clone, Debug)]
pub enum Reducer {
    WeightedBand(WeightedBand),
    RegressionSlope(RegressionSlope),
    OnsetThreshold(OnsetThreshold),
}

impl SpectrumReducer for Reducer {
    fn reduce(&mut self, frame: &SpectrumFrame) -> f32 {
        match self {
            Reducer::WeightedBand(r) => r.reduce(frame),
            Reducer::RegressionSlope(r) => r.reduce(frame),
            Reducer::OnsetThreshold(r) => r.reduce(frame),
        }
    }

    fn required_bins(&self) -> usize {
        match self {
            Reducer::WeightedBand(r) => r.required_bins(),
            Reducer::RegressionSlope(r) => r.required_bins(),
            Reducer::OnsetThreshold(r) => r.required_bins(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Reducer::WeightedBand(r) => r.name(),
            Reducer::RegressionSlope(r) => r.name(),
            Reducer::OnsetThreshold(r) => r.name(),
        }
    }
}

impl From<WeightedBand> for Reducer {
    fn from(r: WeightedBand) -> Self {
        Reducer::WeightedBand(r)
    }
}

impl From<RegressionSlope> for Reducer {
    fn from(r: RegressionSlope) -> Self {
        Reducer::RegressionSlope(r)
    }
}

impl From<OnsetThreshold> for Reducer {
    fn from(r: OnsetThreshold) -> Self {
        Reducer::OnsetThreshold(r)
    }
}

/// Returns false (and logs) when `frame` is too short for `name`.
fn frame_fits(name: &str, frame: &SpectrumFrame, required: usize) -> bool {
    if frame.len() < required {
        log::warn!(
            "[{}] frame has {} bins, {} required; skipping",
            name,
            frame.len(),
            required
        );
        return false;
    }
    true
}
