use std::collections::VecDeque;

use super::{frame_fits, SpectrumReducer};
use crate::constants::{ONSET_BINS, ONSET_MULTIPLIER, ONSET_SUBBANDS, ONSET_WINDOW};
use crate::error::ConfigError;
use crate::spectrum::SpectrumFrame;

#[derive(Clone, Debug, PartialEq)]
pub struct OnsetParams {
    pub bins: usize,
    pub subbands: usize,
    pub window: usize,
    pub multiplier: f32,
}

impl Default for OnsetParams {
    fn default() -> Self {
        Self {
            bins: ONSET_BINS,
            subbands: ONSET_SUBBANDS,
            window: ONSET_WINDOW,
            multiplier: ONSET_MULTIPLIER,
        }
    }
}

impl OnsetParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subbands == 0 || self.bins < self.subbands || self.bins % self.subbands != 0 {
            return Err(ConfigError::UnevenSubbands {
                bins: self.bins,
                subbands: self.subbands,
            });
        }
        if self.window == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if !(self.multiplier.is_finite() && self.multiplier > 0.0) {
            return Err(ConfigError::NotPositive {
                name: "onset multiplier",
                value: self.multiplier,
            });
        }
        Ok(())
    }
}

/// Beat detector comparing instant sub-band energy with its recent history.
///
/// Every sub-band keeps a FIFO of its last `window` energy sums, seeded with
/// zeros. The average is taken before the newest sum is pushed, so the
/// comparison always lags one tick behind. Only sub-band 0 decides the
/// output: `1.0` on an onset, `0.0` otherwise.
#[derive(Clone, Debug)]
pub struct OnsetThreshold {
    params: OnsetParams,
    width: usize,
    history: Vec<VecDeque<f32>>,
}

impl OnsetThreshold {
    pub fn new(params: OnsetParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let width = params.bins / params.subbands;
        let history = (0..params.subbands)
            .map(|_| {
                let mut q = VecDeque::with_capacity(params.window);
                q.extend(std::iter::repeat(0.0).take(params.window));
                q
            })
            .collect();
        Ok(Self {
            params,
            width,
            history,
        })
    }

    pub fn params(&self) -> &OnsetParams {
        &self.params
    }

    /// Energy history of one sub-band, oldest first.
    pub fn history(&self, subband: usize) -> Option<Vec<f32>> {
        self.history.get(subband).map(|q| q.iter().copied().collect())
    }
}

impl SpectrumReducer for OnsetThreshold {
    fn reduce(&mut self, frame: &SpectrumFrame) -> f32 {
        if !frame_fits(self.name(), frame, self.params.bins) {
            return f32::NAN;
        }
        let mut value = 0.0;
        for (band, queue) in self.history.iter_mut().enumerate() {
            let from = band * self.width;
            let instant: f32 = frame.bins()[from..from + self.width].iter().sum();

            let average = queue.iter().sum::<f32>() / queue.len() as f32;
            queue.pop_front();
            queue.push_back(instant);

            if band == 0 {
                value = if instant > self.params.multiplier * average {
                    1.0
                } else {
                    0.0
                };
            }
        }
        value
    }

    fn required_bins(&self) -> usize {
        self.params.bins
    }

    fn name(&self) -> &'static str {
        "onset-threshold"
    }
}
