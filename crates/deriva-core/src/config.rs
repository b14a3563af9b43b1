//! Session configuration, set once before analysis starts.
//!
//! Defaults reproduce the tuning the game shipped with: the weighted
//! sub-band reducer on band 6 of a 512-bin spectrum, smoothing rate 1, and
//! two channels (small and big fractals) with their own palettes.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use crate::color::Rgb;
use crate::constants::*;
use crate::dispatch::ChannelId;
use crate::error::ConfigError;
use crate::interpolation::{ColorInterpolator, ControlPoint};
use crate::reducer::{OnsetParams, OnsetThreshold, Reducer, RegressionSlope, WeightedBand};
use crate::smoother::ColorTarget;

#[derive(Clone, Debug, PartialEq)]
pub enum ReducerConfig {
    WeightedBand { bins: usize, band: u32 },
    RegressionSlope { bins: usize },
    OnsetThreshold(OnsetParams),
}

impl Default for ReducerConfig {
    fn default() -> Self {
        ReducerConfig::WeightedBand {
            bins: WEIGHTED_BAND_BINS,
            band: DEFAULT_BAND,
        }
    }
}

impl ReducerConfig {
    /// Spectrum length the host should deliver.
    pub fn bins(&self) -> usize {
        match self {
            ReducerConfig::WeightedBand { bins, .. } => *bins,
            ReducerConfig::RegressionSlope { bins } => *bins,
            ReducerConfig::OnsetThreshold(p) => p.bins,
        }
    }

    pub fn build(&self) -> Result<Reducer, ConfigError> {
        Ok(match self {
            ReducerConfig::WeightedBand { bins, band } => WeightedBand::new(*band, *bins)?.into(),
            ReducerConfig::RegressionSlope { bins } => RegressionSlope::new(*bins)?.into(),
            ReducerConfig::OnsetThreshold(p) => OnsetThreshold::new(p.clone())?.into(),
        })
    }
}

impl FromStr for ReducerConfig {
    type Err = ConfigError;

    /// Strategy name with its default parameters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weighted" | "weighted-band" => Ok(ReducerConfig::default()),
            "regression" | "regression-slope" => Ok(ReducerConfig::RegressionSlope {
                bins: REGRESSION_BINS,
            }),
            "onset" | "onset-threshold" => Ok(ReducerConfig::OnsetThreshold(OnsetParams::default())),
            other => Err(ConfigError::UnknownReducer(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub enum PaletteConfig {
    Blend { low: Rgb, high: Rgb },
    Ramp(Vec<ControlPoint>),
    /// Ramp already built and shared with other channels.
    Shared(Arc<ColorInterpolator>),
}

impl PaletteConfig {
    pub fn build(&self) -> Result<ColorTarget, ConfigError> {
        Ok(match self {
            PaletteConfig::Blend { low, high } => ColorTarget::Blend {
                low: *low,
                high: *high,
            },
            PaletteConfig::Ramp(points) => {
                ColorTarget::Ramp(Arc::new(ColorInterpolator::build(points)?))
            }
            PaletteConfig::Shared(ramp) => ColorTarget::Ramp(Arc::clone(ramp)),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ChannelConfig {
    pub channel: ChannelId,
    pub palette: PaletteConfig,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub reducer: ReducerConfig,
    pub smoothing_rate: f32,
    pub channels: Vec<ChannelConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reducer: ReducerConfig::default(),
            smoothing_rate: DEFAULT_SMOOTHING_RATE,
            channels: vec![
                ChannelConfig {
                    channel: ChannelId::NEAR,
                    palette: PaletteConfig::Blend {
                        low: NEAR_LOW_COLOR,
                        high: NEAR_HIGH_COLOR,
                    },
                },
                ChannelConfig {
                    channel: ChannelId::FAR,
                    palette: PaletteConfig::Blend {
                        low: FAR_LOW_COLOR,
                        high: FAR_HIGH_COLOR,
                    },
                },
            ],
        }
    }
}

impl SessionConfig {
    pub fn with_reducer(mut self, reducer: ReducerConfig) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn with_smoothing_rate(mut self, rate: f32) -> Self {
        self.smoothing_rate = rate;
        self
    }

    /// Check everything that would make building a session fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing_rate.is_finite() && self.smoothing_rate > 0.0) {
            return Err(ConfigError::NotPositive {
                name: "smoothing rate",
                value: self.smoothing_rate,
            });
        }
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        let mut seen = HashSet::new();
        for c in &self.channels {
            if !seen.insert(c.channel) {
                return Err(ConfigError::DuplicateChannel(c.channel.0));
            }
            c.palette.build()?;
        }
        self.reducer.build()?;
        Ok(())
    }
}
