//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use deriva_core::constants::DEFAULT_SMOOTHING_RATE;
use deriva_core::{ReducerConfig, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "deriva-native")]
#[command(about = "Drive the Deriva color core from a synthetic or captured signal", long_about = None)]
pub struct Args {
    /// Reducer strategy: weighted, regression, onset
    #[arg(long, value_name = "STRATEGY", default_value = "weighted")]
    pub reducer: String,

    /// Band index for the weighted reducer
    #[arg(long, value_name = "N")]
    pub band: Option<u32>,

    /// Smoothing rate, per second
    #[arg(long, value_name = "RATE", default_value_t = DEFAULT_SMOOTHING_RATE)]
    pub smoothing: f32,

    /// Number of frames to run
    #[arg(long, value_name = "N", default_value_t = 600)]
    pub ticks: u64,

    /// Simulated frame rate
    #[arg(long, value_name = "FPS", default_value_t = 60.0)]
    pub fps: f32,

    /// Seed for the synthetic signal
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Tempo of the synthetic kick
    #[arg(long, default_value_t = 120.0)]
    pub bpm: f32,

    /// Log every Nth color update per channel (0 = never)
    #[arg(long, value_name = "N", default_value_t = 30)]
    pub log_every: u64,

    /// Write every accepted reducer value to a track file
    #[arg(long, value_name = "FILE", conflicts_with = "replay")]
    pub record: Option<PathBuf>,

    /// Play a recorded track instead of analysing a signal
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Analyse the default input device instead of the synthetic signal
    #[cfg(feature = "capture")]
    #[arg(long, conflicts_with = "replay")]
    pub capture: bool,
}

impl Args {
    pub fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut reducer: ReducerConfig = self.reducer.parse()?;
        if let Some(band) = self.band {
            match &mut reducer {
                ReducerConfig::WeightedBand { band: b, .. } => *b = band,
                other => log::warn!("--band has no effect on {:?}", other),
            }
        }
        let config = SessionConfig::default()
            .with_reducer(reducer)
            .with_smoothing_rate(self.smoothing);
        config.validate()?;
        Ok(config)
    }

    /// Seconds per frame.
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1.0)
    }
}
