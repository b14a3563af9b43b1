//! Error types for configuring the pipeline and loading recorded tracks.
//!
//! Per-tick numeric trouble (NaN, infinities) is never an error: it is
//! absorbed by skipping the tick. These types only cover problems a caller
//! can fix by changing its input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    #[error("no control points to interpolate")]
    Empty,
    #[error("control point abscissa {x} is not finite")]
    NonFiniteAbscissa { x: f32 },
    #[error("two control points share abscissa {x}")]
    DuplicateAbscissa { x: f32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("band {band} needs {required} bins but the frame has {bins}")]
    BandOutOfRange {
        band: u32,
        required: usize,
        bins: usize,
    },
    #[error("spectrum must have at least {min} bins, got {bins}")]
    TooFewBins { bins: usize, min: usize },
    #[error("{bins} bins cannot be split evenly into {subbands} sub-bands")]
    UnevenSubbands { bins: usize, subbands: usize },
    #[error("onset history window must hold at least one entry")]
    EmptyWindow,
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("channel {0} is configured more than once")]
    DuplicateChannel(u8),
    #[error("session needs at least one channel")]
    NoChannels,
    #[error("unknown reducer `{0}` (expected weighted, regression or onset)")]
    UnknownReducer(String),
    #[error(transparent)]
    Palette(#[from] InterpolationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("track byte length {0} is not a multiple of 4")]
    Misaligned(usize),
    #[error("track holds {0} floats, at least 2 (min and max) are required")]
    Truncated(usize),
}
