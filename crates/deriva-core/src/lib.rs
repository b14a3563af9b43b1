//! Audio-reactive color generation for Deriva.
//!
//! Spectrum frames go in, smoothed colors come out:
//!
//! ```text
//! SpectrumFrame -> Reducer -> raw scalar -> SignalSmoother -> ColorUpdate -> Dispatcher
//! ```
//!
//! Nothing here touches a platform API; the web and native front-ends supply
//! spectra and delta-time and subscribe listeners for the colors.

pub mod clock;
pub mod color;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod interpolation;
pub mod reducer;
pub mod session;
pub mod smoother;
pub mod spectrum;
pub mod track;

pub use clock::FrameClock;
pub use color::Rgb;
pub use config::{ChannelConfig, PaletteConfig, ReducerConfig, SessionConfig};
pub use dispatch::{ChannelId, ColorListener, Delivery, Dispatcher, ListenerId};
pub use error::{ConfigError, InterpolationError, TrackError};
pub use interpolation::{ColorInterpolator, ControlPoint, DividedDifferenceTable};
pub use reducer::{
    LineFit, OnsetParams, OnsetThreshold, Reducer, RegressionSlope, SpectrumReducer,
    WeightedBand,
};
pub use session::{AnalysisSession, SessionState, TickOutcome};
pub use smoother::{ColorTarget, ColorUpdate, SignalSmoother, SmoothedState};
pub use spectrum::SpectrumFrame;
pub use track::ValueTrack;
