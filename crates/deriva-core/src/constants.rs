use crate::color::Rgb;

// Shared tuning constants used by the pipeline and both front-ends.

// Spectrum sizes requested from the host's analyser
pub const WEIGHTED_BAND_BINS: usize = 512;
pub const REGRESSION_BINS: usize = 512;
pub const ONSET_BINS: usize = 64;

// Weighted sub-band average
pub const DEFAULT_BAND: u32 = 6;
pub const WEIGHTED_BAND_SCALE: f32 = 10.0; // applied after averaging

// Log-magnitude regression: y = ln(m) * SCALE + OFFSET
pub const LOG_MAGNITUDE_SCALE: f64 = 10.0;
pub const LOG_MAGNITUDE_OFFSET: f64 = 100.0;

// Onset detector
pub const ONSET_SUBBANDS: usize = 4;
pub const ONSET_WINDOW: usize = 5; // history length per sub-band
pub const ONSET_MULTIPLIER: f32 = 1.25; // instant energy must exceed avg * this

// Smoothing
pub const DEFAULT_SMOOTHING_RATE: f32 = 1.0; // per second
pub const SCALAR_RATE_BOOST: f32 = 1.5; // scalar follows faster than color

// Frame clock
pub const MAX_FRAME_DT_SEC: f32 = 0.25;

// Default palettes: small fractals drift from teal to white, big fractals
// from periwinkle to deep indigo.
pub const NEAR_LOW_COLOR: Rgb = Rgb::new(0.0, 253.0 / 256.0, 221.0 / 256.0);
pub const NEAR_HIGH_COLOR: Rgb = Rgb::WHITE;
pub const FAR_LOW_COLOR: Rgb = Rgb::new(82.0 / 256.0, 109.0 / 256.0, 200.0 / 256.0);
pub const FAR_HIGH_COLOR: Rgb = Rgb::new(33.0 / 256.0, 38.0 / 256.0, 100.0 / 256.0);
