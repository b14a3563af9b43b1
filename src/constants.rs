// Browser-side tuning. Analysis constants live in deriva-core.

/// Smallest `fftSize` an `AnalyserNode` accepts.
pub const MIN_FFT_SIZE: u32 = 32;
/// Largest `fftSize` an `AnalyserNode` accepts.
pub const MAX_FFT_SIZE: u32 = 32_768;

/// The analyser's own averaging is disabled; the core smooths the reduced
/// scalar instead.
pub const ANALYSER_SMOOTHING: f64 = 0.0;

/// Level reported for an empty bin before the first analyser read.
pub const SILENCE_DB: f32 = f32::NEG_INFINITY;
