//! Magnitude spectrum buffer handed to reducers once per tick.

/// Fixed-length sequence of non-negative magnitudes, one per frequency bin.
///
/// Hosts keep one frame alive for the whole session and refill it in place
/// with [`SpectrumFrame::bins_mut`] or [`SpectrumFrame::fill_from_decibels`]
/// before every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumFrame {
    bins: Vec<f32>,
}

impl SpectrumFrame {
    pub fn new(bins: Vec<f32>) -> Self {
        Self { bins }
    }

    pub fn zeroed(len: usize) -> Self {
        Self {
            bins: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    pub fn bins_mut(&mut self) -> &mut [f32] {
        &mut self.bins
    }

    /// Overwrite the frame with linear magnitudes converted from decibels,
    /// as produced by analyser nodes. Extra input is ignored; missing input
    /// leaves the remaining bins at zero.
    pub fn fill_from_decibels(&mut self, db: &[f32]) {
        for (i, out) in self.bins.iter_mut().enumerate() {
            *out = db.get(i).copied().map(db_to_magnitude).unwrap_or(0.0);
        }
    }
}

impl From<Vec<f32>> for SpectrumFrame {
    fn from(bins: Vec<f32>) -> Self {
        Self::new(bins)
    }
}

/// Decibels to linear amplitude. `-inf` dB (silence) maps to exactly zero.
#[inline]
pub fn db_to_magnitude(db: f32) -> f32 {
    if db == f32::NEG_INFINITY {
        0.0
    } else {
        10.0_f32.powf(db / 20.0)
    }
}
