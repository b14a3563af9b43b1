//! Pre-analysed value tracks.
//!
//! A track is recorded by running a reducer over a whole piece of music
//! ahead of time. Playback then feeds the stored values back through the
//! smoothers, normalized against the range seen while recording, instead of
//! analysing live audio.
//!
//! Byte layout: every value as an `f32` in native byte order, followed by
//! the minimum and the maximum. A track with no finite value stores NaN for
//! both bounds.

use crate::error::TrackError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueTrack {
    values: Vec<f32>,
    min: Option<f32>,
    max: Option<f32>,
}

impl ValueTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value. Non-finite values are stored but never widen the
    /// range.
    pub fn push(&mut self, value: f32) {
        self.values.push(value);
        if value.is_finite() {
            self.min = Some(self.min.map_or(value, |m| m.min(value)));
            self.max = Some(self.max.map_or(value, |m| m.max(value)));
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> Option<f32> {
        self.min
    }

    pub fn max(&self) -> Option<f32> {
        self.max
    }

    /// Value `i` mapped into \[0, 1\] against the recorded range; 0.5 for a
    /// flat track. Non-finite values stay non-finite.
    pub fn normalized(&self, i: usize) -> Option<f32> {
        let v = *self.values.get(i)?;
        let (min, max) = (self.min?, self.max?);
        let span = max - min;
        if span > 0.0 {
            Some((v - min) / span)
        } else {
            Some(if v.is_finite() { 0.5 } else { v })
        }
    }

    pub fn replay(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.values.len()).filter_map(move |i| self.normalized(i))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut floats = Vec::with_capacity(self.values.len() + 2);
        floats.extend_from_slice(&self.values);
        floats.push(self.min.unwrap_or(f32::NAN));
        floats.push(self.max.unwrap_or(f32::NAN));
        bytemuck::cast_slice::<f32, u8>(&floats).to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrackError> {
        if bytes.len() % 4 != 0 {
            return Err(TrackError::Misaligned(bytes.len()));
        }
        let mut floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect();
        if floats.len() < 2 {
            return Err(TrackError::Truncated(floats.len()));
        }
        let max = floats.pop().filter(|v| v.is_finite());
        let min = floats.pop().filter(|v| v.is_finite());
        log::debug!("[track] loaded {} values", floats.len());
        let (min, max) = match (min, max) {
            (Some(lo), Some(hi)) if !floats.is_empty() => (Some(lo), Some(hi)),
            _ => (None, None),
        };
        Ok(Self {
            values: floats,
            min,
            max,
        })
    }
}
