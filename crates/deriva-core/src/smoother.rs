//! Per-tick double exponential decay from a raw reducer scalar to a
//! (color, scalar) pair.

use std::sync::Arc;

use crate::color::Rgb;
use crate::constants::SCALAR_RATE_BOOST;
use crate::interpolation::ColorInterpolator;

/// How a raw scalar picks the color the smoother moves towards.
#[derive(Clone, Debug)]
pub enum ColorTarget {
    /// `low.lerp(high, raw)`, unclamped.
    Blend { low: Rgb, high: Rgb },
    /// Color ramp through a set of control points, shared read-only.
    Ramp(Arc<ColorInterpolator>),
}

impl ColorTarget {
    pub fn resolve(&self, raw: f32) -> Rgb {
        match self {
            ColorTarget::Blend { low, high } => low.lerp(*high, raw),
            ColorTarget::Ramp(ramp) => ramp.evaluate(raw),
        }
    }
}

/// One emission: the blended color and the smoothed scalar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorUpdate {
    pub color: Rgb,
    pub scalar: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedState {
    pub color: Rgb,
    pub scalar: f32,
    pub target_color: Rgb,
    pub last_raw: Option<f32>,
}

impl Default for SmoothedState {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            scalar: 0.0,
            target_color: Rgb::WHITE,
            last_raw: None,
        }
    }
}

/// Color blender driven by one reducer.
///
/// The scalar follows the raw value with rate `1.5 * rate` (factor capped at
/// 1); the color follows the target color with rate `rate`, uncapped, so a
/// long frame hitch can overshoot.
#[derive(Clone, Debug)]
pub struct SignalSmoother {
    target: ColorTarget,
    rate: f32,
    state: SmoothedState,
}

impl SignalSmoother {
    pub fn new(target: ColorTarget, rate: f32) -> Self {
        Self {
            target,
            rate,
            state: SmoothedState::default(),
        }
    }

    pub fn blend(low: Rgb, high: Rgb, rate: f32) -> Self {
        Self::new(ColorTarget::Blend { low, high }, rate)
    }

    /// Advance one tick. Returns `None`, leaving state untouched, when `raw`
    /// or the color it maps to is not finite.
    pub fn update(&mut self, raw: f32, dt: f32) -> Option<ColorUpdate> {
        if !raw.is_finite() {
            log::trace!("[smoother] dropping non-finite value {}", raw);
            return None;
        }
        let target_color = self.target.resolve(raw);
        if !target_color.is_finite() {
            log::trace!("[smoother] target color for {} is not finite", raw);
            return None;
        }

        let s = &mut self.state;
        s.target_color = target_color;
        let scalar_t = (SCALAR_RATE_BOOST * self.rate * dt).min(1.0);
        s.scalar += (raw - s.scalar) * scalar_t;
        s.color = s.color.lerp(target_color, self.rate * dt);
        s.last_raw = Some(raw);

        Some(ColorUpdate {
            color: s.color,
            scalar: s.scalar,
        })
    }

    pub fn state(&self) -> SmoothedState {
        self.state
    }

    pub fn target(&self) -> &ColorTarget {
        &self.target
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn reset(&mut self) {
        self.state = SmoothedState::default();
    }
}
