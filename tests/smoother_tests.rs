// Host-side tests for the double exponential color smoother.

use std::sync::Arc;

use deriva_core::constants::*;
use deriva_core::*;
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

fn distance(a: Rgb, b: Rgb) -> f32 {
    (Vec3::from(a) - Vec3::from(b)).abs().max_element()
}

fn near_smoother() -> SignalSmoother {
    SignalSmoother::blend(NEAR_LOW_COLOR, NEAR_HIGH_COLOR, DEFAULT_SMOOTHING_RATE)
}

#[test]
fn starts_white_with_zero_scalar() {
    let s = near_smoother();
    let state = s.state();
    assert_eq!(state.color, Rgb::WHITE);
    assert_eq!(state.scalar, 0.0);
    assert_eq!(state.last_raw, None);
}

#[test]
fn converges_monotonically_on_a_constant_input() {
    let mut s = near_smoother();
    let target = NEAR_LOW_COLOR.lerp(NEAR_HIGH_COLOR, 0.3);
    let mut prev_color = distance(s.state().color, target);
    let mut prev_scalar = (s.state().scalar - 0.3).abs();
    for tick in 0..600 {
        let update = s.update(0.3, DT).expect("finite input emits");
        let d_color = distance(update.color, target);
        let d_scalar = (update.scalar - 0.3).abs();
        assert!(d_color <= prev_color + 1e-6, "color moved away at tick {tick}");
        assert!(d_scalar <= prev_scalar + 1e-6, "scalar moved away at tick {tick}");
        prev_color = d_color;
        prev_scalar = d_scalar;
    }
    assert!(prev_color < 1e-3);
    assert!(prev_scalar < 1e-3);
    assert_eq!(s.state().target_color, target);
    assert_eq!(s.state().last_raw, Some(0.3));
}

#[test]
fn non_finite_input_is_dropped_without_touching_state() {
    let mut s = near_smoother();
    s.update(0.5, DT);
    let before = s.state();
    for raw in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        assert!(s.update(raw, DT).is_none());
        assert_eq!(s.state(), before);
    }
}

#[test]
fn blend_extrapolates_outside_unit_range() {
    let low = Rgb::new(0.2, 0.2, 0.2);
    let high = Rgb::new(0.6, 0.4, 0.2);
    let mut s = SignalSmoother::blend(low, high, 1.0);
    s.update(2.0, DT);
    assert_close_rgb(s.state().target_color, Rgb::new(1.0, 0.6, 0.2));
    s.update(-1.0, DT);
    assert_close_rgb(s.state().target_color, Rgb::new(-0.2, 0.0, 0.2));
}

fn assert_close_rgb(a: Rgb, b: Rgb) {
    assert!(distance(a, b) < 1e-6, "{a:?} vs {b:?}");
}

#[test]
fn scalar_factor_is_capped_but_color_factor_is_not() {
    let mut s = near_smoother();
    let update = s.update(0.8, 10.0).unwrap();
    // 1.5 * 1 * 10 caps at 1: the scalar lands exactly on the input
    assert_eq!(update.scalar, 0.8);
    // the color factor of 10 overshoots the target
    let target = s.state().target_color;
    assert!(update.color.r < target.r);
    assert!(distance(update.color, target) > distance(Rgb::WHITE, target));
}

#[test]
fn zero_dt_emits_unchanged_state() {
    let mut s = near_smoother();
    s.update(0.4, DT);
    let before = s.state();
    for _ in 0..3 {
        let update = s.update(0.4, 0.0).unwrap();
        assert_eq!(update.color, before.color);
        assert_eq!(update.scalar, before.scalar);
    }
}

#[test]
fn scalar_follows_faster_than_color() {
    let mut s = SignalSmoother::blend(Rgb::BLACK, Rgb::WHITE, 2.0);
    let update = s.update(1.0, 0.1).unwrap();
    // scalar factor 0.3, color factor 0.2 from white towards white
    assert!((update.scalar - 0.3).abs() < 1e-6);
    assert_eq!(update.color, Rgb::WHITE);

    let mut s = SignalSmoother::blend(Rgb::BLACK, Rgb::WHITE, 2.0);
    let update = s.update(0.0, 0.1).unwrap();
    assert!((update.color.r - 0.8).abs() < 1e-6);
}

#[test]
fn ramp_target_uses_interpolator() {
    let ramp = Arc::new(
        ColorInterpolator::build(&[
            ControlPoint::new(0.0, Rgb::BLACK),
            ControlPoint::new(0.5, Rgb::new(1.0, 0.0, 0.0)),
            ControlPoint::new(1.0, Rgb::new(1.0, 1.0, 0.0)),
        ])
        .unwrap(),
    );
    let mut s = SignalSmoother::new(ColorTarget::Ramp(Arc::clone(&ramp)), 1.0);
    s.update(0.5, DT);
    assert_close_rgb(s.state().target_color, Rgb::new(1.0, 0.0, 0.0));
    // far outside the ramp the target is clamped, not extrapolated
    s.update(40.0, DT);
    for v in s.state().target_color.to_array() {
        assert!((0.0..=1.0).contains(&v));
    }
}

#[test]
fn ramp_keeps_moving_on_huge_values() {
    let ramp = Arc::new(
        ColorInterpolator::build(&[
            ControlPoint::new(0.0, Rgb::new(0.5, 0.0, 1.0)),
            ControlPoint::new(0.5, Rgb::new(0.5, 1.0, 0.0)),
            ControlPoint::new(1.0, Rgb::new(0.5, 0.0, 1.0)),
        ])
        .unwrap(),
    );
    let mut s = SignalSmoother::new(ColorTarget::Ramp(ramp), 1.0);
    let update = s.update(1e20, DT).expect("finite raw value must emit");
    assert!(update.color.is_finite());
    assert_eq!(s.state().target_color, Rgb::new(0.5, 0.0, 1.0));
    assert_eq!(s.state().last_raw, Some(1e20));
}

#[test]
fn reset_restores_initial_state() {
    let mut s = near_smoother();
    for _ in 0..10 {
        s.update(0.9, DT);
    }
    assert_ne!(s.state(), SmoothedState::default());
    s.reset();
    assert_eq!(s.state(), SmoothedState::default());
}
