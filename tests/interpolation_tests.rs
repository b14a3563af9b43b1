// Host-side tests for the divided-difference color interpolator.

use deriva_core::*;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn assert_close(a: Rgb, b: Rgb, eps: f32) {
    let d = (Vec3::from(a) - Vec3::from(b)).abs().max_element();
    assert!(d <= eps, "{a:?} vs {b:?} (off by {d})");
}

fn random_color(rng: &mut StdRng) -> Rgb {
    Rgb::new(
        rng.gen_range(0.0..=1.0),
        rng.gen_range(0.0..=1.0),
        rng.gen_range(0.0..=1.0),
    )
}

/// `n` points with strictly increasing x in [0, 1].
fn random_points(rng: &mut StdRng, n: usize) -> Vec<ControlPoint> {
    (0..n)
        .map(|i| {
            let x = (i as f32 + rng.gen_range(0.0..0.5)) / n as f32;
            ControlPoint::new(x, random_color(rng))
        })
        .collect()
}

#[test]
fn single_point_is_constant() {
    let c = Rgb::new(0.2, 0.4, 0.6);
    let ramp = ColorInterpolator::build(&[ControlPoint::new(0.5, c)]).unwrap();
    for x in [-10.0, 0.0, 0.5, 3.0, 1e6] {
        assert_eq!(ramp.evaluate(x), c);
    }
    assert_eq!(ramp.table().degree(), 0);
}

#[test]
fn passes_through_every_control_point() {
    let mut rng = StdRng::seed_from_u64(42);
    for n in 2..=5 {
        for _ in 0..20 {
            let points = random_points(&mut rng, n);
            let ramp = ColorInterpolator::build(&points).unwrap();
            for p in &points {
                assert_close(ramp.evaluate(p.x), p.color, 1e-3);
            }
        }
    }
}

#[test]
fn output_is_always_clamped() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..50 {
        let points = random_points(&mut rng, 5);
        let ramp = ColorInterpolator::build(&points).unwrap();
        for _ in 0..40 {
            let x = rng.gen_range(-100.0..100.0);
            let c = ramp.evaluate(x);
            for v in c.to_array() {
                assert!((0.0..=1.0).contains(&v), "x={x} gave {c:?}");
            }
        }
    }
}

#[test]
fn input_order_does_not_matter() {
    let points = [
        ControlPoint::new(0.0, Rgb::new(0.0, 0.9, 0.8)),
        ControlPoint::new(0.4, Rgb::new(0.5, 0.2, 0.1)),
        ControlPoint::new(1.0, Rgb::WHITE),
        ControlPoint::new(0.7, Rgb::new(0.3, 0.3, 0.9)),
    ];
    let mut shuffled = points;
    shuffled.reverse();
    shuffled.swap(0, 2);

    let a = ColorInterpolator::build(&points).unwrap();
    let b = ColorInterpolator::build(&shuffled).unwrap();
    let xs: Vec<f32> = b.points().iter().map(|p| p.x).collect();
    assert_eq!(xs, [0.0, 0.4, 0.7, 1.0]);
    for i in 0..=20 {
        let x = i as f32 / 20.0;
        assert_eq!(a.evaluate(x), b.evaluate(x));
    }
}

#[test]
fn recovers_newton_coefficients_of_a_quadratic() {
    // red follows 0.1 + 0.2x + 0.05x^2
    let f = |x: f32| 0.1 + 0.2 * x + 0.05 * x * x;
    let points: Vec<ControlPoint> = [0.0, 1.0, 2.0]
        .iter()
        .map(|&x| ControlPoint::new(x, Rgb::new(f(x), 0.5, 1.0 - x / 4.0)))
        .collect();
    let ramp = ColorInterpolator::build(&points).unwrap();
    let coeffs = ramp.coefficients();
    assert_eq!(coeffs.len(), 3);
    assert!((coeffs[0].x - 0.1).abs() < 1e-6);
    assert!((coeffs[1].x - 0.25).abs() < 1e-6);
    assert!((coeffs[2].x - 0.05).abs() < 1e-6);
    // constant green, linear blue
    assert!(coeffs[1].y.abs() < 1e-6 && coeffs[2].y.abs() < 1e-6);
    assert!((coeffs[1].z + 0.25).abs() < 1e-6 && coeffs[2].z.abs() < 1e-6);

    let mid = ramp.evaluate(0.5);
    assert!((mid.r - f(0.5)).abs() < 1e-6);
    assert!((mid.b - 0.875).abs() < 1e-6);
}

#[test]
fn table_levels_shrink_by_one() {
    let mut rng = StdRng::seed_from_u64(1);
    let points = random_points(&mut rng, 5);
    let ramp = ColorInterpolator::build(&points).unwrap();
    let table = ramp.table();
    assert_eq!(table.len(), 15);
    assert_eq!(table.degree(), 4);
    for k in 0..5 {
        assert_eq!(table.level(k).unwrap().len(), 5 - k);
    }
    assert!(table.level(5).is_none());
    let level0: Vec<Rgb> = table.level(0).unwrap().iter().map(|v| Rgb::from(*v)).collect();
    let colors: Vec<Rgb> = ramp.points().iter().map(|p| p.color).collect();
    assert_eq!(level0, colors);
}

#[test]
fn rejects_degenerate_point_sets() {
    assert_eq!(
        ColorInterpolator::build(&[]).unwrap_err(),
        InterpolationError::Empty
    );
    let dup = [
        ControlPoint::new(0.25, Rgb::BLACK),
        ControlPoint::new(0.75, Rgb::WHITE),
        ControlPoint::new(0.25, Rgb::WHITE),
    ];
    assert_eq!(
        ColorInterpolator::build(&dup).unwrap_err(),
        InterpolationError::DuplicateAbscissa { x: 0.25 }
    );
    let nan = [
        ControlPoint::new(0.0, Rgb::BLACK),
        ControlPoint::new(f32::NAN, Rgb::WHITE),
    ];
    assert!(matches!(
        ColorInterpolator::build(&nan),
        Err(InterpolationError::NonFiniteAbscissa { .. })
    ));
}

#[test]
fn nan_input_propagates() {
    let ramp = ColorInterpolator::build(&[
        ControlPoint::new(0.0, Rgb::BLACK),
        ControlPoint::new(1.0, Rgb::WHITE),
    ])
    .unwrap();
    assert!(!ramp.evaluate(f32::NAN).is_finite());
}

#[test]
fn huge_inputs_stay_clamped() {
    // constant red, symmetric green and blue: several Newton coefficients are zero
    let ramp = ColorInterpolator::build(&[
        ControlPoint::new(0.0, Rgb::new(0.5, 0.0, 1.0)),
        ControlPoint::new(0.5, Rgb::new(0.5, 1.0, 0.0)),
        ControlPoint::new(1.0, Rgb::new(0.5, 0.0, 1.0)),
    ])
    .unwrap();
    for x in [1e20, -1e20, 3e38, -3e38, f32::MAX, f32::MIN] {
        let c = ramp.evaluate(x);
        assert_eq!(c, Rgb::new(0.5, 0.0, 1.0), "x={x}");
    }
}

#[test]
fn overflowing_high_degree_ramp_saturates() {
    let mut rng = StdRng::seed_from_u64(77);
    let points = random_points(&mut rng, 12);
    let ramp = ColorInterpolator::build(&points).unwrap();
    for x in [1e20, -1e20, 3e38, -3e38] {
        let c = ramp.evaluate(x);
        for v in c.to_array() {
            assert!((0.0..=1.0).contains(&v), "x={x} gave {c:?}");
        }
    }
}
