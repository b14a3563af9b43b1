//! Newton divided-difference interpolation over RGB colors.
//!
//! A handful of `(x, color)` control points define a color ramp. The
//! polynomial passing through all of them is built once (O(N²)) and then
//! evaluated per tick in O(N), with each channel clamped to \[0, 1\].

use glam::Vec3;

use crate::color::Rgb;
use crate::error::InterpolationError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    pub x: f32,
    pub color: Rgb,
}

impl ControlPoint {
    pub const fn new(x: f32, color: Rgb) -> Self {
        Self { x, color }
    }
}

/// Triangular table of vector divided differences.
///
/// Stored flat: level `k` holds `n - k` entries and starts at
/// `k * n - k * (k - 1) / 2`. Level 0 is the raw colors; entry 0 of level `k`
/// is the Newton coefficient of degree `k`.
#[derive(Clone, Debug)]
pub struct DividedDifferenceTable {
    n: usize,
    entries: Vec<Vec3>,
}

impl DividedDifferenceTable {
    fn build(xs: &[f32], colors: &[Vec3]) -> Self {
        let n = xs.len();
        let mut entries = Vec::with_capacity(n * (n + 1) / 2);
        entries.extend_from_slice(colors);

        let mut prev = 0usize;
        for k in 1..n {
            let cur = entries.len();
            for j in 0..n - k {
                let d = (entries[prev + j + 1] - entries[prev + j]) / (xs[j + k] - xs[j]);
                entries.push(d);
            }
            prev = cur;
        }
        Self { n, entries }
    }

    pub fn degree(&self) -> usize {
        self.n.saturating_sub(1)
    }

    fn offset(&self, level: usize) -> usize {
        level * self.n - level * level.saturating_sub(1) / 2
    }

    /// Entries of one level, or `None` past the top level.
    pub fn level(&self, level: usize) -> Option<&[Vec3]> {
        if level >= self.n {
            return None;
        }
        let from = self.offset(level);
        Some(&self.entries[from..from + self.n - level])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct ColorInterpolator {
    xs: Vec<f32>,
    points: Vec<ControlPoint>,
    table: DividedDifferenceTable,
}

impl ColorInterpolator {
    /// Build the interpolating polynomial. Points may come in any order.
    pub fn build(points: &[ControlPoint]) -> Result<Self, InterpolationError> {
        if points.is_empty() {
            return Err(InterpolationError::Empty);
        }
        if let Some(p) = points.iter().find(|p| !p.x.is_finite()) {
            return Err(InterpolationError::NonFiniteAbscissa { x: p.x });
        }

        let mut sorted = points.to_vec();
        exchange_sort(&mut sorted);
        if let Some(w) = sorted.windows(2).find(|w| w[0].x == w[1].x) {
            return Err(InterpolationError::DuplicateAbscissa { x: w[0].x });
        }

        let xs: Vec<f32> = sorted.iter().map(|p| p.x).collect();
        let colors: Vec<Vec3> = sorted.iter().map(|p| Vec3::from(p.color)).collect();
        let table = DividedDifferenceTable::build(&xs, &colors);
        log::debug!(
            "[interpolation] built degree-{} color polynomial over x in [{}, {}]",
            table.degree(),
            xs[0],
            xs[xs.len() - 1]
        );
        Ok(Self {
            xs,
            points: sorted,
            table,
        })
    }

    /// Evaluate the ramp at `x`. Every channel lands in \[0, 1\] for finite
    /// `x`, including far outside the control points where the polynomial
    /// overflows; only a NaN `x` yields NaN channels.
    pub fn evaluate(&self, x: f32) -> Rgb {
        if x.is_nan() {
            return Rgb::new(f32::NAN, f32::NAN, f32::NAN);
        }
        let x = f64::from(x);
        let n = self.xs.len();
        let mut sum = [0.0f64; 3];
        // sign of the highest-degree non-zero term, which dominates on overflow
        let mut lead = [0.0f64; 3];
        let mut product = 1.0f64;
        let mut offset = 0usize;
        for (i, xi) in self.xs.iter().enumerate() {
            let coeff = self.table.entries[offset].to_array();
            for ((acc, sign), c) in sum.iter_mut().zip(lead.iter_mut()).zip(coeff) {
                if c == 0.0 {
                    continue;
                }
                let term = f64::from(c) * product;
                *acc += term;
                if term != 0.0 {
                    *sign = term.signum();
                }
            }
            offset += n - i;
            product *= x - f64::from(*xi);
            if product.is_nan() {
                // inf * 0: x sits exactly on a node
                product = 0.0;
            }
        }
        let channel = |ch: usize| -> f32 {
            if sum[ch].is_finite() {
                sum[ch] as f32
            } else if lead[ch] > 0.0 {
                1.0
            } else {
                0.0
            }
        };
        Rgb::new(channel(0), channel(1), channel(2)).clamp01()
    }

    /// Control points sorted by ascending `x`.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Newton coefficients, lowest degree first.
    pub fn coefficients(&self) -> Vec<Vec3> {
        (0..self.xs.len())
            .filter_map(|k| self.table.level(k).map(|l| l[0]))
            .collect()
    }

    pub fn table(&self) -> &DividedDifferenceTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

// Stable bubble sort with early exit; point sets are tiny and often already
// ordered.
fn exchange_sort(points: &mut [ControlPoint]) {
    let n = points.len();
    for i in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..n - i - 1 {
            if points[j].x > points[j + 1].x {
                points.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
}
