//! Three-channel color value shared by every stage of the pipeline.
//!
//! `Rgb` is plain old data so front-ends can upload it straight into GPU
//! buffers or typed arrays. Arithmetic goes through `glam::Vec3`.

use glam::Vec3;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation without clamping `t`; values outside \[0, 1\]
    /// extrapolate past the endpoints.
    #[inline]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::from(Vec3::from(self).lerp(Vec3::from(other), t))
    }

    /// Clamp every channel to \[0, 1\]. NaN channels stay NaN.
    #[inline]
    pub fn clamp01(self) -> Rgb {
        Rgb::new(clamp_channel(self.r), clamp_channel(self.g), clamp_channel(self.b))
    }

    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// `#rrggbb` with channels clamped to the displayable range.
    pub fn to_hex(self) -> String {
        let c = self.clamp01();
        let byte = |v: f32| (v * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(c.r), byte(c.g), byte(c.b))
    }
}

#[inline]
fn clamp_channel(v: f32) -> f32 {
    // f32::clamp keeps NaN, which is what callers rely on to detect bad input
    v.clamp(0.0, 1.0)
}

impl From<Vec3> for Rgb {
    fn from(v: Vec3) -> Self {
        Rgb::new(v.x, v.y, v.z)
    }
}

impl From<Rgb> for Vec3 {
    fn from(c: Rgb) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(a: [f32; 3]) -> Self {
        Rgb::new(a[0], a[1], a[2])
    }
}
