use glam::Vec3;

/// An sRGB colour, stored as the 24-bit hex literal it was authored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);

    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0xff_ffff)
    }

    #[allow(dead_code)]
    pub fn hex(&self) -> u32 {
        self.0
    }

    /// Channels in 0..=1, still sRGB encoded.
    pub fn srgb(&self) -> Vec3 {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        Vec3::new(r, g, b)
    }

    /// Linear channels, which is what the shaders work in.
    pub fn linear(&self) -> Vec3 {
        let srgb = self.srgb();
        Vec3::new(
            srgb_to_linear(srgb.x),
            srgb_to_linear(srgb.y),
            srgb_to_linear(srgb.z),
        )
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn splits_hex_into_channels() {
        let color = Color::from_hex(0xc22e2e);
        let srgb = color.srgb();
        assert_relative_eq!(srgb.x, 194.0 / 255.0);
        assert_relative_eq!(srgb.y, 46.0 / 255.0);
        assert_relative_eq!(srgb.z, 46.0 / 255.0);
    }

    #[test]
    fn linear_keeps_black_and_white() {
        assert_eq!(Color::BLACK.linear(), Vec3::ZERO);
        assert_relative_eq!(Color::WHITE.linear().x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn linear_darkens_midtones() {
        let grey = Color::from_hex(0x808080).linear();
        assert_relative_eq!(grey.x, 0.2158605, epsilon = 1e-5);
    }

    #[test]
    fn from_hex_ignores_high_byte() {
        assert_eq!(Color::from_hex(0xff77d977).hex(), 0x77d977);
    }
}
