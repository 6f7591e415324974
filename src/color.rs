/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb8(0, 0, 0);
    pub const WHITE: Color = Color::rgb8(0xFF, 0xFF, 0xFF);

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 0xFF }
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Blends `self` over `dst` using the source alpha
    pub fn over(self, dst: Color) -> Color {
        let a = self.a as u32;
        let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
        Color::rgb8(mix(self.r, dst.r), mix(self.g, dst.g), mix(self.b, dst.b))
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::rgb8(r, g, b)
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        crossterm::style::Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_source_replaces_destination() {
        let red = Color::rgb8(255, 0, 0);
        assert_eq!(red.over(Color::WHITE), red);
    }

    #[test]
    fn transparent_source_keeps_destination() {
        let clear = Color::rgba8(255, 0, 0, 0);
        assert_eq!(clear.over(Color::rgb8(10, 20, 30)), Color::rgb8(10, 20, 30));
    }

    #[test]
    fn half_alpha_mixes_channels() {
        let halo = Color::rgba8(255, 255, 255, 128);
        let out = halo.over(Color::BLACK);
        assert_eq!(out.r, 128);
        assert_eq!(out.a, 255);
    }
}
