/// Straight (non-premultiplied) RGB stroke color, channels in `[0, 1]`.
///
/// Opacity is a separate per-point value because a negative opacity is the
/// "hidden" sentinel understood by the join shader.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct StrokeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl StrokeColor {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Creates a color from sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parses `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::from_srgb_u8(byte(0)?, byte(2)?, byte(4)?))
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Clamps all channels to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(self.r.clamp(0.0, 1.0), self.g.clamp(0.0, 1.0), self.b.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for StrokeColor {
    #[inline]
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(StrokeColor::from_hex("#ff0000"), Some(StrokeColor::new(1.0, 0.0, 0.0)));
        assert_eq!(StrokeColor::from_hex("00ff00"), Some(StrokeColor::new(0.0, 1.0, 0.0)));
        assert_eq!(StrokeColor::from_hex("#12345"), None);
        assert_eq!(StrokeColor::from_hex("#zz0000"), None);
    }

    #[test]
    fn clamped_limits_channels() {
        let c = StrokeColor::new(-1.0, 0.5, 3.0).clamped();
        assert_eq!(c, StrokeColor::new(0.0, 0.5, 1.0));
    }
}
