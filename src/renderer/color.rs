//! RGBA colours and the HSL helpers the games use for palettes

use serde::{Deserialize, Serialize};

/// Linear RGBA colour, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Rgba = Rgba([0.0, 0.0, 0.0, 1.0]);
    pub const TRANSPARENT: Rgba = Rgba([0.0, 0.0, 0.0, 0.0]);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// From a 0xRRGGBB literal
    pub const fn hex(rgb: u32) -> Self {
        Self([
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ])
    }

    /// From 8-bit channels and a float alpha (CSS `rgba()` style)
    pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a])
    }

    /// CSS-style HSL: hue in degrees, saturation and lightness in 0..=1
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self([r + m, g + m, b + m, 1.0])
    }

    pub fn alpha(&self) -> f32 {
        self.0[3]
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    /// Multiply the existing alpha
    pub fn fade(self, factor: f32) -> Self {
        let [r, g, b, a] = self.0;
        Self([r, g, b, a * factor.clamp(0.0, 1.0)])
    }

    /// Scale the RGB channels toward black by `factor` (0 = unchanged)
    pub fn darken(self, factor: f32) -> Self {
        let k = 1.0 - factor.clamp(0.0, 1.0);
        let [r, g, b, a] = self.0;
        Self([r * k, g * k, b * k, a])
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0.0; 4];
        for (i, c) in out.iter_mut().enumerate() {
            *c = self.0[i] + (other.0[i] - self.0[i]) * t;
        }
        Self(out)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Shared palette
pub mod palette {
    use super::Rgba;

    pub const ARCADE_GREEN: Rgba = Rgba::hex(0x00ff88);
    pub const ACCENT_ORANGE: Rgba = Rgba::hex(0xff6b35);
    pub const DANGER_RED: Rgba = Rgba::hex(0xff4444);
    pub const PANEL_DARK: Rgba = Rgba::hex(0x111111);
    pub const PANEL_MID: Rgba = Rgba::hex(0x222222);
    pub const BOARD_BACKGROUND: Rgba = Rgba::hex(0x0a0a0a);
    pub const ENGINE_GRADIENT_START: Rgba = Rgba::hex(0x0a0a0a);
    pub const ENGINE_GRADIENT_END: Rgba = Rgba::hex(0x1a1a2e);
    pub const ORANGE: Rgba = Rgba::hex(0xffa500);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgba, b: Rgba) -> bool {
        a.0.iter().zip(b.0.iter()).all(|(x, y)| (x - y).abs() < 0.01)
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(Rgba::hsl(0.0, 1.0, 0.5), Rgba::new(1.0, 0.0, 0.0, 1.0)));
        assert!(close(Rgba::hsl(120.0, 1.0, 0.5), Rgba::new(0.0, 1.0, 0.0, 1.0)));
        assert!(close(Rgba::hsl(240.0, 1.0, 0.5), Rgba::new(0.0, 0.0, 1.0, 1.0)));
        // Hue wraps
        assert!(close(Rgba::hsl(360.0, 1.0, 0.5), Rgba::hsl(0.0, 1.0, 0.5)));
    }

    #[test]
    fn test_hex() {
        assert!(close(Rgba::hex(0x00ff88), Rgba::new(0.0, 1.0, 136.0 / 255.0, 1.0)));
    }
}
