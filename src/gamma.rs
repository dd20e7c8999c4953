// Gamma-correct mixing of packed pixels via lookup tables instead of powf.
// Used wherever an overlay or preview composites one image over another
// with fractional alpha (checkerboard alpha previews, translucent fills).

use crate::types::{channels, rgb};

/// sRGB <-> linear tables. Building one costs ~4k `powf` calls, so keep it around.
pub struct GammaLut {
    to_linear: [f32; 256],
    // Linear light quantized to 12 bits
    to_srgb: [u8; LINEAR_STEPS],
}

const LINEAR_STEPS: usize = 4096;

fn srgb_decode(c: f32) -> f32 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

fn srgb_encode(l: f32) -> f32 {
    if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaLut {
    pub fn new() -> Self {
        let top = (LINEAR_STEPS - 1) as f32;
        Self {
            to_linear: std::array::from_fn(|v| srgb_decode(v as f32 / 255.0)),
            to_srgb: std::array::from_fn(|i| (srgb_encode(i as f32 / top) * 255.0).round().clamp(0.0, 255.0) as u8),
        }
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.to_linear[usize::from(v)]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        let top = (LINEAR_STEPS - 1) as f32;
        self.to_srgb[(l.clamp(0.0, 1.0) * top).round() as usize]
    }

    /// `a * fg + (1 - a) * bg`, mixed in linear light.
    #[inline]
    pub fn mix(&self, fg: u32, bg: u32, a: f32) -> u32 {
        if a <= 0.0 {
            return bg;
        }
        if a >= 1.0 {
            return fg;
        }
        let (rf, gf, bf) = channels(fg);
        let (rb, gb, bb) = channels(bg);
        let inv = 1.0 - a;
        let ch = |f: u8, b: u8| {
            self.linear_to_srgb_u8(a * self.srgb_u8_to_linear(f) + inv * self.srgb_u8_to_linear(b))
        };
        rgb(ch(rf, rb), ch(gf, gb), ch(bf, bb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_roundtrip_exactly() {
        let lut = GammaLut::new();
        for v in [0u8, 128, 255] {
            assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(v)), v);
        }
    }

    #[test]
    fn mix_endpoints_return_inputs() {
        let lut = GammaLut::new();
        let (fg, bg) = (rgb(200, 10, 10), rgb(0, 0, 255));
        assert_eq!(lut.mix(fg, bg, 0.0), bg);
        assert_eq!(lut.mix(fg, bg, 1.0), fg);
        // Half-way in linear light lands brighter than the sRGB midpoint
        let (r, _, _) = channels(lut.mix(rgb(255, 0, 0), rgb(0, 0, 0), 0.5));
        assert!(r > 128);
    }
}
