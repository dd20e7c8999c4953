// Whole-image pixel operations: scaling, letterboxing, blending, mask thresholding.
// Scaling is delegated to the `image` crate; everything else works on packed
// FrameBuffer pixels directly.

use crate::error::Error;
use crate::gamma::GammaLut;
use crate::types::{FrameBuffer, Mask, MaskPredictions, rgb};
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma};

/// Largest (h, w) with the aspect ratio of `src_hw` that fits inside `target_hw`.
/// Never returns a zero dimension.
pub fn fit_hw(src_hw: (usize, usize), target_hw: (usize, usize)) -> (usize, usize) {
    let (sh, sw) = (src_hw.0.max(1) as f64, src_hw.1.max(1) as f64);
    let (th, tw) = (target_hw.0.max(1), target_hw.1.max(1));
    let scale = (th as f64 / sh).min(tw as f64 / sw);
    let h = ((sh * scale).round() as usize).clamp(1, th);
    let w = ((sw * scale).round() as usize).clamp(1, tw);
    (h, w)
}

/// Scale a frame to exactly (h, w). Returns a copy when the size already matches.
pub fn resize(src: &FrameBuffer, h: usize, w: usize, filter: FilterType) -> FrameBuffer {
    let (h, w) = (h.max(1), w.max(1));
    if src.hw() == (h, w) {
        return src.clone();
    }
    if src.is_empty() {
        return FrameBuffer::filled(h, w, 0);
    }
    let scaled = imageops::resize(&src.to_rgb_image(), w as u32, h as u32, filter);
    FrameBuffer::from_rgb_image(&scaled)
}

/// Scale `src` to fit inside (h, w) keeping its aspect ratio, then pad the
/// leftover evenly on both sides with `fill`.
pub fn letterbox(src: &FrameBuffer, h: usize, w: usize, fill: u32, filter: FilterType) -> FrameBuffer {
    let (h, w) = (h.max(1), w.max(1));
    let (fh, fw) = fit_hw(src.hw(), (h, w));
    let scaled = resize(src, fh, fw, filter);
    let pad_t = (h - fh) / 2;
    let pad_l = (w - fw) / 2;
    let mut out = FrameBuffer::filled(h, w, fill);
    out.blit(&scaled, pad_l as i32, pad_t as i32);
    out
}

/// Gamma-correct blend of `sink` into `fg` wherever `mask` is non-zero:
/// `fg = a * sink + (1 - a) * fg`.
pub fn blend_linear_in_place(fg: &mut FrameBuffer, sink: &FrameBuffer, mask: &Mask, lut: &GammaLut) -> Result<(), Error> {
    if fg.width != sink.width || fg.height != sink.height {
        return Err(Error::SizeMismatch(format!(
            "blend: {}x{} vs {}x{}",
            fg.width, fg.height, sink.width, sink.height
        )));
    }
    if mask.width != fg.width || mask.height != fg.height {
        return Err(Error::SizeMismatch(format!(
            "blend mask: {}x{} vs {}x{}",
            mask.width, mask.height, fg.width, fg.height
        )));
    }

    for ((dst, &src), &a) in fg.pixels.iter_mut().zip(&sink.pixels).zip(&mask.alpha) {
        *dst = lut.mix(src, *dst, a);
    }
    Ok(())
}

/// Binary 0/255 image from one mask's scores (`> threshold` is foreground).
pub fn threshold_plane(scores: &[f32], height: usize, width: usize, threshold: f32, invert: bool) -> GrayImage {
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let on = scores[y as usize * width + x as usize] > threshold;
        Luma([if on != invert { 255 } else { 0 }])
    })
}

/// Upscale one mask's raw scores with bilinear interpolation, then threshold.
/// Interpolating before thresholding keeps the outline smooth at high resolution.
pub fn hires_mask(preds: &MaskPredictions, index: usize, out_hw: (usize, usize), threshold: f32) -> GrayImage {
    let (out_h, out_w) = (out_hw.0.max(1), out_hw.1.max(1));
    let plane: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(preds.width as u32, preds.height as u32, |x, y| {
            Luma([preds.plane(index)[y as usize * preds.width + x as usize]])
        });
    let up = imageops::resize(&plane, out_w as u32, out_h as u32, FilterType::Triangle);
    GrayImage::from_fn(out_w as u32, out_h as u32, |x, y| {
        Luma([if up.get_pixel(x, y)[0] > threshold { 255 } else { 0 }])
    })
}

/// Two-tone checkerboard that suggests transparency behind a masked image.
pub struct CheckerPattern {
    tile_px: usize,
    light: u32,
    dark: u32,
    lut: GammaLut,
    cached: Option<FrameBuffer>,
}

impl Default for CheckerPattern {
    fn default() -> Self {
        Self::new(16)
    }
}

impl CheckerPattern {
    pub fn new(tile_px: usize) -> Self {
        Self { tile_px: tile_px.max(1), light: rgb(200, 200, 200), dark: rgb(120, 120, 120), lut: GammaLut::new(), cached: None }
    }

    fn pattern(&mut self, h: usize, w: usize) -> &FrameBuffer {
        let stale = self.cached.as_ref().is_none_or(|c| c.hw() != (h, w));
        if stale {
            let mut fb = FrameBuffer::filled(h, w, self.light);
            for y in 0..h {
                for x in 0..w {
                    if ((x / self.tile_px) + (y / self.tile_px)) % 2 == 1 {
                        fb.pixels[y * w + x] = self.dark;
                    }
                }
            }
            self.cached = Some(fb);
        }
        self.cached.get_or_insert_with(|| FrameBuffer::filled(h, w, 0))
    }

    /// Show `image` where `mask` is set and the checkerboard elsewhere.
    /// The mask is rescaled to the image size if needed.
    pub fn superimpose(&mut self, image: &FrameBuffer, mask: &GrayImage) -> Result<FrameBuffer, Error> {
        let (h, w) = image.hw();
        let mask = if mask.dimensions() != (w as u32, h as u32) {
            imageops::resize(mask, w as u32, h as u32, FilterType::Nearest)
        } else {
            mask.clone()
        };
        let mut out = self.pattern(h, w).clone();
        let alpha = Mask::from_gray_image(&mask);
        blend_linear_in_place(&mut out, image, &alpha, &self.lut)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_preserves_aspect_and_never_zero() {
        assert_eq!(fit_hw((100, 200), (100, 100)), (50, 100));
        assert_eq!(fit_hw((200, 100), (100, 100)), (100, 50));
        assert_eq!(fit_hw((1, 1000), (10, 10)), (1, 10));
    }

    #[test]
    fn letterbox_pads_evenly() {
        let src = FrameBuffer::filled(10, 20, rgb(255, 255, 255));
        let out = letterbox(&src, 20, 20, 0, FilterType::Nearest);
        assert_eq!(out.hw(), (20, 20));
        assert_eq!(out.get(10, 0), 0); // top padding
        assert_eq!(out.get(10, 10), rgb(255, 255, 255));
        assert_eq!(out.get(10, 19), 0); // bottom padding
    }

    #[test]
    fn threshold_respects_invert() {
        let scores = [-1.0, 0.5, 2.0, 0.0];
        let m = threshold_plane(&scores, 2, 2, 0.0, false);
        assert_eq!(m.as_raw(), &vec![0, 255, 255, 0]);
        let inv = threshold_plane(&scores, 2, 2, 0.0, true);
        assert_eq!(inv.as_raw(), &vec![255, 0, 0, 255]);
    }

    #[test]
    fn hires_mask_matches_output_size() {
        let preds = MaskPredictions::new(1, 2, 2, vec![1.0, 1.0, -1.0, -1.0]).unwrap();
        let m = hires_mask(&preds, 0, (8, 6), 0.0);
        assert_eq!(m.dimensions(), (6, 8));
        assert_eq!(m.get_pixel(3, 0)[0], 255);
        assert_eq!(m.get_pixel(3, 7)[0], 0);
    }

    #[test]
    fn checker_superimpose_keeps_masked_pixels() {
        let img = FrameBuffer::filled(4, 4, rgb(10, 200, 30));
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(1, 1, Luma([255]));
        let out = CheckerPattern::new(2).superimpose(&img, &mask).unwrap();
        assert_eq!(out.get(1, 1), rgb(10, 200, 30));
        assert_ne!(out.get(0, 0), rgb(10, 200, 30));
    }
}
