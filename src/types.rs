// Core pixel types shared by every node, overlay and controller.

use crate::error::Error;
use image::{GrayImage, Rgb, RgbImage};

/// Pack three channels into the 0x00RRGGBB layout minifb displays.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Split a packed pixel back into (r, g, b).
#[inline]
pub const fn channels(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

/// Halve every channel. Used to draw disabled widgets.
#[inline]
pub const fn dim(px: u32) -> u32 {
    (px >> 1) & 0x007F_7F7F
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the frame is on screen (pixels)
    pub height: usize,    // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Solid frame of the given size.
    pub fn filled(height: usize, width: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    pub fn hw(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Convert an `image` RGB buffer into packed pixels.
    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img.pixels().map(|p| rgb(p[0], p[1], p[2])).collect();
        Self { width: w as usize, height: h as usize, pixels }
    }

    /// Grayscale masks are shown as gray pixels (used for mask tiles).
    pub fn from_gray_image(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img.pixels().map(|p| rgb(p[0], p[0], p[0])).collect();
        Self { width: w as usize, height: h as usize, pixels }
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let (r, g, b) = channels(self.get(x as usize, y as usize));
            Rgb([r, g, b])
        })
    }

    /// Load any image file `image` can decode.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let img = image::open(path)?.to_rgb8();
        Ok(Self::from_rgb_image(&img))
    }

    /// Copy `src` into this frame with its top-left at (x, y); out-of-bounds parts are dropped.
    pub fn blit(&mut self, src: &FrameBuffer, x: i32, y: i32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + src.width as i32).min(self.width as i32);
        let y1 = (y + src.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let run = (x1 - x0) as usize;
        for dy in y0..y1 {
            let sy = (dy - y) as usize;
            let sx = (x0 - x) as usize;
            let src_row = sy * src.width + sx;
            let dst_row = dy as usize * self.width + x0 as usize;
            self.pixels[dst_row..dst_row + run].copy_from_slice(&src.pixels[src_row..src_row + run]);
        }
    }

    /// Copy out the half-open window [x1,x2) x [y1,y2), clipped to this frame.
    pub fn crop(&self, x1: usize, y1: usize, x2: usize, y2: usize) -> FrameBuffer {
        let x2 = x2.min(self.width);
        let y2 = y2.min(self.height);
        let x1 = x1.min(x2);
        let y1 = y1.min(y2);
        let (w, h) = (x2 - x1, y2 - y1);
        let mut pixels = Vec::with_capacity(w * h);
        for y in y1..y2 {
            let row = y * self.width;
            pixels.extend_from_slice(&self.pixels[row + x1..row + x2]);
        }
        FrameBuffer { width: w, height: h, pixels }
    }
}

/// Alpha mask in [0,1] per pixel; 1 = take the foreground image, 0 = keep what's underneath.
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub alpha: Vec<f32>, // length = width * height, values clamped to [0.0, 1.0]
}

impl Mask {
    pub fn from_gray_image(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        let alpha = img.pixels().map(|p| p[0] as f32 / 255.0).collect();
        Self { width: w as usize, height: h as usize, alpha }
    }
}

/// Raw mask scores from a segmentation model, laid out as [mask_index][y][x].
/// The leading batch dimension of the model output is always 1 and is dropped here.
#[derive(Clone, Debug)]
pub struct MaskPredictions {
    pub num_masks: usize,
    pub height: usize,
    pub width: usize,
    pub scores: Vec<f32>,
}

impl MaskPredictions {
    pub fn new(num_masks: usize, height: usize, width: usize, scores: Vec<f32>) -> Result<Self, Error> {
        let expected = num_masks * height * width;
        if scores.len() != expected {
            return Err(Error::MaskShape(format!(
                "expected {num_masks}x{height}x{width} = {expected} scores, got {}",
                scores.len()
            )));
        }
        Ok(Self { num_masks, height, width, scores })
    }

    pub fn hw(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Scores of one mask, row-major. Panics if `index >= num_masks`.
    pub fn plane(&self, index: usize) -> &[f32] {
        let len = self.height * self.width;
        &self.scores[index * len..(index + 1) * len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack_roundtrip() {
        let px = rgb(12, 200, 7);
        assert_eq!(px, 0x000C_C807);
        assert_eq!(channels(px), (12, 200, 7));
    }

    #[test]
    fn blit_clips_at_edges() {
        let mut dst = FrameBuffer::filled(4, 4, 0);
        let src = FrameBuffer::filled(3, 3, 1);
        dst.blit(&src, 2, -1);
        let ones = dst.pixels.iter().filter(|&&p| p == 1).count();
        assert_eq!(ones, 4); // 2 columns x 2 rows survive
        assert_eq!(dst.get(3, 0), 1);
        assert_eq!(dst.get(1, 0), 0);
    }

    #[test]
    fn crop_is_half_open_and_clipped() {
        let mut fb = FrameBuffer::filled(5, 6, 0);
        for (i, p) in fb.pixels.iter_mut().enumerate() {
            *p = i as u32;
        }
        let c = fb.crop(1, 2, 4, 10);
        assert_eq!(c.hw(), (3, 3));
        assert_eq!(c.get(0, 0), fb.get(1, 2));
    }

    #[test]
    fn mask_predictions_reject_bad_length() {
        assert!(MaskPredictions::new(4, 2, 2, vec![0.0; 15]).is_err());
        let preds = MaskPredictions::new(2, 2, 2, (0..8).map(|v| v as f32).collect()).unwrap();
        assert_eq!(preds.plane(1), &[4.0, 5.0, 6.0, 7.0]);
    }
}
