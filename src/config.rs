// Tuning for the two tool windows, loadable from a JSON file.
//
// Every field has a default, so a config file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geometry::{BoxNorm, XYNorm};
use crate::types::rgb;

/// Serializable 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Packed `0x00RRGGBB`, the frame buffer format.
    pub fn packed(self) -> u32 {
        rgb(self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crop: CropConfig,
    pub prompt: PromptConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let cfg = serde_json::from_str(&text)?;
        log::debug!("loaded config from {}", path.as_ref().display());
        Ok(cfg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub render_height: usize,
    pub line_color: Rgb,
    /// Smallest crop, in image pixels, along either axis.
    pub min_crop_px: usize,
    /// Zoom half-window is `zoom_base_px + (1 - slider) * zoom_range_px`.
    pub zoom_base_px: usize,
    pub zoom_range_px: usize,
    /// Half-window used until the slider is first read.
    pub initial_zoom_px: usize,
    pub initial_zoom_slider: f32,
    pub initial_box: BoxNorm,
    /// Natural size of the zoom and crop previews.
    pub preview_px: usize,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            render_height: 800,
            line_color: Rgb(0, 255, 0),
            min_crop_px: 5,
            zoom_base_px: 3,
            zoom_range_px: 200,
            initial_zoom_px: 100,
            initial_zoom_slider: 0.5,
            initial_box: BoxNorm { xy1: XYNorm { x: 0.25, y: 0.25 }, xy2: XYNorm { x: 0.75, y: 0.75 } },
            preview_px: 256,
        }
    }
}

impl CropConfig {
    /// Zoom half-window in pixels for a slider position in `[0,1]`.
    pub fn zoom_boundary_px(&self, slider: f32) -> usize {
        let slider = if slider.is_finite() { slider.clamp(0.0, 1.0) } else { 0.0 };
        self.zoom_base_px + ((1.0 - slider) * self.zoom_range_px as f32) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub render_height: usize,
    /// Width / height the whole display aims for.
    pub target_aspect_ratio: f64,
    pub num_masks: usize,
    pub initial_mask: usize,
    pub mask_threshold: f32,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { render_height: 800, target_aspect_ratio: 2.0, num_masks: 4, initial_mask: 1, mask_threshold: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_curve_matches_slider_ends() {
        let cfg = CropConfig::default();
        assert_eq!(cfg.zoom_boundary_px(1.0), 3);
        assert_eq!(cfg.zoom_boundary_px(0.0), 203);
        assert_eq!(cfg.zoom_boundary_px(0.5), 103);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "crop": { "render_height": 600 } }"#).unwrap();
        assert_eq!(cfg.crop.render_height, 600);
        assert_eq!(cfg.crop.min_crop_px, 5);
        assert_eq!(cfg.prompt, PromptConfig::default());
    }
}
