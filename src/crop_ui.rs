// Interactive image cropping: a main view with a draggable crop box, a zoom
// preview that follows the pointer, and a letterboxed preview of the result.

use std::ops::Range;

use image::imageops::FilterType;
use minifb::Key;

use crate::config::CropConfig;
use crate::error::Error;
use crate::geometry::{BoxNorm, XYNorm};
use crate::node::{Handle, Node, NodeId};
use crate::overlays::{CropBoxOverlay, HoverOverlay, PolygonsOverlay};
use crate::stack::{OverlayStack, Stack};
use crate::types::{FrameBuffer, rgb};
use crate::vision::letterbox;
use crate::widgets::{Button, ImageDisplay, MessageBar, Separator, Slider, TextBlock};
use crate::window::{CancelToken, KeyBindings, Screen};

/// Half-open pixel intervals selecting the crop on each axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CropResult {
    pub x: Range<usize>,
    pub y: Range<usize>,
}

impl CropResult {
    pub fn full(width: usize, height: usize) -> Self {
        Self { x: 0..width, y: 0..height }
    }

    pub fn width(&self) -> usize {
        self.x.len()
    }

    pub fn height(&self) -> usize {
        self.y.len()
    }

    pub fn apply(&self, image: &FrameBuffer) -> FrameBuffer {
        image.crop(self.x.start, self.y.start, self.x.end, self.y.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropAction {
    ZoomIn,
    ZoomOut,
    /// Move the crop box by (dx, dy) image pixels.
    Nudge(i32, i32),
    Confirm,
}

/// `[`/`]` zoom, arrows and WASD nudge by one pixel, Enter confirms.
pub fn default_crop_bindings() -> KeyBindings<CropAction> {
    KeyBindings::new()
        .bind(Key::LeftBracket, CropAction::ZoomOut)
        .bind(Key::RightBracket, CropAction::ZoomIn)
        .bind_all(&[Key::Up, Key::W], CropAction::Nudge(0, -1))
        .bind_all(&[Key::Down, Key::S], CropAction::Nudge(0, 1))
        .bind_all(&[Key::Left, Key::A], CropAction::Nudge(-1, 0))
        .bind_all(&[Key::Right, Key::D], CropAction::Nudge(1, 0))
        .bind_all(&[Key::Enter, Key::NumPadEnter], CropAction::Confirm)
}

/// Typed handles to everything the controller reads or updates.
#[derive(Clone, Copy, Debug)]
pub struct CropHandles {
    pub hover: Handle<HoverOverlay>,
    pub crop_box: Handle<CropBoxOverlay>,
    pub zoom_slider: Handle<Slider>,
    pub zoom_display: Handle<ImageDisplay>,
    pub zoom_outline: Handle<PolygonsOverlay>,
    pub crop_display: Handle<ImageDisplay>,
    pub done: Handle<Button>,
    pub xy1_text: Handle<TextBlock>,
    pub wh_text: Handle<TextBlock>,
    pub xy2_text: Handle<TextBlock>,
}

/// Build the crop window layout. Returns the root and handles into it.
pub fn make_crop_ui(image: &FrameBuffer, cfg: &CropConfig) -> (Node, CropHandles) {
    let line = cfg.line_color.packed();
    let preview = cfg.preview_px.max(1);
    let separator = rgb(40, 40, 40);

    let main_display = Node::new(ImageDisplay::new(image.clone())).named("MainDisplay");
    let (hover, hover_h) = Node::with_handle(HoverOverlay::new());
    let (crop_box, crop_box_h) =
        Node::with_handle(CropBoxOverlay::new(image.hw(), line, 2).with_box(cfg.initial_box));

    let (zoom_display, zoom_display_h) = Node::with_handle(
        ImageDisplay::new(FrameBuffer::filled(preview, preview, 0)).with_filter(FilterType::Nearest),
    );
    let (zoom_outline, zoom_outline_h) = Node::with_handle(PolygonsOverlay::new(line, 1));
    let (zoom_slider, zoom_slider_h) = Node::with_handle(
        Slider::new("Zoom Factor", 0.0, 1.0, cfg.initial_zoom_slider)
            .with_step(0.05)
            .with_markers((0..=4).map(|i| i as f32 * 0.25).collect()),
    );
    let (crop_display, crop_display_h) = Node::with_handle(
        ImageDisplay::new(FrameBuffer::filled(preview, preview, 0)).with_filter(FilterType::Nearest),
    );
    let (done, done_h) = Node::with_handle(Button::new("Done", rgb(0, 185, 125)));

    let (xy1_text, xy1_h) = Node::with_handle(TextBlock::new("Crop XY1: ", "(0, 0)"));
    let (wh_text, wh_h) = Node::with_handle(TextBlock::new("Crop WH: ", "(1, 1)"));
    let (xy2_text, xy2_h) = Node::with_handle(TextBlock::new("Crop XY2: ", "(1, 1)"));

    let (img_h, img_w) = image.hw();
    let side_column = Stack::vertical(vec![
        Node::new(OverlayStack::new(zoom_display, vec![zoom_outline])).named("ZoomPreview"),
        zoom_slider,
        Node::new(Separator::new(8, separator)),
        crop_display.named("CropPreview"),
        done,
    ]);
    let root = Stack::vertical(vec![
        Node::new(MessageBar::new([format!("Original: {img_w} x {img_h} px")])),
        Node::new(Stack::horizontal(vec![
            Node::new(OverlayStack::new(main_display, vec![hover, crop_box])),
            Node::new(Separator::new(8, separator)),
            Node::new(side_column),
        ])),
        Node::new(Stack::horizontal(vec![xy1_text, wh_text, xy2_text]).space_equally(true)),
        Node::new(
            MessageBar::new([
                "Click & drag to adjust crop boundaries",
                "Arrow keys for fine adjustments",
                "Use ] or [ keys to zoom",
            ])
            .space_equally(true),
        ),
    ]);

    let handles = CropHandles {
        hover: hover_h,
        crop_box: crop_box_h,
        zoom_slider: zoom_slider_h,
        zoom_display: zoom_display_h,
        zoom_outline: zoom_outline_h,
        crop_display: crop_display_h,
        done: done_h,
        xy1_text: xy1_h,
        wh_text: wh_h,
        xy2_text: xy2_h,
    };
    (Node::new(root).named("CropUI"), handles)
}

/// Per-frame crop logic over a [`make_crop_ui`] tree.
pub struct CropController {
    image: FrameBuffer,
    cfg: CropConfig,
    root: Node,
    handles: CropHandles,
    zoom_boundary_px: usize,
    // Current crop as half-open pixel bounds (x1, y1, x2, y2)
    crop: (usize, usize, usize, usize),
}

impl CropController {
    pub fn new(image: FrameBuffer, cfg: CropConfig) -> Self {
        let (root, handles) = make_crop_ui(&image, &cfg);
        let (h, w) = image.hw();
        Self { zoom_boundary_px: cfg.initial_zoom_px, crop: (0, 0, w, h), image, cfg, root, handles }
    }

    pub fn handles(&self) -> CropHandles {
        self.handles
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn zoom_boundary_px(&self) -> usize {
        self.zoom_boundary_px
    }

    pub fn result(&self) -> CropResult {
        let (x1, y1, x2, y2) = self.crop;
        CropResult { x: x1..x2, y: y1..y2 }
    }

    pub fn full_result(&self) -> CropResult {
        let (h, w) = self.image.hw();
        CropResult::full(w, h)
    }

    /// Read every input once and refresh the derived displays.
    pub fn update(&mut self) -> Result<(), Error> {
        let h = self.handles;
        let (zoom_changed, _, zoom_event) = self.root.widget_mut(h.hover)?.read();
        let (slider_changed, slider) = self.root.widget_mut(h.zoom_slider)?.read();
        let (crop_changed, valid, bbox) = self.root.widget_mut(h.crop_box)?.read();

        if slider_changed {
            self.zoom_boundary_px = self.cfg.zoom_boundary_px(slider);
        }

        // An unusable box means "no crop" rather than an error
        let bbox = if valid { bbox } else { BoxNorm::FULL };
        if crop_changed {
            self.set_crop_from_box(bbox);
            self.refresh_crop_preview()?;
        }
        if zoom_changed || slider_changed || crop_changed {
            self.refresh_zoom(zoom_event.xy_norm)?;
        }
        Ok(())
    }

    fn set_crop_from_box(&mut self, bbox: BoxNorm) {
        let (img_h, img_w) = self.image.hw();
        let to_px = |v: f32, len: usize| ((v * len as f32).round().max(0.0) as usize).min(len);
        let (mut x1, mut y1) = (to_px(bbox.xy1.x, img_w), to_px(bbox.xy1.y, img_h));
        let (mut x2, mut y2) = (to_px(bbox.xy2.x, img_w), to_px(bbox.xy2.y, img_h));
        if x2.abs_diff(x1) < self.cfg.min_crop_px || y2.abs_diff(y1) < self.cfg.min_crop_px {
            (x1, y1, x2, y2) = (0, 0, img_w, img_h);
        }
        self.crop = (x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2));
        log::debug!("crop set to x {}..{}, y {}..{}", self.crop.0, self.crop.2, self.crop.1, self.crop.3);
    }

    /// Size the crop preview was last drawn at, or its natural size before the first frame.
    fn display_hw(&self, id: NodeId) -> (usize, usize) {
        match self.root.find(id).map(Node::last_hw) {
            Some((h, w)) if h > 0 && w > 0 => (h, w),
            _ => (self.cfg.preview_px.max(1), self.cfg.preview_px.max(1)),
        }
    }

    fn refresh_crop_preview(&mut self) -> Result<(), Error> {
        let h = self.handles;
        let (x1, y1, x2, y2) = self.crop;
        let cropped = self.image.crop(x1, y1, x2, y2);
        let (disp_h, disp_w) = self.display_hw(h.crop_display.id());
        let boxed = letterbox(&cropped, disp_h, disp_w, 0, FilterType::Nearest);
        self.root.widget_mut(h.crop_display)?.set_image(boxed);

        self.root.widget_mut(h.xy1_text)?.set_value(format!("({x1}, {y1})"));
        self.root.widget_mut(h.xy2_text)?.set_value(format!("({x2}, {y2})"));
        self.root.widget_mut(h.wh_text)?.set_value(format!("({}, {})", x2 - x1, y2 - y1));
        Ok(())
    }

    /// Cut a window around `center` and outline the crop inside it.
    fn refresh_zoom(&mut self, center: XYNorm) -> Result<(), Error> {
        let h = self.handles;
        let (img_h, img_w) = self.image.hw();
        // Shrink the window for images smaller than it
        let bx = self.zoom_boundary_px.min(img_w.saturating_sub(1) / 2);
        let by = self.zoom_boundary_px.min(img_h.saturating_sub(1) / 2);
        let cx = ((center.x * img_w as f32).round() as usize).clamp(bx, img_w.saturating_sub(bx + 1).max(bx));
        let cy = ((center.y * img_h as f32).round() as usize).clamp(by, img_h.saturating_sub(by + 1).max(by));
        let (zx1, zy1) = (cx - bx, cy - by);
        let zoom = self.image.crop(zx1, zy1, cx + bx + 1, cy + by + 1);

        let (zoom_h, zoom_w) = zoom.hw();
        let sx = zoom_w.saturating_sub(1).max(1) as f32;
        let sy = zoom_h.saturating_sub(1).max(1) as f32;
        let (x1, y1, x2, y2) = self.crop;
        let (zx1, zy1) = (zx1 as f32, zy1 as f32);
        // One pixel outside the crop on every side, so the outline doesn't hide crop pixels
        let left = (x1 as f32 - zx1 - 1.0) / sx;
        let top = (y1 as f32 - zy1 - 1.0) / sy;
        let right = (x2 as f32 - zx1 + 1.0) / sx;
        let bottom = (y2 as f32 - zy1 + 1.0) / sy;
        let outline = vec![
            XYNorm { x: left, y: top },
            XYNorm { x: right, y: top },
            XYNorm { x: right, y: bottom },
            XYNorm { x: left, y: bottom },
        ];
        self.root.widget_mut(h.zoom_outline)?.set_polygons(Some(vec![outline]));
        self.root.widget_mut(h.zoom_display)?.set_image(zoom);
        Ok(())
    }

    /// Apply a bound key action. Returns true when the action ends the session.
    pub fn apply(&mut self, action: CropAction) -> Result<bool, Error> {
        let h = self.handles;
        match action {
            CropAction::ZoomIn => self.root.widget_mut(h.zoom_slider)?.increment(),
            CropAction::ZoomOut => self.root.widget_mut(h.zoom_slider)?.decrement(),
            CropAction::Nudge(dx, dy) => self.root.widget_mut(h.crop_box)?.nudge(dx, dy),
            CropAction::Confirm => return Ok(true),
        }
        Ok(false)
    }

    pub fn render(&mut self) -> FrameBuffer {
        self.root.render_to_height(self.cfg.render_height)
    }

    /// Drive the window until the user confirms, closes or cancels.
    /// Cancelling returns the full image, never a partial crop.
    pub fn run(mut self, screen: &mut impl Screen, cancel: &CancelToken) -> Result<CropResult, Error> {
        let bindings = default_crop_bindings();
        loop {
            if cancel.is_cancelled() {
                log::warn!("crop cancelled, keeping the full image");
                return Ok(self.full_result());
            }
            self.update()?;
            let frame = self.render();
            let shown = screen.show(&frame, &mut self.root)?;
            if shown.request_break {
                break;
            }
            if let Some(action) = shown.keypress.and_then(|k| bindings.action(k)) {
                if self.apply(action)? {
                    break;
                }
            }
            if self.root.widget_mut(self.handles.done)?.read() {
                break;
            }
        }
        if cancel.is_cancelled() {
            log::warn!("crop cancelled, keeping the full image");
            return Ok(self.full_result());
        }
        let result = self.result();
        log::info!("crop finished: x {:?}, y {:?}", result.x, result.y);
        Ok(result)
    }
}

/// Open a crop session for `image` on `screen`.
pub fn run_crop_ui(
    image: &FrameBuffer,
    cfg: &CropConfig,
    screen: &mut impl Screen,
    cancel: &CancelToken,
) -> Result<CropResult, Error> {
    CropController::new(image.clone(), cfg.clone()).run(screen, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(h: usize, w: usize) -> FrameBuffer {
        let mut fb = FrameBuffer::filled(h, w, 0);
        for y in 0..h {
            for x in 0..w {
                fb.pixels[y * w + x] = rgb(x as u8, y as u8, 0);
            }
        }
        fb
    }

    #[test]
    fn initial_box_maps_to_pixels() {
        let mut ctl = CropController::new(gradient(80, 100), CropConfig::default());
        ctl.update().unwrap();
        assert_eq!(ctl.result(), CropResult { x: 25..75, y: 20..60 });
        assert_eq!(ctl.zoom_boundary_px(), 103);
    }

    #[test]
    fn invalid_box_falls_back_to_full_image() {
        let mut ctl = CropController::new(gradient(80, 100), CropConfig::default());
        let h = ctl.handles();
        ctl.root_mut()
            .widget_mut(h.crop_box)
            .unwrap()
            .set_box(BoxNorm::new(XYNorm::new(0.5, 0.5), XYNorm::new(0.51, 0.9)));
        ctl.update().unwrap();
        assert_eq!(ctl.result(), CropResult::full(100, 80));
    }

    #[test]
    fn text_blocks_report_crop() {
        let mut ctl = CropController::new(gradient(80, 100), CropConfig::default());
        ctl.update().unwrap();
        let h = ctl.handles();
        assert_eq!(ctl.root().get(h.wh_text).unwrap().text(), "Crop WH: (50, 40)");
        assert_eq!(ctl.root().get(h.xy2_text).unwrap().text(), "Crop XY2: (75, 60)");
    }

    #[test]
    fn zoom_window_fits_small_images() {
        let mut ctl = CropController::new(gradient(20, 30), CropConfig::default());
        ctl.update().unwrap();
        let zoom = ctl.root().get(ctl.handles().zoom_display).unwrap().image();
        assert_eq!(zoom.hw(), (19, 29));
    }

    #[test]
    fn nudge_and_zoom_actions() {
        let mut ctl = CropController::new(gradient(80, 100), CropConfig::default());
        ctl.update().unwrap();
        assert!(!ctl.apply(CropAction::Nudge(3, 0)).unwrap());
        assert!(!ctl.apply(CropAction::ZoomIn).unwrap());
        ctl.update().unwrap();
        assert_eq!(ctl.result().x, 28..78);
        // 3 + (1 - 0.55) * 200, give or take float truncation
        assert!((92..=93).contains(&ctl.zoom_boundary_px()));
        assert!(ctl.apply(CropAction::Confirm).unwrap());
    }

    #[test]
    fn rendered_frame_has_requested_height() {
        let mut ctl = CropController::new(gradient(80, 100), CropConfig { render_height: 300, ..CropConfig::default() });
        ctl.update().unwrap();
        assert_eq!(ctl.render().height, 300);
    }
}
