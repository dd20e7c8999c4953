// Prompt collection for segmentation: a tool bar (hover, box, foreground
// point, background point, clear), the main image with one overlay per
// tool, and a block of selectable mask previews.
//
// [`PromptUi`] owns the layout and the two radio constraints;
// [`PromptUiControl`] adds the per-frame reading and display updates.

use image::GrayImage;
use image::imageops::FilterType;
use minifb::Key;
use serde::{Deserialize, Serialize};

use crate::arrange::{Side, StackOrder, find_best_display_arrangement};
use crate::config::PromptConfig;
use crate::error::Error;
use crate::geometry::{BoxNorm, XYNorm, norm_from_px};
use crate::node::{Handle, Node, NodeId};
use crate::overlays::{BoxSelectOverlay, HoverOverlay, PointSelectOverlay, PolygonsOverlay};
use crate::radio::RadioConstraint;
use crate::stack::{OverlayStack, Stack};
use crate::types::{FrameBuffer, MaskPredictions, rgb};
use crate::vision::{CheckerPattern, hires_mask, resize, threshold_plane};
use crate::widgets::{Button, ImageDisplay, ToggleButton, ToggleImage};
use crate::window::{CancelToken, KeyBindings, Screen};

const IMAGE_PAD_COLOR: u32 = rgb(35, 25, 30);
const MASK_PAD_COLOR: u32 = rgb(60, 60, 60);

/// Prompt geometry, all normalized to the main image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub boxes: Vec<BoxNorm>,
    pub fg_points: Vec<XYNorm>,
    pub bg_points: Vec<XYNorm>,
}

impl Prompts {
    pub fn len(&self) -> usize {
        self.boxes.len() + self.fg_points.len() + self.bg_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One frame's worth of prompt input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PromptRead {
    /// Prompts or tool changed since the last read; re-run inference.
    pub need_reencode: bool,
    pub prompts: Prompts,
}

/// Tools in tool-bar order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Hover,
    Box,
    FgPoint,
    BgPoint,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Hover, Tool::Box, Tool::FgPoint, Tool::BgPoint];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ToolHandles {
    pub hover: Handle<ToggleButton>,
    pub boxes: Handle<ToggleButton>,
    pub fg_point: Handle<ToggleButton>,
    pub bg_point: Handle<ToggleButton>,
    pub clear: Handle<Button>,
}

impl ToolHandles {
    fn toggles(&self) -> [Handle<ToggleButton>; 4] {
        [self.hover, self.boxes, self.fg_point, self.bg_point]
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OverlayHandles {
    pub polygon: Handle<PolygonsOverlay>,
    pub hover: Handle<HoverOverlay>,
    pub boxes: Handle<BoxSelectOverlay>,
    pub fg_points: Handle<PointSelectOverlay>,
    pub bg_points: Handle<PointSelectOverlay>,
}

impl OverlayHandles {
    /// Overlay ids in tool order.
    fn tool_overlay_ids(&self) -> [NodeId; 4] {
        [self.hover.id(), self.boxes.id(), self.fg_points.id(), self.bg_points.id()]
    }
}

pub struct PromptUi {
    root: Node,
    render_height: usize,
    arrangement: (Side, StackOrder),
    tools: ToolHandles,
    overlays: OverlayHandles,
    image: Handle<ImageDisplay>,
    mask_tiles: Vec<Handle<ToggleImage>>,
    tool_constraint: RadioConstraint<ToggleButton>,
    mask_constraint: RadioConstraint<ToggleImage>,
}

impl PromptUi {
    /// Build the layout for `image` with `cfg.num_masks` blank tiles of size `mask_hw`.
    pub fn new(image: &FrameBuffer, mask_hw: (usize, usize), cfg: &PromptConfig) -> Result<Self, Error> {
        // Tool bar
        let mut tool_nodes = Vec::with_capacity(5);
        let mut tool_handles = Vec::with_capacity(4);
        for toggle in ToggleButton::many(["Hover", "Box", "FG Point", "BG Point"]) {
            let (node, handle) = Node::with_handle(toggle);
            tool_nodes.push(node);
            tool_handles.push(handle);
        }
        let (clear_node, clear) = Node::with_handle(Button::new("Clear", rgb(150, 0, 0)));
        tool_nodes.push(clear_node);
        let tools = ToolHandles {
            hover: tool_handles[0],
            boxes: tool_handles[1],
            fg_point: tool_handles[2],
            bg_point: tool_handles[3],
            clear,
        };

        // Overlays; prompts stay visible while another tool is active
        let (polygon, polygon_h) = Node::with_handle(PolygonsOverlay::new(rgb(255, 10, 100), 2));
        let (hover, hover_h) = Node::with_handle(HoverOverlay::new());
        let mut box_olay = BoxSelectOverlay::new(rgb(0, 255, 255));
        box_olay.show_when_disabled = true;
        let (boxes, boxes_h) = Node::with_handle(box_olay);
        let mut fg_olay = PointSelectOverlay::new(rgb(0, 255, 0)).with_radius(3);
        fg_olay.show_when_disabled = true;
        let (fg_points, fg_h) = Node::with_handle(fg_olay);
        let mut bg_olay = PointSelectOverlay::new(rgb(0, 0, 0)).with_radius(3).with_outline(rgb(0, 255, 0));
        bg_olay.show_when_disabled = true;
        let (bg_points, bg_h) = Node::with_handle(bg_olay);
        let overlays =
            OverlayHandles { polygon: polygon_h, hover: hover_h, boxes: boxes_h, fg_points: fg_h, bg_points: bg_h };

        let (image_node, image_h) = Node::with_handle(ImageDisplay::new(image.clone()));
        let image_stack = Node::new(
            OverlayStack::new(image_node.named("MainDisplayImage"), vec![polygon, hover, boxes, fg_points, bg_points]),
        );

        // Mask previews
        let (mask_h, mask_w) = (mask_hw.0.max(1), mask_hw.1.max(1));
        let mut mask_nodes = Vec::with_capacity(cfg.num_masks);
        let mut mask_tiles = Vec::with_capacity(cfg.num_masks);
        for _ in 0..cfg.num_masks {
            let tile = ToggleImage::new(FrameBuffer::filled(mask_h, mask_w, 0)).with_highlight(rgb(255, 120, 0));
            let (node, handle) = Node::with_handle(tile);
            mask_nodes.push(node);
            mask_tiles.push(handle);
        }

        let arrangement =
            find_best_display_arrangement(image.hw(), (mask_h, mask_w), cfg.target_aspect_ratio, cfg.num_masks);
        let (side, order) = arrangement;
        let mask_stack = match order {
            StackOrder::Vertical => Stack::vertical(mask_nodes),
            StackOrder::Horizontal => Stack::horizontal(mask_nodes),
            StackOrder::Grid => {
                // Same split `StackOrder::Grid` is scored for
                let second_row = mask_nodes.split_off(mask_nodes.len().div_ceil(2));
                Stack::vertical(vec![
                    Node::new(Stack::horizontal(mask_nodes).with_pad_color(MASK_PAD_COLOR)),
                    Node::new(Stack::horizontal(second_row).with_pad_color(MASK_PAD_COLOR)),
                ])
            }
        };
        let mask_stack = Node::new(mask_stack.with_pad_color(MASK_PAD_COLOR)).named("MaskStack");
        let display = match side {
            Side::Right => Stack::horizontal(vec![image_stack, mask_stack]),
            Side::Top => Stack::vertical(vec![mask_stack, image_stack]),
        };
        let display = Node::new(display.with_pad_color(IMAGE_PAD_COLOR)).named("MainDisplayBlock");

        let toolbar = Node::new(Stack::horizontal(tool_nodes)).named("ToolBar");
        let mut root = Node::new(Stack::vertical(vec![toolbar, display])).named("DisplayLayout");

        // Each tool drives its own overlay
        let mut tool_constraint = RadioConstraint::new(tool_handles, 0)?;
        for (tool, overlay_id) in tools.toggles().into_iter().zip(overlays.tool_overlay_ids()) {
            tool_constraint.add_listener(
                tool,
                Box::new(move |root: &mut Node, on: bool| {
                    root.enable_id(overlay_id, on);
                }),
            );
        }
        let mut mask_constraint = RadioConstraint::new(mask_tiles.clone(), cfg.initial_mask)?;
        tool_constraint.sync(&mut root)?;
        mask_constraint.sync(&mut root)?;

        Ok(Self {
            root,
            render_height: cfg.render_height,
            arrangement,
            tools,
            overlays,
            image: image_h,
            mask_tiles,
            tool_constraint,
            mask_constraint,
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn tools(&self) -> ToolHandles {
        self.tools
    }

    pub fn overlays(&self) -> OverlayHandles {
        self.overlays
    }

    pub fn image(&self) -> Handle<ImageDisplay> {
        self.image
    }

    pub fn mask_tiles(&self) -> &[Handle<ToggleImage>] {
        &self.mask_tiles
    }

    pub fn arrangement(&self) -> (Side, StackOrder) {
        self.arrangement
    }

    pub fn selected_tool(&self) -> Tool {
        Tool::ALL[self.tool_constraint.selected_index()]
    }

    pub fn selected_mask(&self) -> usize {
        self.mask_constraint.selected_index()
    }

    pub fn select_tool(&mut self, tool: Tool) -> Result<(), Error> {
        self.tool_constraint.change_to_index(&mut self.root, tool.index())?;
        Ok(())
    }

    /// Size the main image was last drawn at, (0, 0) before the first render.
    pub fn image_display_hw(&self) -> (usize, usize) {
        self.root.find(self.image.id()).map_or((0, 0), Node::last_hw)
    }

    /// Turn the tool bar on or off. Enabling re-enables only the selected
    /// tool's overlay; disabling switches every prompt overlay off.
    pub fn enable_tools(&mut self, enable: bool, clear_on_disable: bool) {
        for id in self.tools.toggles().iter().map(Handle::id).chain([self.tools.clear.id()]) {
            self.root.enable_id(id, enable);
        }
        let overlay_ids = self.overlays.tool_overlay_ids();
        if enable {
            self.root.enable_id(overlay_ids[self.tool_constraint.selected_index()], true);
        } else {
            for id in overlay_ids {
                self.root.enable_id(id, false);
            }
            if clear_on_disable {
                self.clear_prompts();
            }
        }
        log::debug!("prompt tools {}", if enable { "enabled" } else { "disabled" });
    }

    pub fn enable_masks(&mut self, enable: bool) {
        for tile in &self.mask_tiles {
            self.root.enable_id(tile.id(), enable);
        }
    }

    pub fn clear_prompts(&mut self) {
        let o = self.overlays;
        if let Some(hover) = self.root.get_mut(o.hover) {
            hover.clear();
        }
        if let Some(boxes) = self.root.get_mut(o.boxes) {
            boxes.clear();
        }
        for points in [o.fg_points, o.bg_points] {
            if let Some(points) = self.root.get_mut(points) {
                points.clear();
            }
        }
    }

    pub fn render(&mut self) -> FrameBuffer {
        self.root.render_to_height(self.render_height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptAction {
    PreviousTool,
    NextTool,
    PreviousMask,
    NextMask,
    ToggleAlpha,
    Confirm,
}

/// Arrows switch tools (left/right) and masks (up/down), Space toggles the
/// alpha preview, Enter finishes.
pub fn default_prompt_bindings() -> KeyBindings<PromptAction> {
    KeyBindings::new()
        .bind(Key::Left, PromptAction::PreviousTool)
        .bind(Key::Right, PromptAction::NextTool)
        .bind(Key::Up, PromptAction::PreviousMask)
        .bind(Key::Down, PromptAction::NextMask)
        .bind(Key::Space, PromptAction::ToggleAlpha)
        .bind_all(&[Key::Enter, Key::NumPadEnter], PromptAction::Confirm)
}

/// Reads prompts from a [`PromptUi`] and pushes model output back into it.
pub struct PromptUiControl {
    ui: PromptUi,
    checker: CheckerPattern,
    /// Foreground points held by the overlay at the previous read.
    last_fg_count: usize,
}

impl PromptUiControl {
    pub fn new(ui: PromptUi) -> Self {
        Self { ui, checker: CheckerPattern::default(), last_fg_count: 0 }
    }

    pub fn ui(&self) -> &PromptUi {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut PromptUi {
        &mut self.ui
    }

    /// Seed the overlays with existing prompts. A pending clear-button click is
    /// discarded first so the next read doesn't wipe them.
    pub fn load_initial_prompts(&mut self, prompts: &Prompts) -> Result<(), Error> {
        let (root, o) = (&mut self.ui.root, self.ui.overlays);
        root.widget_mut(self.ui.tools.clear)?.read();
        root.widget_mut(o.boxes)?.add_boxes(prompts.boxes.iter().copied());
        root.widget_mut(o.fg_points)?.add_points(prompts.fg_points.iter().copied());
        root.widget_mut(o.bg_points)?.add_points(prompts.bg_points.iter().copied());
        log::debug!("loaded {} initial prompts", prompts.len());
        Ok(())
    }

    /// Apply a key action. Returns false for actions this control doesn't own.
    pub fn apply(&mut self, action: PromptAction) -> Result<bool, Error> {
        let ui = &mut self.ui;
        match action {
            PromptAction::PreviousTool => ui.tool_constraint.previous(&mut ui.root)?,
            PromptAction::NextTool => ui.tool_constraint.next(&mut ui.root)?,
            PromptAction::PreviousMask => ui.mask_constraint.previous(&mut ui.root)?,
            PromptAction::NextMask => ui.mask_constraint.next(&mut ui.root)?,
            PromptAction::ToggleAlpha | PromptAction::Confirm => return Ok(false),
        }
        Ok(true)
    }

    /// Read every prompt input once and decide whether inference must re-run.
    pub fn read_prompts(&mut self) -> Result<PromptRead, Error> {
        let ui = &mut self.ui;
        let (t, o) = (ui.tools, ui.overlays);

        let (tool_changed, _, tool) = ui.tool_constraint.read(&mut ui.root)?;
        let clear = ui.root.widget_mut(t.clear)?.read();
        if clear {
            ui.root.widget_mut(o.boxes)?.clear();
            ui.root.widget_mut(o.fg_points)?.clear();
            ui.root.widget_mut(o.bg_points)?.clear();
        }

        let (boxes_changed, boxes) = ui.root.widget_mut(o.boxes)?.read();
        let (fg_changed, mut fg_points) = ui.root.widget_mut(o.fg_points)?.read();
        let (bg_changed, bg_points) = ui.root.widget_mut(o.bg_points)?.read();
        let fg_removed = fg_points.len() < self.last_fg_count;
        self.last_fg_count = fg_points.len();

        // Hovering counts as a foreground point, but only while the hover tool is active
        let mut hover_changed = false;
        if tool == t.hover {
            let (changed, clicked, event) = ui.root.widget_mut(o.hover)?.read();
            hover_changed = changed;
            if clicked {
                ui.tool_constraint.change_to(&mut ui.root, t.fg_point)?;
                self.last_fg_count += 1;
                ui.root.widget_mut(o.fg_points)?.add_points([event.xy_norm]);
                log::debug!("hover click promoted to foreground point {:?}", event.xy_norm);
            }
            if event.is_in_region {
                fg_points.push(event.xy_norm);
            }
        }

        let prompts = Prompts { boxes, fg_points, bg_points };
        // Removing the last foreground point hands control back to hovering
        if fg_removed && prompts.is_empty() {
            ui.tool_constraint.change_to(&mut ui.root, t.hover)?;
        }

        let need_reencode = boxes_changed || fg_changed || bg_changed || hover_changed || tool_changed || clear;
        Ok(PromptRead { need_reencode, prompts })
    }

    /// `(changed, selected_index)` of the mask tiles.
    pub fn read_mask_selection(&mut self) -> Result<(bool, usize), Error> {
        let ui = &mut self.ui;
        let (changed, index, _) = ui.mask_constraint.read(&mut ui.root)?;
        Ok((changed, index))
    }

    /// Show `image` (optionally over a checkerboard outside `mask`) with the given outlines.
    pub fn update_main_display_image(
        &mut self,
        image: &FrameBuffer,
        mask: &GrayImage,
        outlines: Option<Vec<Vec<XYNorm>>>,
        show_with_alpha: bool,
    ) -> Result<(), Error> {
        let shown = if show_with_alpha { self.checker.superimpose(image, mask)? } else { image.clone() };
        let (root, o) = (&mut self.ui.root, self.ui.overlays);
        root.widget_mut(o.polygon)?.set_polygons(if show_with_alpha { None } else { outlines });
        root.widget_mut(self.ui.image)?.set_image(shown);
        Ok(())
    }

    /// Replace each tile with its thresholded mask.
    pub fn update_mask_previews(&mut self, preds: &MaskPredictions, threshold: f32, invert: bool) -> Result<(), Error> {
        if preds.num_masks != self.ui.mask_tiles.len() {
            log::warn!("{} mask predictions for {} preview tiles", preds.num_masks, self.ui.mask_tiles.len());
        }
        let (h, w) = preds.hw();
        for (i, &tile) in self.ui.mask_tiles.iter().enumerate().take(preds.num_masks) {
            let binary = threshold_plane(preds.plane(i), h, w, threshold, invert);
            self.ui.root.widget_mut(tile)?.set_image(FrameBuffer::from_gray_image(&binary));
        }
        Ok(())
    }

    /// Label each tile with its predicted quality as a whole percentage.
    pub fn draw_iou_predictions(&mut self, iou: &[f32]) -> Result<(), Error> {
        for (&tile, score) in self.ui.mask_tiles.iter().zip(iou) {
            let percent = (score * 100.0).round() as i32;
            self.ui.root.widget_mut(tile)?.set_text(Some(percent.to_string()));
        }
        Ok(())
    }

    pub fn create_hires_mask(
        preds: &MaskPredictions,
        index: usize,
        out_hw: (usize, usize),
        threshold: f32,
    ) -> Result<GrayImage, Error> {
        if index >= preds.num_masks {
            return Err(Error::MaskShape(format!("mask {index} selected but only {} predicted", preds.num_masks)));
        }
        Ok(hires_mask(preds, index, out_hw, threshold))
    }

    pub fn render(&mut self) -> FrameBuffer {
        self.ui.render()
    }
}

/// The full-size image, rescaled only when the display size changes.
pub struct ReusableBaseImage {
    full: FrameBuffer,
    display: FrameBuffer,
}

impl ReusableBaseImage {
    pub fn new(full: FrameBuffer) -> Self {
        Self { display: full.clone(), full }
    }

    pub fn full(&self) -> &FrameBuffer {
        &self.full
    }

    pub fn regenerate(&mut self, display_hw: (usize, usize)) -> &FrameBuffer {
        let (h, w) = display_hw;
        if h == 0 || w == 0 {
            return &self.full;
        }
        if self.display.hw() != (h, w) {
            self.display = resize(&self.full, h, w, FilterType::Triangle);
            log::trace!("base image regenerated at {h}x{w}");
        }
        &self.display
    }
}

/// Model output for one set of prompts.
#[derive(Clone, Debug)]
pub struct Prediction {
    pub masks: MaskPredictions,
    /// One quality estimate in `[0,1]` per mask.
    pub iou: Vec<f32>,
}

/// What a finished prompt session produced.
#[derive(Clone, Debug, Default)]
pub struct PromptSession {
    pub prompts: Prompts,
    pub mask_index: usize,
    /// Selected mask at full image resolution; `None` when cancelled.
    pub mask: Option<GrayImage>,
}

/// Axis-aligned outline around the set pixels of `mask`, normalized to its size.
pub fn mask_bounds_outline(mask: &GrayImage) -> Option<Vec<XYNorm>> {
    let (w, h) = (mask.width() as usize, mask.height() as usize);
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for (x, y, px) in mask.enumerate_pixels() {
        if px[0] == 0 {
            continue;
        }
        let (x, y) = (x as usize, y as usize);
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x1, y1, x2, y2)) => (x1.min(x), y1.min(y), x2.max(x), y2.max(y)),
        });
    }
    let (x1, y1, x2, y2) = bounds?;
    let (x1, x2) = (norm_from_px(x1 as i32, w), norm_from_px(x2 as i32, w));
    let (y1, y2) = (norm_from_px(y1 as i32, h), norm_from_px(y2 as i32, h));
    Some(vec![XYNorm::new(x1, y1), XYNorm::new(x2, y1), XYNorm::new(x2, y2), XYNorm::new(x1, y2)])
}

/// Run the prompt window until Enter, Q or cancel. `predictor` is called once
/// up front with no prompts, then whenever the prompts need re-encoding.
pub fn run_prompt_ui<P>(
    image: &FrameBuffer,
    cfg: &PromptConfig,
    screen: &mut impl Screen,
    cancel: &CancelToken,
    mut predictor: P,
) -> Result<PromptSession, Error>
where
    P: FnMut(&Prompts) -> Result<Prediction, Error>,
{
    let mut prediction = predictor(&Prompts::default())?;
    // One tile per predicted mask, whatever the config asked for
    let num_masks = prediction.masks.num_masks;
    if num_masks != cfg.num_masks {
        log::warn!("config asks for {} mask tiles, model predicts {num_masks}", cfg.num_masks);
    }
    let ui_cfg = PromptConfig { num_masks, ..cfg.clone() };
    let ui = PromptUi::new(image, prediction.masks.hw(), &ui_cfg)?;
    let mut control = PromptUiControl::new(ui);
    let mut base = ReusableBaseImage::new(image.clone());
    let bindings = default_prompt_bindings();

    control.update_mask_previews(&prediction.masks, cfg.mask_threshold, false)?;
    control.draw_iou_predictions(&prediction.iou)?;

    let mut prompts = Prompts::default();
    let mut show_alpha = false;
    let mut redraw = true;
    let mut last_display_hw = (0, 0);
    loop {
        if cancel.is_cancelled() {
            log::warn!("prompt session cancelled");
            return Ok(PromptSession::default());
        }

        let read = control.read_prompts()?;
        if read.need_reencode {
            prompts = read.prompts;
            prediction = predictor(&prompts)?;
            if prediction.masks.num_masks != num_masks {
                return Err(Error::MaskShape(format!(
                    "predictor returned {} masks, expected {num_masks}",
                    prediction.masks.num_masks
                )));
            }
            control.update_mask_previews(&prediction.masks, cfg.mask_threshold, false)?;
            control.draw_iou_predictions(&prediction.iou)?;
            redraw = true;
        }
        let (mask_changed, mask_index) = control.read_mask_selection()?;
        let display_hw = control.ui().image_display_hw();
        if redraw || mask_changed || display_hw != last_display_hw {
            let shown = base.regenerate(display_hw);
            let mask = PromptUiControl::create_hires_mask(&prediction.masks, mask_index, shown.hw(), cfg.mask_threshold)?;
            let outline = mask_bounds_outline(&mask).map(|o| vec![o]);
            control.update_main_display_image(shown, &mask, outline, show_alpha)?;
            last_display_hw = display_hw;
            redraw = false;
        }

        let frame = control.render();
        let shown = screen.show(&frame, control.ui_mut().root_mut())?;
        if shown.request_break {
            break;
        }
        match shown.keypress.and_then(|k| bindings.action(k)) {
            Some(PromptAction::Confirm) => break,
            Some(PromptAction::ToggleAlpha) => {
                show_alpha = !show_alpha;
                redraw = true;
            }
            Some(action) => {
                control.apply(action)?;
            }
            None => {}
        }
    }
    if cancel.is_cancelled() {
        log::warn!("prompt session cancelled");
        return Ok(PromptSession::default());
    }

    let mask_index = control.ui().selected_mask();
    let mask = PromptUiControl::create_hires_mask(&prediction.masks, mask_index, image.hw(), cfg.mask_threshold)?;
    log::info!("prompt session finished with {} prompts, mask {mask_index}", prompts.len());
    Ok(PromptSession { prompts, mask_index, mask: Some(mask) })
}
