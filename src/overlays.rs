// Interactive overlays drawn over a base node and sharing its frame.
//
// All state is stored normalized to the base's rectangle, so the same box or
// point survives any window resize. `read()` methods are one-shot: they
// report a change once and clear the flag.

use crate::draw::{draw_crosshair, draw_polyline, draw_rect, fill_circle, fill_rect};
use crate::geometry::{BoxNorm, XYNorm};
use crate::node::{CursorEvent, PointerKind};
use crate::types::{FrameBuffer, rgb};

/// Pixel distance within which a press grabs a crop-box corner or edge.
pub const GRAB_PX: i32 = 10;
/// Minimum crop-box size, in source image pixels, for `read()` to call it valid.
pub const MIN_CROP_PX: f32 = 5.0;
/// Minimum size, in rendered pixels, of a drag that commits a selection box.
pub const MIN_SELECT_PX: i32 = 3;

/* ---------- Hover ---------- */

pub struct HoverOverlay {
    xy: XYNorm,
    in_region: bool,
    clicked: bool,
    changed: bool,
    event: CursorEvent,
    color: u32,
}

impl Default for HoverOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl HoverOverlay {
    pub fn new() -> Self {
        Self {
            xy: XYNorm::CENTER,
            in_region: false,
            clicked: false,
            changed: true,
            event: CursorEvent::default(),
            color: rgb(255, 255, 0),
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn xy(&self) -> XYNorm {
        self.xy
    }

    pub fn is_in_region(&self) -> bool {
        self.in_region
    }

    /// `(changed, clicked, last_event)`. Clears both flags.
    pub fn read(&mut self) -> (bool, bool, CursorEvent) {
        let changed = std::mem::take(&mut self.changed);
        let clicked = std::mem::take(&mut self.clicked);
        (changed, clicked, self.event)
    }

    /// Forget the pointer, as if it left the region.
    pub fn clear(&mut self) {
        if self.in_region || self.clicked {
            self.changed = true;
        }
        self.in_region = false;
        self.clicked = false;
        self.event.is_in_region = false;
    }

    pub fn on_cursor(&mut self, ev: &CursorEvent) {
        if !ev.is_in_region {
            // Only the exit counts; moves elsewhere in the window are ignored
            if self.in_region {
                self.changed = true;
                self.in_region = false;
                self.event = *ev;
            }
            return;
        }
        if ev.xy_norm != self.xy || !self.in_region {
            self.changed = true;
        }
        self.xy = ev.xy_norm;
        self.in_region = ev.is_in_region;
        self.event = *ev;
        if ev.kind == PointerKind::Down && ev.is_in_region {
            self.clicked = true;
            self.changed = true;
        }
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        if !self.in_region {
            return;
        }
        let (h, w) = frame.hw();
        let (x, y) = self.xy.to_px(w, h);
        let size = (w.min(h) as i32 / 30).max(4);
        draw_crosshair(frame, x, y, size, self.color);
    }
}

/* ---------- Crop box ---------- */

/// Which part of the crop box is being dragged. Compass names follow the
/// screen: `NW` is the top-left corner, `N` the top edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    NW,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    Whole {
        offset: XYNorm,
    },
}

pub struct CropBoxOverlay {
    image_hw: (usize, usize),
    bbox: BoxNorm,
    // Box at the start of the current drag, restored if the drag ends degenerate
    before_drag: BoxNorm,
    state: DragState,
    changed: bool,
    color: u32,
    thickness: usize,
    min_px: f32,
    pub show_when_disabled: bool,
}

impl CropBoxOverlay {
    /// `image_hw` is the source image size used for nudges and validity;
    /// the overlay itself can be drawn at any size.
    pub fn new(image_hw: (usize, usize), color: u32, thickness: usize) -> Self {
        Self {
            image_hw,
            bbox: BoxNorm::FULL,
            before_drag: BoxNorm::FULL,
            state: DragState::Idle,
            changed: true,
            color,
            thickness: thickness.max(1),
            min_px: MIN_CROP_PX,
            show_when_disabled: false,
        }
    }

    pub fn with_box(mut self, bbox: BoxNorm) -> Self {
        self.set_box(bbox);
        self
    }

    pub fn set_box(&mut self, bbox: BoxNorm) {
        self.bbox = BoxNorm::new(bbox.xy1, bbox.xy2);
        self.changed = true;
    }

    pub fn bbox(&self) -> BoxNorm {
        self.bbox
    }

    pub fn drag_state(&self) -> DragState {
        self.state
    }

    pub fn is_valid(&self) -> bool {
        let (h, w) = self.image_hw;
        self.bbox.is_valid(w, h, self.min_px)
    }

    /// `(changed, is_valid, box)`.
    pub fn read(&mut self) -> (bool, bool, BoxNorm) {
        (std::mem::take(&mut self.changed), self.is_valid(), self.bbox)
    }

    /// Abort any drag in progress, keeping the box as it is now.
    pub fn release(&mut self) {
        self.state = DragState::Idle;
    }

    /// Shift the whole box by image pixels, stopping at the image border.
    pub fn nudge(&mut self, dx_px: i32, dy_px: i32) {
        let (h, w) = self.image_hw;
        let dx = dx_px as f32 / w.max(1) as f32;
        let dy = dy_px as f32 / h.max(1) as f32;
        let dx = dx.clamp(-self.bbox.xy1.x, 1.0 - self.bbox.xy2.x);
        let dy = dy.clamp(-self.bbox.xy1.y, 1.0 - self.bbox.xy2.y);
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let BoxNorm { xy1, xy2 } = self.bbox;
        self.bbox = BoxNorm::new(XYNorm::new(xy1.x + dx, xy1.y + dy), XYNorm::new(xy2.x + dx, xy2.y + dy));
        self.changed = true;
    }

    /// Decide what a press at `ev` grabs.
    fn grab(&self, ev: &CursorEvent) -> DragState {
        let (h, w) = ev.hw;
        let (x1, y1) = self.bbox.xy1.to_px(w, h);
        let (x2, y2) = self.bbox.xy2.to_px(w, h);
        let (px, py) = ev.xy_px;
        let near = |a: i32, b: i32| (a - b).abs() <= GRAB_PX;
        let in_x = px >= x1 - GRAB_PX && px <= x2 + GRAB_PX;
        let in_y = py >= y1 - GRAB_PX && py <= y2 + GRAB_PX;

        match (near(px, x1), near(px, x2), near(py, y1), near(py, y2)) {
            (true, _, true, _) => DragState::NW,
            (_, true, true, _) => DragState::NE,
            (true, _, _, true) => DragState::SW,
            (_, true, _, true) => DragState::SE,
            (_, _, true, _) if in_x => DragState::N,
            (_, _, _, true) if in_x => DragState::S,
            (true, _, _, _) if in_y => DragState::W,
            (_, true, _, _) if in_y => DragState::E,
            _ if self.bbox.contains(ev.xy_norm) => DragState::Whole {
                offset: XYNorm { x: ev.xy_norm.x - self.bbox.xy1.x, y: ev.xy_norm.y - self.bbox.xy1.y },
            },
            _ => DragState::Idle,
        }
    }

    /// Move the grabbed part to `p`. Dragging a corner or edge past the
    /// opposite one flips the state, so the box never inverts.
    fn drag_to(&mut self, p: XYNorm) {
        let BoxNorm { xy1, xy2 } = self.bbox;
        let (state, bbox) = match self.state {
            DragState::Idle => return,
            DragState::Whole { offset } => {
                let (bw, bh) = (self.bbox.width(), self.bbox.height());
                let x1 = (p.x - offset.x).clamp(0.0, 1.0 - bw);
                let y1 = (p.y - offset.y).clamp(0.0, 1.0 - bh);
                (self.state, BoxNorm::new(XYNorm::new(x1, y1), XYNorm::new(x1 + bw, y1 + bh)))
            }
            DragState::NW | DragState::NE | DragState::SE | DragState::SW => {
                // The corner opposite the grabbed one stays put
                let anchor = match self.state {
                    DragState::NW => xy2,
                    DragState::NE => XYNorm { x: xy1.x, y: xy2.y },
                    DragState::SE => xy1,
                    _ => XYNorm { x: xy2.x, y: xy1.y },
                };
                let state = match (p.x < anchor.x, p.y < anchor.y) {
                    (true, true) => DragState::NW,
                    (false, true) => DragState::NE,
                    (true, false) => DragState::SW,
                    (false, false) => DragState::SE,
                };
                (state, BoxNorm::new(anchor, p))
            }
            DragState::N | DragState::S => {
                let anchor_y = if self.state == DragState::N { xy2.y } else { xy1.y };
                let state = if p.y < anchor_y { DragState::N } else { DragState::S };
                (state, BoxNorm::new(XYNorm::new(xy1.x, anchor_y), XYNorm::new(xy2.x, p.y)))
            }
            DragState::E | DragState::W => {
                let anchor_x = if self.state == DragState::W { xy2.x } else { xy1.x };
                let state = if p.x < anchor_x { DragState::W } else { DragState::E };
                (state, BoxNorm::new(XYNorm::new(anchor_x, xy1.y), XYNorm::new(p.x, xy2.y)))
            }
        };
        self.state = state;
        if bbox != self.bbox {
            self.bbox = bbox;
            self.changed = true;
        }
    }

    pub fn on_cursor(&mut self, ev: &CursorEvent) {
        match ev.kind {
            PointerKind::Down if ev.is_in_region => {
                self.before_drag = self.bbox;
                self.state = self.grab(ev);
                if self.state == DragState::Idle {
                    // Fresh box anchored at the press point, grown from its bottom-right corner
                    self.bbox = BoxNorm::new(ev.xy_norm, ev.xy_norm);
                    self.state = DragState::SE;
                    self.changed = true;
                }
                log::trace!("crop box grab: {:?}", self.state);
            }
            PointerKind::Move if self.state != DragState::Idle => self.drag_to(ev.xy_norm),
            PointerKind::Up if self.state != DragState::Idle => {
                self.drag_to(ev.xy_norm);
                self.state = DragState::Idle;
                if !self.is_valid() {
                    self.bbox = self.before_drag;
                    self.changed = true;
                }
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        let (h, w) = frame.hw();
        let (x1, y1) = self.bbox.xy1.to_px(w, h);
        let (x2, y2) = self.bbox.xy2.to_px(w, h);
        draw_rect(frame, x1, y1, x2, y2, self.color, self.thickness);
        let handle = (self.thickness * 2 + 5) as i32;
        for (cx, cy) in [(x1, y1), (x2, y1), (x1, y2), (x2, y2)] {
            fill_rect(frame, cx - handle / 2, cy - handle / 2, handle as usize, handle as usize, self.color);
        }
    }
}

/* ---------- Box select ---------- */

pub struct BoxSelectOverlay {
    boxes: Vec<BoxNorm>,
    // (anchor, current corner, anchor in px) of the drag in progress
    drag: Option<(XYNorm, XYNorm, (i32, i32))>,
    changed: bool,
    color: u32,
    drag_color: u32,
    thickness: usize,
    pub show_when_disabled: bool,
}

impl BoxSelectOverlay {
    pub fn new(color: u32) -> Self {
        Self {
            boxes: Vec::new(),
            drag: None,
            changed: true,
            color,
            drag_color: rgb(200, 200, 200),
            thickness: 2,
            show_when_disabled: false,
        }
    }

    pub fn boxes(&self) -> &[BoxNorm] {
        &self.boxes
    }

    /// `(changed, committed boxes)`. A drag in progress is never reported.
    pub fn read(&mut self) -> (bool, Vec<BoxNorm>) {
        (std::mem::take(&mut self.changed), self.boxes.clone())
    }

    pub fn add_boxes(&mut self, boxes: impl IntoIterator<Item = BoxNorm>) {
        let before = self.boxes.len();
        self.boxes.extend(
            boxes.into_iter().filter(|b| b.xy1.is_finite() && b.xy2.is_finite()).map(|b| BoxNorm::new(b.xy1, b.xy2)),
        );
        self.changed |= self.boxes.len() != before;
    }

    pub fn remove(&mut self, index: usize) -> Option<BoxNorm> {
        if index >= self.boxes.len() {
            return None;
        }
        self.changed = true;
        Some(self.boxes.remove(index))
    }

    pub fn clear(&mut self) {
        if !self.boxes.is_empty() {
            self.changed = true;
        }
        self.boxes.clear();
        self.drag = None;
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn on_cursor(&mut self, ev: &CursorEvent) {
        match ev.kind {
            PointerKind::Down if ev.is_in_region => self.drag = Some((ev.xy_norm, ev.xy_norm, ev.xy_px)),
            PointerKind::Move => {
                if let Some((_, cur, _)) = &mut self.drag {
                    *cur = ev.xy_norm;
                }
            }
            PointerKind::Up => {
                let Some((anchor, _, (ax, ay))) = self.drag.take() else { return };
                let (px, py) = ev.xy_px;
                let big_enough = (px - ax).abs() >= MIN_SELECT_PX && (py - ay).abs() >= MIN_SELECT_PX;
                if big_enough {
                    self.boxes.push(BoxNorm::new(anchor, ev.xy_norm));
                    self.changed = true;
                } else if let Some(i) = self.boxes.iter().rposition(|b| b.contains(anchor)) {
                    // A plain click on a box removes it (newest first)
                    self.boxes.remove(i);
                    self.changed = true;
                }
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        let (h, w) = frame.hw();
        for b in &self.boxes {
            let (x1, y1) = b.xy1.to_px(w, h);
            let (x2, y2) = b.xy2.to_px(w, h);
            draw_rect(frame, x1, y1, x2, y2, self.color, self.thickness);
        }
        if let Some((anchor, cur, _)) = self.drag {
            let b = BoxNorm::new(anchor, cur);
            let (x1, y1) = b.xy1.to_px(w, h);
            let (x2, y2) = b.xy2.to_px(w, h);
            draw_rect(frame, x1, y1, x2, y2, self.drag_color, 1);
        }
    }
}

/* ---------- Point select ---------- */

pub struct PointSelectOverlay {
    points: Vec<XYNorm>,
    changed: bool,
    color: u32,
    outline: u32,
    radius: i32,
    pub show_when_disabled: bool,
}

impl PointSelectOverlay {
    pub fn new(color: u32) -> Self {
        Self { points: Vec::new(), changed: true, color, outline: rgb(0, 0, 0), radius: 5, show_when_disabled: false }
    }

    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius.max(1);
        self
    }

    /// Ring color drawn around each point.
    pub fn with_outline(mut self, color: u32) -> Self {
        self.outline = color;
        self
    }

    pub fn points(&self) -> &[XYNorm] {
        &self.points
    }

    /// `(changed, points)`.
    pub fn read(&mut self) -> (bool, Vec<XYNorm>) {
        (std::mem::take(&mut self.changed), self.points.clone())
    }

    pub fn add_points(&mut self, points: impl IntoIterator<Item = XYNorm>) {
        let before = self.points.len();
        self.points.extend(points.into_iter().filter(|p| p.is_finite()).map(|p| XYNorm::new(p.x, p.y)));
        self.changed |= self.points.len() != before;
    }

    pub fn remove(&mut self, index: usize) -> Option<XYNorm> {
        if index >= self.points.len() {
            return None;
        }
        self.changed = true;
        Some(self.points.remove(index))
    }

    pub fn clear(&mut self) {
        if !self.points.is_empty() {
            self.changed = true;
        }
        self.points.clear();
    }

    pub fn on_cursor(&mut self, ev: &CursorEvent) {
        if ev.kind != PointerKind::Down || !ev.is_in_region {
            return;
        }
        let (h, w) = ev.hw;
        let (px, py) = ev.xy_px;
        let reach = (self.radius + 4).pow(2);
        let hit = self.points.iter().rposition(|p| {
            let (x, y) = p.to_px(w, h);
            (x - px).pow(2) + (y - py).pow(2) <= reach
        });
        match hit {
            Some(i) => {
                self.points.remove(i);
            }
            None => self.points.push(ev.xy_norm),
        }
        self.changed = true;
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        let (h, w) = frame.hw();
        for p in &self.points {
            let (x, y) = p.to_px(w, h);
            fill_circle(frame, x, y, self.radius + 2, self.outline);
            fill_circle(frame, x, y, self.radius, self.color);
        }
    }
}

/* ---------- Polygon outline ---------- */

/// Drawing-only payload; nothing to read back.
/// Vertices may lie outside the unit square; lines are clipped when drawn.
pub struct PolygonsOverlay {
    polygons: Option<Vec<Vec<XYNorm>>>,
    color: u32,
    thickness: usize,
    pub show_when_disabled: bool,
}

impl PolygonsOverlay {
    pub fn new(color: u32, thickness: usize) -> Self {
        Self { polygons: None, color, thickness: thickness.max(1), show_when_disabled: false }
    }

    /// Replace every polygon; `None` clears. Polygons with non-finite vertices are dropped.
    pub fn set_polygons(&mut self, polygons: Option<Vec<Vec<XYNorm>>>) {
        self.polygons = polygons.map(|polys| polys.into_iter().filter(|poly| poly.iter().all(|p| p.is_finite())).collect());
    }

    pub fn polygons(&self) -> Option<&[Vec<XYNorm>]> {
        self.polygons.as_deref()
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        let Some(polys) = &self.polygons else { return };
        let (h, w) = frame.hw();
        let (sx, sy) = (w.saturating_sub(1) as f32, h.saturating_sub(1) as f32);
        for poly in polys {
            let pts: Vec<(i32, i32)> = poly.iter().map(|p| ((p.x * sx).round() as i32, (p.y * sy).round() as i32)).collect();
            draw_polyline(frame, &pts, true, self.color, self.thickness);
        }
    }
}
