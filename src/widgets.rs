// Leaf widgets. They only know how to size and draw themselves and how to
// react to a cursor event that was already routed to them; layout and
// hit-testing live in `stack`.
//
// Every readable widget starts out "changed" so the first read reports its
// initial value. After that a read reports each change exactly once.

use image::imageops::FilterType;

use crate::draw::{draw_rect, draw_text, fill_rect, text_size};
use crate::node::{CursorEvent, PointerKind};
use crate::radio::Toggle;
use crate::types::{FrameBuffer, dim, rgb};
use crate::vision::{fit_hw, resize};

pub const TEXT_COLOR: u32 = rgb(235, 235, 235);
pub const PANEL_COLOR: u32 = rgb(38, 38, 42);
pub const ACCENT_COLOR: u32 = rgb(255, 170, 0);
const PAD: usize = 6;
const TEXT_SCALE: usize = 2;

/// Draw `text` centered in `fb`.
fn draw_text_centered(fb: &mut FrameBuffer, text: &str, color: u32, scale: usize) {
    let (th, tw) = text_size(text, scale);
    let x = (fb.width as i32 - tw as i32) / 2;
    let y = (fb.height as i32 - th as i32) / 2;
    draw_text(fb, x, y, text, color, scale);
}

fn padded_text_size(text: &str, scale: usize) -> (usize, usize) {
    let (th, tw) = text_size(text, scale);
    (th + 2 * PAD, tw + 2 * PAD)
}

/// Aspect-preserving scaler with a one-entry cache keyed on output size.
struct ScaledImage {
    source: FrameBuffer,
    filter: FilterType,
    cache: Option<FrameBuffer>,
}

impl ScaledImage {
    fn new(source: FrameBuffer, filter: FilterType) -> Self {
        Self { source, filter, cache: None }
    }

    fn set(&mut self, source: FrameBuffer) {
        self.source = source;
        self.cache = None;
    }

    fn scaled(&mut self, h: usize, w: usize) -> &FrameBuffer {
        let (fh, fw) = fit_hw(self.source.hw(), (h, w));
        if self.cache.as_ref().is_none_or(|c| c.hw() != (fh, fw)) {
            self.cache = Some(resize(&self.source, fh, fw, self.filter));
        }
        self.cache.get_or_insert_with(|| FrameBuffer::filled(fh, fw, 0))
    }
}

/// Displays an image, scaled down or up to fit while keeping its aspect ratio.
pub struct ImageDisplay {
    inner: ScaledImage,
}

impl ImageDisplay {
    pub fn new(image: FrameBuffer) -> Self {
        Self { inner: ScaledImage::new(image, FilterType::Triangle) }
    }

    /// `FilterType::Nearest` keeps pixels crisp, which zoom previews want.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.inner.filter = filter;
        self.inner.cache = None;
        self
    }

    pub fn set_image(&mut self, image: FrameBuffer) {
        self.inner.set(image);
    }

    pub fn image(&self) -> &FrameBuffer {
        &self.inner.source
    }

    pub fn render_size(&self) -> (usize, usize) {
        self.inner.source.hw()
    }

    pub fn render(&mut self, h: usize, w: usize) -> FrameBuffer {
        self.inner.scaled(h, w).clone()
    }
}

/// `prefix` followed by a changeable `value`, e.g. "Crop WH: (120, 80)".
pub struct TextBlock {
    prefix: String,
    value: String,
    scale: usize,
    color: u32,
    background: u32,
}

impl TextBlock {
    pub fn new(prefix: impl Into<String>, value: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), value: value.into(), scale: TEXT_SCALE, color: TEXT_COLOR, background: PANEL_COLOR }
    }

    pub fn with_scale(mut self, scale: usize) -> Self {
        self.scale = scale.max(1);
        self
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn text(&self) -> String {
        format!("{}{}", self.prefix, self.value)
    }

    pub fn render_size(&self) -> (usize, usize) {
        padded_text_size(&self.text(), self.scale)
    }

    pub fn render(&mut self, h: usize, w: usize) -> FrameBuffer {
        let mut fb = FrameBuffer::filled(h, w, self.background);
        draw_text_centered(&mut fb, &self.text(), self.color, self.scale);
        fb
    }
}

/// Full-width banner carrying one or more short messages.
pub struct MessageBar {
    messages: Vec<String>,
    space_equally: bool,
    color: u32,
    background: u32,
    scale: usize,
}

impl MessageBar {
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
            space_equally: false,
            color: TEXT_COLOR,
            background: rgb(20, 20, 24),
            scale: TEXT_SCALE,
        }
    }

    /// Give each message an equal slice of the bar instead of packing them.
    pub fn space_equally(mut self, on: bool) -> Self {
        self.space_equally = on;
        self
    }

    pub fn set_message(&mut self, index: usize, text: impl Into<String>) {
        if let Some(slot) = self.messages.get_mut(index) {
            *slot = text.into();
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    fn gap(&self) -> usize {
        4 * 6 * self.scale
    }

    pub fn render_size(&self) -> (usize, usize) {
        let widths: usize = self.messages.iter().map(|m| text_size(m, self.scale).1).sum();
        let gaps = self.gap() * self.messages.len().saturating_sub(1);
        (7 * self.scale + 2 * PAD, widths + gaps + 2 * PAD)
    }

    pub fn render(&mut self, h: usize, w: usize) -> FrameBuffer {
        let mut fb = FrameBuffer::filled(h, w, self.background);
        if self.messages.is_empty() {
            return fb;
        }
        let y = (h as i32 - 7 * self.scale as i32) / 2;

        if self.space_equally {
            let slot = w / self.messages.len();
            for (i, msg) in self.messages.iter().enumerate() {
                let (_, tw) = text_size(msg, self.scale);
                let x = (i * slot) as i32 + (slot as i32 - tw as i32) / 2;
                draw_text(&mut fb, x, y, msg, self.color, self.scale);
            }
        } else {
            let (_, total_w) = self.render_size();
            let mut x = (w as i32 - total_w as i32) / 2 + PAD as i32;
            for msg in &self.messages {
                draw_text(&mut fb, x, y, msg, self.color, self.scale);
                x += (text_size(msg, self.scale).1 + self.gap()) as i32;
            }
        }
        fb
    }
}

/// Solid bar; its thickness is its natural size on both axes.
pub struct Separator {
    px: usize,
    color: u32,
}

impl Separator {
    pub fn new(px: usize, color: u32) -> Self {
        Self { px: px.max(1), color }
    }

    pub fn render_size(&self) -> (usize, usize) {
        (self.px, self.px)
    }

    pub fn render(&mut self, h: usize, w: usize) -> FrameBuffer {
        FrameBuffer::filled(h, w, self.color)
    }
}

/// Momentary push button.
pub struct Button {
    label: String,
    color: u32,
    clicked: bool,
}

impl Button {
    pub fn new(label: impl Into<String>, color: u32) -> Self {
        Self { label: label.into(), color, clicked: false }
    }

    /// True once per press.
    pub fn read(&mut self) -> bool {
        std::mem::take(&mut self.clicked)
    }

    pub fn on_cursor(&mut self, ev: &CursorEvent) {
        if ev.kind == PointerKind::Down && ev.is_in_region {
            self.clicked = true;
        }
    }

    pub fn render_size(&self) -> (usize, usize) {
        let (h, w) = padded_text_size(&self.label, TEXT_SCALE);
        (h + 4, w + 8)
    }

    pub fn render(&mut self, h: usize, w: usize, enabled: bool) -> FrameBuffer {
        let fill = if enabled { self.color } else { dim(self.color) };
        let mut fb = FrameBuffer::filled(h, w, fill);
        draw_rect(&mut fb, 0, 0, w as i32 - 1, h as i32 - 1, dim(fill), 2);
        let text = if enabled { TEXT_COLOR } else { dim(TEXT_COLOR) };
        draw_text_centered(&mut fb, &self.label, text, TEXT_SCALE);
        fb
    }
}

/// Two-state button. On its own a click flips it; inside a radio
/// constraint the constraint decides the state.
pub struct ToggleButton {
    label: String,
    on: bool,
    clicked: bool,
    changed: bool,
    on_color: u32,
    off_color: u32,
}

impl ToggleButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on: false,
            clicked: false,
            changed: true,
            on_color: rgb(40, 110, 200),
            off_color: rgb(70, 70, 76),
        }
    }

    pub fn with_state(mut self, on: bool) -> Self {
        self.on = on;
        self
    }

    /// One toggle per label, all off.
    pub fn many<I, S>(labels: I) -> Vec<ToggleButton>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels.into_iter().map(ToggleButton::new).collect()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// `(changed, is_on)`.
    pub fn read(&mut self) -> (bool, bool) {
        (std::mem::take(&mut self.changed), self.on)
    }

    pub fn on_cursor(&mut self, ev: &CursorEvent) {
        if ev.kind == PointerKind::Down && ev.is_in_region {
            self.on = !self.on;
            self.clicked = true;
            self.changed = true;
        }
    }

    pub fn render_size(&self) -> (usize, usize) {
        let (h, w) = padded_text_size(&self.label, TEXT_SCALE);
        (h + 4, w + 8)
    }

    pub fn render(&mut self, h: usize, w: usize, enabled: bool) -> FrameBuffer {
        let mut fill = if self.on { self.on_color } else { self.off_color };
        if !enabled {
            fill = dim(fill);
        }
        let mut fb = FrameBuffer::filled(h, w, fill);
        if self.on {
            draw_rect(&mut fb, 0, 0, w as i32 - 1, h as i32 - 1, ACCENT_COLOR, 2);
        }
        let text = if enabled { TEXT_COLOR } else { dim(TEXT_COLOR) };
        draw_text_centered(&mut fb, &self.label, text, TEXT_SCALE);
        fb
    }
}

impl Toggle for ToggleButton {
    fn take_click(&mut self) -> bool {
        std::mem::take(&mut self.clicked)
    }

    fn set_on(&mut self, on: bool) {
        if self.on != on {
            self.on = on;
            self.changed = true;
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

/// Selectable image tile (mask previews) with a highlight border when on
/// and optional text in the top-left corner.
pub struct ToggleImage {
    inner: ScaledImage,
    text: Option<String>,
    on: bool,
    clicked: bool,
    changed: bool,
    highlight: u32,
}

impl ToggleImage {
    pub fn new(image: FrameBuffer) -> Self {
        Self {
            inner: ScaledImage::new(image, FilterType::Nearest),
            text: None,
            on: false,
            clicked: false,
            changed: true,
            highlight: ACCENT_COLOR,
        }
    }

    pub fn with_highlight(mut self, color: u32) -> Self {
        self.highlight = color;
        self
    }

    pub fn set_image(&mut self, image: FrameBuffer) {
        self.inner.set(image);
    }

    pub fn image(&self) -> &FrameBuffer {
        &self.inner.source
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn read(&mut self) -> (bool, bool) {
        (std::mem::take(&mut self.changed), self.on)
    }

    pub fn on_cursor(&mut self, ev: &CursorEvent) {
        if ev.kind == PointerKind::Down && ev.is_in_region {
            self.on = !self.on;
            self.clicked = true;
            self.changed = true;
        }
    }

    pub fn render_size(&self) -> (usize, usize) {
        self.inner.source.hw()
    }

    pub fn render(&mut self, h: usize, w: usize, enabled: bool) -> FrameBuffer {
        let mut fb = self.inner.scaled(h, w).clone();
        if !enabled {
            fb.pixels.iter_mut().for_each(|p| *p = dim(*p));
        }
        let (fw, fh) = (fb.width, fb.height);
        let border = (fw.min(fh) / 40).clamp(2, 6);
        let color = if self.on { self.highlight } else { rgb(60, 60, 60) };
        draw_rect(&mut fb, 0, 0, fw as i32 - 1, fh as i32 - 1, color, border);
        if let Some(text) = &self.text {
            let scale = if fw >= 160 { 2 } else { 1 };
            draw_text(&mut fb, (border + 3) as i32, (border + 3) as i32, text, TEXT_COLOR, scale);
        }
        fb
    }
}

impl Toggle for ToggleImage {
    fn take_click(&mut self) -> bool {
        std::mem::take(&mut self.clicked)
    }

    fn set_on(&mut self, on: bool) {
        if self.on != on {
            self.on = on;
            self.changed = true;
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

/// Horizontal slider over `[min, max]`, optionally snapped to `step`.
pub struct Slider {
    label: String,
    min: f32,
    max: f32,
    step: f32,
    value: f32,
    markers: Vec<f32>,
    changed: bool,
    dragging: bool,
}

impl Slider {
    pub fn new(label: impl Into<String>, min: f32, max: f32, initial: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let mut slider =
            Self { label: label.into(), min, max, step: 0.0, value: min, markers: Vec::new(), changed: true, dragging: false };
        slider.value = slider.snap(initial);
        slider
    }

    /// Snap to multiples of `step` from `min`; 0 means continuous.
    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step.max(0.0);
        self.value = self.snap(self.value);
        self
    }

    /// Tick marks drawn under the track at these values.
    pub fn with_markers(mut self, markers: Vec<f32>) -> Self {
        self.markers = markers;
        self
    }

    fn snap(&self, v: f32) -> f32 {
        let v = if v.is_finite() { v.clamp(self.min, self.max) } else { self.min };
        if self.step > 0.0 {
            (self.min + ((v - self.min) / self.step).round() * self.step).clamp(self.min, self.max)
        } else {
            v
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Value as a fraction of the range.
    pub fn fraction(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 { 0.0 } else { (self.value - self.min) / span }
    }

    pub fn set_value(&mut self, v: f32) {
        let v = self.snap(v);
        if v != self.value {
            self.value = v;
            self.changed = true;
        }
    }

    fn nudge_amount(&self) -> f32 {
        if self.step > 0.0 { self.step } else { (self.max - self.min) / 100.0 }
    }

    pub fn increment(&mut self) {
        self.set_value(self.value + self.nudge_amount());
    }

    pub fn decrement(&mut self) {
        self.set_value(self.value - self.nudge_amount());
    }

    /// `(changed, value)`.
    pub fn read(&mut self) -> (bool, f32) {
        (std::mem::take(&mut self.changed), self.value)
    }

    /// Drop an ongoing drag.
    pub fn release(&mut self) {
        self.dragging = false;
    }

    fn set_from_fraction(&mut self, f: f32) {
        self.set_value(self.min + f * (self.max - self.min));
    }

    pub fn on_cursor(&mut self, ev: &CursorEvent) {
        match ev.kind {
            PointerKind::Down if ev.is_in_region => {
                self.dragging = true;
                self.set_from_fraction(ev.xy_norm.x);
            }
            PointerKind::Move if self.dragging => self.set_from_fraction(ev.xy_norm.x),
            PointerKind::Up => self.dragging = false,
            _ => {}
        }
    }

    pub fn render_size(&self) -> (usize, usize) {
        let (_, tw) = text_size(&self.caption(), TEXT_SCALE);
        (7 * TEXT_SCALE + 3 * PAD + 12, tw.max(200) + 2 * PAD)
    }

    fn caption(&self) -> String {
        format!("{}: {:.2}", self.label, self.value)
    }

    pub fn render(&mut self, h: usize, w: usize, enabled: bool) -> FrameBuffer {
        let mut fb = FrameBuffer::filled(h, w, PANEL_COLOR);
        let text = if enabled { TEXT_COLOR } else { dim(TEXT_COLOR) };
        draw_text(&mut fb, PAD as i32, PAD as i32 / 2, &self.caption(), text, TEXT_SCALE);

        let track_y = (h as i32 * 3) / 4;
        let track_w = w.saturating_sub(1).max(1) as f32;
        let to_x = |f: f32| (f.clamp(0.0, 1.0) * track_w).round() as i32;
        fill_rect(&mut fb, 0, track_y - 1, w, 3, rgb(90, 90, 96));
        let span = self.max - self.min;
        for &m in &self.markers {
            if span > 0.0 {
                fill_rect(&mut fb, to_x((m - self.min) / span), track_y + 3, 1, 4, text);
            }
        }
        let knob = if enabled { ACCENT_COLOR } else { dim(ACCENT_COLOR) };
        fill_rect(&mut fb, to_x(self.fraction()) - 3, track_y - 6, 7, 13, knob);
        fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::node::PointerEvent;

    fn cursor(kind: PointerKind, x: i32, y: i32, rect: Rect) -> CursorEvent {
        CursorEvent::new(&PointerEvent { kind, x, y }, rect)
    }

    #[test]
    fn image_display_keeps_aspect() {
        let mut img = ImageDisplay::new(FrameBuffer::filled(50, 100, rgb(9, 9, 9)));
        assert_eq!(img.render(100, 100).hw(), (50, 100));
        assert_eq!(img.render(10, 100).hw(), (10, 20));
    }

    #[test]
    fn toggle_image_border_follows_state() {
        let mut tile = ToggleImage::new(FrameBuffer::filled(40, 40, 0)).with_highlight(rgb(255, 0, 0));
        tile.set_on(true);
        let fb = tile.render(40, 40, true);
        assert_eq!(fb.hw(), (40, 40));
        assert_eq!(fb.pixels[20 * 40], rgb(255, 0, 0));
        assert_eq!(fb.pixels[20 * 40 + 20], 0);

        tile.set_on(false);
        assert_eq!(tile.render(40, 40, true).pixels[20 * 40], rgb(60, 60, 60));
    }

    #[test]
    fn button_click_reads_once() {
        let mut b = Button::new("Done", rgb(0, 120, 0));
        let rect = Rect::new(0, 0, 40, 20);
        b.on_cursor(&cursor(PointerKind::Down, 100, 100, rect));
        assert!(!b.read());
        b.on_cursor(&cursor(PointerKind::Down, 10, 10, rect));
        assert!(b.read());
        assert!(!b.read());
    }

    #[test]
    fn toggle_flips_and_reports_once() {
        let mut t = ToggleButton::new("Alpha");
        assert_eq!(t.read(), (true, false));
        assert_eq!(t.read(), (false, false));
        t.on_cursor(&cursor(PointerKind::Down, 1, 1, Rect::new(0, 0, 10, 10)));
        assert_eq!(t.read(), (true, true));
        assert!(t.take_click());
        assert!(!t.take_click());
    }

    #[test]
    fn slider_drag_steps_and_clamps() {
        let mut s = Slider::new("Zoom", 0.0, 1.0, 0.5).with_step(0.1);
        let rect = Rect::new(0, 0, 101, 20);
        let (changed, v) = s.read();
        assert!(changed && (v - 0.5).abs() < 1e-6);
        s.on_cursor(&cursor(PointerKind::Down, 20, 5, rect));
        s.on_cursor(&cursor(PointerKind::Move, 300, 5, rect));
        let (changed, v) = s.read();
        assert!(changed);
        assert!((v - 1.0).abs() < 1e-6);
        s.on_cursor(&cursor(PointerKind::Up, 300, 5, rect));
        s.on_cursor(&cursor(PointerKind::Move, 0, 5, rect));
        assert!(!s.read().0);
        s.decrement();
        assert!((s.read().1 - 0.9).abs() < 1e-6);
    }

    #[test]
    fn message_bar_fills_requested_size() {
        let mut bar = MessageBar::new(["Enter: done", "Esc: cancel"]).space_equally(true);
        let (h, w) = bar.render_size();
        assert!(h > 0 && w > 0);
        assert_eq!(bar.render(30, 500).hw(), (30, 500));
    }
}
