// Visual nodes: the closed set of things a layout tree can hold.
//
// A [`Node`] wraps one [`NodeKind`] together with the bookkeeping every node
// shares (id, debug name, enabled flag, size of the last render). Trees are
// owned top-down: stacks own their children, the caller owns the root.
// Controllers keep typed [`Handle`]s instead of references and look widgets
// up through the root each frame.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::Error;
use crate::geometry::{Rect, XYNorm};
use crate::overlays::{BoxSelectOverlay, CropBoxOverlay, HoverOverlay, PointSelectOverlay, PolygonsOverlay};
use crate::stack::{OverlayStack, Stack};
use crate::types::FrameBuffer;
use crate::widgets::{Button, ImageDisplay, MessageBar, Separator, Slider, TextBlock, ToggleButton, ToggleImage};

/// Process-unique node identity. Only used for lookups, never for ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Down,
    Up,
}

/// Raw pointer event in absolute pixel coordinates of the displayed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: i32,
    pub y: i32,
}

impl PointerEvent {
    pub fn moved(x: i32, y: i32) -> Self {
        Self { kind: PointerKind::Move, x, y }
    }

    pub fn down(x: i32, y: i32) -> Self {
        Self { kind: PointerKind::Down, x, y }
    }

    pub fn up(x: i32, y: i32) -> Self {
        Self { kind: PointerKind::Up, x, y }
    }
}

/// A pointer event as seen by the node receiving it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorEvent {
    pub kind: PointerKind,
    /// Position relative to the node's top-left corner (may lie outside it).
    pub xy_px: (i32, i32),
    /// Same position normalized to the node's size, clamped to `[0,1]`.
    pub xy_norm: XYNorm,
    /// (height, width) of the node's content rectangle.
    pub hw: (usize, usize),
    pub is_in_region: bool,
}

impl Default for CursorEvent {
    fn default() -> Self {
        Self { kind: PointerKind::Move, xy_px: (0, 0), xy_norm: XYNorm::CENTER, hw: (1, 1), is_in_region: false }
    }
}

impl CursorEvent {
    pub fn new(ev: &PointerEvent, rect: Rect) -> Self {
        let (lx, ly) = (ev.x - rect.x, ev.y - rect.y);
        Self {
            kind: ev.kind,
            xy_px: (lx, ly),
            xy_norm: XYNorm::from_px(lx, ly, rect.w, rect.h),
            hw: rect.hw(),
            is_in_region: rect.contains(ev.x, ev.y),
        }
    }
}

pub enum NodeKind {
    Image(ImageDisplay),
    Text(TextBlock),
    MessageBar(MessageBar),
    Separator(Separator),
    Button(Button),
    Toggle(ToggleButton),
    ToggleImage(ToggleImage),
    Slider(Slider),
    Stack(Stack),
    OverlayStack(OverlayStack),
    Hover(HoverOverlay),
    CropBox(CropBoxOverlay),
    BoxSelect(BoxSelectOverlay),
    PointSelect(PointSelectOverlay),
    Polygons(PolygonsOverlay),
}

impl NodeKind {
    fn label(&self) -> &'static str {
        match self {
            NodeKind::Image(_) => "Image",
            NodeKind::Text(_) => "Text",
            NodeKind::MessageBar(_) => "MessageBar",
            NodeKind::Separator(_) => "Separator",
            NodeKind::Button(_) => "Button",
            NodeKind::Toggle(_) => "Toggle",
            NodeKind::ToggleImage(_) => "ToggleImage",
            NodeKind::Slider(_) => "Slider",
            NodeKind::Stack(_) => "Stack",
            NodeKind::OverlayStack(_) => "OverlayStack",
            NodeKind::Hover(_) => "HoverOverlay",
            NodeKind::CropBox(_) => "CropBoxOverlay",
            NodeKind::BoxSelect(_) => "BoxSelectOverlay",
            NodeKind::PointSelect(_) => "PointSelectOverlay",
            NodeKind::Polygons(_) => "PolygonsOverlay",
        }
    }

    fn is_overlay(&self) -> bool {
        matches!(
            self,
            NodeKind::Hover(_) | NodeKind::CropBox(_) | NodeKind::BoxSelect(_) | NodeKind::PointSelect(_) | NodeKind::Polygons(_)
        )
    }
}

/// Conversion between a concrete widget type and its [`NodeKind`] variant.
pub trait Widget: Sized {
    fn into_kind(self) -> NodeKind;
    fn from_kind(kind: &NodeKind) -> Option<&Self>;
    fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self>;
}

macro_rules! widget_kind {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Widget for $ty {
            fn into_kind(self) -> NodeKind {
                NodeKind::$variant(self)
            }
            fn from_kind(kind: &NodeKind) -> Option<&Self> {
                match kind {
                    NodeKind::$variant(w) => Some(w),
                    _ => None,
                }
            }
            fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self> {
                match kind {
                    NodeKind::$variant(w) => Some(w),
                    _ => None,
                }
            }
        }
    )*};
}

widget_kind! {
    ImageDisplay => Image,
    TextBlock => Text,
    MessageBar => MessageBar,
    Separator => Separator,
    Button => Button,
    ToggleButton => Toggle,
    ToggleImage => ToggleImage,
    Slider => Slider,
    Stack => Stack,
    OverlayStack => OverlayStack,
    HoverOverlay => Hover,
    CropBoxOverlay => CropBox,
    BoxSelectOverlay => BoxSelect,
    PointSelectOverlay => PointSelect,
    PolygonsOverlay => Polygons,
}

/// Typed address of a widget living somewhere inside a layout tree.
pub struct Handle<T> {
    id: NodeId,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(#{})", self.id.0)
    }
}

pub struct Node {
    id: NodeId,
    debug_name: Option<String>,
    enabled: bool,
    last_hw: (usize, usize),
    kind: NodeKind,
}

impl<T: Widget> From<T> for Node {
    fn from(widget: T) -> Self {
        Node::new(widget)
    }
}

impl Node {
    pub fn new(widget: impl Widget) -> Self {
        Self { id: NodeId::next(), debug_name: None, enabled: true, last_hw: (0, 0), kind: widget.into_kind() }
    }

    /// Wrap a widget and return a handle for reaching it after it is moved into a tree.
    pub fn with_handle<T: Widget>(widget: T) -> (Node, Handle<T>) {
        let node = Node::new(widget);
        let handle = Handle { id: node.id, _kind: PhantomData };
        (node, handle)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.set_debug_name(name);
        self
    }

    /// Diagnostics only; has no effect on layout or input.
    pub fn set_debug_name(&mut self, name: impl Into<String>) {
        self.debug_name = Some(name.into());
    }

    pub fn debug_name(&self) -> &str {
        self.debug_name.as_deref().unwrap_or(self.kind.label())
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// (height, width) of the most recent render, (0, 0) before the first one.
    pub fn last_hw(&self) -> (usize, usize) {
        self.last_hw
    }

    /// Enable or disable input (and, for overlays, drawing).
    /// Stacks pass the change down to their children; overlay stacks only to their base,
    /// since each overlay is switched individually by its owning tool.
    pub fn enable(&mut self, on: bool) {
        self.enabled = on;
        match &mut self.kind {
            NodeKind::Stack(s) => s.children.iter_mut().for_each(|c| c.enable(on)),
            NodeKind::OverlayStack(o) => o.base.enable(on),
            NodeKind::Hover(h) if !on => h.clear(),
            NodeKind::CropBox(c) if !on => c.release(),
            NodeKind::BoxSelect(b) if !on => b.cancel_drag(),
            NodeKind::Slider(s) if !on => s.release(),
            _ => {}
        }
    }

    /// Natural (height, width) this node would like to be rendered at.
    pub fn render_size(&self) -> (usize, usize) {
        match &self.kind {
            NodeKind::Image(w) => w.render_size(),
            NodeKind::Text(w) => w.render_size(),
            NodeKind::MessageBar(w) => w.render_size(),
            NodeKind::Separator(w) => w.render_size(),
            NodeKind::Button(w) => w.render_size(),
            NodeKind::Toggle(w) => w.render_size(),
            NodeKind::ToggleImage(w) => w.render_size(),
            NodeKind::Slider(w) => w.render_size(),
            NodeKind::Stack(w) => w.render_size(),
            NodeKind::OverlayStack(w) => w.render_size(),
            _ => (1, 1),
        }
    }

    /// Expanding nodes soak up leftover space in a stack.
    pub fn is_expanding(&self) -> bool {
        match &self.kind {
            NodeKind::Image(_) | NodeKind::ToggleImage(_) => true,
            NodeKind::Stack(s) => s.children.iter().any(Node::is_expanding),
            NodeKind::OverlayStack(o) => o.base.is_expanding(),
            _ => false,
        }
    }

    /// Render into a buffer no larger than (h, w). Zero sizes are bumped to 1.
    pub fn render(&mut self, h: usize, w: usize) -> FrameBuffer {
        let (h, w) = (h.max(1), w.max(1));
        if self.kind.is_overlay() {
            let mut frame = FrameBuffer::filled(h, w, 0);
            self.draw_overlay(&mut frame);
            return frame;
        }

        let enabled = self.enabled;
        let frame = match &mut self.kind {
            NodeKind::Image(n) => n.render(h, w),
            NodeKind::Text(n) => n.render(h, w),
            NodeKind::MessageBar(n) => n.render(h, w),
            NodeKind::Separator(n) => n.render(h, w),
            NodeKind::Button(n) => n.render(h, w, enabled),
            NodeKind::Toggle(n) => n.render(h, w, enabled),
            NodeKind::ToggleImage(n) => n.render(h, w, enabled),
            NodeKind::Slider(n) => n.render(h, w, enabled),
            NodeKind::Stack(n) => n.render(h, w),
            NodeKind::OverlayStack(n) => n.render(h, w),
            _ => FrameBuffer::filled(h, w, 0),
        };
        self.last_hw = frame.hw();
        if let Some(name) = &self.debug_name {
            log::trace!("render {name}: asked {h}x{w}, got {}x{}", frame.height, frame.width);
        }
        frame
    }

    /// Render at height `h`, deriving the width from the natural aspect ratio.
    pub fn render_to_height(&mut self, h: usize) -> FrameBuffer {
        let (nh, nw) = self.render_size();
        let w = ((nw.max(1) as f64) * (h as f64) / (nh.max(1) as f64)).round() as usize;
        self.render(h, w)
    }

    /// Draw this node on top of `frame`, sharing its coordinate frame.
    /// Overlays draw annotations; any other node is rendered at the frame size and pasted opaque.
    pub fn draw_overlay(&mut self, frame: &mut FrameBuffer) {
        self.last_hw = frame.hw();
        let enabled = self.enabled;
        let visible = |show_when_disabled: bool| enabled || show_when_disabled;
        match &mut self.kind {
            NodeKind::Hover(o) if visible(false) => o.draw(frame),
            NodeKind::CropBox(o) if visible(o.show_when_disabled) => o.draw(frame),
            NodeKind::BoxSelect(o) if visible(o.show_when_disabled) => o.draw(frame),
            NodeKind::PointSelect(o) if visible(o.show_when_disabled) => o.draw(frame),
            NodeKind::Polygons(o) if visible(o.show_when_disabled) => o.draw(frame),
            kind if !kind.is_overlay() => {
                let (h, w) = frame.hw();
                let content = self.render(h, w);
                let x = (w - content.width) / 2;
                let y = (h - content.height) / 2;
                frame.blit(&content, x as i32, y as i32);
            }
            _ => {}
        }
    }

    /// Route a pointer event, given this node's absolute content rectangle.
    pub fn on_pointer(&mut self, ev: &PointerEvent, rect: Rect) {
        if !self.enabled {
            return;
        }
        let cursor = CursorEvent::new(ev, rect);
        match &mut self.kind {
            NodeKind::Stack(n) => n.on_pointer(ev, rect),
            NodeKind::OverlayStack(n) => n.on_pointer(ev, rect),
            NodeKind::Button(n) => n.on_cursor(&cursor),
            NodeKind::Toggle(n) => n.on_cursor(&cursor),
            NodeKind::ToggleImage(n) => n.on_cursor(&cursor),
            NodeKind::Slider(n) => n.on_cursor(&cursor),
            NodeKind::Hover(n) => n.on_cursor(&cursor),
            NodeKind::CropBox(n) => n.on_cursor(&cursor),
            NodeKind::BoxSelect(n) => n.on_cursor(&cursor),
            NodeKind::PointSelect(n) => n.on_cursor(&cursor),
            NodeKind::Image(_) | NodeKind::Text(_) | NodeKind::MessageBar(_) | NodeKind::Separator(_) | NodeKind::Polygons(_) => {}
        }
    }

    /// Entry point for events coming from the window: this node is the root,
    /// drawn at the origin with the size of its last render.
    pub fn dispatch(&mut self, ev: PointerEvent) {
        let rect = Rect::from_hw(self.last_hw);
        self.on_pointer(&ev, rect);
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        match &self.kind {
            NodeKind::Stack(s) => s.children.iter().find_map(|c| c.find(id)),
            NodeKind::OverlayStack(o) => o.base.find(id).or_else(|| o.overlays.iter().find_map(|c| c.find(id))),
            _ => None,
        }
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        match &mut self.kind {
            NodeKind::Stack(s) => s.children.iter_mut().find_map(|c| c.find_mut(id)),
            NodeKind::OverlayStack(o) => {
                let OverlayStack { base, overlays, .. } = o;
                if let Some(found) = base.find_mut(id) {
                    return Some(found);
                }
                overlays.iter_mut().find_map(|c| c.find_mut(id))
            }
            _ => None,
        }
    }

    /// Absolute content rectangle of node `id` from the last render, with this node at the origin.
    pub fn locate(&self, id: NodeId) -> Option<Rect> {
        self.locate_in(id, Rect::from_hw(self.last_hw))
    }

    fn locate_in(&self, id: NodeId, rect: Rect) -> Option<Rect> {
        if self.id == id {
            return Some(rect);
        }
        match &self.kind {
            NodeKind::Stack(s) => s
                .children
                .iter()
                .zip(s.child_rects())
                .find_map(|(c, r)| c.locate_in(id, r.translate(rect.x, rect.y))),
            NodeKind::OverlayStack(o) => {
                let base = o.base_rect().translate(rect.x, rect.y);
                o.base.locate_in(id, base).or_else(|| o.overlays.iter().find_map(|c| c.locate_in(id, base)))
            }
            _ => None,
        }
    }

    pub fn get<T: Widget>(&self, handle: Handle<T>) -> Option<&T> {
        self.find(handle.id).and_then(|n| T::from_kind(&n.kind))
    }

    pub fn get_mut<T: Widget>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.find_mut(handle.id).and_then(|n| T::from_kind_mut(&mut n.kind))
    }

    /// Like [`Node::get_mut`], but a missing widget is an error.
    pub fn widget_mut<T: Widget>(&mut self, handle: Handle<T>) -> Result<&mut T, Error> {
        self.get_mut(handle).ok_or(Error::MissingWidget(handle.id.0))
    }

    /// Enable/disable whichever node carries `id`. Returns false if it isn't in this tree.
    pub fn enable_id(&mut self, id: NodeId, on: bool) -> bool {
        match self.find_mut(id) {
            Some(node) => {
                node.enable(on);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.0)
            .field("name", &self.debug_name())
            .field("enabled", &self.enabled)
            .field("last_hw", &self.last_hw)
            .finish()
    }
}
