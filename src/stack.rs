// Stacks: lay children out along one axis, or layer overlays over a base.

use crate::draw::fill_rect;
use crate::geometry::Rect;
use crate::node::{Node, PointerEvent, PointerKind};
use crate::types::{FrameBuffer, rgb};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Length of `hw` along this axis.
    fn main(self, (h, w): (usize, usize)) -> usize {
        match self {
            Axis::Vertical => h,
            Axis::Horizontal => w,
        }
    }

    fn cross(self, (h, w): (usize, usize)) -> usize {
        match self {
            Axis::Vertical => w,
            Axis::Horizontal => h,
        }
    }

    /// Rebuild (h, w) from main/cross lengths.
    fn hw(self, main: usize, cross: usize) -> (usize, usize) {
        match self {
            Axis::Vertical => (main, cross),
            Axis::Horizontal => (cross, main),
        }
    }

    /// (x, y) of a point `offset` pixels along this axis.
    fn origin(self, offset: usize) -> (i32, i32) {
        match self {
            Axis::Vertical => (0, offset as i32),
            Axis::Horizontal => (offset as i32, 0),
        }
    }
}

pub const DEFAULT_PAD_COLOR: u32 = rgb(0, 0, 0);

/// Split `total` into shares proportional to `weights` that sum exactly to `total`.
/// All-zero (or empty) weights split evenly.
pub fn split_proportional(total: usize, weights: &[usize]) -> Vec<usize> {
    if weights.is_empty() {
        return Vec::new();
    }
    let sum: usize = weights.iter().sum();
    if sum == 0 {
        return split_evenly(total, weights.len());
    }

    let mut shares = Vec::with_capacity(weights.len());
    let mut cum = 0usize;
    let mut prev_edge = 0usize;
    for &w in weights {
        cum += w;
        // Edges rounded from the running total, so rounding error never accumulates
        let edge = ((total as u128 * cum as u128 + sum as u128 / 2) / sum as u128) as usize;
        shares.push(edge - prev_edge);
        prev_edge = edge;
    }
    shares
}

/// Equal shares, remainder handed to the first children.
pub fn split_evenly(total: usize, n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let (base, rem) = (total / n, total % n);
    (0..n).map(|i| base + usize::from(i < rem)).collect()
}

/// Horizontal or vertical sequence of children.
pub struct Stack {
    pub(crate) children: Vec<Node>,
    axis: Axis,
    space_equally: bool,
    separator: Option<(usize, u32)>,
    pad_color: u32,
    // Content rect of each child relative to this stack, from the last render
    rects: Vec<Rect>,
}

impl Stack {
    pub fn new(axis: Axis, children: Vec<Node>) -> Self {
        Self { children, axis, space_equally: false, separator: None, pad_color: DEFAULT_PAD_COLOR, rects: Vec::new() }
    }

    pub fn vertical(children: Vec<Node>) -> Self {
        Self::new(Axis::Vertical, children)
    }

    pub fn horizontal(children: Vec<Node>) -> Self {
        Self::new(Axis::Horizontal, children)
    }

    /// Give every child the same share of the axis regardless of natural size.
    pub fn space_equally(mut self, on: bool) -> Self {
        self.space_equally = on;
        self
    }

    /// Draw a `px`-thick bar of `color` between consecutive children.
    pub fn with_separator(mut self, px: usize, color: u32) -> Self {
        self.separator = Some((px, color));
        self
    }

    pub fn with_pad_color(mut self, color: u32) -> Self {
        self.pad_color = color;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Content rectangles (relative to this stack) recorded by the last render.
    pub fn child_rects(&self) -> &[Rect] {
        &self.rects
    }

    fn separator_total(&self) -> usize {
        match self.separator {
            Some((px, _)) => px * self.children.len().saturating_sub(1),
            None => 0,
        }
    }

    pub fn render_size(&self) -> (usize, usize) {
        let mut main = self.separator_total();
        let mut cross = 0;
        for child in &self.children {
            let hw = child.render_size();
            main += self.axis.main(hw);
            cross = cross.max(self.axis.cross(hw));
        }
        self.axis.hw(main.max(1), cross.max(1))
    }

    /// Lengths along the axis for every child, summing to `length`.
    fn allot(&self, length: usize) -> Vec<usize> {
        let n = self.children.len();
        if self.space_equally {
            return split_evenly(length, n);
        }

        let naturals: Vec<usize> = self.children.iter().map(|c| self.axis.main(c.render_size())).collect();
        let expanding: Vec<bool> = self.children.iter().map(Node::is_expanding).collect();
        if !expanding.iter().any(|&e| e) {
            return split_proportional(length, &naturals);
        }

        let fixed_sum: usize = naturals.iter().zip(&expanding).filter(|(_, e)| !**e).map(|(n, _)| *n).sum();
        let mut shares = vec![0usize; n];
        if fixed_sum >= length {
            let fixed: Vec<usize> = naturals.iter().zip(&expanding).map(|(&n, &e)| if e { 0 } else { n }).collect();
            let scaled = split_proportional(length, &fixed);
            // Expanding children got zero weight, so they come out at zero
            shares.copy_from_slice(&scaled);
            return shares;
        }

        let grow: Vec<usize> = naturals.iter().zip(&expanding).map(|(&n, &e)| if e { n } else { 0 }).collect();
        let extra = split_proportional(length - fixed_sum, &grow);
        for i in 0..n {
            shares[i] = if expanding[i] { extra[i] } else { naturals[i] };
        }
        shares
    }

    /// Always returns exactly (h, w).
    pub fn render(&mut self, h: usize, w: usize) -> FrameBuffer {
        let mut out = FrameBuffer::filled(h, w, self.pad_color);
        self.rects.clear();
        if self.children.is_empty() {
            return out;
        }

        let axis = self.axis;
        let total = axis.main((h, w));
        let cross = axis.cross((h, w));
        let sep_total = self.separator_total().min(total);
        let shares = self.allot(total - sep_total);
        let separator = match self.separator {
            Some((_, color)) if self.children.len() > 1 => Some((sep_total / (self.children.len() - 1), color)),
            _ => None,
        };

        let mut offset = 0usize;
        for (i, (child, &share)) in self.children.iter_mut().zip(&shares).enumerate() {
            if let Some((sep_px, color)) = separator.filter(|&(px, _)| i > 0 && px > 0) {
                let (sh, sw) = axis.hw(sep_px, cross);
                let (sx, sy) = axis.origin(offset);
                fill_rect(&mut out, sx, sy, sw, sh, color);
                offset += sep_px;
            }

            let (cell_x, cell_y) = axis.origin(offset);
            if share == 0 || cross == 0 {
                // Nothing visible; keep an empty rect so hit-testing skips it
                self.rects.push(Rect::new(cell_x, cell_y, 0, 0));
                continue;
            }

            let (cell_h, cell_w) = axis.hw(share, cross);
            let content = child.render(cell_h, cell_w);
            let (ch, cw) = (content.height.min(cell_h), content.width.min(cell_w));
            let x = cell_x + ((cell_w - cw) / 2) as i32;
            let y = cell_y + ((cell_h - ch) / 2) as i32;
            out.blit(&content, x, y);
            self.rects.push(Rect::new(x, y, cw, ch));
            offset += share;
        }
        out
    }

    /// Press events go to the child under the pointer; moves and releases go to everyone.
    pub fn on_pointer(&mut self, ev: &PointerEvent, rect: Rect) {
        let pressed = ev.kind == PointerKind::Down;
        let mut pressed_delivered = false;
        for (child, local) in self.children.iter_mut().zip(&self.rects) {
            let abs = local.translate(rect.x, rect.y);
            if pressed {
                if pressed_delivered || !abs.contains(ev.x, ev.y) {
                    continue;
                }
                pressed_delivered = true;
            }
            child.on_pointer(ev, abs);
        }
    }
}

/// A base node with overlays drawn on top, all sharing the base's frame.
pub struct OverlayStack {
    pub(crate) base: Box<Node>,
    pub(crate) overlays: Vec<Node>,
    base_rect: Rect,
}

impl OverlayStack {
    pub fn new(base: Node, overlays: Vec<Node>) -> Self {
        Self { base: Box::new(base), overlays, base_rect: Rect::default() }
    }

    pub fn base(&self) -> &Node {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut Node {
        &mut self.base
    }

    /// Where the base was drawn by the last render, relative to this stack.
    pub fn base_rect(&self) -> Rect {
        self.base_rect
    }

    pub fn overlays(&self) -> &[Node] {
        &self.overlays
    }

    /// Later overlays draw over earlier ones.
    pub fn push_overlay(&mut self, overlay: Node) {
        self.overlays.push(overlay);
    }

    pub fn render_size(&self) -> (usize, usize) {
        self.base.render_size()
    }

    /// Returns the base's own (possibly smaller) frame with every overlay drawn on it.
    pub fn render(&mut self, h: usize, w: usize) -> FrameBuffer {
        let mut frame = self.base.render(h, w);
        for overlay in &mut self.overlays {
            overlay.draw_overlay(&mut frame);
        }
        self.base_rect = Rect::from_hw(frame.hw());
        frame
    }

    pub fn on_pointer(&mut self, ev: &PointerEvent, rect: Rect) {
        let abs = self.base_rect.translate(rect.x, rect.y);
        self.base.on_pointer(ev, abs);
        for overlay in &mut self.overlays {
            overlay.on_pointer(ev, abs);
        }
    }
}
